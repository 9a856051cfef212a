/// A growable collection of triangles, each stored as three values of type `V`.
///
/// `V` is a vertex id for [IndexedListFormat](crate::formats::IndexedListFormat) and the
/// vertex itself for [DeindexedListFormat](crate::formats::DeindexedListFormat).
pub trait List<V> {
    /// Appends a triangle
    fn push_triangle(&mut self, v0: V, v1: V, v2: V);

    /// The number of triangles stored, including any present before triangulation
    fn triangle_count(&self) -> usize;

    /// Removes triangles from the end until `count` remain
    fn truncate_triangles(&mut self, count: usize);
}

/// A flat list, three consecutive values per triangle
impl<V> List<V> for Vec<V> {
    fn push_triangle(&mut self, v0: V, v1: V, v2: V) {
        self.extend([v0, v1, v2]);
    }

    fn triangle_count(&self) -> usize {
        self.len() / 3
    }

    fn truncate_triangles(&mut self, count: usize) {
        self.truncate(count * 3)
    }
}

impl<V> List<V> for Vec<[V; 3]> {
    fn push_triangle(&mut self, v0: V, v1: V, v2: V) {
        self.push([v0, v1, v2]);
    }

    fn triangle_count(&self) -> usize {
        self.len()
    }

    fn truncate_triangles(&mut self, count: usize) {
        self.truncate(count)
    }
}

impl<V> List<V> for Vec<(V, V, V)> {
    fn push_triangle(&mut self, v0: V, v1: V, v2: V) {
        self.push((v0, v1, v2));
    }

    fn triangle_count(&self) -> usize {
        self.len()
    }

    fn truncate_triangles(&mut self, count: usize) {
        self.truncate(count)
    }
}

impl<V, L: List<V>> List<V> for &mut L {
    fn push_triangle(&mut self, v0: V, v1: V, v2: V) {
        (**self).push_triangle(v0, v1, v2)
    }

    fn triangle_count(&self) -> usize {
        (**self).triangle_count()
    }

    fn truncate_triangles(&mut self, count: usize) {
        (**self).truncate_triangles(count)
    }
}
