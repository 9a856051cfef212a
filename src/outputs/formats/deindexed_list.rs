use crate::{List, ListBuilder, ListFormat, TriangleWinding, TriangulationError};

use super::GenericList;

/// A [ListFormat] which outputs each triangle as copies of its three input vertices
#[derive(Debug)]
pub struct DeindexedListFormat<L> {
    list: L,
    winding: TriangleWinding,
}

impl<L> DeindexedListFormat<L> {
    /// Create a deindexed format which appends counterclockwise triangles to the given [List]
    pub fn new(list: L) -> Self {
        Self { list, winding: TriangleWinding::Counterclockwise }
    }

    /// Output triangles in the given winding instead
    pub fn with_winding(self, winding: TriangleWinding) -> Self {
        Self { winding, ..self }
    }
}

impl<'v, V: 'v + Clone, L: List<V>> ListFormat<'v, V> for DeindexedListFormat<L> {
    type Builder = DeindexedListBuilder<'v, V, L>;

    fn initialize(self, vertices: &'v [V]) -> Result<Self::Builder, <Self::Builder as ListBuilder<'v, V>>::Error> {
        Ok(DeindexedListBuilder {
            list: GenericList::new(self.list),
            winding: self.winding,
            vertices,
        })
    }
}

pub struct DeindexedListBuilder<'v, V: Clone, L: List<V>> {
    list: GenericList<L, V>,
    winding: TriangleWinding,
    vertices: &'v [V],
}

impl<'v, V: 'v + Clone, L: List<V>> ListBuilder<'v, V> for DeindexedListBuilder<'v, V, L> {
    type Output = L;
    type Error = std::convert::Infallible;

    fn add_triangle(&mut self, vi0: usize, vi1: usize, vi2: usize) -> Result<(), Self::Error> {
        let [v0, v1, v2] = self.winding.arrange([&self.vertices[vi0], &self.vertices[vi1], &self.vertices[vi2]]);
        self.list.push(v0.clone(), v1.clone(), v2.clone());
        Ok(())
    }

    fn build(self) -> Result<Self::Output, Self::Error> {
        Ok(self.list.build())
    }

    fn fail(self, _error: &TriangulationError<Self::Error>) {
        self.list.fail();
    }
}
