use std::marker::PhantomData;

use crate::List;

/// Wraps a [List] and remembers how many triangles it held before triangulation started
pub(crate) struct GenericList<L: List<V>, V> {
    list: L,
    initial_count: usize,
    _phantom: PhantomData<V>,
}

impl<L: List<V>, V> GenericList<L, V> {
    pub fn new(list: L) -> Self {
        let initial_count = list.triangle_count();
        Self {
            list,
            initial_count,
            _phantom: PhantomData,
        }
    }

    pub fn push(&mut self, v0: V, v1: V, v2: V) {
        self.list.push_triangle(v0, v1, v2);
    }

    pub fn build(self) -> L {
        self.list
    }

    /// Drops the triangles added since [GenericList::new]
    pub fn fail(mut self) {
        self.list.truncate_triangles(self.initial_count);
    }
}
