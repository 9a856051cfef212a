use std::marker::PhantomData;

use crate::{List, ListBuilder, ListFormat, TriangleWinding, TriangulationError};

use super::GenericList;

/// A [ListFormat] which outputs each triangle as three vertex ids
#[derive(Debug)]
pub struct IndexedListFormat<L: List<usize>> {
    list: L,
    winding: TriangleWinding,
}

impl<L: List<usize>> IndexedListFormat<L> {
    /// Create an indexed format which appends counterclockwise triangles to the given [List]
    pub fn new(list: L) -> Self {
        Self { list, winding: TriangleWinding::Counterclockwise }
    }

    /// Output triangles in the given winding instead
    pub fn with_winding(self, winding: TriangleWinding) -> Self {
        Self { winding, ..self }
    }
}

impl<'v, V: 'v, L: List<usize>> ListFormat<'v, V> for IndexedListFormat<L> {
    type Builder = IndexedListBuilder<'v, V, L>;

    fn initialize(self, _vertices: &'v [V]) -> Result<Self::Builder, <Self::Builder as ListBuilder<'v, V>>::Error> {
        Ok(IndexedListBuilder {
            list: GenericList::new(self.list),
            winding: self.winding,
            _phantom: PhantomData,
        })
    }
}

pub struct IndexedListBuilder<'v, V, L: List<usize>> {
    list: GenericList<L, usize>,
    winding: TriangleWinding,
    _phantom: PhantomData<&'v [V]>,
}

impl<'v, V: 'v, L: List<usize>> ListBuilder<'v, V> for IndexedListBuilder<'v, V, L> {
    type Output = L;
    type Error = std::convert::Infallible;

    fn add_triangle(&mut self, vi0: usize, vi1: usize, vi2: usize) -> Result<(), Self::Error> {
        let [vi0, vi1, vi2] = self.winding.arrange([vi0, vi1, vi2]);
        self.list.push(vi0, vi1, vi2);
        Ok(())
    }

    fn build(self) -> Result<Self::Output, Self::Error> {
        Ok(self.list.build())
    }

    fn fail(self, _error: &TriangulationError<Self::Error>) {
        self.list.fail();
    }
}
