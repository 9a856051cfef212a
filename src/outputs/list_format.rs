use std::error;

use crate::{TriangleWinding, TriangulationError};

/// Describes how the triangles of a [Cdt](crate::Cdt) are written out
pub trait ListFormat<'v, V> {
    /// The type receiving the triangles.
    ///
    /// This can be `Self` if a type implements both [ListFormat] and [ListBuilder].
    type Builder: ListBuilder<'v, V> + Sized;

    /// Creates the [ListFormat::Builder]. `vertices` are the input vertices, indexed by vertex id.
    fn initialize(self, vertices: &'v [V]) -> Result<Self::Builder, <Self::Builder as ListBuilder<'v, V>>::Error>;
}

/// Receives the triangles of a finished triangulation
pub trait ListBuilder<'v, V> {
    /// The triangle list output type
    type Output;
    /// The error type when the builder fails
    type Error: error::Error;

    /// The winding direction this builder expects for triangles
    const WINDING: TriangleWinding = TriangleWinding::Counterclockwise;

    /// Adds a triangle given by vertex ids, in [ListBuilder::WINDING] order
    fn add_triangle(&mut self, vi0: usize, vi1: usize, vi2: usize) -> Result<(), Self::Error>;

    /// Called once every triangle has been added
    fn build(self) -> Result<Self::Output, Self::Error>;

    /// Called instead of [ListBuilder::build] when triangulation fails, including when
    /// [ListBuilder::add_triangle] returned an error.
    ///
    /// Any cleanup (e.g. removing the triangles already added to an existing [Vec]) should be done here.
    fn fail(self, error: &TriangulationError<Self::Error>);
}
