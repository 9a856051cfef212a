mod vertex;
pub use vertex::Vertex;
pub(crate) use vertex::Coords;
