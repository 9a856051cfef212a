//! Constrained Delaunay triangulation of simple polygons with holes and Steiner points.
//!
//! Points are swept bottom to top while an advancing front of triangles grows behind the sweep
//! line. Each polygon edge is inserted once the sweep reaches its upper endpoint, by flipping
//! the triangles it crosses. The triangles inside the boundary and outside every hole form the
//! resulting [Mesh].

mod idx;
mod math;
mod edge;
mod triangle;
mod advancing_front;
mod sweep_context;
mod sweep;
mod validation;
mod mesh;
mod cdt;
mod inputs;
mod outputs;
mod errors;

#[cfg(feature = "debugging")]
pub(crate) mod debug;

#[cfg(any(test, feature = "benchmarking"))]
pub mod tests;

pub use cdt::Cdt;
pub use errors::{Degeneracy, InternalError, TriangulationError};
pub use mesh::{Mesh, Triangle};
pub use sweep::SweepStats;

pub use inputs::Vertex;
pub use outputs::*;

pub use num_traits::real::Real;
