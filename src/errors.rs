use std::{convert::Infallible, error, fmt};

use backtrace::Backtrace;

/// Describes why the input geometry cannot be triangulated even though it is well formed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum Degeneracy {
    /// Two vertices share the same coordinates (this includes zero-length polygon edges)
    DuplicatePoint(usize, usize),
    /// The boundary or a hole encloses no area
    ZeroArea,
    /// A vertex lies exactly on the interior of a polygon edge
    PointOnConstraint {
        /// The vertex lying on the edge
        point: usize,
        /// The endpoints of the polygon edge
        edge: (usize, usize),
    },
}

impl fmt::Display for Degeneracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicatePoint(a, b) => write!(f, "Vertices {} and {} are coincident", a, b),
            Self::ZeroArea => write!(f, "Polygon has zero area"),
            Self::PointOnConstraint { point, edge: (p, q) } => write!(f, "Vertex {} lies on the edge {} -> {}", point, p, q),
        }
    }
}

#[derive(Debug)]
pub struct InternalError {
    pub msg: String,
    pub backtrace: Backtrace,
}

impl InternalError {
    #[cold]
    #[inline(always)]
    pub(crate) fn new(msg: impl Into<String>) -> Self {
        Self {
            msg: msg.into(),
            backtrace: Backtrace::new_unresolved(),
        }
    }
}

impl fmt::Display for InternalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{:?}", self.msg, self.backtrace)
    }
}

impl error::Error for InternalError { }

/// Describes an error which occurred during triangulation.
///
/// `LBError` is the error type of the [ListBuilder](crate::ListBuilder) receiving the output,
/// if there is one.
#[derive(Debug)]
#[non_exhaustive]
pub enum TriangulationError<LBError: error::Error = Infallible> {
    /// A boundary or hole polygon was provided with fewer than 3 vertices
    NotEnoughVertices(usize),
    /// The vertex with the given id has a NaN or infinite coordinate
    NonFiniteCoordinate(usize),
    /// The input is well formed but degenerate in a way the sweep cannot represent
    DegenerateInput(Degeneracy),
    /// Polygon edges intersect each other, so the boundary or a hole is not a simple polygon.
    /// `edge` is the polygon edge being inserted when the intersection was found.
    NonSimplePolygon { edge: (usize, usize) },
    /// The hole with the given index (in insertion order) is not strictly inside the boundary
    HoleOutsideBoundary(usize),
    /// A vertex of one hole lies inside or on the outline of another. Holes are given by index.
    OverlappingHoles(usize, usize),
    /// The Steiner point with the given vertex id is outside the boundary, or inside a hole
    PointOutsideDomain(usize),
    /// A sweep invariant was violated. This indicates either input which slipped past validation
    /// (e.g. hole edges crossing without either hole containing a vertex of the other) or a triangulation bug.
    InternalError(InternalError),
    /// The [ListBuilder](crate::ListBuilder) returned an error.
    ListBuilder(LBError),
}

impl TriangulationError {
    /// Widen a sweep error to the error type of a particular [ListBuilder](crate::ListBuilder)
    pub(crate) fn with_builder_error<LBError: error::Error>(self) -> TriangulationError<LBError> {
        match self {
            Self::NotEnoughVertices(count) => TriangulationError::NotEnoughVertices(count),
            Self::NonFiniteCoordinate(vi) => TriangulationError::NonFiniteCoordinate(vi),
            Self::DegenerateInput(degeneracy) => TriangulationError::DegenerateInput(degeneracy),
            Self::NonSimplePolygon { edge } => TriangulationError::NonSimplePolygon { edge },
            Self::HoleOutsideBoundary(hole) => TriangulationError::HoleOutsideBoundary(hole),
            Self::OverlappingHoles(a, b) => TriangulationError::OverlappingHoles(a, b),
            Self::PointOutsideDomain(vi) => TriangulationError::PointOutsideDomain(vi),
            Self::InternalError(error) => TriangulationError::InternalError(error),
            Self::ListBuilder(infallible) => match infallible { },
        }
    }
}

impl<LBError: error::Error> From<InternalError> for TriangulationError<LBError> {
    fn from(e: InternalError) -> Self {
        Self::InternalError(e)
    }
}

impl<LBError: error::Error> fmt::Display for TriangulationError<LBError> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotEnoughVertices(vertices) => write!(f, "Polygon only contains {} vertices", vertices),
            Self::NonFiniteCoordinate(vi) => write!(f, "Vertex {} has a non-finite coordinate", vi),
            Self::DegenerateInput(degeneracy) => write!(f, "Degenerate input: {}", degeneracy),
            Self::NonSimplePolygon { edge: (p, q) } => write!(f, "Polygon edge {} -> {} intersects another polygon edge", p, q),
            Self::HoleOutsideBoundary(hole) => write!(f, "Hole {} is not strictly inside the boundary polygon", hole),
            Self::OverlappingHoles(a, b) => write!(f, "Holes {} and {} overlap", a, b),
            Self::PointOutsideDomain(vi) => write!(f, "Steiner point {} is outside the triangulated region", vi),
            Self::InternalError(error) => fmt::Display::fmt(error, f),
            Self::ListBuilder(error) => fmt::Display::fmt(error, f),
        }
    }
}

impl<LBError: error::Error> std::error::Error for TriangulationError<LBError> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InternalError(error) => Some(error),
            Self::ListBuilder(error) => error.source(), // This should be Some(error), but that forces restricting LBError to 'static.
            _ => None,
        }
    }
}
