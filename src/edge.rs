use std::fmt;

use num_traits::real::Real;

use crate::{errors::{Degeneracy, InternalError, TriangulationError}, idx::{Idx, IdxDisplay}, sweep_context::{PointId, SweepPoint}};

pub(crate) type EdgeId<C> = Idx<Edge<C>>;

/// One constrained polygon edge.
///
/// The endpoints are normalised on construction so that `upper` comes later in the sweep
/// (greater `y`, ties broken by greater `x`). The edge is registered with its upper point,
/// which is where the sweep inserts it.
#[derive(Debug, Clone)]
pub(crate) struct Edge<C: Real> {
    upper: PointId<C>,
    lower: PointId<C>,
}

impl<C: Real> IdxDisplay for Edge<C> {
    fn fmt(f: &mut fmt::Formatter<'_>, idx: usize) -> fmt::Result {
        write!(f, "e{}", idx)
    }
}

impl<C: Real> fmt::Display for Edge<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.lower, self.upper)
    }
}

impl<C: Real> Edge<C> {
    pub fn new(points: &[SweepPoint<C>], p1: PointId<C>, p2: PointId<C>) -> Result<Self, TriangulationError> {
        let (c1, c2) = (points[p1].coords(), points[p2].coords());
        match c1.partial_cmp(&c2) {
            Some(std::cmp::Ordering::Greater) => Ok(Self { upper: p1, lower: p2 }),
            Some(std::cmp::Ordering::Less) => Ok(Self { upper: p2, lower: p1 }),
            Some(std::cmp::Ordering::Equal) => {
                let (a, b) = (p1.usize().min(p2.usize()), p1.usize().max(p2.usize()));
                Err(TriangulationError::DegenerateInput(Degeneracy::DuplicatePoint(a, b)))
            },
            None => Err(InternalError::new(format!("{} or {} has a non-finite coordinate", p1, p2)).into()),
        }
    }

    pub fn upper(&self) -> PointId<C> { self.upper }
    pub fn lower(&self) -> PointId<C> { self.lower }

    /// The edge as a pair of input vertex ids, lower endpoint first
    pub fn vertices(&self) -> (usize, usize) {
        (self.lower.usize(), self.upper.usize())
    }
}
