use std::fmt;

use num_traits::real::Real;

use crate::{errors::InternalError, idx::{Idx, IdxDisplay}, sweep_context::PointId};

pub(crate) type TriangleId<C> = Idx<Triangle<C>>;

/// A triangle of the sweep mesh.
///
/// Points are stored counterclockwise. Every per-edge array is indexed by the point opposite the edge:
/// `neighbors[i]`, `constrained[i]` and `delaunay[i]` all describe the edge `points[i + 1] - points[i + 2]`.
#[derive(Debug, Clone)]
pub(crate) struct Triangle<C: Real> {
    points: [PointId<C>; 3],
    neighbors: [Option<TriangleId<C>>; 3],
    constrained: [bool; 3],
    delaunay: [bool; 3],
    interior: bool,
}

impl<C: Real> IdxDisplay for Triangle<C> {
    fn fmt(f: &mut fmt::Formatter<'_>, idx: usize) -> fmt::Result {
        write!(f, "t{}", idx)
    }
}

impl<C: Real> fmt::Display for Triangle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.points[0], self.points[1], self.points[2])
    }
}

#[inline(always)]
fn next(i: usize) -> usize { (i + 1) % 3 }
#[inline(always)]
fn prev(i: usize) -> usize { (i + 2) % 3 }

impl<C: Real> Triangle<C> {
    pub fn new(a: PointId<C>, b: PointId<C>, c: PointId<C>) -> Self {
        Self {
            points: [a, b, c],
            neighbors: [None; 3],
            constrained: [false; 3],
            delaunay: [false; 3],
            interior: false,
        }
    }

    pub fn points(&self) -> &[PointId<C>; 3] { &self.points }
    pub fn point(&self, i: usize) -> PointId<C> { self.points[i] }
    pub fn neighbor(&self, i: usize) -> Option<TriangleId<C>> { self.neighbors[i] }
    pub fn neighbors(&self) -> &[Option<TriangleId<C>>; 3] { &self.neighbors }
    pub fn constrained(&self) -> &[bool; 3] { &self.constrained }
    pub fn is_constrained(&self, i: usize) -> bool { self.constrained[i] }
    pub fn set_constrained(&mut self, i: usize, value: bool) { self.constrained[i] = value; }
    pub fn is_delaunay(&self, i: usize) -> bool { self.delaunay[i] }
    pub fn set_delaunay(&mut self, i: usize, value: bool) { self.delaunay[i] = value; }
    pub fn is_interior(&self) -> bool { self.interior }
    pub fn set_interior(&mut self, value: bool) { self.interior = value; }

    pub fn try_index(&self, p: PointId<C>) -> Option<usize> {
        self.points.iter().position(|&q| q == p)
    }

    pub fn index(&self, p: PointId<C>) -> Result<usize, InternalError> {
        self.try_index(p).ok_or_else(|| InternalError::new(format!("{} is not a vertex of {}", p, self)))
    }

    pub fn contains(&self, p: PointId<C>) -> bool {
        self.points.contains(&p)
    }

    pub fn contains_edge(&self, p: PointId<C>, q: PointId<C>) -> bool {
        self.contains(p) && self.contains(q)
    }

    /// The slot of the point opposite the edge `p - q`, if this triangle has that edge
    pub fn edge_index(&self, p: PointId<C>, q: PointId<C>) -> Option<usize> {
        match (self.try_index(p), self.try_index(q)) {
            (Some(i), Some(j)) if i != j => Some(3 - i - j),
            _ => None,
        }
    }

    pub fn point_cw(&self, p: PointId<C>) -> Result<PointId<C>, InternalError> {
        Ok(self.points[prev(self.index(p)?)])
    }

    pub fn point_ccw(&self, p: PointId<C>) -> Result<PointId<C>, InternalError> {
        Ok(self.points[next(self.index(p)?)])
    }

    /// The neighbor across the edge `p - point_cw(p)`
    pub fn neighbor_cw(&self, p: PointId<C>) -> Result<Option<TriangleId<C>>, InternalError> {
        Ok(self.neighbors[next(self.index(p)?)])
    }

    /// The neighbor across the edge `p - point_ccw(p)`
    pub fn neighbor_ccw(&self, p: PointId<C>) -> Result<Option<TriangleId<C>>, InternalError> {
        Ok(self.neighbors[prev(self.index(p)?)])
    }

    pub fn neighbor_across(&self, p: PointId<C>) -> Result<Option<TriangleId<C>>, InternalError> {
        Ok(self.neighbors[self.index(p)?])
    }

    pub fn constrained_cw(&self, p: PointId<C>) -> Result<bool, InternalError> {
        Ok(self.constrained[next(self.index(p)?)])
    }

    pub fn constrained_ccw(&self, p: PointId<C>) -> Result<bool, InternalError> {
        Ok(self.constrained[prev(self.index(p)?)])
    }

    pub fn set_constrained_cw(&mut self, p: PointId<C>, value: bool) -> Result<(), InternalError> {
        let i = next(self.index(p)?);
        self.constrained[i] = value;
        Ok(())
    }

    pub fn set_constrained_ccw(&mut self, p: PointId<C>, value: bool) -> Result<(), InternalError> {
        let i = prev(self.index(p)?);
        self.constrained[i] = value;
        Ok(())
    }

    pub fn delaunay_cw(&self, p: PointId<C>) -> Result<bool, InternalError> {
        Ok(self.delaunay[next(self.index(p)?)])
    }

    pub fn delaunay_ccw(&self, p: PointId<C>) -> Result<bool, InternalError> {
        Ok(self.delaunay[prev(self.index(p)?)])
    }

    pub fn set_delaunay_cw(&mut self, p: PointId<C>, value: bool) -> Result<(), InternalError> {
        let i = next(self.index(p)?);
        self.delaunay[i] = value;
        Ok(())
    }

    pub fn set_delaunay_ccw(&mut self, p: PointId<C>, value: bool) -> Result<(), InternalError> {
        let i = prev(self.index(p)?);
        self.delaunay[i] = value;
        Ok(())
    }

    pub fn clear_delaunay_edges(&mut self) {
        self.delaunay = [false; 3];
    }

    /// Marks the edge `p - q` as constrained. Returns `false` if this triangle has no such edge.
    pub fn mark_constrained_edge(&mut self, p: PointId<C>, q: PointId<C>) -> bool {
        match self.edge_index(p, q) {
            Some(i) => {
                self.constrained[i] = true;
                true
            },
            None => false,
        }
    }

    /// The vertex of `self` which is not on the edge `self` shares with `other` across `other`'s point `p`
    pub fn opposite_point(&self, other: &Triangle<C>, p: PointId<C>) -> Result<PointId<C>, InternalError> {
        let q = other.point_cw(p)?;
        self.point_cw(q)
    }

    /// Rotates the points one slot clockwise around `opoint`, replacing the point that was clockwise of
    /// `opoint` with `npoint`. The per-edge arrays are left in place; callers remap the flags they need.
    pub fn legalize(&mut self, opoint: PointId<C>, npoint: PointId<C>) -> Result<(), InternalError> {
        let i = self.index(opoint)?;
        let old = self.points;
        self.points[i] = old[prev(i)];
        self.points[next(i)] = old[i];
        self.points[prev(i)] = npoint;
        Ok(())
    }

    fn set_neighbor_on_edge(&mut self, p: PointId<C>, q: PointId<C>, t: Option<TriangleId<C>>) -> bool {
        match self.edge_index(p, q) {
            Some(i) => {
                self.neighbors[i] = t;
                true
            },
            None => false,
        }
    }

    fn clear_neighbor(&mut self, t: TriangleId<C>) {
        for n in self.neighbors.iter_mut() {
            if *n == Some(t) {
                *n = None;
            }
        }
    }

    pub fn clear_neighbors(&mut self) {
        self.neighbors = [None; 3];
    }

    /// Links `ti0` and `ti1` across the edge they share `p - q`
    pub fn mark_neighbor_on_edge(ts: &mut [Triangle<C>], ti0: TriangleId<C>, ti1: TriangleId<C>, p: PointId<C>, q: PointId<C>) -> Result<(), InternalError> {
        if ts[ti0].set_neighbor_on_edge(p, q, Some(ti1)) && ts[ti1].set_neighbor_on_edge(p, q, Some(ti0)) {
            Ok(())
        } else {
            Err(InternalError::new(format!("{} and {} do not share the edge {} - {}", ti0, ti1, p, q)))
        }
    }

    /// Links `ti0` and `ti1` across whichever edge they share. Returns `false` when they share none.
    pub fn mark_neighbor(ts: &mut [Triangle<C>], ti0: TriangleId<C>, ti1: TriangleId<C>) -> bool {
        let points = ts[ti0].points;
        for i in 0..3 {
            let (p, q) = (points[next(i)], points[prev(i)]);
            if ts[ti1].contains_edge(p, q) {
                ts[ti0].neighbors[i] = Some(ti1);
                ts[ti1].set_neighbor_on_edge(p, q, Some(ti0));
                return true;
            }
        }
        false
    }

    /// Detaches `ti` from all of its neighbors and resets its edge flags
    pub fn clear(ts: &mut [Triangle<C>], ti: TriangleId<C>) {
        let neighbors = ts[ti].neighbors;
        for n in neighbors.iter().flatten() {
            ts[*n].clear_neighbor(ti);
        }
        let t = &mut ts[ti];
        t.clear_neighbors();
        t.constrained = [false; 3];
        t.clear_delaunay_edges();
        t.interior = false;
    }
}
