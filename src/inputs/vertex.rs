use core::fmt;
use std::{fmt::Debug, cmp};

use num_traits::real::Real;

/// A two-dimensional point.
///
/// The coordinate type must implement [num_traits::real::Real], reexported as [crate::Real].
pub trait Vertex {
    /// The type of the individual `x` and `y` coordinates
    type Coordinate: Real;

    /// The x [Vertex::Coordinate] value
    fn x(&self) -> Self::Coordinate;
    /// The y [Vertex::Coordinate] value
    fn y(&self) -> Self::Coordinate;
}

/// The coordinates of a vertex copied into the sweep.
///
/// Ordered by `y`, then by `x`, which is the order points are swept in.
#[derive(Clone, Copy, PartialEq)]
pub(crate) struct Coords<C: Real>([C; 2]);

impl<C: Real> Coords<C> {
    pub fn new(x: C, y: C) -> Self { Self([x, y]) }

    pub fn of<V: Vertex<Coordinate=C>>(v: &V) -> Self { Self([v.x(), v.y()]) }

    #[inline(always)]
    pub fn x(&self) -> C { self.0[0] }
    #[inline(always)]
    pub fn y(&self) -> C { self.0[1] }

    /// `false` for NaN and infinite coordinates, which are the only values where `c - c` is not zero
    pub fn is_finite(&self) -> bool {
        let (x, y) = (self.x(), self.y());
        x - x == C::zero() && y - y == C::zero()
    }

    /// Total sweep order. Callers must have rejected non-finite coordinates beforehand.
    pub fn sweep_cmp(&self, other: &Self) -> cmp::Ordering {
        self.partial_cmp(other).unwrap_or(cmp::Ordering::Equal)
    }
}

impl<C: Real> fmt::Debug for Coords<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut tuple = f.debug_tuple("Coords");
        if let Some(x) = self.x().to_f64() {
            tuple.field(&x);
        }
        if let Some(y) = self.y().to_f64() {
            tuple.field(&y);
        }
        tuple.finish()
    }
}

impl<C: Real> fmt::Display for Coords<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let (Some(x), Some(y)) = (self.x().to_f64(), self.y().to_f64()) {
            write!(f, "({}, {})", x, y)
        } else {
            write!(f, "Coords<{}>", std::any::type_name::<C>())
        }
    }
}

impl<C: Real> PartialOrd for Coords<C> {
    fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
        self.y().partial_cmp(&other.y()).and_then(|y_ord|
            if y_ord == cmp::Ordering::Equal {
                self.x().partial_cmp(&other.x())
            } else {
                Some(y_ord)
            }
        )
    }
}

impl<C: Debug + Real> Vertex for [C; 2] {
    type Coordinate = C;

    #[inline(always)]
    fn x(&self) -> Self::Coordinate {
        self[0]
    }

    #[inline(always)]
    fn y(&self) -> Self::Coordinate {
        self[1]
    }
}

impl<C: Debug + Real> Vertex for (C, C) {
    type Coordinate = C;

    #[inline(always)]
    fn x(&self) -> Self::Coordinate {
        self.0
    }

    #[inline(always)]
    fn y(&self) -> Self::Coordinate {
        self.1
    }
}
