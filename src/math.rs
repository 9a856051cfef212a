use num_traits::real::Real;

use crate::inputs::Coords;

/// The turn direction of three points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Orientation {
    Clockwise,
    Counterclockwise,
    Collinear,
}

impl Orientation {
    pub fn is_cw(self) -> bool { self == Orientation::Clockwise }
    pub fn is_ccw(self) -> bool { self == Orientation::Counterclockwise }
    pub fn is_collinear(self) -> bool { self == Orientation::Collinear }
}

/// Classifies `a -> b -> c` by the sign of the cross product `(a - c) x (b - c)`.
///
/// A cross product of exactly zero is [Orientation::Collinear]; there is no tolerance band,
/// so nearly collinear points are classified by the raw floating point sign.
pub(crate) fn orient_2d<C: Real>(a: Coords<C>, b: Coords<C>, c: Coords<C>) -> Orientation {
    let det_left = (a.x() - c.x()) * (b.y() - c.y());
    let det_right = (a.y() - c.y()) * (b.x() - c.x());
    let val = det_left - det_right;
    if val > C::zero() {
        Orientation::Counterclockwise
    } else if val < C::zero() {
        Orientation::Clockwise
    } else {
        Orientation::Collinear
    }
}

/// Returns `true` iff `d` lies strictly inside the circumcircle of the counterclockwise triangle `(a, b, c)`.
///
/// `d` must be on the far side of the edge it is tested across: the test bails out early when
/// `d` does not see `a` between `b` and `c`, which is exactly the case where flipping would
/// produce an inverted triangle.
pub(crate) fn in_circle<C: Real>(a: Coords<C>, b: Coords<C>, c: Coords<C>, d: Coords<C>) -> bool {
    let adx = a.x() - d.x();
    let ady = a.y() - d.y();
    let bdx = b.x() - d.x();
    let bdy = b.y() - d.y();

    let oabd = adx * bdy - bdx * ady;
    if oabd <= C::zero() {
        return false;
    }

    let cdx = c.x() - d.x();
    let cdy = c.y() - d.y();

    let ocad = cdx * ady - adx * cdy;
    if ocad <= C::zero() {
        return false;
    }

    let bdxcdy = bdx * cdy;
    let cdxbdy = cdx * bdy;

    let alift = adx * adx + ady * ady;
    let blift = bdx * bdx + bdy * bdy;
    let clift = cdx * cdx + cdy * cdy;

    let det = alift * (bdxcdy - cdxbdy) + blift * ocad + clift * oabd;
    det > C::zero()
}

/// Returns `true` iff the quadrilateral `a, b, d, c` is strictly convex at `b` and `c` as seen from `a`,
/// i.e. the edge `b-c` may be flipped to `a-d`.
pub(crate) fn in_scan_area<C: Real>(a: Coords<C>, b: Coords<C>, c: Coords<C>, d: Coords<C>) -> bool {
    let oadb = (a.x() - b.x()) * (d.y() - b.y()) - (d.x() - b.x()) * (a.y() - b.y());
    if oadb >= C::zero() {
        return false;
    }

    let oadc = (a.x() - c.x()) * (d.y() - c.y()) - (d.x() - c.x()) * (a.y() - c.y());
    if oadc <= C::zero() {
        return false;
    }

    true
}

/// The cross and dot products of `a - origin` and `b - origin`.
///
/// The angle between the two vectors is `atan2(cross, dot)`; the front heuristics only need its
/// quadrant, so they compare these signs directly instead of calling any trigonometric function.
fn cross_dot<C: Real>(origin: Coords<C>, a: Coords<C>, b: Coords<C>) -> (C, C) {
    let (ax, ay) = (a.x() - origin.x(), a.y() - origin.y());
    let (bx, by) = (b.x() - origin.x(), b.y() - origin.y());
    (ax * by - ay * bx, ax * bx + ay * by)
}

/// The angle at `origin` from `a` to `b` is outside `[-90°, 90°]`
pub(crate) fn angle_exceeds_90<C: Real>(origin: Coords<C>, a: Coords<C>, b: Coords<C>) -> bool {
    let (_, dot) = cross_dot(origin, a, b);
    dot < C::zero()
}

/// The angle at `origin` from `a` to `b` is negative (clockwise)
pub(crate) fn angle_is_negative<C: Real>(origin: Coords<C>, a: Coords<C>, b: Coords<C>) -> bool {
    let (cross, _) = cross_dot(origin, a, b);
    cross < C::zero()
}

/// The angle at `origin` from `a` to `b` is greater than 90° or negative
pub(crate) fn angle_exceeds_90_or_negative<C: Real>(origin: Coords<C>, a: Coords<C>, b: Coords<C>) -> bool {
    let (cross, dot) = cross_dot(origin, a, b);
    cross < C::zero() || dot < C::zero()
}

/// The direction from `far` to `node` is below 135°, measured counterclockwise from the positive x axis.
///
/// A basin whose right rim rises steeper than that is worth filling.
pub(crate) fn basin_angle_is_acute<C: Real>(node: Coords<C>, far: Coords<C>) -> bool {
    let ax = node.x() - far.x();
    let ay = node.y() - far.y();
    !(ax < C::zero() && ay >= C::zero() && ay <= -ax)
}

/// Twice the signed area of a polygon; positive when counterclockwise.
pub(crate) fn signed_area_2x<C: Real>(points: &[Coords<C>]) -> C {
    let mut sum = C::zero();
    for (i, p) in points.iter().enumerate() {
        let q = points[(i + 1) % points.len()];
        sum = sum + (p.x() * q.y() - q.x() * p.y());
    }
    sum
}

/// Even-odd point-in-polygon test.
///
/// Returns `None` when `p` lies exactly on the polygon outline.
pub(crate) fn point_in_polygon<C: Real>(p: Coords<C>, polygon: &[Coords<C>]) -> Option<bool> {
    let mut inside = false;
    for (i, &a) in polygon.iter().enumerate() {
        let b = polygon[(i + 1) % polygon.len()];
        if on_segment(p, a, b) {
            return None;
        }
        if (a.y() > p.y()) != (b.y() > p.y()) {
            let x = a.x() + (p.y() - a.y()) * (b.x() - a.x()) / (b.y() - a.y());
            if p.x() < x {
                inside = !inside;
            }
        }
    }
    Some(inside)
}

/// `p` lies on the closed segment `a-b`
pub(crate) fn on_segment<C: Real>(p: Coords<C>, a: Coords<C>, b: Coords<C>) -> bool {
    orient_2d(a, b, p).is_collinear()
        && p.x() >= a.x().min(b.x()) && p.x() <= a.x().max(b.x())
        && p.y() >= a.y().min(b.y()) && p.y() <= a.y().max(b.y())
}

