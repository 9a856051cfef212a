use std::ops::Range;

use num_traits::real::Real;

use crate::{
    errors::{Degeneracy, TriangulationError},
    inputs::Coords,
    math,
};

/// Rejects input the sweep cannot triangulate, before any sweep state is built.
///
/// `polygons` index into `coords`, boundary first, then the holes. Every other vertex is a Steiner point.
/// Holes sharing no vertex with each other's area but with crossing edges are not looked for here,
/// and neither are other crossing polygon edges. The sweep reports them when it meets them.
pub(crate) fn validate<C: Real>(coords: &[Coords<C>], polygons: &[Range<usize>]) -> Result<(), TriangulationError> {
    for polygon in polygons {
        if polygon.len() < 3 {
            return Err(TriangulationError::NotEnoughVertices(polygon.len()));
        }
    }

    if let Some(vi) = coords.iter().position(|c| !c.is_finite()) {
        return Err(TriangulationError::NonFiniteCoordinate(vi));
    }

    let mut sorted: Vec<(Coords<C>, usize)> = coords.iter().copied().zip(0..).collect();
    sorted.sort_by(|(a, ai), (b, bi)| a.sweep_cmp(b).then(ai.cmp(bi)));
    for pair in sorted.windows(2) {
        if pair[0].0 == pair[1].0 {
            return Err(TriangulationError::DegenerateInput(Degeneracy::DuplicatePoint(pair[0].1, pair[1].1)));
        }
    }

    let outlines: Vec<&[Coords<C>]> = polygons.iter().map(|r| &coords[r.clone()]).collect();

    if outlines.iter().any(|p| math::signed_area_2x(p) == C::zero()) {
        return Err(TriangulationError::DegenerateInput(Degeneracy::ZeroArea));
    }

    let (boundary, holes) = match outlines.split_first() {
        Some(split) => split,
        None => return Err(TriangulationError::NotEnoughVertices(0)),
    };

    for (hi, hole) in holes.iter().enumerate() {
        if !hole.iter().all(|&c| math::point_in_polygon(c, boundary) == Some(true)) {
            return Err(TriangulationError::HoleOutsideBoundary(hi));
        }
    }

    let touches = |a: &[Coords<C>], b: &[Coords<C>]| a.iter().any(|&c| math::point_in_polygon(c, b) != Some(false));
    for (hi, hole) in holes.iter().enumerate() {
        for (hj, other) in holes.iter().enumerate().skip(hi + 1) {
            if touches(hole, other) || touches(other, hole) {
                return Err(TriangulationError::OverlappingHoles(hi, hj));
            }
        }
    }

    let mut on_polygon = vec![false; coords.len()];
    for polygon in polygons {
        on_polygon[polygon.clone()].iter_mut().for_each(|v| *v = true);
    }

    for (vi, &c) in coords.iter().enumerate().filter(|&(vi, _)| !on_polygon[vi]) {
        let in_boundary = math::point_in_polygon(c, boundary) == Some(true);
        if !in_boundary || holes.iter().any(|hole| math::point_in_polygon(c, hole) != Some(false)) {
            return Err(TriangulationError::PointOutsideDomain(vi));
        }
    }

    Ok(())
}
