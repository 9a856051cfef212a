use std::{fmt, ops::Range};

use num_traits::{NumCast, real::Real};
use smallvec::SmallVec;
use zot::Zot;

use crate::{
    advancing_front::AdvancingFront,
    edge::{Edge, EdgeId},
    errors::{InternalError, TriangulationError},
    idx::{Idx, IdxDisplay, SliceExt, VecExt},
    inputs::Coords,
    math,
    triangle::{Triangle, TriangleId},
};

pub(crate) type PointId<C> = Idx<SweepPoint<C>>;

/// The margin around the input bounds, relative to its size, at which the artificial points are placed
const ALPHA: f64 = 0.3;

/// A point known to the sweep.
///
/// The arena index of a point is the input vertex id. The two artificial points
/// follow all input vertices.
#[derive(Debug, Clone)]
pub(crate) struct SweepPoint<C: Real> {
    coords: Coords<C>,
    /// Constrained edges which have this point as their upper endpoint
    edges: Zot<EdgeId<C>>,
}

impl<C: Real> IdxDisplay for SweepPoint<C> {
    fn fmt(f: &mut fmt::Formatter<'_>, idx: usize) -> fmt::Result {
        write!(f, "p{}", idx)
    }
}

impl<C: Real> SweepPoint<C> {
    fn new(coords: Coords<C>) -> Self {
        Self {
            coords,
            edges: Zot::Zero,
        }
    }

    pub fn coords(&self) -> Coords<C> { self.coords }

    pub fn edges(&self) -> SmallVec<[EdgeId<C>; 2]> {
        let mut edges = SmallVec::new();
        match &self.edges {
            Zot::Zero => {},
            Zot::One(e0) => edges.push(*e0),
            Zot::Two(e0, e1) => {
                edges.push(*e0);
                edges.push(*e1);
            },
        }
        edges
    }

    fn add_edge(&mut self, ei: EdgeId<C>) -> Result<(), EdgeId<C>> {
        let edges = std::mem::replace(&mut self.edges, Zot::Zero);
        self.edges = match edges {
            Zot::Zero => Zot::One(ei),
            Zot::One(e0) => Zot::Two(e0, ei),
            Zot::Two(e0, e1) => {
                self.edges = Zot::Two(e0, e1);
                return Err(ei);
            },
        };
        Ok(())
    }
}

/// Owns every point, edge, triangle and front node of one triangulation run
pub(crate) struct SweepContext<C: Real> {
    points: Vec<SweepPoint<C>>,
    edges: Vec<Edge<C>>,
    triangles: Vec<Triangle<C>>,
    /// Input points in sweep order
    order: Vec<PointId<C>>,
    front: AdvancingFront<C>,
    head: PointId<C>,
    tail: PointId<C>,
    /// Winding of the first polygon
    boundary_ccw: bool,
    interior: Vec<TriangleId<C>>,
}

impl<C: Real> SweepContext<C> {
    /// Registers the vertices and the edges of each polygon (boundary first, then holes), sorts the
    /// points into sweep order and creates the initial triangle and front.
    ///
    /// Vertex ids are indices into `coords`. Vertices not covered by `polygons` are Steiner points.
    /// Callers must have validated the input; this only rejects what it cannot represent.
    pub fn new(coords: &[Coords<C>], polygons: &[Range<usize>]) -> Result<Self, TriangulationError> {
        let vertex_count = coords.len();
        if vertex_count < 3 {
            return Err(TriangulationError::NotEnoughVertices(vertex_count));
        }

        let mut points = Vec::with_capacity(vertex_count + 2);
        points.extend(coords.iter().map(|&c| SweepPoint::new(c)));
        let mut edges = Vec::with_capacity(vertex_count);

        for polygon in polygons {
            for i in polygon.clone() {
                let p1 = Idx::new(i);
                let p2 = Idx::new(if i + 1 == polygon.end { polygon.start } else { i + 1 });
                let edge = Edge::new(&points, p1, p2)?;
                let upper = edge.upper();
                let ei = edges.push_get_index(edge);
                if points[upper].add_edge(ei).is_err() {
                    return Err(TriangulationError::NonSimplePolygon { edge: edges[ei].vertices() });
                }
            }
        }

        let boundary_ccw = polygons.first().map_or(true, |boundary| math::signed_area_2x(&coords[boundary.clone()]) > C::zero());

        let mut order: Vec<PointId<C>> = points.iter_index().collect();
        order.sort_by(|&a, &b| points[a].coords.sweep_cmp(&points[b].coords));

        let (head, tail) = Self::artificial_points(&points)?;
        let head = points.push_get_index(SweepPoint::new(head));
        let tail = points.push_get_index(SweepPoint::new(tail));

        let mut triangles = Vec::with_capacity(vertex_count * 2);
        let first = order[0];
        let ti = triangles.push_get_index(Triangle::new(first, head, tail));

        let front = AdvancingFront::new(
            (head, points[head].coords.x()),
            (first, points[first].coords.x()),
            (tail, points[tail].coords.x()),
            ti,
            vertex_count + 2,
        );

        log::trace!("sweep context: {} points, {} edges, head {} tail {}", vertex_count, edges.len(), points[head].coords, points[tail].coords);

        Ok(Self {
            points,
            edges,
            triangles,
            order,
            front,
            head,
            tail,
            boundary_ccw,
            interior: Vec::new(),
        })
    }

    /// Two points below and beside all input points which, with the lowest input point, form the initial triangle
    fn artificial_points(points: &[SweepPoint<C>]) -> Result<(Coords<C>, Coords<C>), TriangulationError> {
        let first = points[0].coords;
        let (mut xmin, mut xmax, mut ymin, mut ymax) = (first.x(), first.x(), first.y(), first.y());
        for p in points.iter().skip(1) {
            xmin = xmin.min(p.coords.x());
            xmax = xmax.max(p.coords.x());
            ymin = ymin.min(p.coords.y());
            ymax = ymax.max(p.coords.y());
        }

        let alpha = <C as NumCast>::from(ALPHA).ok_or_else(|| InternalError::new("Coordinate type cannot represent the front margin"))?;
        let dx = alpha * (xmax - xmin);
        let dy = alpha * (ymax - ymin);
        Ok((Coords::new(xmin - dx, ymin - dy), Coords::new(xmax + dx, ymin - dy)))
    }

    pub fn point_count(&self) -> usize { self.order.len() }

    /// The `i`th point in sweep order
    pub fn ordered_point(&self, i: usize) -> PointId<C> { self.order[i] }

    pub fn point(&self, pi: PointId<C>) -> &SweepPoint<C> { &self.points[pi] }
    pub fn coords(&self, pi: PointId<C>) -> Coords<C> { self.points[pi].coords }
    pub fn points(&self) -> &[SweepPoint<C>] { &self.points }

    pub fn edge(&self, ei: EdgeId<C>) -> &Edge<C> { &self.edges[ei] }
    pub fn edge_count(&self) -> usize { self.edges.len() }

    pub fn boundary_is_ccw(&self) -> bool { self.boundary_ccw }

    pub fn is_artificial(&self, pi: PointId<C>) -> bool {
        pi == self.head || pi == self.tail
    }

    pub fn front(&self) -> &AdvancingFront<C> { &self.front }
    pub fn front_mut(&mut self) -> &mut AdvancingFront<C> { &mut self.front }

    pub fn triangle(&self, ti: TriangleId<C>) -> &Triangle<C> { &self.triangles[ti] }
    pub fn triangle_mut(&mut self, ti: TriangleId<C>) -> &mut Triangle<C> { &mut self.triangles[ti] }
    pub fn triangles(&self) -> &[Triangle<C>] { &self.triangles }
    pub fn triangles_mut(&mut self) -> &mut [Triangle<C>] { &mut self.triangles }
    pub fn triangle_count(&self) -> usize { self.triangles.len() }

    pub fn add_triangle(&mut self, t: Triangle<C>) -> TriangleId<C> {
        self.triangles.push_get_index(t)
    }

    /// Interior triangles in the order they were collected by [SweepContext::mesh_clean]
    pub fn interior(&self) -> &[TriangleId<C>] { &self.interior }

    /// Points every front node lying on an open edge of `ti` at `ti`
    pub fn map_triangle_to_nodes(&mut self, ti: TriangleId<C>) -> Result<(), InternalError> {
        for i in 0..3 {
            let t = &self.triangles[ti];
            if t.neighbor(i).is_none() {
                let pi = t.point_cw(t.point(i))?;
                let x = self.points[pi].coords.x();
                if let Some(ni) = self.front.locate_point(pi, x) {
                    self.front.set_triangle(ni, ti);
                }
            }
        }
        Ok(())
    }

    /// Collects every triangle reachable from `start` without crossing a constrained edge.
    ///
    /// Returns `false` and leaves nothing marked if the region reaches an artificial point,
    /// meaning `start` was not inside the constrained region.
    pub fn mesh_clean(&mut self, start: TriangleId<C>) -> bool {
        let mut collected = Vec::new();
        let mut stack: SmallVec<[TriangleId<C>; 16]> = SmallVec::new();
        stack.push(start);
        let mut leaked = false;

        while let Some(ti) = stack.pop() {
            let t = &self.triangles[ti];
            if t.is_interior() {
                continue;
            }
            if t.points().iter().any(|&p| self.is_artificial(p)) {
                leaked = true;
                break;
            }
            self.triangles[ti].set_interior(true);
            collected.push(ti);
            let t = &self.triangles[ti];
            for i in 0..3 {
                if !t.is_constrained(i) {
                    if let Some(n) = t.neighbor(i) {
                        stack.push(n);
                    }
                }
            }
        }

        if leaked {
            for ti in collected {
                self.triangles[ti].set_interior(false);
            }
            false
        } else {
            self.interior = collected;
            true
        }
    }

    /// Detaches every triangle outside the collected region so neighbor links stay inside it
    pub fn discard_exterior(&mut self) {
        for i in 0..self.triangles.len() {
            let ti = Idx::new(i);
            if !self.triangles[ti].is_interior() {
                Triangle::clear(&mut self.triangles, ti);
            }
        }
    }
}

#[cfg(feature = "debugging")]
impl<C: Real> crate::debug::svg::SvgElement<crate::debug::svg::SvgSweepStyle> for SweepContext<C> {
    fn write_svg<'a>(&self, svg_output: &mut crate::debug::svg::SvgOutput<'a, crate::debug::svg::SvgSweepStyle>, _state: &()) -> fmt::Result {
        use svg_fmt::*;
        use fmt::Write;

        use crate::debug::svg::{circle, to_f32};

        let at = |pi: PointId<C>| to_f32(self.points[pi].coords);

        // Once the interior is known only it is drawn
        let finished = !self.interior.is_empty();
        for t in self.triangles.iter().filter(|t| !finished || t.is_interior()) {
            let [(x0, y0), (x1, y1), (x2, y2)] = [at(t.point(0)), at(t.point(1)), at(t.point(2))];
            let fill = if t.is_interior() { rgb(200, 240, 200) } else { rgb(240, 240, 240) };
            writeln!(svg_output, "{}",
                triangle(x0, y0, x1, y1, x2, y2)
                    .fill(Fill::Color(fill))
                    .stroke(Stroke::Color(rgb(128, 128, 128), svg_output.context.percent(0.1)))
            )?;

            for i in 0..3 {
                if t.is_constrained(i) {
                    let ((xa, ya), (xb, yb)) = (at(t.point((i + 1) % 3)), at(t.point((i + 2) % 3)));
                    writeln!(svg_output, "{}",
                        line_segment(xa, ya, xb, yb)
                            .color(rgb(220, 0, 0))
                            .width(svg_output.context.percent(0.3))
                    )?;
                }
            }
        }

        if !finished {
            let front: Vec<[f32; 2]> = self.front.iter()
                .map(|ni| at(self.front.point(ni)))
                .map(|(x, y)| [x, y])
                .collect();
            writeln!(svg_output, "{}",
                polygon(&front)
                    .open()
                    .stroke(Stroke::Color(blue(), svg_output.context.percent(0.3)))
            )?;
        }

        for pi in self.points.iter_index() {
            if finished && self.is_artificial(pi) {
                continue;
            }
            let (x, y) = at(pi);
            let color = if svg_output.style.highlight_point == Some(pi.usize()) {
                rgb(255, 126, 0)
            } else if self.is_artificial(pi) {
                black()
            } else {
                green()
            };
            writeln!(svg_output, "{}",
                circle(x, y, svg_output.context.percent(0.5))
                    .fill(Fill::Color(color))
            )?;

            if svg_output.style.add_labels {
                let gap = svg_output.context.percent(1.0);
                writeln!(svg_output, "{}",
                    text(x - gap, y, pi.to_string())
                        .color(black())
                        .align(Align::Right)
                        .size(svg_output.context.percent(1.5))
                )?;
            }
        }

        Ok(())
    }
}
