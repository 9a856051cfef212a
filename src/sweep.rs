use num_traits::real::Real;
use smallvec::SmallVec;

use crate::{
    advancing_front::NodeId,
    edge::EdgeId,
    errors::{Degeneracy, InternalError, TriangulationError},
    idx::Idx,
    inputs::Coords,
    math::{self, Orientation},
    sweep_context::{PointId, SweepContext},
    triangle::{Triangle, TriangleId},
};

#[cfg(feature = "debugging")]
use crate::debug;

/// Counters describing the work done by one sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct SweepStats {
    /// Triangles allocated, including the initial triangle and those discarded at the end
    pub triangles_created: usize,
    /// Edge flips, from both legalization and constrained edge insertion
    pub flips: usize,
    /// Front concavities closed with a single triangle
    pub fills: usize,
    /// Basins found and filled after a point event
    pub basin_fills: usize,
}

/// Steps allowed per squared point count before a run is considered stuck
const STEPS_PER_POINT_SQUARED: usize = 64;
const MIN_STEPS: usize = 1 << 16;

#[derive(Debug, Clone, Copy)]
struct Basin<C: Real> {
    left: NodeId<C>,
    right: NodeId<C>,
    width: C,
    left_highest: bool,
}

/// The constrained edge currently being inserted
#[derive(Debug, Clone, Copy)]
struct EdgeEvent<C: Real> {
    lower: PointId<C>,
    upper: PointId<C>,
    /// The lower endpoint is right of the upper one
    right: bool,
}

enum LegalizeTask<C: Real> {
    /// Legalize the triangle. Nested tasks also map it onto the front if it needed no flip.
    Legalize { ti: TriangleId<C>, map: bool },
    /// Drop the Delaunay marks set on a flipped edge once both sides are legal
    Reset { ti: TriangleId<C>, i: usize, oti: TriangleId<C>, oi: usize },
}

/// Steps of constrained edge insertion. `ep - eq` is the (sub-)edge being inserted and `p` is
/// the vertex of `ti` the step pivots on.
enum EdgeTask<C: Real> {
    Edge { ep: PointId<C>, eq: PointId<C>, ti: Option<TriangleId<C>>, p: PointId<C> },
    Flip { ep: PointId<C>, eq: PointId<C>, ti: TriangleId<C>, p: PointId<C> },
    FlipScan { ep: PointId<C>, eq: PointId<C>, flip_ti: TriangleId<C>, ti: TriangleId<C>, p: PointId<C> },
}

/// Runs the sweep over a [SweepContext] and selects the triangles inside the constrained region
pub(crate) struct Sweep<C: Real> {
    tcx: SweepContext<C>,
    stats: SweepStats,
    steps_left: usize,
    /// Triangles flipped while inserting the current constrained edge
    flipped: Vec<TriangleId<C>>,
    #[cfg(feature = "debugging")]
    svg_context: Option<debug::svg::SvgContext>,
    #[cfg(feature = "debugging")]
    current_step: u32,
    #[cfg(feature = "debugging")]
    current_substep: u32,
}

impl<C: Real> Sweep<C> {
    pub fn new(tcx: SweepContext<C>) -> Self {
        let n = tcx.point_count() + 2;
        let steps_left = STEPS_PER_POINT_SQUARED.saturating_mul(n).saturating_mul(n).max(MIN_STEPS);
        let stats = SweepStats {
            triangles_created: tcx.triangle_count(),
            ..SweepStats::default()
        };

        #[cfg(feature = "debugging")]
        let svg_context = Self::svg_context(&tcx);

        Self {
            tcx,
            stats,
            steps_left,
            flipped: Vec::new(),
            #[cfg(feature = "debugging")]
            svg_context,
            #[cfg(feature = "debugging")]
            current_step: 0,
            #[cfg(feature = "debugging")]
            current_substep: 0,
        }
    }

    /// Sweeps all points, inserts all constrained edges and collects the interior triangles
    pub fn triangulate(mut self) -> Result<(SweepContext<C>, SweepStats), TriangulationError> {
        self.sweep_points()?;
        self.finalization_polygon()?;

        #[cfg(feature = "debugging")]
        self.output_svg(debug::svg::SvgOutputLevel::ResultOnly, None);

        Ok((self.tcx, self.stats))
    }

    fn step(&mut self) -> Result<(), InternalError> {
        match self.steps_left.checked_sub(1) {
            Some(steps_left) => {
                self.steps_left = steps_left;
                Ok(())
            },
            None => Err(InternalError::new("Sweep exceeded its step budget")),
        }
    }

    #[inline]
    fn coords(&self, pi: PointId<C>) -> Coords<C> {
        self.tcx.coords(pi)
    }

    #[inline]
    fn node_coords(&self, ni: NodeId<C>) -> Coords<C> {
        self.tcx.coords(self.tcx.front().point(ni))
    }

    fn add_triangle(&mut self, t: Triangle<C>) -> TriangleId<C> {
        self.stats.triangles_created += 1;
        self.tcx.add_triangle(t)
    }

    fn non_simple(&self, ev: EdgeEvent<C>) -> TriangulationError {
        TriangulationError::NonSimplePolygon { edge: (ev.lower.usize(), ev.upper.usize()) }
    }

    fn point_on_constraint(&self, ev: EdgeEvent<C>, pi: PointId<C>) -> TriangulationError {
        TriangulationError::DegenerateInput(Degeneracy::PointOnConstraint {
            point: pi.usize(),
            edge: (ev.lower.usize(), ev.upper.usize()),
        })
    }

    fn sweep_points(&mut self) -> Result<(), TriangulationError> {
        for i in 1..self.tcx.point_count() {
            let pi = self.tcx.ordered_point(i);
            let ni = self.point_event(pi)?;
            for ei in self.tcx.point(pi).edges() {
                self.edge_event(ei, ni)?;
            }

            #[cfg(feature = "debugging")]
            self.advance_step();
        }
        Ok(())
    }

    fn point_event(&mut self, pi: PointId<C>) -> Result<NodeId<C>, TriangulationError> {
        let c = self.coords(pi);
        let ni = self.tcx.front_mut().locate_node(c.x())
            .ok_or_else(|| InternalError::new(format!("No front node below {} {}", pi, c)))?;
        log::trace!("point event {} {} above {}", pi, c, self.tcx.front().point(ni));

        let new_ni = self.new_front_triangle(pi, ni)?;

        // The located node is never right of the point, so only the equal case needs a fill
        if c.x() <= self.node_coords(ni).x() {
            self.fill(ni)?;
        }

        self.fill_advancing_front(new_ni)?;

        #[cfg(feature = "debugging")]
        self.output_svg(debug::svg::SvgOutputLevel::MajorSteps, Some(pi));

        Ok(new_ni)
    }

    fn new_front_triangle(&mut self, pi: PointId<C>, ni: NodeId<C>) -> Result<NodeId<C>, TriangulationError> {
        let front = self.tcx.front();
        let next = front.expect_next(ni)?;
        let node_triangle = front.triangle(ni);
        let t = Triangle::new(pi, front.point(ni), front.point(next));
        let ti = self.add_triangle(t);
        if let Some(nti) = node_triangle {
            Triangle::mark_neighbor(self.tcx.triangles_mut(), ti, nti);
        }

        let x = self.coords(pi).x();
        let new_ni = self.tcx.front_mut().insert_after(ni, pi, x)?;

        if !self.legalize(ti)? {
            self.tcx.map_triangle_to_nodes(ti)?;
        }

        Ok(new_ni)
    }

    /// Closes the front at `ni` with the triangle `prev, ni, next` and removes `ni` from the front
    fn fill(&mut self, ni: NodeId<C>) -> Result<(), TriangulationError> {
        let front = self.tcx.front();
        let prev = front.expect_prev(ni)?;
        let next = front.expect_next(ni)?;
        let prev_triangle = front.triangle(prev);
        let node_triangle = front.triangle(ni);
        let t = Triangle::new(front.point(prev), front.point(ni), front.point(next));
        let ti = self.add_triangle(t);

        for nti in prev_triangle.iter().chain(node_triangle.iter()) {
            Triangle::mark_neighbor(self.tcx.triangles_mut(), ti, *nti);
        }

        self.tcx.front_mut().remove(ni)?;
        self.stats.fills += 1;

        if !self.legalize(ti)? {
            self.tcx.map_triangle_to_nodes(ti)?;
        }

        #[cfg(feature = "debugging")]
        self.output_svg(debug::svg::SvgOutputLevel::AllSteps, None);

        Ok(())
    }

    fn fill_advancing_front(&mut self, ni: NodeId<C>) -> Result<(), TriangulationError> {
        // Holes right of the new node
        let mut current = self.tcx.front().next(ni);
        while let Some(node) = current {
            let next = match self.tcx.front().next(node) {
                Some(next) => next,
                None => break,
            };
            if self.large_hole_dont_fill(node)? {
                break;
            }
            self.step()?;
            self.fill(node)?;
            current = Some(next);
        }

        // Holes left of the new node
        let mut current = self.tcx.front().prev(ni);
        while let Some(node) = current {
            let prev = match self.tcx.front().prev(node) {
                Some(prev) => prev,
                None => break,
            };
            if self.large_hole_dont_fill(node)? {
                break;
            }
            self.step()?;
            self.fill(node)?;
            current = Some(prev);
        }

        // Basin right of the new node
        let front = self.tcx.front();
        let next2 = front.next(ni).and_then(|next| front.next(next));
        if let Some(next2) = next2 {
            if math::basin_angle_is_acute(self.node_coords(ni), self.node_coords(next2)) {
                self.fill_basin(ni)?;
            }
        }

        Ok(())
    }

    /// The concavity of the front at `ni` is too wide to close with one triangle
    fn large_hole_dont_fill(&self, ni: NodeId<C>) -> Result<bool, InternalError> {
        let front = self.tcx.front();
        let next = front.expect_next(ni)?;
        let prev = front.expect_prev(ni)?;
        let (c, cn, cp) = (self.node_coords(ni), self.node_coords(next), self.node_coords(prev));

        if !math::angle_exceeds_90(c, cn, cp) {
            return Ok(false);
        }
        if math::angle_is_negative(c, cn, cp) {
            return Ok(true);
        }

        // Look one node further on each side
        if let Some(next2) = front.next(next) {
            if !math::angle_exceeds_90_or_negative(c, self.node_coords(next2), cp) {
                return Ok(false);
            }
        }
        if let Some(prev2) = front.prev(prev) {
            if !math::angle_exceeds_90_or_negative(c, cn, self.node_coords(prev2)) {
                return Ok(false);
            }
        }

        Ok(true)
    }

    fn fill_basin(&mut self, ni: NodeId<C>) -> Result<(), TriangulationError> {
        let front = self.tcx.front();
        let next = front.expect_next(ni)?;
        let next2 = front.expect_next(next)?;

        let left = if math::orient_2d(self.node_coords(ni), self.node_coords(next), self.node_coords(next2)).is_ccw() {
            next2
        } else {
            next
        };

        let mut bottom = left;
        while let Some(n) = front.next(bottom) {
            if self.node_coords(bottom).y() >= self.node_coords(n).y() {
                bottom = n;
            } else {
                break;
            }
        }
        if bottom == left {
            return Ok(());
        }

        let mut right = bottom;
        while let Some(n) = front.next(right) {
            if self.node_coords(right).y() < self.node_coords(n).y() {
                right = n;
            } else {
                break;
            }
        }
        if right == bottom {
            return Ok(());
        }

        let basin = Basin {
            left,
            right,
            width: self.node_coords(right).x() - self.node_coords(left).x(),
            left_highest: self.node_coords(left).y() > self.node_coords(right).y(),
        };
        log::trace!("basin {} .. {} .. {}", front.point(left), front.point(bottom), front.point(right));
        self.stats.basin_fills += 1;

        self.fill_basin_from(basin, bottom)
    }

    /// Fills the basin upwards from `ni`, always continuing on the lower side, until it becomes shallow
    fn fill_basin_from(&mut self, basin: Basin<C>, ni: NodeId<C>) -> Result<(), TriangulationError> {
        let mut ni = ni;
        loop {
            self.step()?;
            if self.is_shallow(basin, ni) {
                return Ok(());
            }

            self.fill(ni)?;

            // `ni` is unlinked now but still knows its former neighbors
            let front = self.tcx.front();
            let prev = front.expect_prev(ni)?;
            let next = front.expect_next(ni)?;

            ni = if prev == basin.left && next == basin.right {
                return Ok(());
            } else if prev == basin.left {
                let next2 = front.expect_next(next)?;
                if math::orient_2d(self.node_coords(ni), self.node_coords(next), self.node_coords(next2)).is_cw() {
                    return Ok(());
                }
                next
            } else if next == basin.right {
                let prev2 = front.expect_prev(prev)?;
                if math::orient_2d(self.node_coords(ni), self.node_coords(prev), self.node_coords(prev2)).is_ccw() {
                    return Ok(());
                }
                prev
            } else if self.node_coords(prev).y() < self.node_coords(next).y() {
                prev
            } else {
                next
            };
        }
    }

    fn is_shallow(&self, basin: Basin<C>, ni: NodeId<C>) -> bool {
        let rim = if basin.left_highest { basin.left } else { basin.right };
        let height = self.node_coords(rim).y() - self.node_coords(ni).y();
        basin.width > height
    }

    fn edge_event(&mut self, ei: EdgeId<C>, ni: NodeId<C>) -> Result<(), TriangulationError> {
        let edge = self.tcx.edge(ei);
        let ev = EdgeEvent {
            lower: edge.lower(),
            upper: edge.upper(),
            right: self.coords(edge.lower()).x() > self.coords(edge.upper()).x(),
        };
        log::trace!("edge event {} {}", ei, edge);

        let ti = self.front_triangle(ni)?;
        if self.is_edge_side_of_triangle(ti, ev.lower, ev.upper) {
            return Ok(());
        }

        self.fill_edge_event(ev, ni)?;

        let ti = self.front_triangle(ni)?;
        self.insert_edge(ev, ti)
    }

    fn front_triangle(&self, ni: NodeId<C>) -> Result<TriangleId<C>, InternalError> {
        self.tcx.front().triangle(ni).ok_or_else(|| InternalError::new(format!("{} has no triangle", ni)))
    }

    /// If `ti` already has the edge `ep - eq`, marks it constrained on both sides
    fn is_edge_side_of_triangle(&mut self, ti: TriangleId<C>, ep: PointId<C>, eq: PointId<C>) -> bool {
        let t = self.tcx.triangle_mut(ti);
        match t.edge_index(ep, eq) {
            Some(i) => {
                t.set_constrained(i, true);
                if let Some(nti) = t.neighbor(i) {
                    self.tcx.triangle_mut(nti).mark_constrained_edge(ep, eq);
                }
                true
            },
            None => false,
        }
    }

    fn fill_edge_event(&mut self, ev: EdgeEvent<C>, ni: NodeId<C>) -> Result<(), TriangulationError> {
        if ev.right {
            self.fill_right_above_edge_event(ev, ni)
        } else {
            self.fill_left_above_edge_event(ev, ni)
        }
    }

    fn fill_right_above_edge_event(&mut self, ev: EdgeEvent<C>, ni: NodeId<C>) -> Result<(), TriangulationError> {
        let (lower, upper) = (self.coords(ev.lower), self.coords(ev.upper));
        let mut ni = ni;
        loop {
            self.step()?;
            let next = self.tcx.front().expect_next(ni)?;
            if self.node_coords(next).x() >= lower.x() {
                return Ok(());
            }
            // Is the next node below the edge?
            if math::orient_2d(upper, self.node_coords(next), lower).is_ccw() {
                if !self.fill_right_below_edge_event(ev, ni)? {
                    ni = next;
                }
            } else {
                ni = next;
            }
        }
    }

    /// Returns `false` if nothing could be filled
    fn fill_right_below_edge_event(&mut self, ev: EdgeEvent<C>, ni: NodeId<C>) -> Result<bool, TriangulationError> {
        let lower = self.coords(ev.lower);
        let mut filled = false;
        loop {
            self.step()?;
            if self.node_coords(ni).x() >= lower.x() {
                return Ok(filled);
            }
            let next = self.tcx.front().expect_next(ni)?;
            let next2 = self.tcx.front().expect_next(next)?;
            if math::orient_2d(self.node_coords(ni), self.node_coords(next), self.node_coords(next2)).is_ccw() {
                self.fill_right_concave_edge_event(ev, ni)?;
                return Ok(true);
            }
            if !self.fill_right_convex_edge_event(ev, ni)? {
                return Ok(filled);
            }
            filled = true;
        }
    }

    fn fill_right_concave_edge_event(&mut self, ev: EdgeEvent<C>, ni: NodeId<C>) -> Result<(), TriangulationError> {
        let (lower, upper) = (self.coords(ev.lower), self.coords(ev.upper));
        loop {
            self.step()?;
            let next = self.tcx.front().expect_next(ni)?;
            self.fill(next)?;

            let next = self.tcx.front().expect_next(ni)?;
            if self.tcx.front().point(next) == ev.lower {
                return Ok(());
            }
            if !math::orient_2d(upper, self.node_coords(next), lower).is_ccw() {
                return Ok(());
            }
            let next2 = self.tcx.front().expect_next(next)?;
            if !math::orient_2d(self.node_coords(ni), self.node_coords(next), self.node_coords(next2)).is_ccw() {
                return Ok(());
            }
        }
    }

    /// Returns `false` if nothing could be filled
    fn fill_right_convex_edge_event(&mut self, ev: EdgeEvent<C>, ni: NodeId<C>) -> Result<bool, TriangulationError> {
        let (lower, upper) = (self.coords(ev.lower), self.coords(ev.upper));
        let mut ni = ni;
        loop {
            self.step()?;
            let front = self.tcx.front();
            let next = front.expect_next(ni)?;
            let next2 = front.expect_next(next)?;
            let next3 = match front.next(next2) {
                Some(next3) => next3,
                None => return Ok(false),
            };

            if math::orient_2d(self.node_coords(next), self.node_coords(next2), self.node_coords(next3)).is_ccw() {
                self.fill_right_concave_edge_event(ev, next)?;
                return Ok(true);
            } else if math::orient_2d(upper, self.node_coords(next2), lower).is_ccw() {
                ni = next;
            } else {
                return Ok(false);
            }
        }
    }

    fn fill_left_above_edge_event(&mut self, ev: EdgeEvent<C>, ni: NodeId<C>) -> Result<(), TriangulationError> {
        let (lower, upper) = (self.coords(ev.lower), self.coords(ev.upper));
        let mut ni = ni;
        loop {
            self.step()?;
            let prev = self.tcx.front().expect_prev(ni)?;
            if self.node_coords(prev).x() <= lower.x() {
                return Ok(());
            }
            // Is the previous node below the edge?
            if math::orient_2d(upper, self.node_coords(prev), lower).is_cw() {
                if !self.fill_left_below_edge_event(ev, ni)? {
                    ni = prev;
                }
            } else {
                ni = prev;
            }
        }
    }

    /// Returns `false` if nothing could be filled
    fn fill_left_below_edge_event(&mut self, ev: EdgeEvent<C>, ni: NodeId<C>) -> Result<bool, TriangulationError> {
        let lower = self.coords(ev.lower);
        let mut filled = false;
        loop {
            self.step()?;
            if self.node_coords(ni).x() <= lower.x() {
                return Ok(filled);
            }
            let prev = self.tcx.front().expect_prev(ni)?;
            let prev2 = self.tcx.front().expect_prev(prev)?;
            if math::orient_2d(self.node_coords(ni), self.node_coords(prev), self.node_coords(prev2)).is_cw() {
                self.fill_left_concave_edge_event(ev, ni)?;
                return Ok(true);
            }
            if !self.fill_left_convex_edge_event(ev, ni)? {
                return Ok(filled);
            }
            filled = true;
        }
    }

    fn fill_left_concave_edge_event(&mut self, ev: EdgeEvent<C>, ni: NodeId<C>) -> Result<(), TriangulationError> {
        let (lower, upper) = (self.coords(ev.lower), self.coords(ev.upper));
        loop {
            self.step()?;
            let prev = self.tcx.front().expect_prev(ni)?;
            self.fill(prev)?;

            let prev = self.tcx.front().expect_prev(ni)?;
            if self.tcx.front().point(prev) == ev.lower {
                return Ok(());
            }
            if !math::orient_2d(upper, self.node_coords(prev), lower).is_cw() {
                return Ok(());
            }
            let prev2 = self.tcx.front().expect_prev(prev)?;
            if !math::orient_2d(self.node_coords(ni), self.node_coords(prev), self.node_coords(prev2)).is_cw() {
                return Ok(());
            }
        }
    }

    /// Returns `false` if nothing could be filled
    fn fill_left_convex_edge_event(&mut self, ev: EdgeEvent<C>, ni: NodeId<C>) -> Result<bool, TriangulationError> {
        let (lower, upper) = (self.coords(ev.lower), self.coords(ev.upper));
        let mut ni = ni;
        loop {
            self.step()?;
            let front = self.tcx.front();
            let prev = front.expect_prev(ni)?;
            let prev2 = front.expect_prev(prev)?;
            let prev3 = match front.prev(prev2) {
                Some(prev3) => prev3,
                None => return Ok(false),
            };

            if math::orient_2d(self.node_coords(prev), self.node_coords(prev2), self.node_coords(prev3)).is_cw() {
                self.fill_left_concave_edge_event(ev, prev)?;
                return Ok(true);
            } else if math::orient_2d(upper, self.node_coords(prev2), lower).is_cw() {
                ni = prev;
            } else {
                return Ok(false);
            }
        }
    }

    /// Flips triangles until the edge of `ev` is an edge of the mesh, starting from `ti` around its upper point
    fn insert_edge(&mut self, ev: EdgeEvent<C>, ti: TriangleId<C>) -> Result<(), TriangulationError> {
        let mut tasks: SmallVec<[EdgeTask<C>; 8]> = SmallVec::new();
        tasks.push(EdgeTask::Edge { ep: ev.lower, eq: ev.upper, ti: Some(ti), p: ev.upper });

        while let Some(task) = tasks.pop() {
            self.step()?;
            match task {
                EdgeTask::Edge { ep, eq, ti, p } => self.edge_event_step(ev, &mut tasks, ep, eq, ti, p)?,
                EdgeTask::Flip { ep, eq, ti, p } => self.flip_edge_event(ev, &mut tasks, ep, eq, ti, p)?,
                EdgeTask::FlipScan { ep, eq, flip_ti, ti, p } => self.flip_scan_edge_event(ev, &mut tasks, ep, eq, flip_ti, ti, p)?,
            }
        }

        // Legalize every flipped pair now that the constraint is in place
        let mut flipped = std::mem::take(&mut self.flipped);
        for ti in flipped.drain(..) {
            if !self.legalize(ti)? {
                self.tcx.map_triangle_to_nodes(ti)?;
            }
        }
        self.flipped = flipped;

        Ok(())
    }

    /// Classifies `x`, a vertex exactly on the line through `eq` and `ep`.
    ///
    /// A vertex behind `eq` cannot block the edge. A vertex between the endpoints is an error.
    fn check_collinear(&self, ev: EdgeEvent<C>, ep: PointId<C>, eq: PointId<C>, x: PointId<C>) -> Result<(), TriangulationError> {
        let (cp, cq, cx) = (self.coords(ep), self.coords(eq), self.coords(x));
        let (ex, ey) = (cp.x() - cq.x(), cp.y() - cq.y());
        let (dx, dy) = (cx.x() - cq.x(), cx.y() - cq.y());
        let dot = ex * dx + ey * dy;
        if dot <= C::zero() {
            Ok(())
        } else if dx * dx + dy * dy < ex * ex + ey * ey {
            Err(self.point_on_constraint(ev, x))
        } else {
            Err(InternalError::new(format!("{} lies on the triangle edge {} - {}", ep, eq, x)).into())
        }
    }

    fn edge_event_step(&mut self, ev: EdgeEvent<C>, tasks: &mut SmallVec<[EdgeTask<C>; 8]>, ep: PointId<C>, eq: PointId<C>, ti: Option<TriangleId<C>>, p: PointId<C>) -> Result<(), TriangulationError> {
        let ti = ti.ok_or_else(|| self.non_simple(ev))?;
        if self.is_edge_side_of_triangle(ti, ep, eq) {
            return Ok(());
        }

        let t = self.tcx.triangle(ti);
        let p1 = t.point_ccw(p)?;
        let p2 = t.point_cw(p)?;
        let mut o1 = math::orient_2d(self.coords(eq), self.coords(p1), self.coords(ep));
        let mut o2 = math::orient_2d(self.coords(eq), self.coords(p2), self.coords(ep));

        // A vertex behind `eq` takes the side of the other vertex, which turns towards the edge
        if o1.is_collinear() {
            self.check_collinear(ev, ep, eq, p1)?;
            o1 = o2;
        }
        if o2.is_collinear() {
            self.check_collinear(ev, ep, eq, p2)?;
            o2 = o1;
        }
        if o1.is_collinear() {
            return Err(InternalError::new(format!("{} is degenerate", ti)).into());
        }

        if o1 == o2 {
            // Rotate around `p` towards the triangle crossing the edge
            let next = if o1.is_cw() {
                t.neighbor_ccw(p)?
            } else {
                t.neighbor_cw(p)?
            };
            tasks.push(EdgeTask::Edge { ep, eq, ti: next, p });
        } else {
            tasks.push(EdgeTask::Flip { ep, eq, ti, p });
        }

        Ok(())
    }

    fn flip_edge_event(&mut self, ev: EdgeEvent<C>, tasks: &mut SmallVec<[EdgeTask<C>; 8]>, ep: PointId<C>, eq: PointId<C>, ti: TriangleId<C>, p: PointId<C>) -> Result<(), TriangulationError> {
        let t = self.tcx.triangle(ti);
        let oti = t.neighbor_across(p)?.ok_or_else(|| self.non_simple(ev))?;
        let ot = self.tcx.triangle(oti);
        let op = ot.opposite_point(t, p)?;

        if !math::in_scan_area(self.coords(p), self.coords(t.point_ccw(p)?), self.coords(t.point_cw(p)?), self.coords(op)) {
            // The quad is not convex, so flip the next triangle over first
            let new_p = self.next_flip_point(ev, ep, eq, oti, op)?;
            tasks.push(EdgeTask::Edge { ep, eq, ti: Some(ti), p });
            tasks.push(EdgeTask::FlipScan { ep, eq, flip_ti: ti, ti: oti, p: new_p });
            return Ok(());
        }

        // The edge about to be flipped is crossed by the edge being inserted
        if t.is_constrained(t.index(p)?) || ot.is_constrained(ot.index(op)?) {
            return Err(self.non_simple(ev));
        }

        self.rotate_triangle_pair(ti, p, oti, op)?;
        self.tcx.map_triangle_to_nodes(ti)?;
        self.tcx.map_triangle_to_nodes(oti)?;
        self.flipped.extend([ti, oti]);

        if p == eq && op == ep {
            if eq == ev.upper && ep == ev.lower {
                self.tcx.triangle_mut(ti).mark_constrained_edge(ep, eq);
                self.tcx.triangle_mut(oti).mark_constrained_edge(ep, eq);
            }
        } else {
            let o = math::orient_2d(self.coords(eq), self.coords(op), self.coords(ep));
            let next_ti = self.next_flip_triangle(ev, o, ti, oti, op)?;
            tasks.push(EdgeTask::Flip { ep, eq, ti: next_ti, p });
        }

        Ok(())
    }

    /// After a flip, returns whichever of the pair still crosses the edge
    fn next_flip_triangle(&self, ev: EdgeEvent<C>, o: Orientation, ti: TriangleId<C>, oti: TriangleId<C>, op: PointId<C>) -> Result<TriangleId<C>, TriangulationError> {
        match o {
            Orientation::Counterclockwise => Ok(ti),
            Orientation::Clockwise => Ok(oti),
            Orientation::Collinear => Err(self.point_on_constraint(ev, op)),
        }
    }

    /// The vertex of `oti` to continue scanning from, on the side of the edge `op` is not on
    fn next_flip_point(&self, ev: EdgeEvent<C>, ep: PointId<C>, eq: PointId<C>, oti: TriangleId<C>, op: PointId<C>) -> Result<PointId<C>, TriangulationError> {
        let ot = self.tcx.triangle(oti);
        match math::orient_2d(self.coords(eq), self.coords(op), self.coords(ep)) {
            Orientation::Clockwise => Ok(ot.point_ccw(op)?),
            Orientation::Counterclockwise => Ok(ot.point_cw(op)?),
            Orientation::Collinear => Err(self.point_on_constraint(ev, op)),
        }
    }

    /// Walks across the triangles crossed by the edge until one can be flipped into `flip_ti`'s corner at `eq`
    #[allow(clippy::too_many_arguments)]
    fn flip_scan_edge_event(&mut self, ev: EdgeEvent<C>, tasks: &mut SmallVec<[EdgeTask<C>; 8]>, ep: PointId<C>, eq: PointId<C>, flip_ti: TriangleId<C>, ti: TriangleId<C>, p: PointId<C>) -> Result<(), TriangulationError> {
        let t = self.tcx.triangle(ti);
        let oti = t.neighbor_across(p)?.ok_or_else(|| self.non_simple(ev))?;
        let op = self.tcx.triangle(oti).opposite_point(t, p)?;

        let flip = self.tcx.triangle(flip_ti);
        let p1 = flip.point_ccw(eq)?;
        let p2 = flip.point_cw(eq)?;

        if math::in_scan_area(self.coords(eq), self.coords(p1), self.coords(p2), self.coords(op)) {
            // Insert `eq - op` first, which turns the corner at `eq` convex
            tasks.push(EdgeTask::Flip { ep: eq, eq: op, ti: oti, p: op });
        } else {
            let new_p = self.next_flip_point(ev, ep, eq, oti, op)?;
            tasks.push(EdgeTask::FlipScan { ep, eq, flip_ti, ti: oti, p: new_p });
        }

        Ok(())
    }

    /// Flips the edge shared by `ti` and `oti`, where `p` is the point of `ti` and `op` the point of `oti`
    /// opposite it. Afterwards `ti` and `oti` share the edge `p - op`.
    fn rotate_triangle_pair(&mut self, ti: TriangleId<C>, p: PointId<C>, oti: TriangleId<C>, op: PointId<C>) -> Result<(), InternalError> {
        log::trace!("flip {} {} across {} {}", ti, p, oti, op);
        let ts = self.tcx.triangles_mut();

        let t = &ts[ti];
        let (n1, n2) = (t.neighbor_ccw(p)?, t.neighbor_cw(p)?);
        let (ce1, ce2) = (t.constrained_ccw(p)?, t.constrained_cw(p)?);
        let (de1, de2) = (t.delaunay_ccw(p)?, t.delaunay_cw(p)?);

        let ot = &ts[oti];
        let (n3, n4) = (ot.neighbor_ccw(op)?, ot.neighbor_cw(op)?);
        let (ce3, ce4) = (ot.constrained_ccw(op)?, ot.constrained_cw(op)?);
        let (de3, de4) = (ot.delaunay_ccw(op)?, ot.delaunay_cw(op)?);

        ts[ti].legalize(p, op)?;
        ts[oti].legalize(op, p)?;

        let ot = &mut ts[oti];
        ot.set_delaunay_ccw(p, de1)?;
        ot.set_delaunay_cw(op, de4)?;
        ot.set_constrained_ccw(p, ce1)?;
        ot.set_constrained_cw(op, ce4)?;
        ot.clear_neighbors();

        let t = &mut ts[ti];
        t.set_delaunay_cw(p, de2)?;
        t.set_delaunay_ccw(op, de3)?;
        t.set_constrained_cw(p, ce2)?;
        t.set_constrained_ccw(op, ce3)?;
        t.clear_neighbors();

        if let Some(n1) = n1 {
            Triangle::mark_neighbor(ts, oti, n1);
        }
        if let Some(n2) = n2 {
            Triangle::mark_neighbor(ts, ti, n2);
        }
        if let Some(n3) = n3 {
            Triangle::mark_neighbor(ts, ti, n3);
        }
        if let Some(n4) = n4 {
            Triangle::mark_neighbor(ts, oti, n4);
        }
        Triangle::mark_neighbor_on_edge(ts, ti, oti, p, op)?;

        self.stats.flips += 1;
        Ok(())
    }

    /// Restores the Delaunay property around `root` by flipping illegal edges.
    ///
    /// Returns `true` if `root` itself was flipped. Triangles flipped along the way are mapped onto
    /// the front as needed, but `root` is left for the caller to map.
    fn legalize(&mut self, root: TriangleId<C>) -> Result<bool, TriangulationError> {
        let mut tasks: SmallVec<[LegalizeTask<C>; 16]> = SmallVec::new();
        tasks.push(LegalizeTask::Legalize { ti: root, map: false });
        let mut root_flipped = None;

        while let Some(task) = tasks.pop() {
            self.step()?;
            match task {
                LegalizeTask::Legalize { ti, map } => {
                    let flipped = self.legalize_one(ti, &mut tasks)?;
                    if root_flipped.is_none() {
                        root_flipped = Some(flipped);
                    }
                    if !flipped && map {
                        self.tcx.map_triangle_to_nodes(ti)?;
                    }
                },
                LegalizeTask::Reset { ti, i, oti, oi } => {
                    self.tcx.triangle_mut(ti).set_delaunay(i, false);
                    self.tcx.triangle_mut(oti).set_delaunay(oi, false);
                },
            }
        }

        Ok(root_flipped.unwrap_or(false))
    }

    /// Flips the first illegal edge of `ti`, queueing the follow-up work. Returns `false` if every edge is legal.
    fn legalize_one(&mut self, ti: TriangleId<C>, tasks: &mut SmallVec<[LegalizeTask<C>; 16]>) -> Result<bool, TriangulationError> {
        for i in 0..3 {
            let t = self.tcx.triangle(ti);
            if t.is_delaunay(i) || t.is_constrained(i) {
                continue;
            }
            let oti = match t.neighbor(i) {
                Some(oti) => oti,
                None => continue,
            };

            let p = t.point(i);
            let ot = self.tcx.triangle(oti);
            let op = ot.opposite_point(t, p)?;
            let oi = ot.index(op)?;

            if ot.is_constrained(oi) || ot.is_delaunay(oi) {
                let constrained = ot.is_constrained(oi);
                self.tcx.triangle_mut(ti).set_constrained(i, constrained);
                continue;
            }

            let inside = math::in_circle(self.coords(p), self.coords(t.point_ccw(p)?), self.coords(t.point_cw(p)?), self.coords(op));
            if inside {
                self.tcx.triangle_mut(ti).set_delaunay(i, true);
                self.tcx.triangle_mut(oti).set_delaunay(oi, true);

                self.rotate_triangle_pair(ti, p, oti, op)?;

                tasks.push(LegalizeTask::Reset { ti, i, oti, oi });
                tasks.push(LegalizeTask::Legalize { ti: oti, map: true });
                tasks.push(LegalizeTask::Legalize { ti, map: true });
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn finalization_polygon(&mut self) -> Result<(), TriangulationError> {
        let collected = match self.front_start()? {
            Some(start) => self.tcx.mesh_clean(start),
            None => false,
        };

        if !collected {
            log::trace!("front start did not lead inside the boundary, searching the boundary edges");
            let start = self.boundary_start();
            if !start.map_or(false, |start| self.tcx.mesh_clean(start)) {
                let edge = self.tcx.edge(Idx::new(0));
                return Err(TriangulationError::NonSimplePolygon { edge: edge.vertices() });
            }
        }

        self.tcx.discard_exterior();
        Ok(())
    }

    /// Spins clockwise around the leftmost front point until just past a constrained edge
    fn front_start(&self) -> Result<Option<TriangleId<C>>, InternalError> {
        let front = self.tcx.front();
        let ni = front.expect_next(front.head())?;
        let p = front.point(ni);
        let mut current = front.triangle(ni);
        let mut remaining = self.tcx.triangle_count();

        while let Some(ti) = current {
            if remaining == 0 {
                return Ok(None);
            }
            remaining -= 1;

            let t = self.tcx.triangle(ti);
            if t.constrained_cw(p)? {
                return Ok(Some(ti));
            }
            current = t.neighbor_ccw(p)?;
        }
        Ok(None)
    }

    /// The triangle on the inner side of the first boundary edge
    fn boundary_start(&self) -> Option<TriangleId<C>> {
        let (a, b) = (Idx::new(0), Idx::new(1));
        let inner = if self.tcx.boundary_is_ccw() { Orientation::Counterclockwise } else { Orientation::Clockwise };

        (0..self.tcx.triangle_count()).map(Idx::new).find(|&ti| {
            let t = self.tcx.triangle(ti);
            match t.edge_index(a, b) {
                Some(i) => math::orient_2d(self.coords(a), self.coords(b), self.coords(t.point(i))) == inner,
                None => false,
            }
        })
    }
}

#[cfg(feature = "debugging")]
impl<C: Real> Sweep<C> {
    fn svg_context(tcx: &SweepContext<C>) -> Option<debug::svg::SvgContext> {
        let output_path = debug::env::svg::output_path()?;
        let output_level = debug::env::svg::output_level();
        let show_labels = debug::env::svg::show_labels();

        if output_level == debug::svg::SvgOutputLevel::None {
            return None;
        }

        // The artificial points are included so the whole front stays in view
        let mut view_x_min = f32::MAX;
        let mut view_x_max = f32::MIN;
        let mut view_y_min = f32::MAX;
        let mut view_y_max = f32::MIN;
        for p in tcx.points() {
            let (x, y) = debug::svg::to_f32(p.coords());
            view_x_min = view_x_min.min(x);
            view_x_max = view_x_max.max(x);
            view_y_min = view_y_min.min(y);
            view_y_max = view_y_max.max(y);
        }

        let w = view_x_max - view_x_min;
        let h = view_y_max - view_y_min;
        let margin_scale = 0.05;
        view_x_min -= w * margin_scale;
        view_x_max += w * margin_scale;
        view_y_min -= h * margin_scale;
        view_y_max += h * margin_scale;

        Some(debug::svg::SvgContext {
            output_path,
            output_level,
            view_x_min,
            view_x_max,
            view_y_min,
            view_y_max,
            show_labels,
        })
    }

    fn output_svg(&mut self, level: debug::svg::SvgOutputLevel, highlight: Option<PointId<C>>) {
        if let Some(svg_context) = &self.svg_context {
            if svg_context.output_level >= level {
                // Make the directory for this step if this is the first svg
                if self.current_substep == 0 {
                    let path = svg_context.output_path.join(format!("{:03}", self.current_step));
                    if std::fs::create_dir(path).is_err() {
                        return;
                    }
                }

                let style = debug::svg::SvgSweepStyle {
                    highlight_point: highlight.map(|p| p.usize()),
                    add_labels: svg_context.show_labels,
                };
                let mut svg = debug::svg::SvgOutput::new(svg_context, style);
                let _ = svg.append_element(&self.tcx, &());

                let path: std::path::PathBuf = format!("{:03}", self.current_step).into();
                let path = path.join(format!("{:03}.svg", self.current_substep));
                if let Err(e) = svg.save(path) {
                    log::warn!("Could not write sweep svg: {}", e);
                }

                self.current_substep += 1;
            }
        }
    }

    fn advance_step(&mut self) {
        if let Some(svg_context) = &self.svg_context {
            if svg_context.output_level >= debug::svg::SvgOutputLevel::MajorSteps && self.current_substep > 0 {
                self.current_step += 1;
                self.current_substep = 0;
            }
        }
    }
}
