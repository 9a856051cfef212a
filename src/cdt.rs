use std::ops::Range;

use crate::{
    errors::TriangulationError,
    inputs::{Coords, Vertex},
    mesh::{Mesh, Triangle},
    outputs::{ListBuilder, ListFormat},
    sweep::Sweep,
    sweep_context::SweepContext,
    validation,
};

/// A constrained Delaunay triangulation of a simple polygon, optionally with holes and Steiner points.
///
/// Vertex ids are assigned in insertion order: the boundary gets `0..n`, and every later hole vertex
/// or Steiner point takes the next id.
///
/// ```
/// use cdt_sweep::Cdt;
///
/// let mut cdt = Cdt::new([[0.0, 0.0], [4.0, 0.0], [4.0, 4.0], [0.0, 4.0]])?;
/// cdt.add_hole([[1.0, 1.0], [1.0, 3.0], [3.0, 3.0], [3.0, 1.0]])?;
/// let mesh = cdt.triangulate()?;
/// assert_eq!(mesh.len(), 8);
/// # Ok::<(), cdt_sweep::TriangulationError>(())
/// ```
#[derive(Debug, Clone)]
pub struct Cdt<V: Vertex> {
    vertices: Vec<V>,
    /// Ranges of `vertices`, boundary first
    polygons: Vec<Range<usize>>,
    mesh: Option<Mesh>,
}

impl<V: Vertex> Cdt<V> {
    /// Starts a triangulation of the simple polygon `boundary`, in either winding
    pub fn new<I: IntoIterator<Item = V>>(boundary: I) -> Result<Self, TriangulationError> {
        let vertices: Vec<V> = boundary.into_iter().collect();
        if vertices.len() < 3 {
            return Err(TriangulationError::NotEnoughVertices(vertices.len()));
        }
        let polygons = vec![0..vertices.len()];
        Ok(Self {
            vertices,
            polygons,
            mesh: None,
        })
    }

    /// Adds a hole, which must lie strictly inside the boundary and must not touch any other hole
    pub fn add_hole<I: IntoIterator<Item = V>>(&mut self, hole: I) -> Result<&mut Self, TriangulationError> {
        let start = self.vertices.len();
        self.vertices.extend(hole);
        let count = self.vertices.len() - start;
        if count < 3 {
            self.vertices.truncate(start);
            return Err(TriangulationError::NotEnoughVertices(count));
        }
        self.polygons.push(start..self.vertices.len());
        self.mesh = None;
        Ok(self)
    }

    /// Adds holes in order. Holes before the first invalid one are kept.
    pub fn add_holes<I, H>(&mut self, holes: I) -> Result<&mut Self, TriangulationError>
    where
        I: IntoIterator<Item = H>,
        H: IntoIterator<Item = V>,
    {
        for hole in holes {
            self.add_hole(hole)?;
        }
        Ok(self)
    }

    /// Adds a Steiner point, which must lie strictly inside the region to triangulate. Returns its vertex id.
    pub fn add_point(&mut self, v: V) -> usize {
        self.mesh = None;
        self.vertices.push(v);
        self.vertices.len() - 1
    }

    /// Adds Steiner points, returning the range of their vertex ids
    pub fn add_points<I: IntoIterator<Item = V>>(&mut self, points: I) -> Range<usize> {
        self.mesh = None;
        let start = self.vertices.len();
        self.vertices.extend(points);
        start..self.vertices.len()
    }

    /// Every vertex added so far, indexed by vertex id
    pub fn vertices(&self) -> &[V] { &self.vertices }

    pub fn hole_count(&self) -> usize { self.polygons.len() - 1 }

    /// Vertex id ranges of the boundary and then each hole
    pub(crate) fn polygons(&self) -> &[Range<usize>] { &self.polygons }

    /// Triangulates the current input and stores the result, replacing any earlier result.
    ///
    /// On failure nothing is stored.
    pub fn triangulate(&mut self) -> Result<&Mesh, TriangulationError> {
        self.mesh = None;
        let mesh = self.run()?;
        Ok(self.mesh.insert(mesh))
    }

    /// The triangles from the last successful [Cdt::triangulate], unless input was added since
    pub fn triangles(&self) -> Option<&[Triangle]> {
        self.mesh.as_ref().map(Mesh::triangles)
    }

    pub fn mesh(&self) -> Option<&Mesh> {
        self.mesh.as_ref()
    }

    /// Triangulates the current input and writes the triangles through `format`.
    ///
    /// Nothing is stored on `self`. If triangulation or the builder fails, [ListBuilder::fail] is called.
    pub fn triangulate_into<'v, F: ListFormat<'v, V>>(&'v self, format: F) -> Result<<F::Builder as ListBuilder<'v, V>>::Output, TriangulationError<<F::Builder as ListBuilder<'v, V>>::Error>> {
        let mut builder = format.initialize(&self.vertices).map_err(TriangulationError::ListBuilder)?;

        let mesh = match self.run() {
            Ok(mesh) => mesh,
            Err(e) => {
                let e = e.with_builder_error();
                builder.fail(&e);
                return Err(e);
            },
        };

        for t in mesh.iter() {
            let [vi0, vi1, vi2] = <F::Builder as ListBuilder<'v, V>>::WINDING.arrange(t.vertices);
            if let Err(e) = builder.add_triangle(vi0, vi1, vi2) {
                let e = TriangulationError::ListBuilder(e);
                builder.fail(&e);
                return Err(e);
            }
        }

        builder.build().map_err(TriangulationError::ListBuilder)
    }

    fn run(&self) -> Result<Mesh, TriangulationError> {
        let result = self.sweep();
        if let Err(e) = &result {
            log::warn!("Triangulation of {} vertices failed: {}", self.vertices.len(), e);
        }
        result
    }

    fn sweep(&self) -> Result<Mesh, TriangulationError> {
        let coords: Vec<Coords<V::Coordinate>> = self.vertices.iter().map(Coords::of).collect();
        validation::validate(&coords, &self.polygons)?;

        let tcx = SweepContext::new(&coords, &self.polygons)?;
        let edge_count = tcx.edge_count();
        let (tcx, stats) = Sweep::new(tcx).triangulate()?;
        let mesh = Mesh::from_sweep(&tcx, stats);

        log::debug!("{} vertices, {} edges, {} holes: {} triangles ({} created, {} flips, {} fills, {} basins)",
            coords.len(), edge_count, self.hole_count(), mesh.len(),
            stats.triangles_created, stats.flips, stats.fills, stats.basin_fills);

        Ok(mesh)
    }
}
