use std::{collections::HashMap, fmt, ops, slice};

use num_traits::real::Real;

use crate::{
    sweep::SweepStats,
    sweep_context::SweepContext,
};

/// One triangle of a [Mesh]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Triangle {
    /// Input vertex ids, counterclockwise
    pub vertices: [usize; 3],
    /// `constrained[i]` is set if the edge opposite `vertices[i]` is a boundary or hole edge
    pub constrained: [bool; 3],
    /// `neighbors[i]` is the index in the [Mesh] of the triangle across the edge opposite `vertices[i]`
    pub neighbors: [Option<usize>; 3],
}

impl Triangle {
    /// The edge opposite `vertices[i]`, counterclockwise
    pub fn edge(&self, i: usize) -> (usize, usize) {
        (self.vertices[(i + 1) % 3], self.vertices[(i + 2) % 3])
    }

    /// The slot of the vertex opposite the edge `a - b`, in either direction
    pub fn edge_index(&self, a: usize, b: usize) -> Option<usize> {
        let ia = self.vertices.iter().position(|&v| v == a)?;
        let ib = self.vertices.iter().position(|&v| v == b)?;
        if ia == ib {
            None
        } else {
            Some(3 - ia - ib)
        }
    }

    pub fn contains(&self, v: usize) -> bool {
        self.vertices.contains(&v)
    }

    /// `false` if this triangle has no edge `a - b`
    pub fn is_constrained_edge(&self, a: usize, b: usize) -> bool {
        self.edge_index(a, b).map_or(false, |i| self.constrained[i])
    }
}

impl fmt::Display for Triangle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}, {}]", self.vertices[0], self.vertices[1], self.vertices[2])
    }
}

/// The triangles covering the region inside the boundary and outside every hole
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mesh {
    triangles: Vec<Triangle>,
    stats: SweepStats,
}

impl Mesh {
    pub(crate) fn from_sweep<C: Real>(tcx: &SweepContext<C>, stats: SweepStats) -> Self {
        let interior = tcx.interior();
        let output_index: HashMap<usize, usize> = interior.iter()
            .enumerate()
            .map(|(i, ti)| (ti.usize(), i))
            .collect();

        let triangles = interior.iter().map(|&ti| {
            let t = tcx.triangle(ti);
            let points = t.points();
            let neighbors = t.neighbors();
            Triangle {
                vertices: [points[0].usize(), points[1].usize(), points[2].usize()],
                constrained: *t.constrained(),
                neighbors: [0, 1, 2].map(|i| neighbors[i].and_then(|n| output_index.get(&n.usize()).copied())),
            }
        }).collect();

        Self { triangles, stats }
    }

    pub fn triangles(&self) -> &[Triangle] { &self.triangles }
    pub fn len(&self) -> usize { self.triangles.len() }
    pub fn is_empty(&self) -> bool { self.triangles.is_empty() }
    pub fn iter(&self) -> slice::Iter<'_, Triangle> { self.triangles.iter() }

    /// Counters from the sweep which built this mesh
    pub fn stats(&self) -> &SweepStats { &self.stats }

    /// Every constrained edge once, in the winding of the triangle it was found in
    pub fn constrained_edges(&self) -> Vec<(usize, usize)> {
        let mut edges = Vec::new();
        for (ti, t) in self.triangles.iter().enumerate() {
            for i in 0..3 {
                // An edge shared by two triangles is reported by the lower-indexed one
                if t.constrained[i] && t.neighbors[i].map_or(true, |n| n > ti) {
                    edges.push(t.edge(i));
                }
            }
        }
        edges
    }
}

impl ops::Index<usize> for Mesh {
    type Output = Triangle;

    fn index(&self, index: usize) -> &Self::Output {
        &self.triangles[index]
    }
}

impl<'a> IntoIterator for &'a Mesh {
    type Item = &'a Triangle;
    type IntoIter = slice::Iter<'a, Triangle>;

    fn into_iter(self) -> Self::IntoIter {
        self.triangles.iter()
    }
}
