//! Structural checks of a finished [Mesh] against the input it was built from

use std::collections::HashSet;

use num_traits::ToPrimitive;

use crate::{Cdt, Mesh, Vertex, inputs::Coords, math};

fn coords<V: Vertex>(cdt: &Cdt<V>, vi: usize) -> [f64; 2] {
    let v = &cdt.vertices()[vi];
    [v.x().to_f64().unwrap(), v.y().to_f64().unwrap()]
}

fn signed_area_2x(ps: &[[f64; 2]]) -> f64 {
    (0..ps.len()).map(|i| {
        let (p, q) = (ps[i], ps[(i + 1) % ps.len()]);
        p[0] * q[1] - q[0] * p[1]
    }).sum()
}

/// Incircle determinant of `d` against counterclockwise `a, b, c`, positive when inside
fn in_circle_det(a: [f64; 2], b: [f64; 2], c: [f64; 2], d: [f64; 2]) -> f64 {
    let (adx, ady) = (a[0] - d[0], a[1] - d[1]);
    let (bdx, bdy) = (b[0] - d[0], b[1] - d[1]);
    let (cdx, cdy) = (c[0] - d[0], c[1] - d[1]);
    (adx * adx + ady * ady) * (bdx * cdy - cdx * bdy)
        - (bdx * bdx + bdy * bdy) * (adx * cdy - cdx * ady)
        + (cdx * cdx + cdy * cdy) * (adx * bdy - bdx * ady)
}

/// Every undirected polygon edge of the input
pub fn polygon_edges<V: Vertex>(cdt: &Cdt<V>) -> HashSet<(usize, usize)> {
    let mut edges = HashSet::new();
    for polygon in cdt.polygons() {
        for i in polygon.clone() {
            let j = if i + 1 == polygon.end { polygon.start } else { i + 1 };
            edges.insert((i.min(j), i.max(j)));
        }
    }
    edges
}

/// The number of triangles any triangulation of the input has
pub fn expected_triangle_count<V: Vertex>(cdt: &Cdt<V>) -> usize {
    let polygon_vertices: usize = cdt.polygons().iter().map(|p| p.len()).sum();
    let steiner = cdt.vertices().len() - polygon_vertices;
    polygon_vertices + 2 * steiner + 2 * cdt.hole_count() - 2
}

/// Panics unless `mesh` is a valid constrained Delaunay triangulation of the input of `cdt`
pub fn check_mesh<V: Vertex>(cdt: &Cdt<V>, mesh: &Mesh) {
    let c = |vi: usize| coords(cdt, vi);

    assert_eq!(mesh.len(), expected_triangle_count(cdt), "triangle count");

    for (ti, t) in mesh.iter().enumerate() {
        let [a, b, d] = t.vertices;
        assert!(a != b && b != d && a != d, "t{} repeats a vertex", ti);

        // Counterclockwise and not degenerate, judged with the sweep's own predicate
        let orientation = {
            let v = cdt.vertices();
            math::orient_2d(Coords::of(&v[a]), Coords::of(&v[b]), Coords::of(&v[d]))
        };
        assert!(orientation.is_ccw(), "t{} {} is {:?}", ti, t, orientation);

        for i in 0..3 {
            let (p, q) = t.edge(i);
            match t.neighbors[i] {
                Some(ni) => {
                    let n = &mesh[ni];
                    let j = n.edge_index(p, q).unwrap_or_else(|| panic!("t{} does not share {}-{} with t{}", ni, p, q, ti));
                    assert_eq!(n.neighbors[j], Some(ti), "t{} does not link back to t{}", ni, ti);
                    assert_eq!(n.constrained[j], t.constrained[i], "t{} and t{} disagree on {}-{}", ti, ni, p, q);
                    assert_eq!(n.edge(j), (q, p), "t{} and t{} are not consistently wound", ti, ni);
                },
                None => assert!(t.constrained[i], "t{} has an open edge {}-{} which is not constrained", ti, p, q),
            }
        }
    }

    // Every polygon edge is in the mesh, constrained, and nothing else is constrained
    let expected = polygon_edges(cdt);
    let found: HashSet<(usize, usize)> = mesh.constrained_edges().into_iter().map(|(p, q)| (p.min(q), p.max(q))).collect();
    assert_eq!(found.len(), mesh.constrained_edges().len(), "a constrained edge is reported twice");
    assert_eq!(found, expected, "constrained edges");

    // No unconstrained edge has its opposite vertex inside the circumcircle
    let scale = cdt.vertices().iter()
        .map(|v| v.x().to_f64().unwrap().abs().max(v.y().to_f64().unwrap().abs()))
        .fold(1.0f64, f64::max);
    let tolerance = 1e-9 * scale.powi(4);
    for t in mesh.iter() {
        for i in 0..3 {
            if let (false, Some(ni)) = (t.constrained[i], t.neighbors[i]) {
                let n = &mesh[ni];
                let (p, q) = t.edge(i);
                let j = n.edge_index(p, q).unwrap();
                let det = in_circle_det(c(t.vertices[0]), c(t.vertices[1]), c(t.vertices[2]), c(n.vertices[j]));
                assert!(det <= tolerance, "edge {}-{} of {} is not locally Delaunay ({})", p, q, t, det);
            }
        }
    }

    // The triangles exactly cover the boundary minus the holes
    let outline = |r: &std::ops::Range<usize>| r.clone().map(c).collect::<Vec<_>>();
    let polygons = cdt.polygons();
    let expected_area = signed_area_2x(&outline(&polygons[0])).abs()
        - polygons[1..].iter().map(|h| signed_area_2x(&outline(h)).abs()).sum::<f64>();
    let area: f64 = mesh.iter().map(|t| signed_area_2x(&[c(t.vertices[0]), c(t.vertices[1]), c(t.vertices[2])])).sum();
    assert!((area - expected_area).abs() <= 1e-6 * expected_area.abs(), "triangles cover {} instead of {}", area / 2.0, expected_area / 2.0);

    // With the area right, a triangle inside a hole would mean another one is missing, but check directly
    for t in mesh.iter() {
        let centroid = [0, 1, 2].iter().fold([0.0, 0.0], |acc, &i| {
            let p = c(t.vertices[i]);
            [acc[0] + p[0] / 3.0, acc[1] + p[1] / 3.0]
        });
        let centroid = Coords::new(centroid[0], centroid[1]);
        for hole in &polygons[1..] {
            let hole: Vec<_> = outline(hole).into_iter().map(|[x, y]| Coords::new(x, y)).collect();
            assert_ne!(math::point_in_polygon(centroid, &hole), Some(true), "{} lies inside a hole", t);
        }
    }
}
