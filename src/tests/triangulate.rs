use rand::{Rng, SeedableRng, rngs::StdRng};

use crate::{Cdt, TriangulationError};

use super::util::{self, check::check_mesh, VTest};

fn triangulate_checked<V: crate::Vertex>(cdt: &mut Cdt<V>) -> crate::Mesh {
    let mesh = cdt.triangulate().expect("Triangulation failed").clone();
    check_mesh(cdt, &mesh);
    mesh
}

#[test]
fn triangulate() {
    for polygon in util::polygon::all() {
        let mut cdt = Cdt::new(polygon).unwrap();
        triangulate_checked(&mut cdt);
    }
}

#[test]
fn square() {
    let mut cdt = Cdt::new(util::polygon::square()).unwrap();
    let mesh = triangulate_checked(&mut cdt);
    assert_eq!(mesh.len(), 2);

    // One shared, unconstrained diagonal
    let (t0, t1) = (&mesh[0], &mesh[1]);
    let i = t0.neighbors.iter().position(|n| *n == Some(1)).unwrap();
    assert!(!t0.constrained[i]);
    assert_eq!(t0.constrained.iter().filter(|c| **c).count(), 2);
    assert_eq!(t1.constrained.iter().filter(|c| **c).count(), 2);
    assert_eq!(mesh.constrained_edges().len(), 4);
}

#[test]
fn l_shape() {
    let mut cdt = Cdt::new(util::polygon::l_shape()).unwrap();
    let mesh = triangulate_checked(&mut cdt);
    assert_eq!(mesh.len(), 4);
    assert!(mesh.stats().fills > 0);
}

#[test]
fn single_triangle() {
    let mut cdt = Cdt::new(util::polygon::triangle()).unwrap();
    let mesh = triangulate_checked(&mut cdt);
    assert_eq!(mesh.len(), 1);
    assert_eq!(mesh[0].constrained, [true; 3]);
    assert_eq!(mesh[0].neighbors, [None; 3]);
    let mut vertices = mesh[0].vertices;
    vertices.sort_unstable();
    assert_eq!(vertices, [0, 1, 2]);
}

#[test]
fn collinear_boundary_points() {
    // Three boundary vertices on the bottom edge, and three on the left edge
    let polygon: Vec<VTest> = vec![
        (0., 0.).into(), (2., 0.).into(), (4., 0.).into(), (4., 4.).into(), (0., 4.).into(), (0., 2.).into(),
    ];
    let mut cdt = Cdt::new(polygon).unwrap();
    match cdt.triangulate() {
        Ok(mesh) => {
            let mesh = mesh.clone();
            check_mesh(&cdt, &mesh);
        },
        Err(TriangulationError::DegenerateInput(_)) => {},
        Err(e) => panic!("Unexpected error: {}", e),
    }
}

#[test]
fn clockwise_boundary() {
    let mut polygon = util::polygon::l_shape();
    polygon.reverse();
    let mut cdt = Cdt::new(polygon).unwrap();
    assert_eq!(triangulate_checked(&mut cdt).len(), 4);
}

#[test]
fn repeated_triangulation() {
    let mut cdt = Cdt::new(util::polygon::comb(6)).unwrap();
    let first = cdt.triangulate().unwrap().clone();
    let second = cdt.triangulate().unwrap().clone();
    assert_eq!(first, second);
    assert_eq!(cdt.triangles().map(<[_]>::len), Some(first.len()));

    cdt.add_point((0.5, 0.5).into());
    assert!(cdt.triangles().is_none());
}

#[test]
fn basins() {
    for teeth in 2..12 {
        let mut cdt = Cdt::new(util::polygon::saw(teeth)).unwrap();
        triangulate_checked(&mut cdt);
        let mut cdt = Cdt::new(util::polygon::comb(teeth)).unwrap();
        triangulate_checked(&mut cdt);
    }
}

#[test]
fn regular_polygons() {
    for n in 3..=200 {
        let mut cdt = Cdt::new(util::polygon::regular(n, 100.)).unwrap();
        let mesh = triangulate_checked(&mut cdt);
        assert_eq!(mesh.len(), n - 2);
    }
}

#[test]
fn steiner_points() {
    let mut cdt = Cdt::new(util::polygon::square()).unwrap();
    let center = cdt.add_point((2., 2.).into());
    assert_eq!(center, 4);
    let mesh = triangulate_checked(&mut cdt);
    assert_eq!(mesh.len(), 4);
    assert!(mesh.iter().all(|t| t.contains(center)));
}

#[test]
fn random_steiner_points() {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    for _ in 0..20 {
        let mut cdt = Cdt::new(util::polygon::regular(16, 10.)).unwrap();
        let count = rng.gen_range(1..200);
        let ids = cdt.add_points((0..count).map(|_| {
            // Strictly inside the inscribed circle of the 16-gon
            let r = rng.gen_range(0.0..9.0f64);
            let theta = rng.gen_range(0.0..std::f64::consts::TAU);
            let (y, x) = theta.sin_cos();
            [x * r, y * r]
        }));
        assert_eq!(ids, 16..16 + count);

        match cdt.triangulate() {
            Ok(mesh) => {
                let mesh = mesh.clone();
                check_mesh(&cdt, &mesh);
            },
            // Random points may coincide after rounding
            Err(TriangulationError::DegenerateInput(_)) => {},
            Err(e) => panic!("Unexpected error: {}", e),
        }
    }
}

#[test]
fn concave_heptagon() {
    // Inserting the edge 3-4 flips several triangles which must all be legalized afterwards
    let polygon = vec![
        [12.419, 0.], [10.467, 13.125], [-3.562, 15.608], [-6.385, 3.075], [-5.690, -2.740], [-1.566, -6.863], [5.633, -7.064],
    ];
    let mut cdt = Cdt::new(polygon).unwrap();
    let mesh = triangulate_checked(&mut cdt);
    assert_eq!(mesh.len(), 5);
    assert!(mesh.stats().flips > 0);
}

/// A simple polygon around the origin, containing the disk of radius 1
fn random_star(rng: &mut StdRng, n: usize) -> Vec<[f64; 2]> {
    // Angular gaps stay under 120 degrees, so every edge is at least 2 * cos(60) from the origin
    (0..n).map(|i| {
        let theta = (i as f64 + rng.gen_range(0.0..0.9)) * std::f64::consts::TAU / n as f64;
        let r = rng.gen_range(2.0..10.0);
        let (y, x) = theta.sin_cos();
        [x * r, y * r]
    }).collect()
}

#[test]
fn random_star_polygons() {
    let mut rng = StdRng::seed_from_u64(0x57a2);
    for case in 0..500 {
        let n = rng.gen_range(6..40);
        let mut cdt = Cdt::new(random_star(&mut rng, n)).unwrap();

        let with_hole = rng.gen_bool(0.5);
        if with_hole {
            let k = rng.gen_range(3..9);
            let phase = rng.gen_range(0.0..std::f64::consts::TAU);
            cdt.add_hole((0..k).map(|i| {
                let (y, x) = (phase + i as f64 * std::f64::consts::TAU / k as f64).sin_cos();
                [x * 0.5, y * 0.5]
            })).unwrap();
        }

        if rng.gen_bool(0.5) {
            let count = rng.gen_range(1..30);
            let r_min = if with_hole { 0.6 } else { 0.0 };
            cdt.add_points((0..count).map(|_| {
                let r = rng.gen_range(r_min..0.95);
                let (y, x) = rng.gen_range(0.0..std::f64::consts::TAU).sin_cos();
                [x * r, y * r]
            }));
        }

        match cdt.triangulate() {
            Ok(mesh) => {
                let mesh = mesh.clone();
                check_mesh(&cdt, &mesh);
            },
            Err(TriangulationError::DegenerateInput(_)) => {},
            Err(e) => panic!("Case {} failed: {}", case, e),
        }
    }
}

#[test]
fn random_grid() {
    // Many exactly collinear and cocircular points
    let mut cdt = Cdt::new(vec![[0., 0.], [10., 0.], [10., 10.], [0., 10.]]).unwrap();
    for x in 1..10 {
        for y in 1..10 {
            cdt.add_point([x as f64, y as f64]);
        }
    }
    let mesh = triangulate_checked(&mut cdt);
    assert_eq!(mesh.len(), 4 + 2 * 81 - 2);
}
