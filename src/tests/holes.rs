use crate::Cdt;

use super::util::{self, check::check_mesh, VTest};

#[test]
fn square_hole() {
    let mut cdt = Cdt::new(util::polygon::square()).unwrap();
    cdt.add_hole(util::polygon::square_hole(1., 1., 2.)).unwrap();
    assert_eq!(cdt.hole_count(), 1);

    let mesh = cdt.triangulate().unwrap().clone();
    check_mesh(&cdt, &mesh);
    assert_eq!(mesh.len(), 8);
    // Only the four hole edges and the four boundary edges are constrained
    assert_eq!(mesh.constrained_edges().len(), 8);
}

#[test]
fn counterclockwise_hole() {
    let mut hole = util::polygon::square_hole(1., 1., 2.);
    hole.reverse();
    let mut cdt = Cdt::new(util::polygon::square()).unwrap();
    cdt.add_hole(hole).unwrap();
    let mesh = cdt.triangulate().unwrap().clone();
    check_mesh(&cdt, &mesh);
}

#[test]
fn hole_ids() {
    let mut cdt = Cdt::new(util::polygon::square()).unwrap();
    cdt.add_point((0.5, 0.5).into());
    cdt.add_hole(util::polygon::square_hole(1., 1., 2.)).unwrap();
    // Hole vertices follow the Steiner point
    assert_eq!(cdt.vertices()[5], VTest::new(1., 1.));

    let mesh = cdt.triangulate().unwrap().clone();
    check_mesh(&cdt, &mesh);
    assert!(mesh.constrained_edges().iter().any(|&(p, q)| (p.min(q), p.max(q)) == (5, 6)));
}

#[test]
fn grid_of_holes() {
    let mut cdt = Cdt::new(vec![(0., 0.).into(), (10., 0.).into(), (10., 10.).into(), (0., 10.).into()]).unwrap();
    let holes: Vec<Vec<VTest>> = (0..3)
        .flat_map(|i| (0..3).map(move |j| util::polygon::square_hole(1. + 3. * i as f32, 1. + 3. * j as f32, 2.)))
        .collect();
    cdt.add_holes(holes).unwrap();
    assert_eq!(cdt.hole_count(), 9);

    let mesh = cdt.triangulate().unwrap().clone();
    check_mesh(&cdt, &mesh);
}

#[test]
fn holes_in_concave_boundary() {
    let mut cdt = Cdt::new(util::polygon::l_shape()).unwrap();
    cdt.add_hole(util::polygon::square_hole(0.5, 0.5, 1.)).unwrap();
    cdt.add_hole(vec![(0.5, 2.5).into(), (1.5, 2.5).into(), (1., 3.5).into()]).unwrap();
    cdt.add_hole(vec![(2.5, 0.5).into(), (3.5, 1.).into(), (2.5, 1.5).into()]).unwrap();
    let mesh = cdt.triangulate().unwrap().clone();
    check_mesh(&cdt, &mesh);
}

#[test]
fn holes_and_points() {
    let mut cdt = Cdt::new(util::polygon::regular(24, 10.)).unwrap();
    cdt.add_hole([[-5., -1.], [-3., -1.], [-4., 1.]]).unwrap();
    cdt.add_hole([[2., -2.], [2., 2.], [6., 2.], [6., -2.]]).unwrap();
    cdt.add_points([[0., 0.], [-4., 5.], [4., 5.], [-1., -6.], [0.5, 3.25], [7.5, 0.1]]);

    let mesh = cdt.triangulate().unwrap().clone();
    check_mesh(&cdt, &mesh);
}

#[test]
fn hole_near_boundary() {
    // A sliver of a hole in the thin right arm of a clockwise boundary
    let mut cdt = Cdt::new(util::polygon::half_frame()).unwrap();
    cdt.add_hole(vec![(0.96, 0.4).into(), (0.99, 0.5).into(), (0.96, 0.6).into()]).unwrap();
    let mesh = cdt.triangulate().unwrap().clone();
    check_mesh(&cdt, &mesh);
}
