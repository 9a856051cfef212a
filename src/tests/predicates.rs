use crate::{inputs::Coords, math::{self, Orientation}};

fn c(x: f64, y: f64) -> Coords<f64> {
    Coords::new(x, y)
}

#[test]
fn orient_2d() {
    assert_eq!(math::orient_2d(c(0., 0.), c(1., 0.), c(0., 1.)), Orientation::Counterclockwise);
    assert_eq!(math::orient_2d(c(0., 0.), c(0., 1.), c(1., 0.)), Orientation::Clockwise);
    assert_eq!(math::orient_2d(c(0., 0.), c(1., 1.), c(3., 3.)), Orientation::Collinear);
    // No tolerance: a tiny offset is still a turn
    assert_eq!(math::orient_2d(c(0., 0.), c(1., 1.), c(3., 3. + 1e-12)), Orientation::Counterclockwise);
}

#[test]
fn in_circle() {
    let (a, b, d) = (c(0., 0.), c(2., 0.), c(0., 2.));
    assert!(math::in_circle(a, b, d, c(1.9, 1.9)));
    assert!(!math::in_circle(a, b, d, c(2.1, 2.1)));
    // Cocircular is not inside
    assert!(!math::in_circle(a, b, d, c(2., 2.)));
}

#[test]
fn in_scan_area() {
    // Convex quad a, b, d, c: b-c may be flipped to a-d
    assert!(math::in_scan_area(c(0., 0.), c(1., -1.), c(1., 1.), c(2., 0.)));
    // d outside the wedge at a
    assert!(!math::in_scan_area(c(0., 0.), c(1., -1.), c(1., 1.), c(2., 3.)));
    // a, b, d collinear
    assert!(!math::in_scan_area(c(0., 0.), c(1., -1.), c(1., 1.), c(2., -2.)));
}

#[test]
fn front_angles() {
    let origin = c(0., 0.);
    // 45° left turn
    assert!(!math::angle_exceeds_90(origin, c(1., 0.), c(1., 1.)));
    assert!(!math::angle_is_negative(origin, c(1., 0.), c(1., 1.)));
    // 135°
    assert!(math::angle_exceeds_90(origin, c(1., 0.), c(-1., 1.)));
    assert!(math::angle_exceeds_90_or_negative(origin, c(1., 0.), c(-1., 1.)));
    // -45°
    assert!(math::angle_is_negative(origin, c(1., 0.), c(1., -1.)));
    assert!(math::angle_exceeds_90_or_negative(origin, c(1., 0.), c(1., -1.)));
    assert!(!math::angle_exceeds_90_or_negative(origin, c(1., 0.), c(1., 1.)));
    // Exactly 90° is not exceeding
    assert!(!math::angle_exceeds_90(origin, c(1., 0.), c(0., 1.)));
}

#[test]
fn basin_angle() {
    // The far node is up and to the right of the node
    assert!(math::basin_angle_is_acute(c(0., 0.), c(1., 1.)));
    assert!(math::basin_angle_is_acute(c(0., 0.), c(1., 10.)));
    // Shallow: the far node is lower than the node
    assert!(!math::basin_angle_is_acute(c(0., 0.), c(1., -0.5)));
    assert!(!math::basin_angle_is_acute(c(0., 0.), c(1., -1.)));
}

#[test]
fn point_in_polygon() {
    let square = [c(0., 0.), c(2., 0.), c(2., 2.), c(0., 2.)];
    assert_eq!(math::point_in_polygon(c(1., 1.), &square), Some(true));
    assert_eq!(math::point_in_polygon(c(3., 1.), &square), Some(false));
    assert_eq!(math::point_in_polygon(c(2., 1.), &square), None);
    assert_eq!(math::point_in_polygon(c(0., 0.), &square), None);
    assert!(math::signed_area_2x(&square) > 0.);
    let mut reversed = square;
    reversed.reverse();
    assert_eq!(math::signed_area_2x(&reversed), -8.);
}
