use super::vtest::VTest;

/// Scenario square, counterclockwise
pub fn square() -> Vec<VTest> {
    vec![
        (0.0, 0.0).into(),
        (4.0, 0.0).into(),
        (4.0, 4.0).into(),
        (0.0, 4.0).into(),
    ]
}

pub fn triangle() -> Vec<VTest> {
    vec![
        (0.0, 0.0).into(),
        (3.0, 0.5).into(),
        (1.0, 2.0).into(),
    ]
}

/// Concave, 6 vertices
pub fn l_shape() -> Vec<VTest> {
    vec![
        (0.0, 0.0).into(),
        (4.0, 0.0).into(),
        (4.0, 2.0).into(),
        (2.0, 2.0).into(),
        (2.0, 4.0).into(),
        (0.0, 4.0).into(),
    ]
}

pub fn star() -> Vec<VTest> {
    vec![
        (1.0, 0.0).into(),
        (2.0, 2.0).into(),
        (0.0, 1.0).into(),
        (-2.0, 2.0).into(),
        (-1.0, 0.0).into(),
        (-2.0, -2.0).into(),
        (0.0, -1.0).into(),
        (2.0, -2.0).into(),
    ]
}

/// Clockwise version of the frame's lower right half
pub fn half_frame() -> Vec<VTest> {
    vec![
        (0., 0.).into(), (0.05, 0.05).into(), (0.95, 0.05).into(), (0.95, 0.95).into(), (1., 1.).into(), (1., 0.).into()
    ]
}

/// Teeth pointing up, with deep gaps between them which the sweep fills as basins
pub fn comb(teeth: usize) -> Vec<VTest> {
    let mut p: Vec<VTest> = vec![(0.0, 0.0).into(), (teeth as f32 * 2.0 - 1.0, 0.0).into()];
    for i in (0..teeth).rev() {
        let x = i as f32 * 2.0;
        p.push((x + 1.0, 5.0).into());
        p.push((x, 5.0 + 0.1 * i as f32).into());
        if i > 0 {
            p.push((x - 0.5, 1.0).into());
        }
    }
    p
}

/// A zigzag whose lower side has a basin under each upper peak
pub fn saw(teeth: usize) -> Vec<VTest> {
    let mut p: Vec<VTest> = Vec::new();
    for i in 0..=teeth {
        let x = i as f32 * 2.0;
        p.push((x, if i % 2 == 0 { 0.0 } else { 1.5 }).into());
    }
    p.push((teeth as f32 * 2.0, 6.0).into());
    p.push((0.0, 6.0).into());
    p
}

pub fn regular(n: usize, radius: f64) -> Vec<[f64; 2]> {
    (0..n).map(|i| {
        let theta = std::f64::consts::PI * 2. * (i as f64) / (n as f64);
        let (y, x) = theta.sin_cos();
        [x * radius, y * radius]
    }).collect()
}

/// An axis-aligned square hole, clockwise
pub fn square_hole(x: f32, y: f32, size: f32) -> Vec<VTest> {
    vec![
        (x, y).into(),
        (x, y + size).into(),
        (x + size, y + size).into(),
        (x + size, y).into(),
    ]
}

pub fn all() -> Vec<Vec<VTest>> {
    vec![square(), triangle(), l_shape(), star(), half_frame(), comb(5), saw(7)]
}
