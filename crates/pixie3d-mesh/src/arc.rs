//! Arc sampling and Catmull-Rom interpolation.
//!
//! Produces the smooth centerline polylines that `tube` sweeps into geometry.

use glam::Vec3;

/// Sample `count` points along a circular arc in the XY plane.
///
/// The arc is centered on the origin and spans `sweep` radians, symmetric
/// about the +Y axis. `flatten` scales the Y component, turning a circular
/// arc into a flatter elliptical one (1.0 = circular).
pub fn sample_arc(radius: f32, sweep: f32, flatten: f32, count: usize) -> Vec<Vec3> {
    assert!(count >= 2, "arc needs at least two samples");

    let start = std::f32::consts::FRAC_PI_2 - sweep / 2.0;
    let mut points = Vec::with_capacity(count);
    for i in 0..count {
        let t = i as f32 / (count - 1) as f32;
        let angle = start + sweep * t;
        points.push(Vec3::new(
            angle.cos() * radius,
            angle.sin() * radius * flatten,
            0.0,
        ));
    }
    points
}

/// Fit a Catmull-Rom spline through `points` and resample it with
/// `subdivisions` segments between each pair of control points.
///
/// Endpoints are duplicated so the curve passes through the first and last
/// control points exactly.
pub fn catmull_rom(points: &[Vec3], subdivisions: usize) -> Vec<Vec3> {
    assert!(points.len() >= 2, "spline needs at least two control points");
    assert!(subdivisions >= 1, "subdivisions must be at least 1");

    let n = points.len();
    let get = |i: isize| -> Vec3 { points[i.clamp(0, n as isize - 1) as usize] };

    let mut out = Vec::with_capacity((n - 1) * subdivisions + 1);
    for seg in 0..n - 1 {
        let p0 = get(seg as isize - 1);
        let p1 = get(seg as isize);
        let p2 = get(seg as isize + 1);
        let p3 = get(seg as isize + 2);

        for step in 0..subdivisions {
            let t = step as f32 / subdivisions as f32;
            out.push(catmull_rom_point(p0, p1, p2, p3, t));
        }
    }
    out.push(points[n - 1]);
    out
}

/// Evaluate one uniform Catmull-Rom segment at parameter `t` in [0, 1].
fn catmull_rom_point(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3, t: f32) -> Vec3 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}
