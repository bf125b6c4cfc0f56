//! Tube sweep along a polyline.
//!
//! Builds a thin closed-ring tube around a centerline, producing positions,
//! normals, and triangle indices in the same layout the renderer consumes.

use glam::Vec3;

/// Triangle mesh produced by a tube sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct TubeGeometry {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl TubeGeometry {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Sweep a circular cross-section of `radius` along `path`.
///
/// Each path point becomes a ring of `segments` vertices. Frames are
/// propagated along the path so rings do not twist against each other.
pub fn sweep_tube(path: &[Vec3], radius: f32, segments: usize) -> TubeGeometry {
    assert!(path.len() >= 2, "tube needs at least two path points");
    assert!(segments >= 3, "tube needs at least three ring segments");

    let ring_count = path.len();
    let mut positions = Vec::with_capacity(ring_count * segments);
    let mut normals = Vec::with_capacity(ring_count * segments);

    // Initial frame: pick a side vector not parallel to the first tangent.
    let mut normal = frame_normal(tangent_at(path, 0));

    for i in 0..ring_count {
        let tangent = tangent_at(path, i);

        // Project the previous normal off the new tangent (parallel transport).
        normal = (normal - tangent * normal.dot(tangent)).normalize_or_zero();
        if normal.length_squared() < 1e-8 {
            normal = frame_normal(tangent);
        }
        let binormal = tangent.cross(normal).normalize();

        for s in 0..segments {
            let theta = std::f32::consts::TAU * s as f32 / segments as f32;
            let dir = normal * theta.cos() + binormal * theta.sin();
            positions.push(path[i] + dir * radius);
            normals.push(dir);
        }
    }

    let mut indices = Vec::with_capacity((ring_count - 1) * segments * 6);
    for i in 0..ring_count - 1 {
        let ring = (i * segments) as u32;
        let next_ring = ring + segments as u32;
        for s in 0..segments as u32 {
            let s1 = (s + 1) % segments as u32;
            indices.extend_from_slice(&[
                ring + s,
                next_ring + s,
                ring + s1,
                ring + s1,
                next_ring + s,
                next_ring + s1,
            ]);
        }
    }

    TubeGeometry {
        positions,
        normals,
        indices,
    }
}

/// Central-difference tangent at path point `i`.
fn tangent_at(path: &[Vec3], i: usize) -> Vec3 {
    let prev = if i == 0 { path[0] } else { path[i - 1] };
    let next = if i + 1 == path.len() {
        path[path.len() - 1]
    } else {
        path[i + 1]
    };
    (next - prev).normalize_or_zero()
}

/// A unit vector perpendicular to `tangent`, chosen deterministically.
fn frame_normal(tangent: Vec3) -> Vec3 {
    let up = if tangent.dot(Vec3::Z).abs() < 0.9 {
        Vec3::Z
    } else {
        Vec3::Y
    };
    tangent.cross(up).normalize()
}
