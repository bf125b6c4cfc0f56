//! Procedural curved-tube mesh generation for Pixie3D.
//!
//! Builds the reusable smile-arc and eyebrow-arc meshes: sample points along
//! a parametrized arc, fit a Catmull-Rom curve through them, and sweep a thin
//! tube along the result. Builds are deterministic and memoized, so mirrored
//! left/right meshes share one geometry instance.

pub mod arc;
pub mod tube;

pub use tube::TubeGeometry;

use std::collections::HashMap;
use std::sync::Arc;

/// Parameters that fully determine one arc-tube geometry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcTubeParams {
    /// Arc radius in engine units.
    pub radius: f32,
    /// Arc sweep in radians.
    pub sweep: f32,
    /// Vertical flattening factor (1.0 = circular).
    pub flatten: f32,
    /// Control points sampled along the arc.
    pub samples: usize,
    /// Catmull-Rom subdivisions between control points.
    pub subdivisions: usize,
    /// Tube cross-section radius.
    pub tube_radius: f32,
    /// Vertices per tube ring.
    pub tube_segments: usize,
}

impl ArcTubeParams {
    /// The closed-smile mouth arc: a half-turn of radius 0.06.
    pub fn smile() -> Self {
        Self {
            radius: 0.06,
            sweep: std::f32::consts::PI,
            flatten: 1.0,
            samples: 12,
            subdivisions: 4,
            tube_radius: 0.006,
            tube_segments: 8,
        }
    }

    /// The eyebrow arc: a 0.7π sweep of radius 0.1, flatter than the smile.
    pub fn eyebrow() -> Self {
        Self {
            radius: 0.1,
            sweep: 0.7 * std::f32::consts::PI,
            flatten: 0.4,
            samples: 10,
            subdivisions: 4,
            tube_radius: 0.005,
            tube_segments: 8,
        }
    }

    /// Bit-exact cache key. Two parameter sets with identical field bits
    /// always produce identical geometry.
    fn key(&self) -> ArcTubeKey {
        ArcTubeKey {
            radius: self.radius.to_bits(),
            sweep: self.sweep.to_bits(),
            flatten: self.flatten.to_bits(),
            samples: self.samples,
            subdivisions: self.subdivisions,
            tube_radius: self.tube_radius.to_bits(),
            tube_segments: self.tube_segments,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct ArcTubeKey {
    radius: u32,
    sweep: u32,
    flatten: u32,
    samples: usize,
    subdivisions: usize,
    tube_radius: u32,
    tube_segments: usize,
}

/// Build an arc tube directly, without caching.
pub fn build_arc_tube(params: &ArcTubeParams) -> TubeGeometry {
    let controls = arc::sample_arc(params.radius, params.sweep, params.flatten, params.samples);
    let curve = arc::catmull_rom(&controls, params.subdivisions);
    tube::sweep_tube(&curve, params.tube_radius, params.tube_segments)
}

/// Memoizing geometry cache keyed by shape parameters.
///
/// Owned by the caller rather than stored in a module-level global, so
/// independent engine instances in tests never share mutable state. Entries
/// are immutable once built and handed out as shared `Arc`s.
#[derive(Debug, Default)]
pub struct GeometryCache {
    entries: HashMap<ArcTubeKey, Arc<TubeGeometry>>,
}

impl GeometryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fetch or build the geometry for `params`.
    pub fn arc_tube(&mut self, params: &ArcTubeParams) -> Arc<TubeGeometry> {
        self.entries
            .entry(params.key())
            .or_insert_with(|| Arc::new(build_arc_tube(params)))
            .clone()
    }

    /// Number of distinct geometries built so far.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Build (or fetch) the closed-smile mouth mesh.
pub fn build_smile_arc(cache: &mut GeometryCache) -> Arc<TubeGeometry> {
    cache.arc_tube(&ArcTubeParams::smile())
}

/// Build (or fetch) the eyebrow mesh, shared by both mirrored brows.
pub fn build_eyebrow_arc(cache: &mut GeometryCache) -> Arc<TubeGeometry> {
    cache.arc_tube(&ArcTubeParams::eyebrow())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smile_arc_idempotent() {
        let a = build_arc_tube(&ArcTubeParams::smile());
        let b = build_arc_tube(&ArcTubeParams::smile());
        assert_eq!(a.vertex_count(), b.vertex_count());
        assert_eq!(a.positions, b.positions);
        assert_eq!(a.indices, b.indices);
    }

    #[test]
    fn test_cache_shares_one_instance() {
        let mut cache = GeometryCache::new();
        let first = build_eyebrow_arc(&mut cache);
        let second = build_eyebrow_arc(&mut cache);
        assert!(
            Arc::ptr_eq(&first, &second),
            "same parameters must return the shared instance"
        );
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_cache_distinguishes_shapes() {
        let mut cache = GeometryCache::new();
        let smile = build_smile_arc(&mut cache);
        let brow = build_eyebrow_arc(&mut cache);
        assert!(!Arc::ptr_eq(&smile, &brow));
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn test_eyebrow_flatter_than_smile() {
        let smile = build_arc_tube(&ArcTubeParams::smile());
        let brow = build_arc_tube(&ArcTubeParams::eyebrow());

        let height = |geo: &TubeGeometry| {
            let max = geo.positions.iter().map(|p| p.y).fold(f32::MIN, f32::max);
            let min = geo.positions.iter().map(|p| p.y).fold(f32::MAX, f32::min);
            max - min
        };
        let width = |geo: &TubeGeometry| {
            let max = geo.positions.iter().map(|p| p.x).fold(f32::MIN, f32::max);
            let min = geo.positions.iter().map(|p| p.x).fold(f32::MAX, f32::min);
            max - min
        };

        let smile_ratio = height(&smile) / width(&smile);
        let brow_ratio = height(&brow) / width(&brow);
        assert!(
            brow_ratio < smile_ratio,
            "eyebrow arc should be flatter: {} vs {}",
            brow_ratio,
            smile_ratio
        );
    }
}
