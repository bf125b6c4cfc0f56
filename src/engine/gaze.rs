//! Pointer gaze tracker.
//!
//! Converts raw normalized pointer coordinates into smoothed, hard-clamped
//! rotational/positional offsets. The same state feeds the irises directly,
//! the brows at a larger scale, and the head at double scale, so the eyes
//! lead and the head follows.

use glam::Vec2;

use super::smoothing::approach_vec2;
use crate::config::EngineTuning;

/// Smoothed, clamped gaze offset in engine units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct GazeState {
    pub offset: Vec2,
}

impl GazeState {
    /// Offset applied directly to the iris/pupil meshes.
    pub fn iris_offset(&self) -> Vec2 {
        self.offset
    }

    /// Offset applied to the eyebrows (exaggerated vertically).
    pub fn brow_offset(&self) -> Vec2 {
        Vec2::new(self.offset.x * 1.5, self.offset.y * 3.0)
    }

    /// Head rotation offset (yaw from x, pitch from y), in radians.
    pub fn head_rotation(&self) -> Vec2 {
        self.offset * 2.0
    }
}

/// Smooths raw pointer input toward a bounded gaze offset.
#[derive(Debug, Default)]
pub struct GazeTracker {
    /// Smoothed raw pointer position, before scaling
    smoothed: Vec2,
}

impl GazeTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance toward the latest pointer sample.
    ///
    /// An absent or non-finite pointer is treated as centered rather than
    /// propagating garbage into the smoothing state. Output is scaled and
    /// hard-clamped, so arbitrarily large pointer values cannot push the
    /// gaze outside its bounds.
    pub fn advance(&mut self, pointer: Option<Vec2>, dt: f32, tuning: &EngineTuning) -> GazeState {
        let raw = pointer
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .unwrap_or(Vec2::ZERO);

        self.smoothed = approach_vec2(self.smoothed, raw, tuning.gaze_rate, dt);

        let bounds = Vec2::new(tuning.gaze_clamp_x, tuning.gaze_clamp_y);
        let offset = (self.smoothed * bounds).clamp(-bounds, bounds);
        GazeState { offset }
    }
}
