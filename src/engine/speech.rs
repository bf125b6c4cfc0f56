//! Speech mouth synthesizer.
//!
//! While speaking, drives mouth-openness with a pseudo-phonemic multi-sine
//! signal and cross-fades between the closed-smile mesh and the open-mouth
//! mesh. Three incommensurate frequencies keep the jaw motion from ever
//! looking periodic.

use glam::Vec3;

use super::smoothing::approach;
use crate::config::EngineTuning;

/// Mouth-openness above which the smile starts fading out.
const SMILE_FADE_THRESHOLD: f32 = 0.1;
/// Mouth-openness above which the open-mouth mesh becomes visible.
const MOUTH_VISIBLE_THRESHOLD: f32 = 0.05;

/// Per-axis weights on the openness term of the mouth scale; the mouth
/// stretches wider than it grows tall.
const SCALE_WEIGHT_X: f32 = 0.7;
const SCALE_WEIGHT_Y: f32 = 0.45;
const SCALE_WEIGHT_Z: f32 = 0.55;

/// Cross-fade state between the two mouth representations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpeechMouthSynth {
    /// Smoothed opacity of the closed-smile mesh
    pub smile_opacity: f32,
    /// Whether the open-mouth mesh is visible
    pub mouth_visible: bool,
    /// Non-uniform scale of the open-mouth mesh
    pub mouth_scale: Vec3,
}

impl SpeechMouthSynth {
    pub fn new() -> Self {
        Self {
            smile_opacity: 1.0,
            mouth_visible: false,
            mouth_scale: Vec3::splat(0.3),
        }
    }

    /// The pseudo-phonemic jaw signal, bounded in `[0, 1]`.
    ///
    /// Evaluated in `f64` so the signal keeps sub-frame resolution even at
    /// long session times, where an `f32` clock can no longer distinguish
    /// consecutive frames.
    pub fn sample(now: f64) -> f32 {
        ((8.0 * now).sin().abs() * 0.45
            + (12.7 * now).sin().abs() * 0.3
            + (5.3 * now).sin().abs() * 0.25) as f32
    }

    /// Update the cross-fade from the current mouth-openness value.
    pub fn advance(&mut self, mouth_open: f32, dt: f32, tuning: &EngineTuning) {
        let smile_target = if mouth_open > SMILE_FADE_THRESHOLD {
            0.0
        } else {
            1.0
        };
        self.smile_opacity = approach(self.smile_opacity, smile_target, tuning.mouth_fade_rate, dt);

        self.mouth_visible = mouth_open > MOUTH_VISIBLE_THRESHOLD;
        self.mouth_scale = Vec3::new(
            0.3 + SCALE_WEIGHT_X * mouth_open,
            0.3 + SCALE_WEIGHT_Y * mouth_open,
            0.3 + SCALE_WEIGHT_Z * mouth_open,
        );
    }
}

impl Default for SpeechMouthSynth {
    fn default() -> Self {
        Self::new()
    }
}
