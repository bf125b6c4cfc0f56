//! Transition bounce.
//!
//! On the rising edge of `speaking`, injects a decaying squash/stretch pulse
//! into the body scale, layered on top of the steady breathing oscillation.

use std::f32::consts::PI;

use tracing::debug;

use crate::config::EngineTuning;

/// Pulse window state; auto-clears once the window elapses.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BounceState {
    pub triggered: bool,
    pub start_time: f64,
}

/// Detects speaking onsets and evaluates the squash/stretch amplitude.
#[derive(Debug, Default)]
pub struct TransitionBounce {
    state: BounceState,
    prev_speaking: bool,
}

impl TransitionBounce {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &BounceState {
        &self.state
    }

    /// Advance edge detection and return this frame's vertical amplitude.
    ///
    /// The caller applies it with squash/stretch conservation:
    /// `scale_y += amp`, `scale_x -= amp/2`, `scale_z -= amp/2`.
    pub fn advance(&mut self, speaking: bool, now: f64, tuning: &EngineTuning) -> f32 {
        if speaking && !self.prev_speaking {
            self.state = BounceState {
                triggered: true,
                start_time: now,
            };
            debug!("speaking onset, bounce triggered");
        }
        self.prev_speaking = speaking;

        if !self.state.triggered {
            return 0.0;
        }

        let elapsed = (now - self.state.start_time) as f32;
        if elapsed >= tuning.bounce_duration {
            self.state.triggered = false;
            return 0.0;
        }

        (elapsed * 5.0 * PI).sin() * (-tuning.bounce_damping * elapsed).exp()
            * tuning.bounce_amplitude
    }
}
