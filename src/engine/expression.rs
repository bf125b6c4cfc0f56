//! Expression state controller.
//!
//! The central mixer: picks target poses from the (active, speaking) mode
//! table and smooths the current pose toward them every frame. Coupling
//! between components happens only through this record.

use serde::Serialize;

use super::smoothing::approach;

/// One set of expression scalars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExprScalars {
    /// Eye openness, 0 = shut, 1 = wide open
    pub eye_open: f32,
    /// Pupil dilation around 1.0
    pub pupil_scale: f32,
    /// Mouth openness, 0 = closed smile, 1 = fully open
    pub mouth_open: f32,
    /// Eyebrow raise, -1 = furrowed, 1 = fully raised
    pub brow_raise: f32,
    /// Aura glow intensity
    pub glow: f32,
    /// Body bob/breathing speed multiplier
    pub bob_speed: f32,
}

impl ExprScalars {
    /// Attentive pose: awake and listening.
    pub fn awake() -> Self {
        Self {
            eye_open: 1.0,
            pupil_scale: 1.0,
            mouth_open: 0.0,
            brow_raise: 0.0,
            glow: 0.15,
            bob_speed: 1.0,
        }
    }

    /// Dozing pose: heavy lids, dim glow, slow bob.
    pub fn dozing() -> Self {
        Self {
            eye_open: 0.12,
            pupil_scale: 1.0,
            mouth_open: 0.0,
            brow_raise: -0.15,
            glow: 0.06,
            bob_speed: 0.4,
        }
    }

    /// Speaking pose: raised brows, bright glow, quick bob. Mouth openness is
    /// not part of the table; the speech synthesizer owns it while speaking.
    pub fn speaking(mouth_open: f32) -> Self {
        Self {
            eye_open: 1.0,
            pupil_scale: 1.0,
            mouth_open,
            brow_raise: 0.4,
            glow: 0.15,
            bob_speed: 1.2,
        }
    }
}

/// Per-character expression state: targets plus smoothed current values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExprState {
    pub target: ExprScalars,
    pub current: ExprScalars,
}

impl ExprState {
    /// Start in the pose matching the initial `active` flag, already settled.
    pub fn new(active: bool) -> Self {
        let pose = if active {
            ExprScalars::awake()
        } else {
            ExprScalars::dozing()
        };
        Self {
            target: pose,
            current: pose,
        }
    }

    /// Evaluate the mode table, in priority order.
    pub fn set_targets(&mut self, active: bool, speaking: bool) {
        self.target = if speaking {
            ExprScalars::speaking(self.target.mouth_open)
        } else if !active {
            ExprScalars::dozing()
        } else {
            ExprScalars::awake()
        };
    }

    /// Smooth every current scalar toward its target.
    pub fn advance(&mut self, rate: f32, dt: f32) {
        let c = &mut self.current;
        let t = &self.target;
        c.eye_open = approach(c.eye_open, t.eye_open, rate, dt);
        c.pupil_scale = approach(c.pupil_scale, t.pupil_scale, rate, dt);
        c.mouth_open = approach(c.mouth_open, t.mouth_open, rate, dt);
        c.brow_raise = approach(c.brow_raise, t.brow_raise, rate, dt);
        c.glow = approach(c.glow, t.glow, rate, dt);
        c.bob_speed = approach(c.bob_speed, t.bob_speed, rate, dt);
    }
}
