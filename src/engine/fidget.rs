//! Idle fidget scheduler.
//!
//! While the character is active but silent, occasionally drifts the head and
//! body toward a small random offset, holds it for a moment, and lets it
//! decay back. Never schedules while speaking or inactive, but existing
//! offsets still decay to rest in those modes.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::smoothing::approach;
use crate::config::EngineTuning;

/// Fidget drift state.
///
/// Invariant: `offset_x`/`offset_z` decay toward 0 once `now > active_until`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FidgetState {
    /// Deadline for the next scheduled fidget (frame-clock seconds)
    pub next: f64,
    /// Sampled drift targets
    pub target_x: f32,
    pub target_z: f32,
    /// Smoothed drift currently applied to the rig
    pub offset_x: f32,
    pub offset_z: f32,
    /// End of the hold window for the current fidget
    pub active_until: f64,
}

/// Advances [`FidgetState`] from logical deadlines on the frame clock.
#[derive(Debug)]
pub struct FidgetScheduler {
    state: FidgetState,
    rng: StdRng,
}

impl FidgetScheduler {
    pub fn new(tuning: &EngineTuning) -> Self {
        Self::with_rng(StdRng::from_entropy(), tuning)
    }

    /// Seeded constructor for reproducible fidget timelines.
    pub fn with_seed(seed: u64, tuning: &EngineTuning) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), tuning)
    }

    fn with_rng(mut rng: StdRng, tuning: &EngineTuning) -> Self {
        // Arm the first deadline so a freshly mounted character sits still
        // for a full interval before its first fidget
        let state = FidgetState {
            next: rng
                .gen_range(tuning.fidget_interval_min..tuning.fidget_interval_max)
                as f64,
            ..FidgetState::default()
        };
        Self { state, rng }
    }

    pub fn state(&self) -> &FidgetState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut FidgetState {
        &mut self.state
    }

    /// Advance by one frame; returns the `(x, z)` drift offsets to apply.
    pub fn advance(
        &mut self,
        now: f64,
        dt: f32,
        active: bool,
        speaking: bool,
        tuning: &EngineTuning,
    ) -> (f32, f32) {
        let eligible = active && !speaking;

        if eligible && now > self.state.next {
            self.state.target_x = self
                .rng
                .gen_range(-tuning.fidget_range_x..tuning.fidget_range_x);
            self.state.target_z = self
                .rng
                .gen_range(-tuning.fidget_range_z..tuning.fidget_range_z);
            self.state.active_until = now
                + self
                    .rng
                    .gen_range(tuning.fidget_window_min..tuning.fidget_window_max)
                    as f64;
            self.state.next = now
                + self
                    .rng
                    .gen_range(tuning.fidget_interval_min..tuning.fidget_interval_max)
                    as f64;
            debug!(
                target_x = self.state.target_x,
                target_z = self.state.target_z,
                "fidget scheduled"
            );
        }

        let holding = eligible && now <= self.state.active_until;
        let (target_x, target_z, rate) = if holding {
            (self.state.target_x, self.state.target_z, tuning.smoothing_rate)
        } else {
            // Outside the window (or while speaking/inactive) drift home,
            // at half the master rate by default
            (0.0, 0.0, tuning.fidget_decay_rate)
        };

        self.state.offset_x = approach(self.state.offset_x, target_x, rate, dt);
        self.state.offset_z = approach(self.state.offset_z, target_z, rate, dt);
        (self.state.offset_x, self.state.offset_z)
    }
}
