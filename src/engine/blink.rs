//! Stochastic blink scheduler.
//!
//! Produces naturalistic eye-closure pulses from logical deadlines checked
//! against the frame clock, including the occasional double-blink. The RNG is
//! injected so tests can seed exact blink timelines.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use crate::config::EngineTuning;

/// Phase length of the closing half of a blink, in seconds.
const CLOSE_PHASE: f32 = 0.06;
/// Phase at which a blink pulse completes.
const OPEN_PHASE: f32 = 0.12;
/// Negative phase ramp that delays the chained second blink by 0.08s.
const REARM_PHASE: f32 = -0.08;
/// Sentinel phase for "no blink in flight".
const IDLE_PHASE: f32 = -1.0;

/// Blink pulse state.
///
/// Invariant: `phase` stays within `[-1, 0.12]`. `-1` is idle; a negative
/// phase above `-1` is the ramp counting up to a chained second blink.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BlinkState {
    /// Deadline for the next scheduled blink (frame-clock seconds)
    pub next: f64,
    pub phase: f32,
    pub is_double: bool,
    pub double_consumed: bool,
}

impl Default for BlinkState {
    fn default() -> Self {
        Self {
            next: 0.0,
            phase: IDLE_PHASE,
            is_double: false,
            double_consumed: false,
        }
    }
}

/// Advances [`BlinkState`] and yields a per-frame blink multiplier.
#[derive(Debug)]
pub struct BlinkScheduler {
    state: BlinkState,
    rng: StdRng,
}

impl BlinkScheduler {
    pub fn new(tuning: &EngineTuning) -> Self {
        Self::with_rng(StdRng::from_entropy(), tuning)
    }

    /// Seeded constructor for reproducible blink timelines.
    pub fn with_seed(seed: u64, tuning: &EngineTuning) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed), tuning)
    }

    fn with_rng(mut rng: StdRng, tuning: &EngineTuning) -> Self {
        // Arm the first deadline so a freshly mounted character waits a full
        // interval instead of blinking on its first frame
        let state = BlinkState {
            next: rng.gen_range(tuning.blink_interval_min..tuning.blink_interval_max) as f64,
            ..BlinkState::default()
        };
        Self { state, rng }
    }

    pub fn state(&self) -> &BlinkState {
        &self.state
    }

    #[cfg(test)]
    pub(crate) fn state_mut(&mut self) -> &mut BlinkState {
        &mut self.state
    }

    /// Advance by one frame and return the blink multiplier in `[0, 1]`,
    /// to be multiplied into eye-openness.
    pub fn advance(&mut self, now: f64, dt: f32, tuning: &EngineTuning) -> f32 {
        if self.state.phase <= IDLE_PHASE {
            if now <= self.state.next {
                return 1.0;
            }
            // Start a blink and schedule the one after it
            self.state.phase = 0.0;
            self.state.next = now
                + self
                    .rng
                    .gen_range(tuning.blink_interval_min..tuning.blink_interval_max)
                    as f64;
            self.state.is_double = self.rng.gen_bool(tuning.double_blink_chance as f64);
            self.state.double_consumed = false;
            if self.state.is_double {
                debug!("blink started (double)");
            }
        } else {
            self.state.phase += dt;
        }

        let phase = self.state.phase;
        if phase < 0.0 {
            // Ramp toward the chained second blink
            1.0
        } else if phase < CLOSE_PHASE {
            1.0 - phase / CLOSE_PHASE
        } else if phase < OPEN_PHASE {
            (phase - CLOSE_PHASE) / CLOSE_PHASE
        } else {
            // Pulse complete: chain the second blink or return to idle
            if self.state.is_double && !self.state.double_consumed {
                self.state.double_consumed = true;
                self.state.phase = REARM_PHASE;
            } else {
                self.state.phase = IDLE_PHASE;
            }
            1.0
        }
        .clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 120.0;

    fn tuning() -> EngineTuning {
        EngineTuning::default()
    }

    /// Run `seconds` of frames, returning (multipliers, close cycle count).
    fn run(scheduler: &mut BlinkScheduler, start: f64, seconds: f64) -> (Vec<f32>, usize) {
        let mut samples = Vec::new();
        let mut cycles = 0;
        let mut was_closing = false;
        let mut now = start;
        let end = start + seconds;
        while now < end {
            let bm = scheduler.advance(now, DT, &tuning());
            samples.push(bm);
            let closing = scheduler.state().phase >= 0.0 && scheduler.state().phase < CLOSE_PHASE;
            if closing && !was_closing {
                cycles += 1;
            }
            was_closing = closing;
            now += DT as f64;
        }
        (samples, cycles)
    }

    #[test]
    fn test_fresh_scheduler_waits_for_first_deadline() {
        let mut scheduler = BlinkScheduler::with_seed(19, &tuning());
        assert!(
            scheduler.state().next >= tuning().blink_interval_min as f64,
            "first deadline is armed at construction: {}",
            scheduler.state().next
        );

        let (samples, cycles) = run(&mut scheduler, 0.0, 1.9);
        assert_eq!(cycles, 0, "no blink before the armed deadline");
        assert!(samples.iter().all(|&bm| bm == 1.0));
    }

    #[test]
    fn test_multiplier_always_in_unit_range() {
        let mut scheduler = BlinkScheduler::with_seed(7, &tuning());
        let (samples, _) = run(&mut scheduler, 0.0, 30.0);
        assert!(samples.iter().all(|&bm| (0.0..=1.0).contains(&bm)));
    }

    #[test]
    fn test_phase_invariant_holds() {
        let mut scheduler = BlinkScheduler::with_seed(11, &tuning());
        let mut now = 0.0;
        for _ in 0..(30.0 / DT as f64) as usize {
            scheduler.advance(now, DT, &tuning());
            let phase = scheduler.state().phase;
            assert!(
                (-1.0..=OPEN_PHASE).contains(&phase),
                "phase {} out of [-1, 0.12]",
                phase
            );
            now += DT as f64;
        }
    }

    #[test]
    fn test_single_blink_one_cycle() {
        let mut scheduler = BlinkScheduler::with_seed(3, &tuning());
        // Arm a known single blink directly
        scheduler.state_mut().next = 0.0;
        let bm = scheduler.advance(0.01, DT, &tuning());
        assert_eq!(bm, 1.0, "first frame of a blink starts fully open");
        scheduler.state_mut().is_double = false;

        // Run through the 0.12s pulse, then a bit more
        let (samples, cycles) = run(&mut scheduler, 0.01 + DT as f64, 0.5);
        assert_eq!(cycles, 1, "a single blink closes exactly once");
        assert_eq!(scheduler.state().phase, IDLE_PHASE);
        assert!(samples.iter().any(|&bm| bm < 0.2), "eye actually closed");
    }

    #[test]
    fn test_double_blink_exactly_two_cycles() {
        let mut scheduler = BlinkScheduler::with_seed(5, &tuning());
        scheduler.state_mut().next = 0.0;
        scheduler.advance(0.01, DT, &tuning());
        scheduler.state_mut().is_double = true;
        scheduler.state_mut().double_consumed = false;

        let (samples, cycles) = run(&mut scheduler, 0.01 + DT as f64, 1.0);
        assert_eq!(cycles, 2, "a double-blink closes exactly twice");
        assert_eq!(scheduler.state().phase, IDLE_PHASE, "idle after second pulse");

        // The eye closed twice: two separate sub-0.2 dips
        let mut dips = 0;
        let mut in_dip = false;
        for &bm in &samples {
            if bm < 0.2 && !in_dip {
                dips += 1;
                in_dip = true;
            } else if bm > 0.8 {
                in_dip = false;
            }
        }
        assert_eq!(dips, 2, "two distinct eye closures");
    }

    #[test]
    fn test_seeded_timelines_reproducible() {
        let mut a = BlinkScheduler::with_seed(42, &tuning());
        let mut b = BlinkScheduler::with_seed(42, &tuning());
        let (samples_a, _) = run(&mut a, 0.0, 20.0);
        let (samples_b, _) = run(&mut b, 0.0, 20.0);
        assert_eq!(samples_a, samples_b);
    }

    #[test]
    fn test_no_blink_before_deadline() {
        let mut scheduler = BlinkScheduler::with_seed(1, &tuning());
        scheduler.state_mut().next = 100.0;
        let (samples, cycles) = run(&mut scheduler, 0.0, 5.0);
        assert_eq!(cycles, 0);
        assert!(samples.iter().all(|&bm| bm == 1.0));
    }
}
