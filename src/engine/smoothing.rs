//! Frame-rate-independent smoothing primitives.
//!
//! Every animated scalar in the engine converges on its target with the same
//! rate-scaled exponential approach, so the visual result does not depend on
//! how often the host ticks the engine.

use glam::Vec2;

/// Advance `current` toward `target` by `(target - current) * min(1, rate * dt)`.
///
/// `rate` is in 1/s. With a large `dt` the step saturates at the target
/// instead of overshooting.
pub fn approach(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    current + (target - current) * (rate * dt).min(1.0)
}

/// Component-wise [`approach`] for 2D values.
pub fn approach_vec2(current: Vec2, target: Vec2, rate: f32, dt: f32) -> Vec2 {
    current + (target - current) * (rate * dt).min(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_approach_converges() {
        let mut value = 1.0;
        for _ in 0..120 {
            value = approach(value, 0.12, 8.0, 1.0 / 60.0);
        }
        assert!(
            (value - 0.12).abs() < 0.01,
            "2s of frames should converge: {}",
            value
        );
    }

    #[test]
    fn test_approach_never_overshoots() {
        let mut value = 1.0f32;
        let mut prev = value;
        for _ in 0..200 {
            value = approach(value, 0.12, 8.0, 1.0 / 60.0);
            assert!(value <= prev, "approach must decrease monotonically");
            assert!(value >= 0.12, "approach must not pass the target");
            prev = value;
        }
    }

    #[test]
    fn test_large_dt_saturates_at_target() {
        let value = approach(0.0, 1.0, 8.0, 10.0);
        assert_eq!(value, 1.0);
    }

    #[test]
    fn test_frame_rate_independence() {
        // 1s simulated at 30fps vs 120fps should land close together
        let mut at_30 = 0.0;
        for _ in 0..30 {
            at_30 = approach(at_30, 1.0, 8.0, 1.0 / 30.0);
        }
        let mut at_120 = 0.0;
        for _ in 0..120 {
            at_120 = approach(at_120, 1.0, 8.0, 1.0 / 120.0);
        }
        assert!(
            (at_30 - at_120).abs() < 0.05,
            "30fps={} vs 120fps={}",
            at_30,
            at_120
        );
    }

    #[test]
    fn test_approach_vec2_matches_scalar() {
        let v = approach_vec2(Vec2::ZERO, Vec2::new(1.0, -1.0), 5.0, 0.016);
        assert_eq!(v.x, approach(0.0, 1.0, 5.0, 0.016));
        assert_eq!(v.y, approach(0.0, -1.0, 5.0, 0.016));
    }
}
