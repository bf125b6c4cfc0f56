//! Procedural character animation engine.
//!
//! One [`CharacterEngine`] owns the full animation state for one character:
//! the expression mixer, the blink and fidget schedulers, the gaze tracker,
//! the speech mouth synthesizer, and the transition bounce. Each call to
//! [`CharacterEngine::tick`] advances every component and composites the
//! results onto the character's [`CharacterRig`].
//!
//! The engine is renderer-agnostic and driven entirely by three inputs: the
//! `active` flag, the `speaking` flag, and an optional pointer position.

pub mod blink;
pub mod bounce;
pub mod expression;
pub mod fidget;
pub mod gaze;
pub mod smoothing;
pub mod speech;

use std::f64::consts::PI;

use glam::{EulerRot, Quat, Vec2, Vec3};
use tracing::debug;

use crate::config::EngineTuning;
use crate::scene::{CharacterRig, RigGeometry};
use blink::BlinkScheduler;
use bounce::TransitionBounce;
use expression::ExprState;
use fidget::FidgetScheduler;
use gaze::GazeTracker;
use pixie3d_mesh::GeometryCache;
use speech::SpeechMouthSynth;

/// Vertical lift applied to the brows per unit of `brow_raise`.
const BROW_LIFT: f32 = 0.02;
/// Fidget z-drift is applied to head roll at half strength.
const FIDGET_ROLL_WEIGHT: f32 = 0.5;

/// The three external inputs that drive the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineInput {
    pub active: bool,
    pub speaking: bool,
    /// Latest pointer position in normalized coordinates, if any
    pub pointer: Option<Vec2>,
}

impl Default for EngineInput {
    fn default() -> Self {
        Self {
            active: true,
            speaking: false,
            pointer: None,
        }
    }
}

/// Full animation state for one mounted character.
pub struct CharacterEngine {
    rig: CharacterRig,
    geometry: RigGeometry,
    expr: ExprState,
    blink: BlinkScheduler,
    fidget: FidgetScheduler,
    gaze: GazeTracker,
    speech: SpeechMouthSynth,
    bounce: TransitionBounce,
    /// Accumulated breathing phase in radians; integrated per frame so a
    /// bob-speed change slews the frequency instead of jumping the phase
    breath_phase: f64,
    tuning: EngineTuning,
    input: EngineInput,
}

impl CharacterEngine {
    /// Mount a character: build its rig (sharing tube geometry through
    /// `cache`) and start awake and settled.
    pub fn new(tuning: EngineTuning, cache: &mut GeometryCache) -> Self {
        let (rig, geometry) = CharacterRig::new(cache);
        let input = EngineInput::default();
        debug!("character engine mounted");
        Self {
            rig,
            geometry,
            expr: ExprState::new(input.active),
            blink: BlinkScheduler::new(&tuning),
            fidget: FidgetScheduler::new(&tuning),
            gaze: GazeTracker::new(),
            speech: SpeechMouthSynth::new(),
            bounce: TransitionBounce::new(),
            breath_phase: 0.0,
            tuning,
            input,
        }
    }

    /// Seeded constructor for reproducible animation timelines.
    pub fn with_seed(tuning: EngineTuning, cache: &mut GeometryCache, seed: u64) -> Self {
        let mut engine = Self::new(tuning, cache);
        engine.blink = BlinkScheduler::with_seed(seed, &engine.tuning);
        engine.fidget = FidgetScheduler::with_seed(seed.wrapping_add(1), &engine.tuning);
        engine
    }

    pub fn set_active(&mut self, active: bool) {
        self.input.active = active;
    }

    pub fn set_speaking(&mut self, speaking: bool) {
        self.input.speaking = speaking;
    }

    pub fn set_pointer(&mut self, pointer: Option<Vec2>) {
        self.input.pointer = pointer;
    }

    pub fn input(&self) -> &EngineInput {
        &self.input
    }

    pub fn rig(&self) -> &CharacterRig {
        &self.rig
    }

    pub fn geometry(&self) -> &RigGeometry {
        &self.geometry
    }

    pub fn tuning(&self) -> &EngineTuning {
        &self.tuning
    }

    /// Unmount: consume the engine and hand the rig back to the host for
    /// teardown. All scheduler state is dropped, mid-blink or not.
    pub fn into_rig(self) -> CharacterRig {
        self.rig
    }

    /// Advance one frame.
    ///
    /// `dt` is the frame delta in seconds and `now` is the monotonic frame
    /// clock. A negative `dt` is treated as zero; components never step
    /// backward in time.
    pub fn tick(&mut self, dt: f32, now: f64) {
        let dt = dt.max(0.0);
        let EngineInput {
            active, speaking, ..
        } = self.input;

        // Expression mixer first: everything downstream reads its output
        self.expr.set_targets(active, speaking);
        self.expr.advance(self.tuning.smoothing_rate, dt);

        let blink_mul = self.blink.advance(now, dt, &self.tuning);
        let gaze = self.gaze.advance(self.input.pointer, dt, &self.tuning);

        // While speaking the synthesizer owns mouth-openness outright; the
        // mixer only smooths it closed again once speech stops
        if speaking {
            let mouth = SpeechMouthSynth::sample(now);
            self.expr.current.mouth_open = mouth;
            self.expr.target.mouth_open = mouth;
        }
        self.speech
            .advance(self.expr.current.mouth_open, dt, &self.tuning);

        let (fidget_x, fidget_z) = self
            .fidget
            .advance(now, dt, active, speaking, &self.tuning);
        let bounce_amp = self.bounce.advance(speaking, now, &self.tuning);

        self.breath_phase += self.expr.current.bob_speed as f64 * 1.2 * PI * dt as f64;

        self.composite(blink_mul, gaze, fidget_x, fidget_z, bounce_amp);
    }

    /// Write every component's output onto the rig. This is the only place
    /// scene nodes are mutated.
    fn composite(
        &mut self,
        blink_mul: f32,
        gaze: gaze::GazeState,
        fidget_x: f32,
        fidget_z: f32,
        bounce_amp: f32,
    ) {
        let expr = &self.expr.current;
        let rig = &mut self.rig;

        // Eyes: openness and blink both land on vertical scale
        let eye_y = expr.eye_open * blink_mul;
        rig.left_eye.scale.y = eye_y;
        rig.right_eye.scale.y = eye_y;

        // Irises and pupils follow the gaze inside the eye group
        let iris_rest = CharacterRig::iris_rest();
        let look = gaze.iris_offset();
        for iris in [&mut rig.left_iris, &mut rig.right_iris] {
            iris.position = iris_rest + Vec3::new(look.x, look.y, 0.0);
        }
        let pupil_rest_z = rig.left_pupil.position.z;
        for pupil in [&mut rig.left_pupil, &mut rig.right_pupil] {
            pupil.position = Vec3::new(look.x, look.y, pupil_rest_z);
            pupil.scale = Vec3::splat(expr.pupil_scale);
        }

        // Brows: raise plus an exaggerated copy of the gaze
        let brow_rest = CharacterRig::brow_rest();
        let brow_look = gaze.brow_offset();
        let lift = expr.brow_raise * BROW_LIFT;
        rig.left_brow.position =
            brow_rest + Vec3::new(brow_look.x, brow_look.y + lift, 0.0);
        rig.right_brow.position = Vec3::new(-brow_rest.x, brow_rest.y, brow_rest.z)
            + Vec3::new(brow_look.x, brow_look.y + lift, 0.0);

        // Mouth crossfade comes straight from the synthesizer
        rig.smile.opacity = self.speech.smile_opacity;
        rig.mouth.visible = self.speech.mouth_visible;
        rig.mouth.scale = self.speech.mouth_scale;

        // Head: gaze-follow rotation at double scale, plus fidget drift as
        // extra yaw and a touch of roll
        let head = gaze.head_rotation();
        rig.head.rotation = Quat::from_euler(
            EulerRot::YXZ,
            head.x + fidget_x,
            -head.y,
            fidget_z * FIDGET_ROLL_WEIGHT,
        );

        // Body: breathing oscillation with the bounce layered on top,
        // conserving volume on the squash/stretch
        let breath = 1.0 + (self.breath_phase.sin() as f32) * self.tuning.breath_amplitude;
        rig.body.scale = Vec3::new(
            breath - bounce_amp * 0.5,
            breath + bounce_amp,
            breath - bounce_amp * 0.5,
        );

        rig.aura.emissive = expr.glow;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn engine(seed: u64) -> CharacterEngine {
        let mut cache = GeometryCache::new();
        CharacterEngine::with_seed(EngineTuning::default(), &mut cache, seed)
    }

    fn run(engine: &mut CharacterEngine, start: f64, seconds: f64) -> f64 {
        let mut now = start;
        let end = start + seconds;
        while now < end {
            engine.tick(DT, now);
            now += DT as f64;
        }
        now
    }

    #[test]
    fn test_corner_pointer_settles_at_clamp() {
        let mut engine = engine(1);
        engine.set_pointer(Some(Vec2::new(1.0, 1.0)));
        run(&mut engine, 0.0, 2.0);

        let iris = engine.rig().left_iris.position;
        let rest = CharacterRig::iris_rest();
        assert!(
            (iris.x - rest.x - 0.035).abs() < 0.005,
            "iris x settled at the clamp: {}",
            iris.x
        );
        assert!((iris.y - rest.y - 0.025).abs() < 0.004);

        // Eyes lead, head follows at double scale; the first fidget is still
        // seconds away, so the yaw is pure gaze
        let (yaw, _, _) = engine.rig().head.rotation.to_euler(EulerRot::YXZ);
        assert!((yaw - 0.07).abs() < 0.01, "head turned toward the pointer: {}", yaw);
    }

    #[test]
    fn test_speaking_mouth_never_static() {
        let mut engine = engine(2);
        engine.set_speaking(true);
        // Let the crossfade complete first
        run(&mut engine, 0.0, 0.5);

        let mut min_y = f32::MAX;
        let mut max_y = f32::MIN;
        let mut now = 0.5;
        while now < 3.5 {
            engine.tick(DT, now);
            let scale = engine.rig().mouth.scale;
            min_y = min_y.min(scale.y);
            max_y = max_y.max(scale.y);
            now += DT as f64;
        }
        assert!(
            max_y - min_y > 0.05,
            "mouth kept moving over 3s of speech: [{}, {}]",
            min_y,
            max_y
        );
        assert!(
            engine.rig().smile.opacity < 0.5,
            "smile mostly faded while speaking"
        );
    }

    #[test]
    fn test_dozing_pose_converges() {
        let mut engine = engine(3);
        engine.set_active(false);
        run(&mut engine, 0.0, 2.0);

        let rig = engine.rig();
        assert!(
            rig.left_eye.scale.y <= 0.2,
            "lids heavy while dozing: {}",
            rig.left_eye.scale.y
        );
        assert!((rig.aura.emissive - 0.06).abs() < 0.01, "glow dimmed");
        assert!(rig.smile.visible && rig.smile.opacity > 0.9, "smile stays");
        assert!(!rig.mouth.visible);
    }

    #[test]
    fn test_bounce_decays_back_to_breathing() {
        let mut engine = engine(4);
        engine.set_speaking(true);
        let now = run(&mut engine, 0.0, 0.45);
        engine.tick(DT, now);

        // Past the pulse window the body is back to pure breathing, which
        // stays inside the breath amplitude band and conserves x == z
        let scale = engine.rig().body.scale;
        assert!((scale.y - 1.0).abs() <= 0.015 + 1e-5, "y = {}", scale.y);
        assert_eq!(scale.x, scale.z);
        assert!((scale.x - 1.0).abs() <= 0.015 + 1e-5);
    }

    #[test]
    fn test_bob_speed_slew_keeps_breathing_smooth() {
        let mut engine = engine(8);

        // Settle breathing well into a session
        let mut now = 600.0;
        for _ in 0..120 {
            engine.tick(DT, now);
            now += DT as f64;
        }

        // Steady-state per-frame body-scale delta over one full breath cycle
        let mut prev = engine.rig().body.scale.y;
        let mut steady_max = 0.0f32;
        for _ in 0..120 {
            engine.tick(DT, now);
            now += DT as f64;
            let y = engine.rig().body.scale.y;
            steady_max = steady_max.max((y - prev).abs());
            prev = y;
        }

        // A mode change slews bob_speed 1.0 -> 0.4; the oscillation must
        // change frequency, not jump phase
        engine.set_active(false);
        let mut slew_max = 0.0f32;
        for _ in 0..120 {
            engine.tick(DT, now);
            now += DT as f64;
            let y = engine.rig().body.scale.y;
            slew_max = slew_max.max((y - prev).abs());
            prev = y;
        }

        assert!(
            slew_max <= steady_max * 1.5 + 1e-5,
            "bob-speed slew must stay near the steady bound: slew {} vs steady {}",
            slew_max,
            steady_max
        );
    }

    #[test]
    fn test_breathing_slows_while_dozing() {
        let mut engine = engine(5);
        engine.set_active(false);
        run(&mut engine, 0.0, 3.0);
        // bob_speed has settled near the dozing value
        assert!((engine.expr_bob_speed() - 0.4).abs() < 0.02);
    }

    #[test]
    fn test_unmount_mid_blink() {
        let mut engine = engine(6);
        // Run long enough that a blink has certainly been scheduled and the
        // engine may be mid-pulse, then tear down
        run(&mut engine, 0.0, 6.0);
        let rig = engine.into_rig();
        assert!(rig.left_eye.scale.y.is_finite());
        assert!(rig.body.scale.y.is_finite());
    }

    #[test]
    fn test_negative_dt_is_ignored() {
        let mut engine = engine(7);
        run(&mut engine, 0.0, 1.0);
        let before = engine.rig().clone();
        engine.tick(-0.5, 1.0);
        // A backward frame must not corrupt any state
        assert!(engine.rig().left_eye.scale.y.is_finite());
        assert!(engine.rig().body.scale.y.is_finite());
        assert_eq!(engine.rig().smile.opacity, before.smile.opacity);
    }

    impl CharacterEngine {
        fn expr_bob_speed(&self) -> f32 {
            self.expr.current.bob_speed
        }
    }
}
