//! Pixie3D - Procedural Character Animation Engine
//!
//! Headless demo entry point: runs a fixed-step simulation of one character
//! through a scripted activity timeline and logs the resulting rig state.

use clap::Parser;
use glam::Vec2;
use std::path::PathBuf;
use tracing::{debug, info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use pixie3d::{CharacterEngine, Config, GeometryCache};

/// Pixie3D - Procedural Character Animation Engine
#[derive(Parser, Debug)]
#[command(name = "pixie3d", version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// RNG seed for a reproducible run
    #[arg(short, long)]
    seed: Option<u64>,

    /// Simulation length in seconds
    #[arg(short, long, default_value_t = 20.0)]
    duration: f64,

    /// Fixed simulation step rate
    #[arg(long, default_value_t = 60)]
    fps: u32,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(log_level.into())
                .from_env_lossy(),
        )
        .init();

    info!("Starting {} v{}", pixie3d::NAME, pixie3d::VERSION);

    // Load configuration
    let config = if let Some(ref path) = args.config {
        Config::from_file(path)?
    } else {
        Config::load()?
    };
    config.validate()?;

    let mut cache = GeometryCache::new();
    let mut engine = match args.seed {
        Some(seed) => {
            info!("Seeded run: {}", seed);
            CharacterEngine::with_seed(config.engine.clone(), &mut cache, seed)
        }
        None => CharacterEngine::new(config.engine.clone(), &mut cache),
    };

    let geometry = engine.geometry();
    info!(
        "Rig geometry built: smile {} verts, brow {} verts",
        geometry.smile.vertex_count(),
        geometry.brow.vertex_count()
    );

    run_simulation(&mut engine, args.duration, args.fps);

    info!("Pixie3D stopped");
    Ok(())
}

/// Drive the engine through a scripted timeline: wake, look around, speak,
/// fall idle, and doze off.
fn run_simulation(engine: &mut CharacterEngine, duration: f64, fps: u32) {
    let dt = 1.0 / fps as f32;
    let mut now = 0.0;
    let mut next_report = 0.0;

    while now < duration {
        script_inputs(engine, now);
        engine.tick(dt, now);

        if now >= next_report {
            let rig = engine.rig();
            info!(
                "t={:.1} eye_open={:.2} mouth_visible={} glow={:.2}",
                now, rig.left_eye.scale.y, rig.mouth.visible, rig.aura.emissive
            );
            debug!(
                body_scale = ?rig.body.scale,
                head_rotation = ?rig.head.rotation,
                "rig detail"
            );
            next_report += 1.0;
        }

        now += dt as f64;
    }
}

/// The demo's activity timeline.
fn script_inputs(engine: &mut CharacterEngine, now: f64) {
    match now {
        t if t < 3.0 => {
            // Idle, watching a pointer circle the screen
            engine.set_active(true);
            engine.set_speaking(false);
            let angle = t * 1.3;
            engine.set_pointer(Some(Vec2::new(
                angle.cos() as f32 * 0.8,
                angle.sin() as f32 * 0.6,
            )));
        }
        t if t < 8.0 => {
            // Speaking burst
            engine.set_speaking(true);
        }
        t if t < 14.0 => {
            // Back to idle, pointer gone
            engine.set_speaking(false);
            engine.set_pointer(None);
        }
        _ => {
            // Doze off for the remainder
            engine.set_active(false);
        }
    }
}
