//! Pixie3D - Procedural Character Animation Engine
//!
//! A renderer-agnostic animation engine for a small 3D mascot character that:
//! - Derives all motion procedurally from two flags (`active`, `speaking`)
//!   and an optional pointer position
//! - Animates gaze, blinks, eyebrows, mouth, breathing, and idle fidgets
//! - Writes its output onto plain scene-node records the host maps to any
//!   renderer
//! - Shares procedurally-built tube geometry between characters through a
//!   memoizing cache

pub mod config;
pub mod engine;
pub mod error;
pub mod scene;

pub use config::{Config, EngineTuning};
pub use engine::{CharacterEngine, EngineInput};
pub use error::{Pixie3dError, Result};
pub use scene::{CharacterRig, RigGeometry, SceneNode};

pub use pixie3d_mesh::{ArcTubeParams, GeometryCache, TubeGeometry};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const NAME: &str = env!("CARGO_PKG_NAME");
