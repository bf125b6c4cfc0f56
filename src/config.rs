//! Configuration parsing and management for Pixie3D

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Pixie3dError};

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineTuning,
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Pixie3dError> {
        let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::ReadFile(format!("{}: {}", path.as_ref().display(), e))
        })?;

        Self::from_str(&contents)
    }

    /// Parse configuration from a TOML string
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Result<Self, Pixie3dError> {
        toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()).into())
    }

    /// Load configuration from default paths
    pub fn load() -> Result<Self, Pixie3dError> {
        // Try config paths in order
        let paths = [
            PathBuf::from("config.toml"),
            PathBuf::from("config/default.toml"),
            dirs_path().join("config.toml"),
        ];

        for path in &paths {
            if path.exists() {
                tracing::info!("Loading config from: {}", path.display());
                return Self::from_file(path);
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), Pixie3dError> {
        self.engine.validate()
    }
}

/// Animation engine tuning parameters.
///
/// All timing ranges are in seconds, rates in 1/s, offsets and clamps in
/// engine units. The defaults reproduce the reference feel; everything here
/// is a tunable, not a contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineTuning {
    // --- Exponential-approach rates ---
    /// Master smoothing rate for expression scalars
    #[serde(default = "default_8_0")]
    pub smoothing_rate: f32,
    /// Gaze pointer smoothing rate
    #[serde(default = "default_5_0")]
    pub gaze_rate: f32,
    /// Fidget offset decay rate after the active window (half the master rate)
    #[serde(default = "default_4_0")]
    pub fidget_decay_rate: f32,
    /// Smile/open-mouth crossfade rate
    #[serde(default = "default_10_0")]
    pub mouth_fade_rate: f32,

    // --- Gaze clamp bounds (engine units) ---
    #[serde(default = "default_0_035")]
    pub gaze_clamp_x: f32,
    #[serde(default = "default_0_025")]
    pub gaze_clamp_y: f32,

    // --- Blink scheduling ---
    #[serde(default = "default_2_0")]
    pub blink_interval_min: f32,
    #[serde(default = "default_5_0")]
    pub blink_interval_max: f32,
    /// Probability that a scheduled blink is a double-blink
    #[serde(default = "default_0_2")]
    pub double_blink_chance: f32,

    // --- Idle fidget scheduling ---
    #[serde(default = "default_5_0")]
    pub fidget_interval_min: f32,
    #[serde(default = "default_10_0")]
    pub fidget_interval_max: f32,
    #[serde(default = "default_1_5")]
    pub fidget_window_min: f32,
    #[serde(default = "default_2_5")]
    pub fidget_window_max: f32,
    /// Fidget target offset ranges (± engine units)
    #[serde(default = "default_0_05")]
    pub fidget_range_x: f32,
    #[serde(default = "default_0_04")]
    pub fidget_range_z: f32,

    // --- Transition bounce ---
    #[serde(default = "default_0_4")]
    pub bounce_duration: f32,
    #[serde(default = "default_0_06")]
    pub bounce_amplitude: f32,
    #[serde(default = "default_6_0")]
    pub bounce_damping: f32,

    // --- Breathing ---
    /// Body scale oscillation amplitude
    #[serde(default = "default_0_015")]
    pub breath_amplitude: f32,
}

fn default_8_0() -> f32 { 8.0 }
fn default_5_0() -> f32 { 5.0 }
fn default_4_0() -> f32 { 4.0 }
fn default_10_0() -> f32 { 10.0 }
fn default_0_035() -> f32 { 0.035 }
fn default_0_025() -> f32 { 0.025 }
fn default_2_0() -> f32 { 2.0 }
fn default_0_2() -> f32 { 0.2 }
fn default_1_5() -> f32 { 1.5 }
fn default_2_5() -> f32 { 2.5 }
fn default_0_05() -> f32 { 0.05 }
fn default_0_04() -> f32 { 0.04 }
fn default_0_4() -> f32 { 0.4 }
fn default_0_06() -> f32 { 0.06 }
fn default_6_0() -> f32 { 6.0 }
fn default_0_015() -> f32 { 0.015 }

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            smoothing_rate: default_8_0(),
            gaze_rate: default_5_0(),
            fidget_decay_rate: default_4_0(),
            mouth_fade_rate: default_10_0(),
            gaze_clamp_x: default_0_035(),
            gaze_clamp_y: default_0_025(),
            blink_interval_min: default_2_0(),
            blink_interval_max: default_5_0(),
            double_blink_chance: default_0_2(),
            fidget_interval_min: default_5_0(),
            fidget_interval_max: default_10_0(),
            fidget_window_min: default_1_5(),
            fidget_window_max: default_2_5(),
            fidget_range_x: default_0_05(),
            fidget_range_z: default_0_04(),
            bounce_duration: default_0_4(),
            bounce_amplitude: default_0_06(),
            bounce_damping: default_6_0(),
            breath_amplitude: default_0_015(),
        }
    }
}

impl EngineTuning {
    /// Validate tuning values
    pub fn validate(&self) -> Result<(), Pixie3dError> {
        for (field, value) in [
            ("engine.smoothing_rate", self.smoothing_rate),
            ("engine.gaze_rate", self.gaze_rate),
            ("engine.fidget_decay_rate", self.fidget_decay_rate),
            ("engine.mouth_fade_rate", self.mouth_fade_rate),
            ("engine.bounce_duration", self.bounce_duration),
        ] {
            if value <= 0.0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "Must be greater than 0".to_string(),
                }
                .into());
            }
        }

        if !(0.0..=1.0).contains(&self.double_blink_chance) {
            return Err(ConfigError::InvalidValue {
                field: "engine.double_blink_chance".to_string(),
                message: "Probability must be between 0.0 and 1.0".to_string(),
            }
            .into());
        }

        for (field, min, max) in [
            ("engine.blink_interval", self.blink_interval_min, self.blink_interval_max),
            ("engine.fidget_interval", self.fidget_interval_min, self.fidget_interval_max),
            ("engine.fidget_window", self.fidget_window_min, self.fidget_window_max),
        ] {
            if min <= 0.0 || max < min {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: format!("Invalid range: {} .. {}", min, max),
                }
                .into());
            }
        }

        Ok(())
    }
}

/// Get the platform-specific configuration directory
fn dirs_path() -> PathBuf {
    #[cfg(target_os = "linux")]
    {
        if let Some(config_dir) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(config_dir).join("pixie3d");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config/pixie3d");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join("Library/Application Support/pixie3d");
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("pixie3d");
        }
    }

    PathBuf::from(".")
}
