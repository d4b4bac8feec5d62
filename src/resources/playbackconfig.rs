//! Playback configuration resource.
//!
//! Tunables for the tick pass, loaded from an INI configuration file.
//! Provides safe defaults so the node works without any file present.
//!
//! # Configuration File Format
//!
//! ```ini
//! [playback]
//! completion_threshold = 0.99
//!
//! [time]
//! scale = 1.0
//! ```

use bevy_ecs::prelude::Resource;
use configparser::ini::Ini;
use std::path::PathBuf;

/// Default safe values for startup
const DEFAULT_COMPLETION_THRESHOLD: f32 = 0.99;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const DEFAULT_CONFIG_PATH: &str = "./rignode.ini";

/// Playback configuration resource.
///
/// `completion_threshold` is the near-end time-ratio above which a one-shot
/// playback is considered finished on its next tick even if the ratio did
/// not visibly wrap. Raising it delays completion detection; lowering it
/// risks cutting clips short on slow ticks.
#[derive(Resource, Debug, Clone)]
pub struct PlaybackConfig {
    /// Near-completion time-ratio threshold for one-shot detection.
    pub completion_threshold: f32,
    /// Initial time scale applied to the world clock.
    pub time_scale: f32,
    /// Path to the configuration file.
    pub config_path: PathBuf,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaybackConfig {
    /// Create a new configuration with safe default values.
    pub fn new() -> Self {
        Self {
            completion_threshold: DEFAULT_COMPLETION_THRESHOLD,
            time_scale: DEFAULT_TIME_SCALE,
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
        }
    }

    /// Create a new configuration with a custom config file path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            config_path: path.into(),
            ..Self::new()
        }
    }

    /// Load configuration from the INI file.
    ///
    /// Missing values retain their current (default) values.
    /// Returns an error if the file cannot be read or parsed.
    pub fn load_from_file(&mut self) -> Result<(), String> {
        let mut config = Ini::new();
        config
            .load(&self.config_path)
            .map_err(|e| format!("Failed to load config file: {}", e))?;
        self.apply_ini(&config);
        Ok(())
    }

    fn apply_ini(&mut self, config: &Ini) {
        // [playback] section
        if let Some(threshold) = config.getfloat("playback", "completion_threshold").ok().flatten()
        {
            self.completion_threshold = threshold as f32;
        }

        // [time] section
        if let Some(scale) = config.getfloat("time", "scale").ok().flatten() {
            self.time_scale = scale as f32;
        }
    }
}
