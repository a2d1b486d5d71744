//! Runtime configuration
//!
//! Read from `config.ron` in the platform config directory. A missing or
//! unreadable file falls back to defaults.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::data::DataError;
use crate::save::save_directory;

/// Environment variable that overrides the save directory
pub const SAVE_DIR_ENV: &str = "MINDGARDEN_SAVE_DIR";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Directory holding plants.ron and puzzles.ron
    pub data_dir: PathBuf,
    /// Where save slots live. `None` uses the platform data directory.
    pub save_dir: Option<PathBuf>,
    /// Seconds between garden growth ticks
    pub growth_tick_secs: f32,
    pub target_fps: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("assets/data"),
            save_dir: None,
            growth_tick_secs: 1.0,
            target_fps: 60,
        }
    }
}

impl GameConfig {
    /// Load the user config, then apply environment overrides
    pub fn load() -> Self {
        let mut config = match config_path() {
            Some(path) if path.exists() => Self::load_from(&path).unwrap_or_else(|e| {
                log::warn!("Failed to load config {}: {}. Using defaults.", path.display(), e);
                Self::default()
            }),
            _ => Self::default(),
        };

        if let Some(dir) = std::env::var_os(SAVE_DIR_ENV) {
            config.save_dir = Some(PathBuf::from(dir));
        }
        config
    }

    pub fn load_from(path: &Path) -> Result<Self, DataError> {
        let content = fs::read_to_string(path)?;
        Ok(ron::from_str(&content)?)
    }

    /// Resolved save directory
    pub fn save_dir(&self) -> PathBuf {
        self.save_dir.clone().unwrap_or_else(save_directory)
    }

    pub fn growth_interval(&self) -> f32 {
        if self.growth_tick_secs > 0.0 {
            self.growth_tick_secs
        } else {
            1.0
        }
    }

    pub fn frame_time(&self) -> Duration {
        Duration::from_millis(1000 / u64::from(self.target_fps.max(1)))
    }
}

/// `<config dir>/config.ron`, if the platform has a config directory
pub fn config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "mindgarden", "Mindgarden")
        .map(|dirs| dirs.config_dir().join("config.ron"))
}
