//! RON data loader
//!
//! Loads the plant catalog and puzzle pool from RON files, falling back to the
//! built-in defaults when a file is missing or malformed.

use std::fs;
use std::io;
use std::path::Path;

use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::garden::{default_plant_types, PlantCatalog, PlantType};
use crate::minigames::puzzles::default_puzzles;
use crate::minigames::{LogicPuzzle, PuzzleBank};

pub const PLANTS_FILE: &str = "plants.ron";
pub const PUZZLES_FILE: &str = "puzzles.ron";

/// Data file errors
#[derive(Debug, Error)]
pub enum DataError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("RON error: {0}")]
    Ron(String),
}

impl From<ron::error::SpannedError> for DataError {
    fn from(e: ron::error::SpannedError) -> Self {
        DataError::Ron(e.to_string())
    }
}

impl From<ron::Error> for DataError {
    fn from(e: ron::Error) -> Self {
        DataError::Ron(e.to_string())
    }
}

/// Static game content
#[derive(Debug, Clone)]
pub struct DataManager {
    pub plants: PlantCatalog,
    pub puzzles: PuzzleBank,
}

impl DataManager {
    /// Load from `dir`, using defaults for anything missing
    pub fn load(dir: &Path) -> Self {
        let plants = load_or_default(&dir.join(PLANTS_FILE), default_plant_types);
        let puzzles = load_or_default(&dir.join(PUZZLES_FILE), default_puzzles);
        Self {
            plants: PlantCatalog::new(plants),
            puzzles: PuzzleBank::new(puzzles),
        }
    }
}

impl Default for DataManager {
    fn default() -> Self {
        Self {
            plants: PlantCatalog::new(default_plant_types()),
            puzzles: PuzzleBank::new(default_puzzles()),
        }
    }
}

fn load_or_default<T: DeserializeOwned>(path: &Path, default: fn() -> Vec<T>) -> Vec<T> {
    if !path.exists() {
        return default();
    }
    match read_ron::<Vec<T>>(path) {
        Ok(values) if !values.is_empty() => {
            log::info!("Loaded {} entries from {}", values.len(), path.display());
            values
        }
        Ok(_) => {
            log::warn!("{} is empty. Using defaults.", path.display());
            default()
        }
        Err(e) => {
            log::warn!("Failed to load {}: {}. Using defaults.", path.display(), e);
            default()
        }
    }
}

fn read_ron<T: DeserializeOwned>(path: &Path) -> Result<T, DataError> {
    let content = fs::read_to_string(path)?;
    Ok(ron::from_str(&content)?)
}

/// Write the built-in content to `dir` as pretty RON for editing
pub fn export_default_data(dir: &Path) -> Result<(), DataError> {
    fs::create_dir_all(dir)?;

    let config = ron::ser::PrettyConfig::default();
    let plants: Vec<PlantType> = default_plant_types();
    fs::write(
        dir.join(PLANTS_FILE),
        ron::ser::to_string_pretty(&plants, config.clone())?,
    )?;

    let puzzles: Vec<LogicPuzzle> = default_puzzles();
    fs::write(
        dir.join(PUZZLES_FILE),
        ron::ser::to_string_pretty(&puzzles, config)?,
    )?;

    log::info!("Exported default data to {}", dir.display());
    Ok(())
}
