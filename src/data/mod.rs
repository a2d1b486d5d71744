//! Data loading and external game content
//!
//! Plants and puzzles can be overridden by RON files in the data directory,
//! which makes it easy to tune content without rebuilding.

pub mod loader;

pub use loader::{export_default_data, DataError, DataManager, PLANTS_FILE, PUZZLES_FILE};
