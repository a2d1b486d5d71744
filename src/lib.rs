//! Mindgarden - Brain training that grows a garden
//!
//! Play short memory, pattern and logic games to earn coins and experience,
//! then spend them on plants for a garden that grows while you play.

pub mod config;
pub mod data;
pub mod game;
pub mod garden;
pub mod minigames;
pub mod progression;
pub mod save;
pub mod ui;

// Re-export commonly used types
pub use config::GameConfig;
pub use game::{Game, GameMode, PurchaseError};
pub use minigames::{GameOutcome, MiniGameKind, RoundEngine, RoundPhase};
pub use save::{FileStore, KeyValueStore, MemoryStore, SharedStore};
