//! Save/load system
//!
//! Durable key-value slots and the data written into them.

pub mod storage;
pub mod snapshot;

pub use storage::{
    FileStore, KeyValueStore, MemoryStore, SharedStore, StorageError,
    save_directory, GARDEN_SLOT, PROGRESS_SLOT,
};

pub use snapshot::{AchievementRecord, GardenSave, ProgressSave};
