//! Durable key-value slots
//!
//! Each save slot is a named string value. The file backend writes one JSON
//! file per slot under the save directory; the memory backend is used by
//! tests and headless runs.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use thiserror::Error;

/// Slot holding player progress and achievements
pub const PROGRESS_SLOT: &str = "magicalGardenSave";
/// Slot holding the placed garden items
pub const GARDEN_SLOT: &str = "magicalGardenData";

/// Storage error types
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error on slot '{slot}': {source}")]
    Io {
        slot: String,
        #[source]
        source: io::Error,
    },
    #[error("Serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// A durable string-valued key-value store
pub trait KeyValueStore: Send + Sync {
    /// Read a slot. A missing slot is `Ok(None)`.
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError>;

    /// Write (or overwrite) a slot
    fn write(&self, slot: &str, value: &str) -> Result<(), StorageError>;

    /// Delete a slot. Deleting a missing slot is not an error.
    fn remove(&self, slot: &str) -> Result<(), StorageError>;
}

/// Shared handle to a storage backend
pub type SharedStore = Arc<dyn KeyValueStore>;

/// Get the default save directory path
pub fn save_directory() -> PathBuf {
    use directories::ProjectDirs;

    if let Some(proj_dirs) = ProjectDirs::from("com", "mindgarden", "Mindgarden") {
        let mut path = proj_dirs.data_local_dir().to_path_buf();
        path.push("saves");
        path
    } else {
        // Fallback to current directory
        PathBuf::from("./saves")
    }
}

/// One JSON file per slot inside a directory
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Get the path for a specific slot
    pub fn slot_path(&self, slot: &str) -> PathBuf {
        self.dir.join(format!("{}.json", slot))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
        let path = self.slot_path(slot);
        match fs::read_to_string(&path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(source) => Err(StorageError::Io {
                slot: slot.to_string(),
                source,
            }),
        }
    }

    fn write(&self, slot: &str, value: &str) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            slot: slot.to_string(),
            source,
        };

        // Ensure directory exists
        fs::create_dir_all(&self.dir).map_err(io_err)?;
        // Write beside the slot, then rename into place
        let path = self.slot_path(slot);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(io_err)?;
        fs::rename(&tmp, &path).map_err(io_err)?;

        log::debug!("Wrote slot {} to {:?}", slot, self.dir);
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<(), StorageError> {
        let path = self.slot_path(slot);
        match fs::remove_file(&path) {
            Ok(()) => {
                log::info!("Deleted slot {}", slot);
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(StorageError::Io {
                slot: slot.to_string(),
                source,
            }),
        }
    }
}

/// In-process storage; clones share the same slots
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, slot: &str) -> bool {
        self.slots.lock().contains_key(slot)
    }
}

impl KeyValueStore for MemoryStore {
    fn read(&self, slot: &str) -> Result<Option<String>, StorageError> {
        Ok(self.slots.lock().get(slot).cloned())
    }

    fn write(&self, slot: &str, value: &str) -> Result<(), StorageError> {
        self.slots.lock().insert(slot.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, slot: &str) -> Result<(), StorageError> {
        self.slots.lock().remove(slot);
        Ok(())
    }
}
