//! Garden item store
//!
//! Placed plants with their position and growth, persisted to the garden slot.
//! The store never checks prices; purchases go through `Game::purchase_plant`.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::save::{GardenSave, SharedStore, StorageError, GARDEN_SLOT};

/// Growth added to every plant per growth tick
pub const GROWTH_PER_TICK: f32 = 0.001;

/// A placed plant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GardenItem {
    pub id: String,
    /// Catalog id of the plant type
    pub plant_type: String,
    pub x: i32,
    pub y: i32,
    /// 0.0 = just planted, 1.0 = fully grown
    pub growth: f32,
    /// Unix time in milliseconds
    pub planted: u64,
}

impl GardenItem {
    pub fn is_grown(&self) -> bool {
        self.growth >= 1.0
    }
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// Placed plants in placement order
pub struct GardenStore {
    items: Vec<GardenItem>,
    storage: SharedStore,
}

impl GardenStore {
    pub fn new(storage: SharedStore) -> Self {
        Self {
            items: Vec::new(),
            storage,
        }
    }

    pub fn items(&self) -> &[GardenItem] {
        &self.items
    }

    pub fn get(&self, id: &str) -> Option<&GardenItem> {
        self.items.iter().find(|item| item.id == id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Place a new plant and return its id
    pub fn add_plant(&mut self, plant_type: &str, x: i32, y: i32) -> String {
        let planted = now_millis();
        let salt: u32 = rand::thread_rng().gen();
        let id = format!("plant_{}_{}", planted, salt);

        self.items.push(GardenItem {
            id: id.clone(),
            plant_type: plant_type.to_string(),
            x,
            y,
            growth: 0.0,
            planted,
        });
        log::debug!("Planted {} at ({}, {}) as {}", plant_type, x, y, id);
        id
    }

    /// Move a plant. Returns false if no plant has this id.
    pub fn move_plant(&mut self, id: &str, x: i32, y: i32) -> bool {
        match self.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.x = x;
                item.y = y;
                true
            }
            None => false,
        }
    }

    /// Remove a plant. Returns the removed item, if any.
    pub fn remove_plant(&mut self, id: &str) -> Option<GardenItem> {
        let pos = self.items.iter().position(|item| item.id == id)?;
        Some(self.items.remove(pos))
    }

    /// Advance every plant by one growth step
    pub fn grow_plants(&mut self) {
        for item in &mut self.items {
            item.growth = (item.growth + GROWTH_PER_TICK).min(1.0);
        }
    }

    pub fn save_garden(&self) -> Result<(), StorageError> {
        let json = serde_json::to_string(&self.items)?;
        self.storage.write(GARDEN_SLOT, &json)?;
        log::info!("Garden saved ({} plants)", self.items.len());
        Ok(())
    }

    /// Restore plants from the garden slot. Failures are logged and leave the
    /// current plants untouched.
    pub fn load_garden(&mut self) {
        let data = match self.storage.read(GARDEN_SLOT) {
            Ok(Some(data)) => data,
            Ok(None) => return,
            Err(e) => {
                log::warn!("Failed to read garden: {}", e);
                return;
            }
        };

        match serde_json::from_str::<GardenSave>(&data) {
            Ok(mut items) => {
                for item in &mut items {
                    item.growth = item.growth.clamp(0.0, 1.0);
                }
                log::info!("Garden loaded ({} plants)", items.len());
                self.items = items;
            }
            Err(e) => log::warn!("Failed to parse garden: {}", e),
        }
    }

    /// Remove every plant and delete the garden slot
    pub fn clear_garden(&mut self) -> Result<(), StorageError> {
        self.items.clear();
        self.storage.remove(GARDEN_SLOT)?;
        log::info!("Garden cleared");
        Ok(())
    }
}
