//! Plant catalog
//!
//! Static plant definitions resolved once into an id-indexed lookup table.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// A purchasable plant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlantType {
    pub id: String,
    pub name: String,
    pub cost: u32,
    pub unlock_level: u32,
    pub sprite: String,
    /// Footprint in garden pixels
    pub width: u32,
    pub height: u32,
    pub magical: bool,
}

impl PlantType {
    fn new(
        id: &str,
        name: &str,
        cost: u32,
        unlock_level: u32,
        sprite: &str,
        (width, height): (u32, u32),
        magical: bool,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            cost,
            unlock_level,
            sprite: sprite.to_string(),
            width,
            height,
            magical,
        }
    }

    pub fn is_unlocked_at(&self, level: u32) -> bool {
        self.unlock_level <= level
    }
}

/// Plant definitions in display order, indexed by id
#[derive(Debug, Clone)]
pub struct PlantCatalog {
    plants: Vec<PlantType>,
    by_id: HashMap<String, usize>,
}

impl PlantCatalog {
    /// Build the lookup table. Later duplicates of an id are dropped.
    pub fn new(plants: Vec<PlantType>) -> Self {
        let mut by_id = HashMap::with_capacity(plants.len());
        let mut unique = Vec::with_capacity(plants.len());
        for plant in plants {
            if by_id.contains_key(&plant.id) {
                log::warn!("Duplicate plant id '{}' ignored", plant.id);
                continue;
            }
            by_id.insert(plant.id.clone(), unique.len());
            unique.push(plant);
        }
        Self { plants: unique, by_id }
    }

    pub fn get(&self, id: &str) -> Option<&PlantType> {
        self.by_id.get(id).map(|&idx| &self.plants[idx])
    }

    pub fn iter(&self) -> impl Iterator<Item = &PlantType> {
        self.plants.iter()
    }

    pub fn len(&self) -> usize {
        self.plants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plants.is_empty()
    }

    /// Plants the player may buy at this level
    pub fn available_at(&self, level: u32) -> Vec<&PlantType> {
        self.plants.iter().filter(|p| p.is_unlocked_at(level)).collect()
    }

    pub fn plants(&self) -> &[PlantType] {
        &self.plants
    }
}

impl Default for PlantCatalog {
    fn default() -> Self {
        Self::new(default_plant_types())
    }
}

/// Built-in plant definitions
pub fn default_plant_types() -> Vec<PlantType> {
    vec![
        PlantType::new("sunflower", "Sunflower", 10, 1, "🌻", (32, 48), false),
        PlantType::new("rose", "Rose", 15, 1, "🌹", (24, 32), false),
        PlantType::new("tulip", "Tulip", 12, 2, "🌷", (20, 36), false),
        PlantType::new("magic_mushroom", "Magic Mushroom", 50, 3, "🍄", (28, 28), true),
        PlantType::new("crystal_flower", "Crystal Flower", 100, 5, "💎", (32, 40), true),
        PlantType::new("fairy_tree", "Fairy Tree", 200, 8, "🧚", (48, 64), true),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_by_id() {
        let catalog = PlantCatalog::default();
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.get("rose").map(|p| p.cost), Some(15));
        assert!(catalog.get("cactus").is_none());
    }

    #[test]
    fn test_available_at_level() {
        let catalog = PlantCatalog::default();
        let ids = |level| {
            catalog
                .available_at(level)
                .into_iter()
                .map(|p| p.id.as_str())
                .collect::<Vec<_>>()
        };
        assert_eq!(ids(1), vec!["sunflower", "rose"]);
        assert_eq!(ids(3).len(), 4);
        assert_eq!(ids(8).len(), 6);
    }

    #[test]
    fn test_duplicate_ids_keep_first() {
        let mut plants = default_plant_types();
        let mut dup = plants[0].clone();
        dup.cost = 999;
        plants.push(dup);

        let catalog = PlantCatalog::new(plants);
        assert_eq!(catalog.len(), 6);
        assert_eq!(catalog.get("sunflower").unwrap().cost, 10);
    }
}
