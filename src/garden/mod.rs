//! Garden building
//!
//! The plant catalog, placed plants, and grid geometry.

pub mod plants;
pub mod store;
pub mod grid;

pub use grid::{cell_origin, plant_at, snap_to_grid, CELL_SIZE};
pub use plants::{default_plant_types, PlantCatalog, PlantType};
pub use store::{GardenItem, GardenStore, GROWTH_PER_TICK};
