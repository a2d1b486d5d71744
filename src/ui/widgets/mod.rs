//! UI widgets

pub mod garden_grid;

pub use garden_grid::{render_garden_help, GardenGridWidget, GridCursor, GARDEN_COLS, GARDEN_ROWS};
