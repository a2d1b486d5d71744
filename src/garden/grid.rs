//! Garden grid geometry
//!
//! Snapping placements to grid cells and hit-testing placed plants.

use super::plants::PlantCatalog;
use super::store::GardenItem;

/// Garden cell size in pixels
pub const CELL_SIZE: i32 = 32;

/// Snap a point down to the top-left corner of its grid cell
pub fn snap_to_grid(x: i32, y: i32) -> (i32, i32) {
    (
        x.div_euclid(CELL_SIZE) * CELL_SIZE,
        y.div_euclid(CELL_SIZE) * CELL_SIZE,
    )
}

/// Pixel position of a grid cell's top-left corner
pub fn cell_origin(col: i32, row: i32) -> (i32, i32) {
    (col * CELL_SIZE, row * CELL_SIZE)
}

fn contains(px: i32, py: i32, x: i32, y: i32, width: u32, height: u32) -> bool {
    let (w, h) = (width as i32, height as i32);
    px >= x && px <= x + w && py >= y && py <= y + h
}

/// The topmost plant whose footprint contains the point.
///
/// Later placements are drawn over earlier ones, so the search runs from the
/// end. Items whose plant type is missing from the catalog are never hit.
pub fn plant_at<'a>(
    items: &'a [GardenItem],
    catalog: &PlantCatalog,
    x: i32,
    y: i32,
) -> Option<&'a GardenItem> {
    items.iter().rev().find(|item| {
        catalog
            .get(&item.plant_type)
            .is_some_and(|plant| contains(x, y, item.x, item.y, plant.width, plant.height))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, plant_type: &str, x: i32, y: i32) -> GardenItem {
        GardenItem {
            id: id.to_string(),
            plant_type: plant_type.to_string(),
            x,
            y,
            growth: 0.0,
            planted: 0,
        }
    }

    #[test]
    fn test_snap_to_grid() {
        assert_eq!(snap_to_grid(0, 0), (0, 0));
        assert_eq!(snap_to_grid(31, 33), (0, 32));
        assert_eq!(snap_to_grid(100, 64), (96, 64));
        assert_eq!(snap_to_grid(-1, -33), (-32, -64));
    }

    #[test]
    fn test_cells() {
        assert_eq!(cell_origin(2, 3), (64, 96));
    }

    #[test]
    fn test_plant_at_prefers_topmost() {
        let catalog = PlantCatalog::default();
        let items = vec![
            item("under", "sunflower", 0, 0),
            item("over", "rose", 0, 0),
            item("ghost", "cactus", 64, 64),
        ];

        assert_eq!(plant_at(&items, &catalog, 10, 10).map(|i| i.id.as_str()), Some("over"));
        // Past the rose's 24x32 footprint but inside the sunflower's 32x48
        assert_eq!(plant_at(&items, &catalog, 30, 40).map(|i| i.id.as_str()), Some("under"));
        assert!(plant_at(&items, &catalog, 70, 70).is_none());
    }
}
