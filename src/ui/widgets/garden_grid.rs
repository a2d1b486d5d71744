//! Garden grid widget for ratatui
//!
//! Draws the garden as a grid of 32-pixel cells, two terminal columns each.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

use crate::garden::{cell_origin, plant_at, GardenItem, PlantCatalog, CELL_SIZE};

/// Garden size in cells
pub const GARDEN_COLS: i32 = 20;
pub const GARDEN_ROWS: i32 = 12;

/// Growth below which a plant is still drawn as a sprout
const SPROUT_GROWTH: f32 = 0.5;

/// Grid cursor position in cells
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridCursor {
    pub col: i32,
    pub row: i32,
}

impl GridCursor {
    pub fn move_by(&mut self, dcol: i32, drow: i32) {
        self.col = (self.col + dcol).clamp(0, GARDEN_COLS - 1);
        self.row = (self.row + drow).clamp(0, GARDEN_ROWS - 1);
    }

    /// Garden coordinates of the cell's top-left corner
    pub fn origin(&self) -> (i32, i32) {
        cell_origin(self.col, self.row)
    }

    /// Garden coordinates of the cell's centre, used for hit tests
    pub fn center(&self) -> (i32, i32) {
        let (x, y) = self.origin();
        (x + CELL_SIZE / 2, y + CELL_SIZE / 2)
    }
}

/// Widget for rendering the garden
pub struct GardenGridWidget<'a> {
    items: &'a [GardenItem],
    catalog: &'a PlantCatalog,
    cursor: GridCursor,
    /// Plant being moved, drawn highlighted
    carrying: Option<&'a str>,
    title: &'a str,
}

impl<'a> GardenGridWidget<'a> {
    pub fn new(items: &'a [GardenItem], catalog: &'a PlantCatalog) -> Self {
        Self {
            items,
            catalog,
            cursor: GridCursor::default(),
            carrying: None,
            title: " Garden ",
        }
    }

    pub fn cursor(mut self, cursor: GridCursor) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn carrying(mut self, id: Option<&'a str>) -> Self {
        self.carrying = id;
        self
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = title;
        self
    }

    /// Text and style for one cell
    fn cell_style(&self, col: i32, row: i32) -> (&'a str, Style) {
        let is_cursor = self.cursor.col == col && self.cursor.row == row;
        let (x, y) = cell_origin(col, row);

        // Only the cell a plant is anchored in shows its sprite
        let anchored = self
            .items
            .iter()
            .rev()
            .find(|item| item.x == x && item.y == y);

        if let Some(item) = anchored {
            let sprite = match self.catalog.get(&item.plant_type) {
                Some(plant) if item.growth >= SPROUT_GROWTH => plant.sprite.as_str(),
                Some(_) => "🌱",
                None => "??",
            };
            let mut style = Style::default();
            if is_cursor {
                style = style.bg(Color::Rgb(70, 90, 60)).add_modifier(Modifier::BOLD);
            }
            if self.carrying == Some(item.id.as_str()) {
                style = style.add_modifier(Modifier::REVERSED);
            }
            return (sprite, style);
        }

        // Cells covered by a larger plant's footprint
        let covered = plant_at(self.items, self.catalog, x + CELL_SIZE / 2, y + CELL_SIZE / 2).is_some();
        let (glyph, mut style) = if covered {
            ("░░", Style::default().fg(Color::Rgb(60, 110, 50)))
        } else {
            ("· ", Style::default().fg(Color::Rgb(70, 100, 60)))
        };
        if is_cursor {
            style = style.bg(Color::Rgb(50, 70, 45)).fg(Color::White);
        }
        (glyph, style)
    }
}

impl<'a> Widget for GardenGridWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(self.title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Rgb(90, 140, 80)));

        let inner = block.inner(area);
        block.render(area, buf);

        for row in 0..GARDEN_ROWS {
            for col in 0..GARDEN_COLS {
                let cell_x = inner.x + (col as u16 * 2);
                let cell_y = inner.y + row as u16;
                if cell_x + 1 >= inner.x + inner.width || cell_y >= inner.y + inner.height {
                    continue;
                }

                let (text, style) = self.cell_style(col, row);
                // Clear both columns first; wide glyphs fill the second one
                if let Some(cell) = buf.cell_mut((cell_x + 1, cell_y)) {
                    cell.set_char(' ').set_style(style);
                }
                buf.set_stringn(cell_x, cell_y, text, 2, style);
            }
        }
    }
}

/// Render help text for garden controls
pub fn render_garden_help(area: Rect, buf: &mut Buffer) {
    let help_lines = [
        ("↑↓←→", "Move cursor"),
        ("Tab", "Next plant"),
        ("Enter", "Buy / drop"),
        ("M", "Move plant"),
        ("D", "Dig up plant"),
        ("Esc", "Back"),
    ];

    let mut y = area.y;
    for (key, desc) in help_lines {
        if y >= area.y + area.height {
            break;
        }
        let key_style = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(Color::DarkGray);

        buf.set_string(area.x, y, key, key_style);
        buf.set_string(area.x + 6, y, desc, desc_style);
        y += 1;
    }
}
