use macroquad::math::{Rect, Vec2, vec2};

use crate::cell::CELL_SIZE;

const MARGIN: f32 = 16.0;
const RULER: f32 = 24.0;
const GAP: f32 = 12.0;
const BUTTON_HEIGHT: f32 = 26.0;
const BUTTON_SPACING: f32 = 6.0;
const PROPERTY_ROW_HEIGHT: f32 = 30.0;
const PROPERTY_ROWS: usize = 8;
const PALETTE_HEIGHT: f32 = 480.0;

pub(crate) const PREVIEW_SCALE: f32 = 4.0;
pub(crate) const MODE_BUTTON_WIDTH: f32 = 90.0;
pub(crate) const PANEL_WIDTH: f32 = 300.0;

/// Where each part of the editor sits on screen.
#[derive(Clone, Debug)]
pub struct Layout {
    pub grid: Rect,
    pub mode_bar: Rect,
    pub layers: Rect,
    pub properties: Rect,
    pub palette: Rect,
    preview_size: Vec2,
}

impl Layout {
    pub fn new(visible_rows: usize, visible_columns: usize) -> Self {
        let grid = Rect::new(
            MARGIN + RULER,
            MARGIN + RULER,
            visible_columns as f32 * CELL_SIZE,
            visible_rows as f32 * CELL_SIZE,
        );
        let mode_bar = Rect::new(grid.x, grid.bottom() + GAP, grid.w, BUTTON_HEIGHT + 8.0);
        let preview_size = vec2(visible_columns as f32, visible_rows as f32) * PREVIEW_SCALE;
        let layers = Rect::new(
            grid.right() + GAP * 2.0,
            grid.y,
            preview_size.x + 48.0,
            mode_bar.bottom() - grid.y,
        );
        let properties = Rect::new(
            layers.right() + GAP,
            grid.y,
            PANEL_WIDTH,
            PROPERTY_ROWS as f32 * PROPERTY_ROW_HEIGHT + 16.0,
        );
        let palette = Rect::new(
            properties.x,
            properties.bottom() + GAP,
            PANEL_WIDTH,
            PALETTE_HEIGHT,
        );
        Self {
            grid,
            mode_bar,
            layers,
            properties,
            palette,
            preview_size,
        }
    }

    /// Size of the whole window this layout fills.
    pub fn window_size(&self) -> Vec2 {
        vec2(
            self.palette.right() + MARGIN,
            self.palette.bottom().max(self.mode_bar.bottom()) + MARGIN,
        )
    }

    pub fn grid_origin(&self) -> Vec2 {
        self.grid.point()
    }

    pub fn mode_button(&self, index: usize) -> Rect {
        Rect::new(
            self.mode_bar.x + index as f32 * (MODE_BUTTON_WIDTH + BUTTON_SPACING),
            self.mode_bar.y + 4.0,
            MODE_BUTTON_WIDTH,
            BUTTON_HEIGHT,
        )
    }

    /// Layer previews are stacked with the topmost layer first.
    pub fn layer_preview(&self, layer: usize, count: usize) -> Rect {
        let slot = count.saturating_sub(layer + 1) as f32;
        let step = (self.layers.h - 8.0) / count.max(1) as f32;
        Rect::new(
            self.layers.x + 36.0,
            self.layers.y + 4.0 + slot * step,
            self.preview_size.x,
            self.preview_size.y,
        )
    }

    pub fn layer_toggle(&self, layer: usize, count: usize) -> Rect {
        let preview = self.layer_preview(layer, count);
        Rect::new(self.layers.x + 6.0, preview.y + preview.h / 2.0 - 10.0, 20.0, 20.0)
    }

    /// `(minus, plus)` buttons of one property row.
    pub fn property_buttons(&self, row: usize) -> (Rect, Rect) {
        let y = self.properties.y + 8.0 + row as f32 * PROPERTY_ROW_HEIGHT;
        let size = PROPERTY_ROW_HEIGHT - 6.0;
        (
            Rect::new(self.properties.right() - 2.0 * size - 16.0, y, size, size),
            Rect::new(self.properties.right() - size - 8.0, y, size, size),
        )
    }

    pub fn property_label(&self, row: usize) -> Vec2 {
        let (minus, _) = self.property_buttons(row);
        vec2(self.properties.x + 10.0, minus.y + 18.0)
    }

    /// Tile brush buttons along the top of the palette panel.
    pub fn brush_button(&self, index: usize) -> Rect {
        let w = (self.palette.w - 4.0 * BUTTON_SPACING) / 3.0;
        Rect::new(
            self.palette.x + BUTTON_SPACING + index as f32 * (w + BUTTON_SPACING),
            self.palette.y + BUTTON_SPACING,
            w,
            BUTTON_HEIGHT,
        )
    }

    /// `(previous, next)` page buttons for one of the two paged catalogs.
    pub fn page_buttons(&self, slot: usize) -> (Rect, Rect) {
        let y = self.palette.y + BUTTON_SPACING * 2.0 + BUTTON_HEIGHT;
        let x = self.palette.x + BUTTON_SPACING + slot as f32 * (self.palette.w / 2.0);
        (
            Rect::new(x, y, BUTTON_HEIGHT, BUTTON_HEIGHT),
            Rect::new(x + 110.0, y, BUTTON_HEIGHT, BUTTON_HEIGHT),
        )
    }

    /// Top-left corner of the palette entries.
    pub fn palette_origin(&self) -> Vec2 {
        vec2(
            self.palette.x + 10.0,
            self.palette.y + BUTTON_SPACING * 3.0 + BUTTON_HEIGHT * 2.0 + 8.0,
        )
    }
}
