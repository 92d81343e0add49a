use std::ops::Range;

use macroquad::math::{Rect, Vec2, vec2};

use crate::cell::CELL_SIZE;
use crate::position::Position;

/// The fixed on-screen window onto the grid and how far it is scrolled.
#[derive(Clone, Debug)]
pub struct Viewport {
    origin: Vec2,
    visible_rows: usize,
    visible_columns: usize,
    row_offset: usize,
    column_offset: usize,
}

impl Viewport {
    /// Starts scrolled to the bottom-left corner of a grid with `dims`.
    pub fn new(origin: Vec2, visible_rows: usize, visible_columns: usize, dims: (usize, usize)) -> Self {
        let mut viewport = Self {
            origin,
            visible_rows,
            visible_columns,
            row_offset: dims.0,
            column_offset: 0,
        };
        viewport.clamp(dims);
        viewport
    }

    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub fn row_offset(&self) -> usize {
        self.row_offset
    }

    pub fn column_offset(&self) -> usize {
        self.column_offset
    }

    pub fn visible_rows(&self) -> usize {
        self.visible_rows
    }

    pub fn visible_columns(&self) -> usize {
        self.visible_columns
    }

    pub fn screen_rect(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.visible_columns as f32 * CELL_SIZE,
            self.visible_rows as f32 * CELL_SIZE,
        )
    }

    /// Rows and columns currently on screen, limited to the grid.
    pub fn visible_range(&self, dims: (usize, usize)) -> (Range<usize>, Range<usize>) {
        let rows = self.row_offset..(self.row_offset + self.visible_rows).min(dims.0);
        let columns = self.column_offset..(self.column_offset + self.visible_columns).min(dims.1);
        (rows, columns)
    }

    pub fn screen_to_cell(&self, point: Vec2, dims: (usize, usize)) -> Option<Position> {
        if !self.screen_rect().contains(point) {
            return None;
        }
        let local = (point - self.origin) / CELL_SIZE;
        let pos = Position::new(
            local.y.floor() as usize + self.row_offset,
            local.x.floor() as usize + self.column_offset,
        );
        pos.in_bounds(dims).then_some(pos)
    }

    /// Top-left screen corner of a cell, if it is on screen.
    pub fn cell_to_screen(&self, pos: Position, dims: (usize, usize)) -> Option<Vec2> {
        let (rows, columns) = self.visible_range(dims);
        if !rows.contains(&pos.row) || !columns.contains(&pos.column) {
            return None;
        }
        let local = vec2(
            (pos.column - self.column_offset) as f32,
            (pos.row - self.row_offset) as f32,
        );
        Some(self.origin + local * CELL_SIZE)
    }

    /// Negative deltas scroll up or left.
    pub fn scroll(&mut self, delta_rows: i32, delta_columns: i32, dims: (usize, usize)) {
        self.row_offset = self.row_offset.saturating_add_signed(delta_rows as isize);
        self.column_offset = self.column_offset.saturating_add_signed(delta_columns as isize);
        self.clamp(dims);
    }

    /// Keeps the same bottom rows on screen after rows are added or removed
    /// at the top of the grid.
    pub fn follow_resize(&mut self, old: (usize, usize), new: (usize, usize)) {
        self.row_offset = (self.row_offset + new.0).saturating_sub(old.0);
        self.clamp(new);
    }

    pub fn clamp(&mut self, dims: (usize, usize)) {
        self.row_offset = self.row_offset.min(dims.0.saturating_sub(self.visible_rows));
        self.column_offset = self
            .column_offset
            .min(dims.1.saturating_sub(self.visible_columns));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport(dims: (usize, usize)) -> Viewport {
        Viewport::new(vec2(16.0, 16.0), 14, 18, dims)
    }

    #[test]
    fn starts_at_bottom_left() {
        let view = viewport((30, 100));
        assert_eq!(view.row_offset(), 16);
        assert_eq!(view.column_offset(), 0);
        assert_eq!(viewport((14, 18)).row_offset(), 0);
    }

    #[test]
    fn maps_points_to_cells() {
        let view = viewport((14, 18));
        assert_eq!(view.screen_to_cell(vec2(16.0, 16.0), (14, 18)), Some(Position::new(0, 0)));
        assert_eq!(view.screen_to_cell(vec2(16.0 + 33.0, 16.0 + 70.0), (14, 18)), Some(Position::new(2, 1)));
        assert_eq!(view.screen_to_cell(vec2(10.0, 20.0), (14, 18)), None);
        assert_eq!(view.screen_to_cell(vec2(16.0 + 18.0 * 32.0, 20.0), (14, 18)), None);
    }

    #[test]
    fn mapping_includes_scroll() {
        let mut view = viewport((30, 100));
        view.scroll(-10, 5, (30, 100));
        let pos = view.screen_to_cell(vec2(16.0, 16.0), (30, 100)).unwrap();
        assert_eq!(pos, Position::new(6, 5));
        assert_eq!(view.cell_to_screen(pos, (30, 100)), Some(vec2(16.0, 16.0)));
        assert_eq!(view.cell_to_screen(Position::new(0, 0), (30, 100)), None);
    }

    #[test]
    fn scroll_stays_clamped() {
        let dims = (20, 40);
        let mut view = viewport(dims);
        let deltas = [(-100, 3), (2, -7), (50, 50), (-1, -1), (3, 0), (0, 1000)];
        for (dr, dc) in deltas {
            view.scroll(dr, dc, dims);
            assert!(view.row_offset() <= dims.0 - 14);
            assert!(view.column_offset() <= dims.1 - 18);
        }
        assert_eq!(view.column_offset(), 22);
    }

    #[test]
    fn resize_keeps_bottom_anchor() {
        let mut view = viewport((20, 18));
        assert_eq!(view.row_offset(), 6);
        view.follow_resize((20, 18), (25, 18));
        assert_eq!(view.row_offset(), 11);
        view.follow_resize((25, 18), (14, 18));
        assert_eq!(view.row_offset(), 0);

        let mut view = viewport((20, 60));
        view.scroll(0, 42, (20, 60));
        view.follow_resize((20, 60), (20, 30));
        assert_eq!(view.column_offset(), 12);
    }
}
