use std::iter;

use crate::cell::Cell;
use crate::position::{CellRef, Position};

mod parse;
pub use parse::{CellRecord, LayerHeader, LevelFile};

pub const LAYER_COUNT: usize = 7;

/// Allowed range of grid dimensions.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GridBounds {
    pub min_rows: usize,
    pub max_rows: usize,
    pub min_columns: usize,
    pub max_columns: usize,
}

impl Default for GridBounds {
    fn default() -> Self {
        Self {
            min_rows: 14,
            max_rows: 40,
            min_columns: 18,
            max_columns: 400,
        }
    }
}

impl GridBounds {
    pub fn clamp_rows(&self, rows: usize) -> usize {
        rows.clamp(self.min_rows, self.max_rows)
    }

    pub fn clamp_columns(&self, columns: usize) -> usize {
        columns.clamp(self.min_columns, self.max_columns)
    }
}

#[derive(Clone, Debug)]
pub struct Layer {
    name: String,
    visible: bool,
    cells: Vec<Cell>,
}

impl Layer {
    fn new(name: String, len: usize) -> Self {
        Self {
            name,
            visible: true,
            cells: iter::repeat_with(Cell::blank).take(len).collect(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub(crate) fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }
}

/// All layers of a level. Every layer holds exactly `rows * columns` cells,
/// stored row-major.
#[derive(Clone, Debug)]
pub struct Grid {
    layers: Vec<Layer>,
    rows: usize,
    columns: usize,
    bounds: GridBounds,
}

impl Grid {
    pub fn new(rows: usize, columns: usize, bounds: GridBounds) -> Self {
        Self::with_layers(rows, columns, bounds, LAYER_COUNT)
    }

    pub fn with_layers(rows: usize, columns: usize, bounds: GridBounds, layers: usize) -> Self {
        let layers = (0..layers)
            .map(|i| Layer::new(format!("Layer {}", i + 1), rows * columns))
            .collect();
        Self {
            layers,
            rows,
            columns,
            bounds,
        }
    }

    pub fn create_empty() -> Self {
        let bounds = GridBounds::default();
        Self::new(bounds.min_rows, bounds.min_columns, bounds)
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// `(rows, columns)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.columns)
    }

    pub fn bounds(&self) -> GridBounds {
        self.bounds
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub(crate) fn layer_mut(&mut self, index: usize) -> Option<&mut Layer> {
        self.layers.get_mut(index)
    }

    pub fn at(&self, cell: CellRef) -> Option<&Cell> {
        if !cell.pos.in_bounds(self.dimensions()) {
            return None;
        }
        let index = cell.pos.index(self.columns);
        self.layers.get(cell.layer)?.cells.get(index)
    }

    pub fn at_mut(&mut self, cell: CellRef) -> Option<&mut Cell> {
        if !cell.pos.in_bounds(self.dimensions()) {
            return None;
        }
        let index = cell.pos.index(self.columns);
        self.layers.get_mut(cell.layer)?.cells.get_mut(index)
    }

    /// Every cell of one layer with its position.
    pub fn entries(&self, layer: usize) -> impl Iterator<Item = (Position, &Cell)> {
        let columns = self.columns;
        self.layers
            .get(layer)
            .into_iter()
            .flat_map(|l| l.cells.iter().enumerate())
            .map(move |(i, cell)| (Position::from_index(i, columns), cell))
    }

    /// Resizes every layer, keeping each surviving cell's content.
    ///
    /// Rows are added or removed at the top, so existing content stays
    /// anchored to the bottom of the map. Columns are added or removed at
    /// the right. Targets must already be within bounds. Returns `false` if
    /// the dimensions are unchanged.
    pub fn resize(&mut self, new_rows: usize, new_columns: usize) -> bool {
        if (new_rows, new_columns) == self.dimensions() {
            return false;
        }
        let (old_rows, old_columns) = self.dimensions();
        for layer in &mut self.layers {
            let cells = std::mem::take(&mut layer.cells);
            let cells = relocate_rows(cells, old_rows, new_rows, old_columns);
            layer.cells = relocate_columns(cells, new_rows, old_columns, new_columns);
            assert_eq!(layer.cells.len(), new_rows * new_columns);
        }
        self.rows = new_rows;
        self.columns = new_columns;
        log::debug!("resized grid from {old_rows}x{old_columns} to {new_rows}x{new_columns}");
        true
    }

    /// Where the cell at `pos` ends up after a resize from `old` to `new`
    /// dimensions, or `None` if it is dropped.
    pub fn relocate(pos: Position, old: (usize, usize), new: (usize, usize)) -> Option<Position> {
        let row = (pos.row + new.0).checked_sub(old.0)?;
        let moved = Position::new(row, pos.column);
        moved.in_bounds(new).then_some(moved)
    }
}

fn relocate_rows(mut cells: Vec<Cell>, old_rows: usize, new_rows: usize, columns: usize) -> Vec<Cell> {
    if new_rows >= old_rows {
        let added = (new_rows - old_rows) * columns;
        let mut out = Vec::with_capacity(new_rows * columns);
        out.extend(iter::repeat_with(Cell::blank).take(added));
        out.append(&mut cells);
        out
    } else {
        cells.drain(..(old_rows - new_rows) * columns);
        cells
    }
}

fn relocate_columns(cells: Vec<Cell>, rows: usize, old_columns: usize, new_columns: usize) -> Vec<Cell> {
    if old_columns == new_columns {
        return cells;
    }
    let mut out = Vec::with_capacity(rows * new_columns);
    let mut old = cells.into_iter();
    for _ in 0..rows {
        out.extend(old.by_ref().take(old_columns.min(new_columns)));
        if new_columns > old_columns {
            out.extend(iter::repeat_with(Cell::blank).take(new_columns - old_columns));
        } else {
            old.by_ref().take(old_columns - new_columns).for_each(drop);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::{CellKind, CollisionType};

    fn marker(layer: usize, pos: Position) -> Cell {
        Cell::textured(format!("{layer}:{}:{}", pos.row, pos.column), CellKind::Tile)
            .with_collision(CollisionType::Solid)
    }

    /// Fills every cell of every layer with a marker naming its position.
    fn marked_grid(rows: usize, columns: usize) -> Grid {
        let mut grid = Grid::new(rows, columns, GridBounds::default());
        for layer in 0..grid.layer_count() {
            for row in 0..rows {
                for column in 0..columns {
                    let pos = Position::new(row, column);
                    *grid.at_mut(CellRef::new(layer, pos)).unwrap() = marker(layer, pos);
                }
            }
        }
        grid
    }

    fn assert_layer_lengths(grid: &Grid) {
        for layer in grid.layers() {
            assert_eq!(layer.cells().len(), grid.rows() * grid.columns());
        }
    }

    #[test]
    fn new_grid_is_blank() {
        let grid = Grid::create_empty();
        assert_eq!(grid.dimensions(), (14, 18));
        assert_eq!(grid.layer_count(), LAYER_COUNT);
        assert!(grid.layers().iter().all(|l| l.cells().iter().all(Cell::is_blank)));
        assert_layer_lengths(&grid);
    }

    #[test]
    fn unchanged_dimensions_do_nothing() {
        let mut grid = marked_grid(14, 18);
        assert!(!grid.resize(14, 18));
        let pos = Position::new(3, 4);
        assert_eq!(grid.at(CellRef::new(0, pos)), Some(&marker(0, pos)));
    }

    #[test]
    fn growing_rows_adds_blank_rows_at_top() {
        let mut grid = marked_grid(14, 18);
        assert!(grid.resize(17, 18));
        assert_layer_lengths(&grid);
        for layer in 0..LAYER_COUNT {
            for row in 0..3 {
                for column in 0..18 {
                    let cell = grid.at(CellRef::new(layer, Position::new(row, column))).unwrap();
                    assert!(cell.is_blank());
                }
            }
            for row in 0..14 {
                for column in 0..18 {
                    let old = Position::new(row, column);
                    let new = Position::new(row + 3, column);
                    assert_eq!(grid.at(CellRef::new(layer, new)), Some(&marker(layer, old)));
                }
            }
        }
    }

    #[test]
    fn shrinking_rows_drops_top_rows() {
        let mut grid = marked_grid(20, 18);
        grid.resize(15, 18);
        assert_layer_lengths(&grid);
        let old = Position::new(5, 7);
        assert_eq!(grid.at(CellRef::new(2, Position::new(0, 7))), Some(&marker(2, old)));
        let old = Position::new(19, 17);
        assert_eq!(grid.at(CellRef::new(2, Position::new(14, 17))), Some(&marker(2, old)));
    }

    #[test]
    fn growing_columns_appends_at_right() {
        let mut grid = marked_grid(14, 18);
        grid.resize(14, 21);
        assert_layer_lengths(&grid);
        for row in 0..14 {
            for column in 0..21 {
                let pos = Position::new(row, column);
                let cell = grid.at(CellRef::new(0, pos)).unwrap();
                if column < 18 {
                    assert_eq!(cell, &marker(0, pos));
                } else {
                    assert!(cell.is_blank());
                }
            }
        }
    }

    #[test]
    fn shrinking_columns_drops_right_columns() {
        let mut grid = marked_grid(14, 25);
        grid.resize(14, 19);
        assert_layer_lengths(&grid);
        for row in 0..14 {
            for column in 0..19 {
                let pos = Position::new(row, column);
                assert_eq!(grid.at(CellRef::new(6, pos)), Some(&marker(6, pos)));
            }
        }
    }

    #[test]
    fn rows_and_columns_change_together() {
        let mut grid = marked_grid(16, 20);
        grid.resize(18, 19);
        assert_layer_lengths(&grid);
        for row in 0..16 {
            for column in 0..19 {
                let old = Position::new(row, column);
                let new = Position::new(row + 2, column);
                assert_eq!(grid.at(CellRef::new(1, new)), Some(&marker(1, old)));
            }
        }

        let mut grid = marked_grid(16, 20);
        grid.resize(14, 22);
        assert_layer_lengths(&grid);
        for row in 2..16 {
            for column in 0..20 {
                let old = Position::new(row, column);
                let new = Position::new(row - 2, column);
                assert_eq!(grid.at(CellRef::new(1, new)), Some(&marker(1, old)));
            }
            assert!(grid.at(CellRef::new(1, Position::new(row - 2, 21))).unwrap().is_blank());
        }
    }

    #[test]
    fn grow_then_shrink_restores_content() {
        let original = marked_grid(14, 18);
        let mut grid = original.clone();
        for (rows, columns) in [(30, 18), (30, 100), (14, 100), (40, 400), (14, 18)] {
            grid.resize(rows, columns);
            assert_layer_lengths(&grid);
        }
        for layer in 0..LAYER_COUNT {
            assert_eq!(grid.layer(layer).unwrap().cells(), original.layer(layer).unwrap().cells());
        }
    }

    #[test]
    fn relocate_matches_resize() {
        let old = (16, 20);
        assert_eq!(
            Grid::relocate(Position::new(0, 3), old, (18, 20)),
            Some(Position::new(2, 3))
        );
        assert_eq!(Grid::relocate(Position::new(1, 3), old, (14, 20)), None);
        assert_eq!(
            Grid::relocate(Position::new(2, 3), old, (14, 20)),
            Some(Position::new(0, 3))
        );
        assert_eq!(Grid::relocate(Position::new(5, 19), old, (16, 18)), None);
    }

    #[test]
    fn out_of_range_lookups_are_none() {
        let grid = Grid::create_empty();
        assert!(grid.at(CellRef::new(0, Position::new(14, 0))).is_none());
        assert!(grid.at(CellRef::new(LAYER_COUNT, Position::new(0, 0))).is_none());
    }

    #[test]
    fn entries_walk_row_major() {
        let grid = marked_grid(14, 18);
        let entries: Vec<_> = grid.entries(3).collect();
        assert_eq!(entries.len(), 14 * 18);
        assert_eq!(entries[19].0, Position::new(1, 1));
        assert_eq!(entries[19].1, &marker(3, Position::new(1, 1)));
    }
}
