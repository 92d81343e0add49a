use serde::{Deserialize, Serialize};

/// A (row, column) address in the grid. Row 0 is the top of the map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: usize,
    pub column: usize,
}

impl Position {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }

    /// `bounds` is `(rows, columns)`.
    pub fn in_bounds(self, bounds: (usize, usize)) -> bool {
        let (rows, columns) = bounds;
        self.row < rows && self.column < columns
    }

    pub(crate) fn index(self, columns: usize) -> usize {
        self.row * columns + self.column
    }

    pub(crate) fn from_index(index: usize, columns: usize) -> Self {
        Self {
            row: index / columns,
            column: index % columns,
        }
    }
}

/// A cell address on a specific layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellRef {
    pub layer: usize,
    pub pos: Position,
}

impl CellRef {
    pub fn new(layer: usize, pos: Position) -> Self {
        Self { layer, pos }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_is_row_major() {
        let pos = Position::new(2, 5);
        assert_eq!(pos.index(18), 41);
        assert_eq!(Position::from_index(41, 18), pos);
    }

    #[test]
    fn bounds_are_exclusive() {
        assert!(Position::new(13, 17).in_bounds((14, 18)));
        assert!(!Position::new(14, 0).in_bounds((14, 18)));
        assert!(!Position::new(0, 18).in_bounds((14, 18)));
    }
}
