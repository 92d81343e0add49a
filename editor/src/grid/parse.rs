use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::cell::{Cell, CellKind, CollisionType, Rgb, Visual};
use crate::error::LevelIoError;
use crate::metadata::LevelMetadata;
use crate::position::{CellRef, Position};

use super::Grid;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LayerHeader {
    pub name: String,
    pub visible: bool,
}

/// The JSON half of a saved level.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct LevelFile {
    #[serde(flatten)]
    pub metadata: LevelMetadata,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub layers: Vec<LayerHeader>,
}

impl LevelFile {
    pub fn new(metadata: &LevelMetadata, grid: &Grid) -> Self {
        let layers = grid
            .layers()
            .iter()
            .map(|l| LayerHeader {
                name: l.name().to_string(),
                visible: l.is_visible(),
            })
            .collect();
        Self {
            metadata: metadata.clone(),
            layers,
        }
    }

    /// Parses and clamps every metadata value into range.
    pub fn parse(json_str: &str) -> Result<Self, LevelIoError> {
        let mut file: LevelFile = serde_json::from_str(json_str)?;
        file.metadata.sanitize(&Default::default());
        Ok(file)
    }

    pub fn to_json(&self) -> Result<String, LevelIoError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// One non-blank cell in the CSV half of a saved level.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct CellRecord {
    pub layer: usize,
    pub row: usize,
    pub column: usize,
    pub kind: CellKind,
    pub collision: CollisionType,
    pub visible: bool,
    pub texture: Option<String>,
    pub color: Option<String>,
    pub alpha: f32,
    pub offset_x: f32,
    pub offset_y: f32,
}

impl CellRecord {
    fn new(at: CellRef, cell: &Cell) -> Self {
        let (texture, color) = match cell.visual() {
            Visual::Texture { key, .. } => (Some(key.clone()), None),
            Visual::Color { color, .. } => (None, Some(color.to_hex())),
        };
        let (offset_x, offset_y) = cell.draw_offset();
        Self {
            layer: at.layer,
            row: at.pos.row,
            column: at.pos.column,
            kind: cell.kind(),
            collision: cell.collision(),
            visible: cell.is_visible(),
            texture,
            color,
            alpha: cell.visual().alpha(),
            offset_x,
            offset_y,
        }
    }

    fn to_cell(&self, line: usize) -> Result<Cell, LevelIoError> {
        let malformed = |reason: &str| LevelIoError::MalformedCell {
            line,
            reason: reason.to_string(),
        };
        let alpha = self.alpha.clamp(0.0, 1.0);
        let visual = match (&self.texture, &self.color) {
            (Some(key), None) => Visual::Texture {
                key: key.clone(),
                alpha,
            },
            (None, Some(hex)) => Visual::Color {
                color: Rgb::from_hex(hex).ok_or_else(|| malformed("bad color"))?,
                alpha,
            },
            _ => return Err(malformed("expected exactly one of texture or color")),
        };
        Ok(Cell::from_parts(
            visual,
            self.kind,
            self.collision,
            self.visible,
            (self.offset_x, self.offset_y),
        ))
    }
}

impl Grid {
    pub fn records(&self) -> impl Iterator<Item = CellRecord> + '_ {
        (0..self.layer_count()).flat_map(move |layer| {
            self.entries(layer)
                .filter(|(_, cell)| !cell.is_blank())
                .map(move |(pos, cell)| CellRecord::new(CellRef::new(layer, pos), cell))
        })
    }

    pub fn to_csv(&self) -> Result<String, LevelIoError> {
        let mut writer = WriterBuilder::new().has_headers(true).from_writer(Vec::new());
        for record in self.records() {
            writer.serialize(record)?;
        }
        let bytes = writer.into_inner().map_err(|e| e.into_error())?;
        String::from_utf8(bytes).map_err(|e| LevelIoError::Io(std::io::Error::other(e)))
    }

    pub fn from_csv_and_level(csv_str: &str, file: &LevelFile) -> Result<Self, LevelIoError> {
        let (rows, columns) = file.metadata.dimensions();
        let mut grid = Grid::new(rows, columns, Default::default());
        for (layer, header) in grid.layers.iter_mut().zip(&file.layers) {
            layer.set_name(header.name.clone());
            layer.set_visible(header.visible);
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(false)
            .from_reader(csv_str.as_bytes());

        for (i, result) in reader.deserialize::<CellRecord>().enumerate() {
            // Line 1 is the header.
            let line = i + 2;
            let record = result?;
            let at = CellRef::new(record.layer, Position::new(record.row, record.column));
            let cell = record.to_cell(line)?;
            let slot = grid.at_mut(at).ok_or(LevelIoError::OutOfBounds {
                line,
                layer: record.layer,
                row: record.row,
                column: record.column,
            })?;
            *slot = cell;
        }
        Ok(grid)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_grid() -> (LevelMetadata, Grid) {
        let mut meta = LevelMetadata::new("1-1");
        let bounds = Default::default();
        meta.set_rows(16, &bounds);
        meta.set_columns(30, &bounds);
        meta.set_music_id(4);
        let mut grid = Grid::new(16, 30, bounds);
        grid.layer_mut(2).unwrap().set_visible(false);

        let ground = Cell::textured("A1", CellKind::Tile).with_collision(CollisionType::Solid);
        *grid.at_mut(CellRef::new(0, Position::new(15, 0))).unwrap() = ground;
        let water = Cell::colored(Rgb::new(0, 64, 255), 0.5);
        *grid.at_mut(CellRef::new(2, Position::new(10, 29))).unwrap() = water;
        let mario = Cell::textured("marioR", CellKind::PlayerStart)
            .with_collision(CollisionType::Solid)
            .with_draw_offset(0.0, -8.0);
        *grid.at_mut(CellRef::new(0, Position::new(14, 1))).unwrap() = mario;
        (meta, grid)
    }

    #[test]
    fn only_non_blank_cells_are_written() {
        let (_, grid) = sample_grid();
        let records: Vec<_> = grid.records().collect();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].row, 14);
        assert_eq!(records[0].texture.as_deref(), Some("marioR"));
        assert_eq!(records[2].color.as_deref(), Some("#0040ff"));
    }

    #[test]
    fn saved_level_loads_back() {
        let (meta, grid) = sample_grid();
        let json = LevelFile::new(&meta, &grid).to_json().unwrap();
        let csv = grid.to_csv().unwrap();

        let file = LevelFile::parse(&json).unwrap();
        assert_eq!(file.metadata, meta);
        let loaded = Grid::from_csv_and_level(&csv, &file).unwrap();
        assert_eq!(loaded.dimensions(), (16, 30));
        assert!(!loaded.layer(2).unwrap().is_visible());
        for layer in 0..grid.layer_count() {
            assert_eq!(loaded.layer(layer).unwrap().cells(), grid.layer(layer).unwrap().cells());
        }
    }

    #[test]
    fn record_outside_grid_is_rejected() {
        let file = LevelFile::parse(r#"{"name":"tiny"}"#).unwrap();
        let csv = "layer,row,column,kind,collision,visible,texture,color,alpha,offset_x,offset_y\n\
                   0,14,0,Tile,Solid,true,A1,,1.0,0.0,0.0\n";
        let err = Grid::from_csv_and_level(csv, &file).unwrap_err();
        assert!(matches!(err, LevelIoError::OutOfBounds { line: 2, row: 14, .. }));
    }

    #[test]
    fn record_needs_one_visual() {
        let file = LevelFile::parse(r#"{"name":"tiny"}"#).unwrap();
        let csv = "layer,row,column,kind,collision,visible,texture,color,alpha,offset_x,offset_y\n\
                   0,0,0,Tile,Solid,true,A1,#ffffff,1.0,0.0,0.0\n";
        let err = Grid::from_csv_and_level(csv, &file).unwrap_err();
        assert!(matches!(err, LevelIoError::MalformedCell { line: 2, .. }));
    }
}
