use thiserror::Error;

/// Failure to read or write a level's file pair.
#[derive(Debug, Error)]
pub enum LevelIoError {
    #[error("failed to access level file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse level metadata: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to parse cell table: {0}")]
    Csv(#[from] csv::Error),
    #[error("cell record {line} addresses layer {layer}, row {row}, column {column} outside the grid")]
    OutOfBounds {
        line: usize,
        layer: usize,
        row: usize,
        column: usize,
    },
    #[error("cell record {line} is malformed: {reason}")]
    MalformedCell { line: usize, reason: String },
}
