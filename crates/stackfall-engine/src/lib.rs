pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("shape index {_0} out of range (expected 0..=6)")]
pub struct InvalidShapeIndex(#[error(not(source))] pub usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum SpawnError {
    #[display("a piece is already falling")]
    PieceInFlight,
    #[display("spawned piece overwrote {overwritten} locked cell(s)")]
    Overflow { overwritten: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ConfigError {
    #[display("board needs at least {min} rows, got {rows}")]
    TooFewRows { rows: usize, min: usize },
    #[display("board needs at least {min} columns, got {cols}")]
    TooFewCols { cols: usize, min: usize },
    #[display("board of {rows}x{cols} exceeds {max_cells} cells")]
    TooLarge {
        rows: usize,
        cols: usize,
        max_cells: usize,
    },
    #[display("descent interval must be non-zero")]
    ZeroDescentInterval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum ParseSeedError {
    #[display("expected 32 hex digits, got {_0} characters")]
    Length(#[error(not(source))] usize),
    #[display("seed contains a non-hex character")]
    Digit,
}
