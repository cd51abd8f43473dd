//! Error types for construction-time failures.
//!
//! Gameplay never produces errors: rejected moves and rotations are ordinary
//! `false` results. Only malformed configuration, malformed grids and empty
//! piece sequences are reported here, and always before a game starts.

use thiserror::Error;

/// Reasons an [`EngineConfig`](crate::config::EngineConfig) is rejected
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("grid must be at least 1x1, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },

    #[error("buffer rows ({buffer_rows}) must be fewer than grid height ({height})")]
    BufferRows { buffer_rows: usize, height: usize },

    #[error("queue depth must be at least 1")]
    QueueDepth,

    #[error("lines per level must be at least 1")]
    LinesPerLevel,

    #[error("spawn anchor ({x}, {y}) puts the {kind:?} piece outside a {width}x{height} grid")]
    SpawnOutOfBounds {
        x: i32,
        y: i32,
        kind: crate::types::PieceKind,
        width: usize,
        height: usize,
    },

    #[error("{0:?} is mapped to color id 0, which is reserved for empty cells")]
    ZeroColorId(crate::types::PieceKind),

    #[error("color id {0} is assigned to more than one piece kind")]
    DuplicateColorId(u8),

    #[error("starting grid is {actual_width}x{actual_height}, config expects {width}x{height}")]
    GridMismatch {
        width: usize,
        height: usize,
        actual_width: usize,
        actual_height: usize,
    },
}

/// Reasons a grid cannot be built from rows
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("grid has no rows or no columns")]
    Empty,

    #[error("row {row} has {len} cells, expected {expected}")]
    RaggedRow { row: usize, len: usize, expected: usize },
}

/// Reasons a piece source cannot be built
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SourceError {
    #[error("piece sequence must contain at least one piece")]
    EmptySequence,
}
