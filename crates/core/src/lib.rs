//! Core game logic - pure, deterministic, and testable
//!
//! This crate holds the rules and state of a falling-block puzzle game with
//! no rendering, timing or input code. The caller owns the clock and the
//! screen. It issues commands, reads back owned snapshots, and draws them
//! however it likes.
//!
//! # Module Structure
//!
//! - [`grid`]: the cell matrix with collision checks, merging and row clearing
//! - [`pieces`]: the seven piece kinds and their 4x4 rotation tables
//! - [`cursor`]: active piece kind plus rotation index
//! - [`rng`]: piece sources (seeded random, fixed sequence)
//! - [`score`]: score counter with change observers
//! - [`scoring`]: point and level rules
//! - [`engine`]: the state machine tying it all together
//! - [`snapshot`]: owned views handed to renderers
//!
//! # Game Rules
//!
//! - **Uniform pieces**: each piece is drawn independently, no 7-bag
//! - **Simple rotation**: the next table state at the same anchor, no wall kicks
//! - **Immediate lock**: a blocked downward step locks at once, no lock delay
//! - **Hold**: park one piece, at most once per spawned piece
//! - **Scoring**: `50 * n * n` per clear, 1 per user soft drop step, 1 per
//!   hard-dropped row when the drop clears a line
//!
//! # Example
//!
//! ```
//! use blockfall_core::{Engine, EngineConfig, RandomSource};
//! use blockfall_core::types::Command;
//!
//! let mut engine = Engine::new(EngineConfig::default(), RandomSource::new(12345)).unwrap();
//!
//! engine.apply(Command::MoveRight);
//! engine.apply(Command::Rotate);
//! let outcome = engine.apply(Command::HardDrop);
//!
//! // A hard drop always locks
//! assert!(outcome.lock().is_some());
//! assert!(!engine.grid().is_empty());
//! ```

pub mod config;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod grid;
pub mod pieces;
pub mod rng;
pub mod score;
pub mod scoring;
pub mod snapshot;

pub use blockfall_types as types;

// Re-export commonly used types for convenience
pub use config::{ColorMap, EngineConfig, HardDropBonus};
pub use cursor::{NextShape, RotationCursor};
pub use engine::{DropOutcome, Engine, HardDrop, LockEvent, Outcome};
pub use error::{ConfigError, GridError, SourceError};
pub use grid::{ClearResult, Grid, Offset};
pub use pieces::{get_shape, get_spawn_shape, rotation_count, Shape};
pub use rng::{PieceSource, RandomSource, SequenceSource};
pub use score::{Score, ScoreChange, SubscriptionId};
pub use scoring::{level_for_lines, line_clear_bonus, LevelTracker};
pub use snapshot::{Snapshot, Status, View};
