//! Core types module - shared data structures and constants
//!
//! This module defines the fundamental types used throughout the workspace.
//! All types are plain data with no behavior beyond conversions, making them
//! usable in any context (simulation, replay tooling, presentation layers).
//!
//! # Grid Dimensions
//!
//! Reference playfield dimensions:
//!
//! - **Width**: 10 columns (indexed 0-9)
//! - **Height**: 25 rows (indexed 0-24), the top 2 of which are an off-screen
//!   spawn buffer that is collidable but never rendered
//! - **Spawn anchor**: (4, 1), the top-left corner of the piece's 4x4 box
//!
//! # Color Ids
//!
//! A grid cell is `0` when empty, otherwise the color id of the piece that
//! filled it:
//!
//! | Piece | Id |
//! |-------|----|
//! | I | 1 |
//! | J | 2 |
//! | L | 3 |
//! | O | 4 |
//! | S | 5 |
//! | T | 6 |
//! | Z | 7 |
//!
//! # Examples
//!
//! ```
//! use blockfall_types::{Command, PieceKind, DEFAULT_HEIGHT, DEFAULT_WIDTH};
//!
//! let piece = PieceKind::T;
//! assert_eq!(PieceKind::from_str("t"), Some(piece));
//! assert_eq!(piece.color_id(), 6);
//! assert_eq!(PieceKind::from_color_id(6), Some(PieceKind::T));
//!
//! assert_eq!(Command::from_str("hardDrop"), Some(Command::HardDrop));
//!
//! assert_eq!(DEFAULT_WIDTH, 10);
//! assert_eq!(DEFAULT_HEIGHT, 25);
//! ```

use serde::{Deserialize, Serialize};

/// Grid width in cells (10 columns)
pub const DEFAULT_WIDTH: usize = 10;

/// Grid height in cells, buffer rows included (25 rows)
pub const DEFAULT_HEIGHT: usize = 25;

/// Rows at the top of the grid that are collidable but not rendered
pub const DEFAULT_BUFFER_ROWS: usize = 2;

/// Number of pieces kept in the look-ahead queue
pub const DEFAULT_QUEUE_DEPTH: usize = 3;

/// Spawn anchor column
pub const DEFAULT_SPAWN_X: i32 = 4;

/// Spawn anchor row
pub const DEFAULT_SPAWN_Y: i32 = 1;

/// Lines needed to advance one level
pub const DEFAULT_LINES_PER_LEVEL: u32 = 10;

/// Points per line-clear unit; a clear of `n` rows is worth `LINE_CLEAR_UNIT * n * n`
pub const LINE_CLEAR_UNIT: i64 = 50;

/// Points for one user-initiated soft drop step
pub const SOFT_DROP_POINTS: i64 = 1;

/// Side length of every rotation state matrix
pub const SHAPE_SIZE: usize = 4;

/// Value of an empty grid cell
pub const EMPTY: Cell = 0;

/// A cell on the grid
///
/// - `0`: Empty cell
/// - `1..=7`: Cell filled by the piece kind with that color id
pub type Cell = u8;

/// The seven piece kinds
///
/// Declaration order matches the color ids: I=1, J=2, L=3, O=4, S=5, T=6, Z=7.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
}

impl PieceKind {
    /// All kinds in color-id order
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    /// Position of the kind in [`PieceKind::ALL`]
    pub fn index(self) -> usize {
        match self {
            PieceKind::I => 0,
            PieceKind::J => 1,
            PieceKind::L => 2,
            PieceKind::O => 3,
            PieceKind::S => 4,
            PieceKind::T => 5,
            PieceKind::Z => 6,
        }
    }

    /// Reference color id used in grid cells
    pub fn color_id(self) -> Cell {
        self.index() as Cell + 1
    }

    /// Inverse of [`PieceKind::color_id`]
    pub fn from_color_id(id: Cell) -> Option<Self> {
        match id {
            1..=7 => Some(Self::ALL[id as usize - 1]),
            _ => None,
        }
    }

    /// Parse piece kind from string (case-insensitive)
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_str("i"), Some(PieceKind::I));
    /// assert_eq!(PieceKind::from_str("O"), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    /// Convert to lowercase string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Z => "z",
        }
    }
}

/// Who asked for a one-row downward step
///
/// Only user-initiated steps earn soft drop points; gravity ticks from the
/// caller's timer earn nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DropOrigin {
    User,
    Timer,
}

/// Commands that can be applied to an engine
///
/// These are used by scripted replays, tests and any external controller.
/// Each command maps to one engine operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Command {
    /// Move piece one cell left
    MoveLeft,
    /// Move piece one cell right
    MoveRight,
    /// Advance to the next rotation state
    Rotate,
    /// User soft drop (one row, one point)
    SoftDrop,
    /// Gravity tick from the caller's clock (one row, no points)
    Tick,
    /// Drop to the ghost position and lock
    HardDrop,
    /// Hold or swap the active piece
    Hold,
    /// Reset everything and start over
    NewGame,
}

impl Command {
    /// Parse command from string
    ///
    /// # Examples
    ///
    /// ```
    /// use blockfall_types::Command;
    ///
    /// assert_eq!(Command::from_str("moveLeft"), Some(Command::MoveLeft));
    /// assert_eq!(Command::from_str("tick"), Some(Command::Tick));
    /// assert_eq!(Command::from_str("unknown"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Command::MoveLeft),
            "moveright" => Some(Command::MoveRight),
            "rotate" => Some(Command::Rotate),
            "softdrop" => Some(Command::SoftDrop),
            "tick" => Some(Command::Tick),
            "harddrop" => Some(Command::HardDrop),
            "hold" => Some(Command::Hold),
            "newgame" => Some(Command::NewGame),
            _ => None,
        }
    }

    /// Convert to camelCase string
    pub fn as_str(&self) -> &'static str {
        match self {
            Command::MoveLeft => "moveLeft",
            Command::MoveRight => "moveRight",
            Command::Rotate => "rotate",
            Command::SoftDrop => "softDrop",
            Command::Tick => "tick",
            Command::HardDrop => "hardDrop",
            Command::Hold => "hold",
            Command::NewGame => "newGame",
        }
    }

    /// Single-character script encoding used by replay scripts
    ///
    /// `l` left, `r` right, `u` rotate, `d` soft drop, `t` tick, `x` hard drop,
    /// `h` hold, `n` new game.
    pub fn from_script_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'l' => Some(Command::MoveLeft),
            'r' => Some(Command::MoveRight),
            'u' => Some(Command::Rotate),
            'd' => Some(Command::SoftDrop),
            't' => Some(Command::Tick),
            'x' => Some(Command::HardDrop),
            'h' => Some(Command::Hold),
            'n' => Some(Command::NewGame),
            _ => None,
        }
    }
}
