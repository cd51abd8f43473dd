//! Pieces module - the piece catalog
//!
//! Every piece kind owns a fixed table of 4x4 rotation states. I, S and Z have
//! two distinct states, O has one, J, L and T have four. Rotation indices wrap
//! modulo the state count, and increasing the index always spins the same way.
//!
//! There is no wall-kick table: a rotation is either legal at the unchanged
//! anchor or rejected.

use std::fmt;

use arrayvec::ArrayVec;
use serde::{Deserialize, Serialize};

use crate::types::{Cell, PieceKind, EMPTY, SHAPE_SIZE};

/// Rows of a rotation state, `SHAPE_SIZE` x `SHAPE_SIZE`
pub type ShapeRows = [[Cell; SHAPE_SIZE]; SHAPE_SIZE];

/// One rotation state of a piece
///
/// A `Shape` is a plain `Copy` value: handing one out can never expose the
/// catalog (or an engine) to mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Shape(ShapeRows);

impl Shape {
    pub const fn new(rows: ShapeRows) -> Self {
        Self(rows)
    }

    /// Cell at row `r`, column `c` (0 when out of the 4x4 box)
    pub fn get(&self, r: usize, c: usize) -> Cell {
        self.0
            .get(r)
            .and_then(|row| row.get(c))
            .copied()
            .unwrap_or(EMPTY)
    }

    pub fn rows(&self) -> &ShapeRows {
        &self.0
    }

    /// Occupied cells as `(row, col)` pairs, row-major
    pub fn cells(&self) -> ArrayVec<(usize, usize), 16> {
        let mut out = ArrayVec::new();
        for (r, row) in self.0.iter().enumerate() {
            for (c, &cell) in row.iter().enumerate() {
                if cell != EMPTY {
                    out.push((r, c));
                }
            }
        }
        out
    }

    /// Color id of the occupied cells, `None` for an empty shape
    pub fn color_id(&self) -> Option<Cell> {
        self.0.iter().flatten().copied().find(|&cell| cell != EMPTY)
    }

    /// Same occupancy with every occupied cell set to `id`
    pub fn recolor(&self, id: Cell) -> Self {
        let mut rows = self.0;
        for cell in rows.iter_mut().flatten() {
            if *cell != EMPTY {
                *cell = id;
            }
        }
        Self(rows)
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.0 {
            for &cell in row {
                if cell == EMPTY {
                    write!(f, ".")?;
                } else {
                    write!(f, "{}", cell)?;
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

const I_STATES: [Shape; 2] = [
    Shape::new([[0, 0, 0, 0], [1, 1, 1, 1], [0, 0, 0, 0], [0, 0, 0, 0]]),
    Shape::new([[0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0], [0, 1, 0, 0]]),
];

const J_STATES: [Shape; 4] = [
    Shape::new([[0, 0, 0, 0], [2, 2, 2, 0], [0, 0, 2, 0], [0, 0, 0, 0]]),
    Shape::new([[0, 0, 0, 0], [0, 2, 2, 0], [0, 2, 0, 0], [0, 2, 0, 0]]),
    Shape::new([[0, 0, 0, 0], [0, 2, 0, 0], [0, 2, 2, 2], [0, 0, 0, 0]]),
    Shape::new([[0, 0, 2, 0], [0, 0, 2, 0], [0, 2, 2, 0], [0, 0, 0, 0]]),
];

const L_STATES: [Shape; 4] = [
    Shape::new([[0, 0, 0, 0], [0, 3, 3, 3], [0, 3, 0, 0], [0, 0, 0, 0]]),
    Shape::new([[0, 0, 0, 0], [0, 3, 3, 0], [0, 0, 3, 0], [0, 0, 3, 0]]),
    Shape::new([[0, 0, 0, 0], [0, 0, 3, 0], [3, 3, 3, 0], [0, 0, 0, 0]]),
    Shape::new([[0, 3, 0, 0], [0, 3, 0, 0], [0, 3, 3, 0], [0, 0, 0, 0]]),
];

const O_STATES: [Shape; 1] = [Shape::new([
    [0, 0, 0, 0],
    [0, 4, 4, 0],
    [0, 4, 4, 0],
    [0, 0, 0, 0],
])];

const S_STATES: [Shape; 2] = [
    Shape::new([[0, 0, 0, 0], [0, 5, 5, 0], [5, 5, 0, 0], [0, 0, 0, 0]]),
    Shape::new([[5, 0, 0, 0], [5, 5, 0, 0], [0, 5, 0, 0], [0, 0, 0, 0]]),
];

const T_STATES: [Shape; 4] = [
    Shape::new([[0, 0, 0, 0], [6, 6, 6, 0], [0, 6, 0, 0], [0, 0, 0, 0]]),
    Shape::new([[0, 6, 0, 0], [0, 6, 6, 0], [0, 6, 0, 0], [0, 0, 0, 0]]),
    Shape::new([[0, 6, 0, 0], [6, 6, 6, 0], [0, 0, 0, 0], [0, 0, 0, 0]]),
    Shape::new([[0, 6, 0, 0], [6, 6, 0, 0], [0, 6, 0, 0], [0, 0, 0, 0]]),
];

const Z_STATES: [Shape; 2] = [
    Shape::new([[0, 0, 0, 0], [7, 7, 0, 0], [0, 7, 7, 0], [0, 0, 0, 0]]),
    Shape::new([[0, 7, 0, 0], [7, 7, 0, 0], [7, 0, 0, 0], [0, 0, 0, 0]]),
];

/// All rotation states of a piece kind, in spin order
pub fn rotations(kind: PieceKind) -> &'static [Shape] {
    match kind {
        PieceKind::I => &I_STATES,
        PieceKind::J => &J_STATES,
        PieceKind::L => &L_STATES,
        PieceKind::O => &O_STATES,
        PieceKind::S => &S_STATES,
        PieceKind::T => &T_STATES,
        PieceKind::Z => &Z_STATES,
    }
}

/// Number of distinct rotation states
pub fn rotation_count(kind: PieceKind) -> usize {
    rotations(kind).len()
}

/// Rotation state at `index`, wrapping modulo the state count
pub fn get_shape(kind: PieceKind, index: usize) -> Shape {
    let states = rotations(kind);
    states[index % states.len()]
}

/// Rotation state 0, used for spawning, previews and the hold slot
pub fn get_spawn_shape(kind: PieceKind) -> Shape {
    get_shape(kind, 0)
}
