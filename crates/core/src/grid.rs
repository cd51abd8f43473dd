//! Grid module - the playfield matrix
//!
//! The grid is `height x width` cells stored in one flat row-major array.
//! Coordinates: (x, y) where x runs left to right and y runs top to bottom.
//! With the reference 25x10 grid the top 2 rows are an off-screen spawn
//! buffer: they collide like every other row but are never rendered.
//!
//! `merge` and `clear_full_rows` are pure: they return new grids and leave
//! their input untouched. The engine swaps the result in.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::GridError;
use crate::pieces::Shape;
use crate::scoring::line_clear_bonus;
use crate::types::{Cell, EMPTY};

/// A grid coordinate, used for piece anchors and ghost positions
///
/// Anchors may be negative or past the edge while a move is being checked,
/// so both axes are signed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn translated(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Result of one `clear_full_rows` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClearResult {
    /// Number of full rows removed
    pub lines_removed: usize,
    /// Grid after compaction
    pub grid: Grid,
    /// `50 * n * n` for `n` removed rows
    pub score_bonus: i64,
    /// Indices of the removed rows in the pre-clear grid, top to bottom
    pub cleared_rows: Vec<usize>,
}

/// The playfield
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    /// Flat array of cells, row-major order (y * width + x)
    cells: Vec<Cell>,
}

impl Grid {
    /// Create an empty grid
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![EMPTY; width * height],
        }
    }

    /// Build a grid from rows, top row first
    pub fn from_rows<R: AsRef<[Cell]>>(rows: &[R]) -> Result<Self, GridError> {
        let expected = rows.first().map(|r| r.as_ref().len()).unwrap_or(0);
        if expected == 0 {
            return Err(GridError::Empty);
        }

        let mut cells = Vec::with_capacity(expected * rows.len());
        for (row, cells_in_row) in rows.iter().enumerate() {
            let cells_in_row = cells_in_row.as_ref();
            if cells_in_row.len() != expected {
                return Err(GridError::RaggedRow {
                    row,
                    len: cells_in_row.len(),
                    expected,
                });
            }
            cells.extend_from_slice(cells_in_row);
        }

        Ok(Self {
            width: expected,
            height: rows.len(),
            cells,
        })
    }

    /// Calculate flat index from (x, y) coordinates
    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        self.index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match self.index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Cells of row `y`, or None past the bottom
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= self.height {
            return None;
        }
        let start = y * self.width;
        Some(&self.cells[start..start + self.width])
    }

    /// Rows top to bottom
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        // chunks(0) panics; a zero-width grid has no cells anyway
        self.cells.chunks(self.width.max(1))
    }

    /// Rows below the spawn buffer, top to bottom
    pub fn visible_rows(&self, buffer_rows: usize) -> impl Iterator<Item = &[Cell]> + '_ {
        self.rows().skip(buffer_rows)
    }

    pub fn to_rows(&self) -> Vec<Vec<Cell>> {
        self.rows().map(<[Cell]>::to_vec).collect()
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        self.row(y)
            .map(|row| row.iter().all(|&cell| cell != EMPTY))
            .unwrap_or(false)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.iter().all(|&cell| cell == EMPTY)
    }

    /// Whether `shape` anchored at (x, y) hits an occupied cell or leaves the grid
    ///
    /// Occupied shape cell (r, c) maps to grid cell (x + c, y + r). Stops at the
    /// first offending cell.
    pub fn intersects(&self, shape: &Shape, x: i32, y: i32) -> bool {
        shape.cells().iter().any(|&(r, c)| {
            match cell_position(x, y, r, c).and_then(|(gx, gy)| self.index(gx, gy)) {
                Some(idx) => self.cells[idx] != EMPTY,
                None => true,
            }
        })
    }

    /// New grid with `shape` written at (x, y)
    ///
    /// Occupied shape cells keep their color id. Cells that would land outside
    /// the grid are dropped.
    pub fn merge(&self, shape: &Shape, x: i32, y: i32) -> Grid {
        let mut merged = self.clone();
        for (r, c) in shape.cells() {
            if let Some((gx, gy)) = cell_position(x, y, r, c) {
                merged.set(gx, gy, shape.get(r, c));
            }
        }
        merged
    }

    /// Remove every full row and compact the rest downward
    ///
    /// Non-full rows keep their relative order; each one moves down by the
    /// number of full rows below it, and the freed rows at the top are empty.
    /// Uses a two-pointer sweep from the bottom.
    pub fn clear_full_rows(&self) -> ClearResult {
        let width = self.width;
        let mut compacted = Grid::new(width, self.height);
        let mut cleared_rows = Vec::new();
        let mut write_y = self.height;

        for read_y in (0..self.height).rev() {
            if self.is_row_full(read_y) {
                cleared_rows.push(read_y);
            } else {
                write_y -= 1;
                let src = read_y * width;
                let dst = write_y * width;
                compacted.cells[dst..dst + width].copy_from_slice(&self.cells[src..src + width]);
            }
        }

        // Collected bottom to top
        cleared_rows.reverse();
        let lines_removed = cleared_rows.len();

        ClearResult {
            lines_removed,
            grid: compacted,
            score_bonus: line_clear_bonus(lines_removed),
            cleared_rows,
        }
    }
}

/// Grid coordinate of shape cell (r, c) anchored at (x, y), `None` on overflow
fn cell_position(x: i32, y: i32, r: usize, c: usize) -> Option<(i32, i32)> {
    Some((x.checked_add(c as i32)?, y.checked_add(r as i32)?))
}

impl Serialize for Grid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.rows())
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
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
