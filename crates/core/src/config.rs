//! Engine configuration.
//!
//! Every constant of the reference game is a field here, defaulting to the
//! reference value. Configurations are checked once, when an engine is built;
//! a bad configuration is never discovered mid-game.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::grid::{Grid, Offset};
use crate::pieces::{get_shape, get_spawn_shape, Shape};
use crate::types::{
    Cell, PieceKind, DEFAULT_BUFFER_ROWS, DEFAULT_HEIGHT, DEFAULT_LINES_PER_LEVEL,
    DEFAULT_QUEUE_DEPTH, DEFAULT_SPAWN_X, DEFAULT_SPAWN_Y, DEFAULT_WIDTH, EMPTY,
};

/// Color id written into the grid for each piece kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColorMap([Cell; 7]);

impl ColorMap {
    /// Ids indexed in [`PieceKind::ALL`] order
    pub const fn new(ids: [Cell; 7]) -> Self {
        Self(ids)
    }

    pub fn color_id(&self, kind: PieceKind) -> Cell {
        self.0[kind.index()]
    }

    /// Piece kind owning a grid cell value
    pub fn kind_for(&self, id: Cell) -> Option<PieceKind> {
        PieceKind::ALL
            .into_iter()
            .find(|&kind| id != EMPTY && self.color_id(kind) == id)
    }

    /// Catalog shape at `index`, painted with this map's color
    pub fn shape(&self, kind: PieceKind, index: usize) -> Shape {
        get_shape(kind, index).recolor(self.color_id(kind))
    }

    pub fn spawn_shape(&self, kind: PieceKind) -> Shape {
        get_spawn_shape(kind).recolor(self.color_id(kind))
    }

    fn validate(&self) -> Result<(), ConfigError> {
        for (i, &id) in self.0.iter().enumerate() {
            if id == EMPTY {
                return Err(ConfigError::ZeroColorId(PieceKind::ALL[i]));
            }
            if self.0[..i].contains(&id) {
                return Err(ConfigError::DuplicateColorId(id));
            }
        }
        Ok(())
    }
}

impl Default for ColorMap {
    fn default() -> Self {
        Self(PieceKind::ALL.map(PieceKind::color_id))
    }
}

/// When a hard drop earns its per-row bonus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum HardDropBonus {
    /// Only if the lock cleared at least one line (reference behavior)
    #[default]
    OnLineClear,
    /// On every hard drop
    Always,
    /// Never
    Never,
}

impl HardDropBonus {
    pub fn awards(self, lines_removed: usize) -> bool {
        match self {
            HardDropBonus::OnLineClear => lines_removed > 0,
            HardDropBonus::Always => true,
            HardDropBonus::Never => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub width: usize,
    /// Total rows, buffer rows included
    pub height: usize,
    /// Hidden rows at the top of the grid
    pub buffer_rows: usize,
    pub queue_depth: usize,
    /// Anchor (top-left of the 4x4 box) for every spawn and hold swap
    pub spawn: Offset,
    pub lines_per_level: u32,
    pub colors: ColorMap,
    pub hard_drop_bonus: HardDropBonus,
}

impl EngineConfig {
    /// Check every field; the first problem found is returned
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::ZeroDimension {
                width: self.width,
                height: self.height,
            });
        }
        if self.buffer_rows >= self.height {
            return Err(ConfigError::BufferRows {
                buffer_rows: self.buffer_rows,
                height: self.height,
            });
        }
        if self.queue_depth < 1 {
            return Err(ConfigError::QueueDepth);
        }
        if self.lines_per_level < 1 {
            return Err(ConfigError::LinesPerLevel);
        }
        self.colors.validate()?;

        // Every kind must fit at the spawn anchor on an empty grid
        let empty = Grid::new(self.width, self.height);
        for kind in PieceKind::ALL {
            if empty.intersects(&get_spawn_shape(kind), self.spawn.x, self.spawn.y) {
                return Err(ConfigError::SpawnOutOfBounds {
                    x: self.spawn.x,
                    y: self.spawn.y,
                    kind,
                    width: self.width,
                    height: self.height,
                });
            }
        }
        Ok(())
    }

    pub fn empty_grid(&self) -> Grid {
        Grid::new(self.width, self.height)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            buffer_rows: DEFAULT_BUFFER_ROWS,
            queue_depth: DEFAULT_QUEUE_DEPTH,
            spawn: Offset::new(DEFAULT_SPAWN_X, DEFAULT_SPAWN_Y),
            lines_per_level: DEFAULT_LINES_PER_LEVEL,
            colors: ColorMap::default(),
            hard_drop_bonus: HardDropBonus::default(),
        }
    }
}
