use serde::Serialize;

use crate::grid::Grid;
use crate::pieces::Shape;
use crate::types::PieceKind;

/// Whether the engine still accepts gameplay commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Status {
    Running,
    GameOver,
}

/// What a renderer needs for the falling piece
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct View {
    pub kind: PieceKind,
    pub rotation: usize,
    /// Active shape at its current rotation
    pub shape: Shape,
    pub x: i32,
    pub y: i32,
    pub ghost_x: i32,
    pub ghost_y: i32,
    /// First rotation state of the piece at the front of the queue
    pub next_shape: Shape,
}

/// Everything observable about an engine at one moment
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub grid: Grid,
    pub buffer_rows: usize,
    pub view: View,
    pub queue: Vec<PieceKind>,
    pub queue_shapes: Vec<Shape>,
    /// The piece after the queue
    pub upcoming: PieceKind,
    pub held: Option<PieceKind>,
    pub held_shape: Option<Shape>,
    pub can_hold: bool,
    pub score: i64,
    pub status: Status,
}

impl Snapshot {
    pub fn playable(&self) -> bool {
        self.status == Status::Running
    }
}
