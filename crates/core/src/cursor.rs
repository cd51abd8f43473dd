//! Rotation cursor - the active piece kind and its rotation index.

use crate::config::ColorMap;
use crate::pieces::{rotation_count, Shape};
use crate::types::PieceKind;

/// Candidate rotation returned by [`RotationCursor::next_shape`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NextShape {
    pub shape: Shape,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RotationCursor {
    kind: PieceKind,
    index: usize,
    colors: ColorMap,
}

impl RotationCursor {
    pub fn new(kind: PieceKind, colors: ColorMap) -> Self {
        Self {
            kind,
            index: 0,
            colors,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Replace the piece; rotation restarts at 0
    pub fn set_piece(&mut self, kind: PieceKind) {
        self.kind = kind;
        self.index = 0;
    }

    pub fn current_shape(&self) -> Shape {
        self.colors.shape(self.kind, self.index)
    }

    /// The following rotation state, without moving the cursor
    pub fn next_shape(&self) -> NextShape {
        let index = (self.index + 1) % rotation_count(self.kind);
        NextShape {
            shape: self.colors.shape(self.kind, index),
            index,
        }
    }

    /// Set the index once a rotation has been checked
    pub fn commit_rotation(&mut self, index: usize) {
        self.index = index % rotation_count(self.kind);
    }
}
