//! Engine module - the game state machine
//!
//! This module ties together the grid, the rotation cursor, the look-ahead
//! queue, the hold slot and the score. Every command runs to completion before
//! returning, including the lock → clear → score → spawn cascade, and every
//! query hands back owned values.
//!
//! Game over is entered only when a freshly spawned piece already overlaps
//! the grid. From then on every command except [`Engine::new_game`] is a
//! no-op that reports the current state.

use std::collections::VecDeque;

use log::{debug, info, trace};
use serde::Serialize;

use crate::config::EngineConfig;
use crate::cursor::RotationCursor;
use crate::error::ConfigError;
use crate::grid::{ClearResult, Grid, Offset};
use crate::pieces::Shape;
use crate::rng::{PieceSource, RandomSource};
use crate::score::{Score, ScoreChange, SubscriptionId};
use crate::scoring::{hard_drop_bonus, soft_drop_bonus};
use crate::snapshot::{Snapshot, Status, View};
use crate::types::{Command, DropOrigin, PieceKind};

/// What happened when a piece locked
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LockEvent {
    pub clear: ClearResult,
    /// Hard drop points awarded by this lock (0 for gravity locks)
    pub drop_bonus: i64,
    /// Whether the spawn that followed the lock ended the game
    pub game_over: bool,
}

impl LockEvent {
    pub fn lines_removed(&self) -> usize {
        self.clear.lines_removed
    }

    /// Clear bonus plus drop bonus
    pub fn points(&self) -> i64 {
        self.clear.score_bonus + self.drop_bonus
    }
}

/// Result of one downward step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DropOutcome {
    /// The piece moved down one row
    pub moved: bool,
    /// The piece was blocked and locked instead
    pub lock: Option<LockEvent>,
    pub view: View,
}

/// Result of a hard drop
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HardDrop {
    pub rows_dropped: u32,
    /// `None` only when the command was ignored after game over
    pub lock: Option<LockEvent>,
    pub view: View,
}

/// Result of [`Engine::apply`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Outcome {
    /// Move or rotation, with whether it was accepted
    Shifted(bool),
    Dropped(DropOutcome),
    HardDropped(HardDrop),
    Held(View),
    Restarted(View),
}

impl Outcome {
    pub fn lock(&self) -> Option<&LockEvent> {
        match self {
            Outcome::Dropped(drop) => drop.lock.as_ref(),
            Outcome::HardDropped(drop) => drop.lock.as_ref(),
            Outcome::Shifted(_) | Outcome::Held(_) | Outcome::Restarted(_) => None,
        }
    }
}

/// The simulation core
#[derive(Debug)]
pub struct Engine<S: PieceSource = RandomSource> {
    config: EngineConfig,
    grid: Grid,
    cursor: RotationCursor,
    offset: Offset,
    ghost: Offset,
    queue: VecDeque<PieceKind>,
    source: S,
    hold: Option<PieceKind>,
    hold_used: bool,
    score: Score,
    status: Status,
}

impl<S: PieceSource> Engine<S> {
    /// Build an engine on an empty grid and spawn the first piece
    pub fn new(config: EngineConfig, source: S) -> Result<Self, ConfigError> {
        let grid = config.empty_grid();
        Self::with_grid(config, source, grid)
    }

    /// Build an engine on a pre-filled grid and spawn the first piece
    ///
    /// The first spawn may already end the game if `grid` blocks the spawn
    /// anchor.
    pub fn with_grid(config: EngineConfig, mut source: S, grid: Grid) -> Result<Self, ConfigError> {
        config.validate()?;
        if grid.width() != config.width || grid.height() != config.height {
            return Err(ConfigError::GridMismatch {
                width: config.width,
                height: config.height,
                actual_width: grid.width(),
                actual_height: grid.height(),
            });
        }

        let queue: VecDeque<PieceKind> =
            (0..config.queue_depth).map(|_| source.next_piece()).collect();
        // Placeholder kind; the spawn below pops the real one off the queue
        let cursor = RotationCursor::new(source.peek_piece(), config.colors);

        let mut engine = Self {
            config,
            grid,
            cursor,
            offset: config.spawn,
            ghost: config.spawn,
            queue,
            source,
            hold: None,
            hold_used: false,
            score: Score::new(),
            status: Status::Running,
        };
        engine.spawn();
        Ok(engine)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The piece source feeding the queue
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status == Status::GameOver
    }

    pub fn can_hold(&self) -> bool {
        !self.hold_used && !self.is_game_over()
    }

    pub fn active_kind(&self) -> PieceKind {
        self.cursor.kind()
    }

    pub fn rotation_index(&self) -> usize {
        self.cursor.index()
    }

    pub fn active_offset(&self) -> Offset {
        self.offset
    }

    pub fn ghost_offset(&self) -> Offset {
        self.ghost
    }

    pub fn active_shape(&self) -> Shape {
        self.cursor.current_shape()
    }

    /// Copy of the grid (without the active piece)
    pub fn grid(&self) -> Grid {
        self.grid.clone()
    }

    pub fn view(&self) -> View {
        let next_shape = self
            .queue
            .front()
            .map(|&kind| self.config.colors.spawn_shape(kind))
            .unwrap_or_else(|| self.config.colors.spawn_shape(self.source.peek_piece()));
        View {
            kind: self.cursor.kind(),
            rotation: self.cursor.index(),
            shape: self.cursor.current_shape(),
            x: self.offset.x,
            y: self.offset.y,
            ghost_x: self.ghost.x,
            ghost_y: self.ghost.y,
            next_shape,
        }
    }

    /// Queued kinds, front first
    pub fn queue(&self) -> Vec<PieceKind> {
        self.queue.iter().copied().collect()
    }

    /// First rotation state of every queued piece, front first
    pub fn queue_shapes(&self) -> Vec<Shape> {
        self.queue
            .iter()
            .map(|&kind| self.config.colors.spawn_shape(kind))
            .collect()
    }

    /// The piece the source will produce after the queue
    pub fn upcoming_piece(&self) -> PieceKind {
        self.source.peek_piece()
    }

    pub fn held_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    pub fn held_shape(&self) -> Option<Shape> {
        self.hold.map(|kind| self.config.colors.spawn_shape(kind))
    }

    pub fn score(&self) -> &Score {
        &self.score
    }

    /// Watch score changes; see [`Score::subscribe`]
    pub fn subscribe_score<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(ScoreChange) + Send + 'static,
    {
        self.score.subscribe(observer)
    }

    pub fn unsubscribe_score(&mut self, id: SubscriptionId) -> bool {
        self.score.unsubscribe(id)
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            grid: self.grid(),
            buffer_rows: self.config.buffer_rows,
            view: self.view(),
            queue: self.queue(),
            queue_shapes: self.queue_shapes(),
            upcoming: self.upcoming_piece(),
            held: self.hold,
            held_shape: self.held_shape(),
            can_hold: self.can_hold(),
            score: self.score.value(),
            status: self.status,
        }
    }

    /// Apply a command
    pub fn apply(&mut self, command: Command) -> Outcome {
        match command {
            Command::MoveLeft => Outcome::Shifted(self.move_left()),
            Command::MoveRight => Outcome::Shifted(self.move_right()),
            Command::Rotate => Outcome::Shifted(self.rotate()),
            Command::SoftDrop => Outcome::Dropped(self.soft_drop(DropOrigin::User)),
            Command::Tick => Outcome::Dropped(self.soft_drop(DropOrigin::Timer)),
            Command::HardDrop => Outcome::HardDropped(self.hard_drop()),
            Command::Hold => Outcome::Held(self.hold()),
            Command::NewGame => Outcome::Restarted(self.new_game()),
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.try_move(-1, 0)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_move(1, 0)
    }

    /// One row down; locks the piece if it is blocked
    ///
    /// A successful step earns a point only when the user asked for it.
    pub fn soft_drop(&mut self, origin: DropOrigin) -> DropOutcome {
        if self.is_game_over() {
            return DropOutcome {
                moved: false,
                lock: None,
                view: self.view(),
            };
        }

        if self.try_move(0, 1) {
            if origin == DropOrigin::User {
                self.score.add(soft_drop_bonus());
            }
            return DropOutcome {
                moved: true,
                lock: None,
                view: self.view(),
            };
        }

        let lock = self.lock_piece(None);
        DropOutcome {
            moved: false,
            lock: Some(lock),
            view: self.view(),
        }
    }

    /// Advance to the next rotation state at the same anchor, if it fits
    pub fn rotate(&mut self) -> bool {
        if self.is_game_over() {
            return false;
        }

        let next = self.cursor.next_shape();
        if self.grid.intersects(&next.shape, self.offset.x, self.offset.y) {
            trace!(
                "rotation of {:?} to state {} rejected at ({}, {})",
                self.cursor.kind(),
                next.index,
                self.offset.x,
                self.offset.y
            );
            return false;
        }

        self.cursor.commit_rotation(next.index);
        self.refresh_ghost();
        true
    }

    /// Park the active piece, or swap it with the parked one
    ///
    /// Allowed once per spawned piece. The first hold of a game spawns from
    /// the queue; later holds swap kinds and restart the held piece at the
    /// spawn anchor without a game-over check.
    pub fn hold(&mut self) -> View {
        if self.is_game_over() || self.hold_used {
            return self.view();
        }

        let current = self.cursor.kind();
        match self.hold.replace(current) {
            None => {
                debug!("holding {:?}", current);
                self.spawn();
            }
            Some(held) => {
                debug!("swapping {:?} for held {:?}", current, held);
                self.cursor.set_piece(held);
                self.offset = self.config.spawn;
                self.refresh_ghost();
            }
        }

        self.hold_used = true;
        self.view()
    }

    /// Drop straight to the ghost and lock
    ///
    /// Always locks, even when the piece is already resting.
    pub fn hard_drop(&mut self) -> HardDrop {
        if self.is_game_over() {
            return HardDrop {
                rows_dropped: 0,
                lock: None,
                view: self.view(),
            };
        }

        let rows_dropped = (self.ghost.y - self.offset.y).max(0) as u32;
        self.offset = self.ghost;
        let lock = self.lock_piece(Some(rows_dropped));

        HardDrop {
            rows_dropped,
            lock: Some(lock),
            view: self.view(),
        }
    }

    /// Take the next queued piece into play; returns whether the game is over
    ///
    /// The queue is refilled by one piece so its depth never changes.
    pub fn spawn(&mut self) -> bool {
        if self.is_game_over() {
            return true;
        }

        let kind = self
            .queue
            .pop_front()
            .unwrap_or_else(|| self.source.next_piece());
        self.queue.push_back(self.source.next_piece());

        self.cursor.set_piece(kind);
        self.offset = self.config.spawn;
        self.hold_used = false;
        self.refresh_ghost();

        let shape = self.cursor.current_shape();
        if self.grid.intersects(&shape, self.offset.x, self.offset.y) {
            self.status = Status::GameOver;
            info!(
                "game over: {:?} blocked at spawn ({}, {}), score {}",
                kind,
                self.offset.x,
                self.offset.y,
                self.score.value()
            );
        } else {
            debug!("spawned {:?}, next {:?}", kind, self.queue);
        }

        self.is_game_over()
    }

    /// Reset grid, score, hold and queue, then spawn
    pub fn new_game(&mut self) -> View {
        self.grid = self.config.empty_grid();
        self.score.reset();
        self.hold = None;
        self.hold_used = false;

        self.queue.clear();
        for _ in 0..self.config.queue_depth {
            self.queue.push_back(self.source.next_piece());
        }

        self.status = Status::Running;
        info!("new game");
        self.spawn();
        self.view()
    }

    /// Translate the active piece if the target is free
    fn try_move(&mut self, dx: i32, dy: i32) -> bool {
        if self.is_game_over() {
            return false;
        }

        let target = self.offset.translated(dx, dy);
        let shape = self.cursor.current_shape();
        if self.grid.intersects(&shape, target.x, target.y) {
            trace!(
                "move of {:?} to ({}, {}) rejected",
                self.cursor.kind(),
                target.x,
                target.y
            );
            return false;
        }

        self.offset = target;
        self.refresh_ghost();
        true
    }

    /// Merge, clear, score, spawn
    ///
    /// `hard_drop_rows` is set for hard drops and feeds the drop bonus.
    fn lock_piece(&mut self, hard_drop_rows: Option<u32>) -> LockEvent {
        let shape = self.cursor.current_shape();
        let merged = self.grid.merge(&shape, self.offset.x, self.offset.y);
        self.hold_used = false;

        let clear = merged.clear_full_rows();
        self.grid = clear.grid.clone();
        debug!(
            "locked {:?} at ({}, {}), cleared {} rows {:?}",
            self.cursor.kind(),
            self.offset.x,
            self.offset.y,
            clear.lines_removed,
            clear.cleared_rows
        );

        if clear.lines_removed > 0 {
            self.score.add(clear.score_bonus);
        }

        let drop_bonus = match hard_drop_rows {
            Some(rows) if self.config.hard_drop_bonus.awards(clear.lines_removed) => {
                hard_drop_bonus(rows)
            }
            _ => 0,
        };
        self.score.add(drop_bonus);

        let game_over = self.spawn();
        self.hold_used = false;

        LockEvent {
            clear,
            drop_bonus,
            game_over,
        }
    }

    fn refresh_ghost(&mut self) {
        self.ghost = self.calculate_ghost(self.offset);
    }

    /// Lowest free position straight below `from` for the current shape
    fn calculate_ghost(&self, from: Offset) -> Offset {
        let shape = self.cursor.current_shape();
        let mut y = from.y;
        while !self.grid.intersects(&shape, from.x, y + 1) {
            y += 1;
        }
        Offset::new(from.x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::SequenceSource;

    fn engine_with(pieces: &[PieceKind]) -> Engine<SequenceSource> {
        let source = SequenceSource::new(pieces.iter().copied()).unwrap();
        Engine::new(EngineConfig::default(), source).unwrap()
    }

    #[test]
    fn test_new_engine_spawns_first_piece() {
        let engine = engine_with(&[PieceKind::T, PieceKind::I, PieceKind::O, PieceKind::S]);

        assert_eq!(engine.status(), Status::Running);
        assert_eq!(engine.active_kind(), PieceKind::T);
        assert_eq!(engine.active_offset(), Offset::new(4, 1));
        assert_eq!(engine.rotation_index(), 0);
        assert_eq!(
            engine.queue(),
            vec![PieceKind::I, PieceKind::O, PieceKind::S]
        );
        assert!(engine.can_hold());
        assert_eq!(engine.score().value(), 0);
    }

    #[test]
    fn test_try_move() {
        let mut engine = engine_with(&[PieceKind::O]);
        let x = engine.active_offset().x;

        assert!(engine.try_move(1, 0));
        assert_eq!(engine.active_offset().x, x + 1);

        assert!(engine.try_move(-1, 0));
        assert_eq!(engine.active_offset().x, x);
    }

    #[test]
    fn test_move_stops_at_walls() {
        // O occupies columns 1 and 2 of its box
        let mut engine = engine_with(&[PieceKind::O]);
        let mut moved = 0;
        while engine.move_left() {
            moved += 1;
        }
        assert_eq!(moved, 5);
        assert_eq!(engine.active_offset().x, -1);

        let mut moved = 0;
        while engine.move_right() {
            moved += 1;
        }
        assert_eq!(moved, 8);
        assert_eq!(engine.active_offset().x, 7);
    }

    #[test]
    fn test_ghost_of_fresh_i_piece() {
        // Row 1 of the box rests on row 24
        let engine = engine_with(&[PieceKind::I]);
        assert_eq!(engine.ghost_offset(), Offset::new(4, 23));
    }

    #[test]
    fn test_rotate_commits_next_state() {
        let mut engine = engine_with(&[PieceKind::T]);
        assert!(engine.rotate());
        assert_eq!(engine.rotation_index(), 1);
        assert!(engine.rotate());
        assert!(engine.rotate());
        assert!(engine.rotate());
        assert_eq!(engine.rotation_index(), 0);
    }

    #[test]
    fn test_rotate_without_kick_is_rejected_at_wall() {
        let mut engine = engine_with(&[PieceKind::I]);
        // Vertical I uses column 1 of its box
        assert!(engine.rotate());
        while engine.move_left() {}
        assert_eq!(engine.active_offset().x, -1);

        // Horizontal state would need column -1
        assert!(!engine.rotate());
        assert_eq!(engine.rotation_index(), 1);
    }

    #[test]
    fn test_soft_drop_scores_only_for_user() {
        let mut engine = engine_with(&[PieceKind::O]);

        let timer = engine.soft_drop(DropOrigin::Timer);
        assert!(timer.moved);
        assert_eq!(engine.score().value(), 0);

        let user = engine.soft_drop(DropOrigin::User);
        assert!(user.moved);
        assert!(user.lock.is_none());
        assert_eq!(engine.score().value(), 1);
        assert_eq!(engine.active_offset().y, 3);
    }

    #[test]
    fn test_blocked_soft_drop_locks() {
        let mut engine = engine_with(&[PieceKind::O, PieceKind::T]);
        let mut locked = None;
        for _ in 0..30 {
            let outcome = engine.soft_drop(DropOrigin::Timer);
            if let Some(lock) = outcome.lock {
                locked = Some(lock);
                break;
            }
        }

        let lock = locked.expect("O piece should lock within 30 ticks");
        assert_eq!(lock.lines_removed(), 0);
        assert!(!lock.game_over);
        assert_eq!(engine.grid().get(5, 24), Some(4));
        assert_eq!(engine.active_kind(), PieceKind::T);
        assert_eq!(engine.score().value(), 0);
    }

    #[test]
    fn test_hold_first_use_spawns_from_queue() {
        let mut engine = engine_with(&[PieceKind::T, PieceKind::I, PieceKind::O, PieceKind::S]);
        engine.hold();

        assert_eq!(engine.held_piece(), Some(PieceKind::T));
        assert_eq!(engine.active_kind(), PieceKind::I);
        assert!(!engine.can_hold());
        assert_eq!(engine.queue().len(), 3);
    }

    #[test]
    fn test_hold_swap_resets_anchor_and_rotation() {
        let mut engine = engine_with(&[PieceKind::T, PieceKind::I, PieceKind::O, PieceKind::S]);
        engine.hold();
        engine.hard_drop();

        // Active is now O; move it before swapping
        assert_eq!(engine.active_kind(), PieceKind::O);
        engine.move_right();
        engine.soft_drop(DropOrigin::Timer);

        let queue_before = engine.queue();
        let view = engine.hold();

        assert_eq!(engine.held_piece(), Some(PieceKind::O));
        assert_eq!(view.kind, PieceKind::T);
        assert_eq!((view.x, view.y), (4, 1));
        assert_eq!(view.rotation, 0);
        assert_eq!(engine.queue(), queue_before);
    }

    #[test]
    fn test_lock_resets_hold() {
        let mut engine = engine_with(&[PieceKind::T, PieceKind::I]);
        engine.hold();
        assert!(!engine.can_hold());

        engine.hard_drop();
        assert!(engine.can_hold());
    }

    #[test]
    fn test_new_game_resets_everything() {
        let mut engine = engine_with(&[PieceKind::I, PieceKind::O]);
        engine.soft_drop(DropOrigin::User);
        engine.hold();
        engine.hard_drop();
        assert!(engine.score().value() > 0);

        engine.new_game();
        assert_eq!(engine.score().value(), 0);
        assert_eq!(engine.held_piece(), None);
        assert!(engine.grid().is_empty());
        assert!(engine.can_hold());
        assert_eq!(engine.queue().len(), 3);
        assert_eq!(engine.status(), Status::Running);
    }

    #[test]
    fn test_apply_dispatches_commands() {
        let mut engine = engine_with(&[PieceKind::O]);
        assert_eq!(engine.apply(Command::MoveLeft), Outcome::Shifted(true));

        let outcome = engine.apply(Command::HardDrop);
        let lock = outcome.lock().expect("hard drop always locks");
        assert_eq!(lock.lines_removed(), 0);
        assert!(matches!(outcome, Outcome::HardDropped(HardDrop { rows_dropped: 21, .. })));
    }
}
