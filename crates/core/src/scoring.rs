//! Scoring module - point and level rules
//!
//! These are pure functions. The engine applies them when it locks or drops a
//! piece; level is derived by the caller from the running line count, which is
//! what [`LevelTracker`] packages up.
//!
//! - Line clear: `50 * n * n` for `n` rows removed at once (50, 200, 450, 800)
//! - Hard drop: one point per row dropped
//! - Soft drop: one point per user-initiated step
//! - Level: `1 + total_lines / lines_per_level`

use serde::{Deserialize, Serialize};

use crate::grid::ClearResult;
use crate::types::{LINE_CLEAR_UNIT, SOFT_DROP_POINTS};

/// Points for removing `lines` rows in one clear
pub fn line_clear_bonus(lines: usize) -> i64 {
    let n = lines as i64;
    LINE_CLEAR_UNIT * n * n
}

/// Points for a hard drop of `rows_dropped` rows
pub fn hard_drop_bonus(rows_dropped: u32) -> i64 {
    i64::from(rows_dropped)
}

/// Points for one user-initiated soft drop step
pub fn soft_drop_bonus() -> i64 {
    SOFT_DROP_POINTS
}

/// Level for a cumulative line count, starting at 1
///
/// `lines_per_level` of 0 is treated as 1.
pub fn level_for_lines(total_lines: u32, lines_per_level: u32) -> u32 {
    1 + total_lines / lines_per_level.max(1)
}

/// Running line and level counter kept by the caller
///
/// Feed it every lock event's clear result; it reports when a clear pushed
/// the player into a new level so the presentation layer can react.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTracker {
    lines: u32,
    lines_per_level: u32,
}

impl LevelTracker {
    pub fn new(lines_per_level: u32) -> Self {
        Self {
            lines: 0,
            lines_per_level,
        }
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn level(&self) -> u32 {
        level_for_lines(self.lines, self.lines_per_level)
    }

    /// Add `cleared` lines; returns the new level if it changed
    pub fn record_lines(&mut self, cleared: u32) -> Option<u32> {
        let before = self.level();
        self.lines = self.lines.saturating_add(cleared);
        let after = self.level();
        (after != before).then_some(after)
    }

    /// Add the lines of one clear; returns the new level if it changed
    pub fn record(&mut self, clear: &ClearResult) -> Option<u32> {
        self.record_lines(clear.lines_removed as u32)
    }

    pub fn reset(&mut self) {
        self.lines = 0;
    }
}
