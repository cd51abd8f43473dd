//! Score counter with change notification.
//!
//! The counter only knows how to add and reset. How points are earned lives in
//! [`scoring`](crate::scoring) and the engine. Observers are called
//! synchronously, in subscription order, every time the value changes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Old and new value delivered to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreChange {
    pub old: i64,
    pub new: i64,
}

/// Handle returned by [`Score::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(ScoreChange) + Send>;

#[derive(Default)]
pub struct Score {
    value: i64,
    next_id: u64,
    observers: Vec<(SubscriptionId, Observer)>,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    /// Add `delta` (which may be negative)
    pub fn add(&mut self, delta: i64) {
        self.set(self.value.saturating_add(delta));
    }

    pub fn reset(&mut self) {
        self.set(0);
    }

    /// Register an observer; it sees every later change
    pub fn subscribe<F>(&mut self, observer: F) -> SubscriptionId
    where
        F: FnMut(ScoreChange) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer; false if it was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(sub, _)| *sub != id);
        self.observers.len() != before
    }

    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    fn set(&mut self, new: i64) {
        if new == self.value {
            return;
        }
        let change = ScoreChange {
            old: self.value,
            new,
        };
        self.value = new;
        for (_, observer) in &mut self.observers {
            observer(change);
        }
    }
}

impl fmt::Debug for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Score")
            .field("value", &self.value)
            .field("observers", &self.observers.len())
            .finish()
    }
}
