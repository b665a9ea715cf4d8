//! Delayed actions for the single game loop.
//!
//! Entries are keyed by `(fire_at_ms, sequence)`, which gives a total order:
//! earlier times first, then scheduling order within the same millisecond.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Handle for cancelling a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TaskId {
    fire_at_ms: u64,
    sequence: u64,
}

impl TaskId {
    pub fn fire_at_ms(&self) -> u64 {
        self.fire_at_ms
    }
}

/// Ordered queue of pending actions.
#[derive(Debug, Clone)]
pub struct TaskQueue<A> {
    tasks: BTreeMap<TaskId, A>,
    next_sequence: u64,
}

impl<A> Default for TaskQueue<A> {
    fn default() -> Self {
        Self {
            tasks: BTreeMap::new(),
            next_sequence: 0,
        }
    }
}

impl<A> TaskQueue<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `action` to run once the clock reaches `fire_at_ms`.
    pub fn schedule(&mut self, fire_at_ms: u64, action: A) -> TaskId {
        let id = TaskId {
            fire_at_ms,
            sequence: self.next_sequence,
        };
        self.next_sequence += 1;
        self.tasks.insert(id, action);
        id
    }

    /// Drop a pending task. Returns false if it already ran or was cancelled.
    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    pub fn is_pending(&self, id: TaskId) -> bool {
        self.tasks.contains_key(&id)
    }

    /// Time of the earliest pending task.
    pub fn next_due(&self) -> Option<u64> {
        self.tasks.keys().next().map(|id| id.fire_at_ms)
    }

    /// Remove the earliest task if it is due at or before `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<(TaskId, A)> {
        let entry = self.tasks.first_entry()?;
        if entry.key().fire_at_ms > now_ms {
            return None;
        }
        Some(entry.remove_entry())
    }

    /// Remove and return every task due at or before `now_ms`, in order.
    pub fn drain_due(&mut self, now_ms: u64) -> Vec<(TaskId, A)> {
        std::iter::from_fn(|| self.pop_due(now_ms)).collect()
    }

    /// Discard everything without running it. Returns how many were dropped.
    pub fn clear(&mut self) -> usize {
        let dropped = self.tasks.len();
        self.tasks.clear();
        dropped
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
