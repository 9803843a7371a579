//! Time-ordered index of events by `scheduled_at`

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use chrono::{DateTime, Utc};

/// Min-heap of `(scheduled_at, event id)`.
///
/// Entries are never removed when an event is deleted; readers pass a
/// liveness check instead.
#[derive(Debug, Default, Clone)]
pub struct ScheduleIndex {
    heap: BinaryHeap<Reverse<(DateTime<Utc>, String)>>,
}

impl ScheduleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, at: DateTime<Utc>, event_id: impl Into<String>) {
        self.heap.push(Reverse((at, event_id.into())));
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Earliest entry accepted by `is_live`.
    pub fn earliest<F>(&self, is_live: F) -> Option<(DateTime<Utc>, &str)>
    where
        F: Fn(&str) -> bool,
    {
        self.heap
            .iter()
            .map(|Reverse((at, id))| (*at, id.as_str()))
            .filter(|(_, id)| is_live(id))
            .min()
    }

    /// Live entries scheduled at or before `cutoff`, earliest first.
    pub fn due<F>(&self, cutoff: DateTime<Utc>, is_live: F) -> Vec<(DateTime<Utc>, &str)>
    where
        F: Fn(&str) -> bool,
    {
        let mut due: Vec<_> = self
            .heap
            .iter()
            .map(|Reverse((at, id))| (*at, id.as_str()))
            .filter(|(at, id)| *at <= cutoff && is_live(id))
            .collect();
        due.sort();
        due
    }

    /// Drop entries rejected by `is_live`.
    pub fn prune<F>(&mut self, is_live: F)
    where
        F: Fn(&str) -> bool,
    {
        self.heap.retain(|Reverse((_, id))| is_live(id));
    }
}
