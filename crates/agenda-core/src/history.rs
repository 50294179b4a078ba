//! Bounded transition history, kept for diagnostics only.
//!
//! Nothing reads these records back into engine state.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::events::Event;
use crate::resolver::AgendaStatus;

pub const DEFAULT_HISTORY_CAPACITY: usize = 100;

/// Most recent events retained for diagnostics.
const EVENT_CAPACITY: usize = 50;

/// What moved the engine into a new state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionCause {
    RealTime,
    Manual,
    DayChange,
    Sync,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionRecord {
    pub at: DateTime<Utc>,
    pub status: AgendaStatus,
    pub event_index: Option<usize>,
    pub cause: TransitionCause,
}

/// Ring buffer of the last `capacity` state transitions.
#[derive(Debug, Clone)]
pub struct TransitionLog {
    records: VecDeque<TransitionRecord>,
    capacity: usize,
}

impl TransitionLog {
    /// A zero capacity is bumped to one so the latest transition is always kept.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            records: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn push(&mut self, record: TransitionRecord) {
        if self.records.len() == self.capacity {
            self.records.pop_front();
        }
        self.records.push_back(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn last(&self) -> Option<&TransitionRecord> {
        self.records.back()
    }

    /// Up to `n` newest records, oldest first.
    pub fn recent(&self, n: usize) -> Vec<TransitionRecord> {
        let skip = self.records.len().saturating_sub(n);
        self.records.iter().skip(skip).cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TransitionRecord> {
        self.records.iter()
    }
}

impl Default for TransitionLog {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

/// Events waiting to be drained by the runtime, plus a short memory of the
/// newest ones for diagnostics. Both queues are bounded; undrained events
/// are dropped oldest first.
#[derive(Debug, Clone, Default)]
pub struct EventJournal {
    pending: VecDeque<Event>,
    recent: VecDeque<Event>,
}

impl EventJournal {
    pub fn record(&mut self, event: Event) {
        for queue in [&mut self.pending, &mut self.recent] {
            if queue.len() == EVENT_CAPACITY {
                queue.pop_front();
            }
        }
        self.recent.push_back(event.clone());
        self.pending.push_back(event);
    }

    pub fn drain(&mut self) -> Vec<Event> {
        self.pending.drain(..).collect()
    }

    /// Up to `n` newest events, oldest first.
    pub fn recent(&self, n: usize) -> Vec<Event> {
        let skip = self.recent.len().saturating_sub(n);
        self.recent.iter().skip(skip).cloned().collect()
    }
}
