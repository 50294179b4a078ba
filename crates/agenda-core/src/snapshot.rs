//! Read-only views of engine state handed to renderers, peers and operators.
//!
//! These are owned copies; holding one never borrows the engine.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::agenda::{AgendaItem, DayKey};
use crate::events::Event;
use crate::history::TransitionRecord;
use crate::resolver::AgendaStatus;

/// Who decides the displayed item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineMode {
    /// The clock drives the display.
    Automatic,
    /// An operator picked the item; the clock is ignored until reset.
    Manual,
    /// A peer display's snapshots drive the display.
    Following,
}

/// Point-in-time status, as consumed by renderers and the sync channel.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSnapshot {
    pub current_day: DayKey,
    /// Venue-local `HH:MM:SS`.
    pub current_time: String,
    pub status: AgendaStatus,
    pub current_event_index: Option<usize>,
    pub next_event: Option<AgendaItem>,
    pub minutes_until_next: Option<u32>,
    pub mode: EngineMode,
    pub taken_at: DateTime<Utc>,
}

/// The displayed item with timing metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentEvent {
    pub index: usize,
    pub total_events: usize,
    pub item: AgendaItem,
    /// 0..=100; always 0 unless the item is actually running.
    pub progress_pct: u8,
    /// Minutes left in the item while it is running.
    pub minutes_remaining: Option<u32>,
    pub start_minutes: u32,
    pub end_minutes: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayDate {
    pub day: DayKey,
    pub date: NaiveDate,
}

/// Everything an operator needs to see what the engine is doing and why.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Diagnostics {
    pub current_day: DayKey,
    pub available_days: Vec<DayKey>,
    pub conference_dates: Vec<DayDate>,
    pub current_time: String,
    pub current_time_with_seconds: String,
    pub status: AgendaStatus,
    pub mode: EngineMode,
    pub current_event_index: Option<usize>,
    pub total_events: usize,
    pub current_event: Option<CurrentEvent>,
    pub next_event: Option<AgendaItem>,
    pub minutes_until_next: Option<u32>,
    /// What real-time resolution would say right now.
    pub message: String,
    pub last_transition_at: Option<DateTime<Utc>>,
    pub status_history: Vec<TransitionRecord>,
    pub recent_events: Vec<Event>,
}
