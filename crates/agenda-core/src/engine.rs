//! Schedule engine implementation.
//!
//! The engine is a wall-clock-based state machine. It does not use internal
//! threads - the caller is responsible for calling `tick()` (about once a
//! second) and `check_day()` (about once a minute).
//!
//! ## Modes
//!
//! ```text
//! Automatic --set_event_index--> Manual --reset_to_real_time--> Automatic
//! Automatic --apply_peer_state--> Following --reset_to_real_time--> Automatic
//! ```
//!
//! Only `Automatic` lets `tick()` move the displayed item. Day changes reset
//! the position in every mode.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = ScheduleEngine::new(Agenda::default_conference(), SystemClock::default());
//! // In a loop:
//! if engine.tick() {
//!     render(engine.status_snapshot());
//! }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::agenda::{Agenda, AgendaItem, DayKey};
use crate::clock::{Clock, ClockReading};
use crate::events::Event;
use crate::history::{EventJournal, TransitionCause, TransitionLog, TransitionRecord};
use crate::resolver::{resolve, resolve_day, AgendaStatus, Resolution};
use crate::snapshot::{CurrentEvent, DayDate, Diagnostics, EngineMode, StatusSnapshot};

/// Mutable runtime position of one display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineState {
    pub current_day: DayKey,
    pub current_event_index: Option<usize>,
    pub status: AgendaStatus,
    pub last_transition_at: Option<DateTime<Utc>>,
}

/// Core schedule engine.
pub struct ScheduleEngine {
    agenda: Agenda,
    clock: Arc<dyn Clock>,
    state: EngineState,
    mode: EngineMode,
    log: TransitionLog,
    journal: EventJournal,
}

impl std::fmt::Debug for ScheduleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ScheduleEngine")
            .field("state", &self.state)
            .field("mode", &self.mode)
            .field("days", &self.agenda.day_names())
            .finish_non_exhaustive()
    }
}

impl ScheduleEngine {
    /// Create an engine for `agenda`, on the day the clock's date belongs to.
    ///
    /// Starts `Waiting` with no item; the first `tick()` resolves the position.
    pub fn new(agenda: Agenda, clock: impl Clock + 'static) -> Self {
        Self::with_shared_clock(agenda, Arc::new(clock))
    }

    pub fn with_shared_clock(agenda: Agenda, clock: Arc<dyn Clock>) -> Self {
        let current_day = resolve_day(clock.now().date, &agenda.dates()).unwrap_or_default();
        tracing::info!(day = %current_day, "conference day detected");
        Self {
            agenda,
            clock,
            state: EngineState {
                current_day,
                current_event_index: None,
                status: AgendaStatus::Waiting,
                last_transition_at: None,
            },
            mode: EngineMode::Automatic,
            log: TransitionLog::default(),
            journal: EventJournal::default(),
        }
    }

    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        self.log = TransitionLog::new(capacity);
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn agenda(&self) -> &Agenda {
        &self.agenda
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn mode(&self) -> EngineMode {
        self.mode
    }

    pub fn current_day(&self) -> &str {
        &self.state.current_day
    }

    pub fn current_event_index(&self) -> Option<usize> {
        self.state.current_event_index
    }

    pub fn status(&self) -> AgendaStatus {
        self.state.status
    }

    pub fn available_days(&self) -> Vec<DayKey> {
        self.agenda.day_names()
    }

    /// Items of the current day.
    pub fn items(&self) -> &[AgendaItem] {
        self.agenda.items(&self.state.current_day)
    }

    pub fn current_event(&self) -> Option<&AgendaItem> {
        self.state
            .current_event_index
            .and_then(|i| self.items().get(i))
    }

    pub fn now(&self) -> ClockReading {
        self.clock.now()
    }

    pub fn now_utc(&self) -> DateTime<Utc> {
        self.clock.now_utc()
    }

    pub fn history(&self) -> &TransitionLog {
        &self.log
    }

    /// What the clock says should be on screen, regardless of mode.
    pub fn resolve_now(&self) -> Resolution {
        resolve(self.items(), self.clock.now().minutes_since_midnight)
    }

    /// Take the events produced since the last call.
    pub fn drain_events(&mut self) -> Vec<Event> {
        self.journal.drain()
    }

    // ── Periodic work ────────────────────────────────────────────────

    /// Re-resolve against the clock. Returns `true` only when the displayed
    /// `(index, status)` pair changed, so callers can skip redrawing otherwise.
    ///
    /// Does nothing outside `Automatic` mode.
    pub fn tick(&mut self) -> bool {
        if self.mode != EngineMode::Automatic {
            return false;
        }
        let resolution = self.resolve_now();
        if (resolution.event_index, resolution.status)
            == (self.state.current_event_index, self.state.status)
        {
            return false;
        }

        let at = self.clock.now_utc();
        self.journal.record(Event::AgendaChanged {
            day: self.state.current_day.clone(),
            from_index: self.state.current_event_index,
            from_status: self.state.status,
            to_index: resolution.event_index,
            to_status: resolution.status,
            at,
        });
        tracing::info!(
            day = %self.state.current_day,
            status = %resolution.status,
            index = ?resolution.event_index,
            "real-time update: {}",
            resolution.describe(&self.state.current_day, self.items())
        );
        self.transition(resolution.event_index, resolution.status, TransitionCause::RealTime);
        true
    }

    /// Re-detect the day from the calendar date and switch to it when it
    /// differs from the current day.
    ///
    /// A day picked by hand or taken from a peer is corrected on the next
    /// check. Returns `true` when the current day was switched.
    pub fn check_day(&mut self) -> bool {
        match resolve_day(self.clock.now().date, &self.agenda.dates()) {
            Some(day) if day != self.state.current_day => {
                self.switch_day(day, false);
                true
            }
            _ => false,
        }
    }

    // ── Overrides ────────────────────────────────────────────────────

    /// Switch to a configured day. Unknown days are ignored.
    pub fn set_current_day(&mut self, day: &str) -> bool {
        if !self.agenda.contains_day(day) {
            tracing::warn!(
                day,
                available = ?self.agenda.day_names(),
                "unknown conference day, ignoring"
            );
            return false;
        }
        self.switch_day(day.to_string(), true);
        true
    }

    /// Pin the display to `index` (or to nothing) and enter manual mode.
    ///
    /// Out-of-range indices are ignored and leave state untouched.
    pub fn set_event_index(&mut self, index: Option<usize>) -> bool {
        let len = self.items().len();
        if let Some(i) = index.filter(|&i| i >= len) {
            tracing::warn!(
                index = i,
                len,
                day = %self.state.current_day,
                "event index out of range, ignoring"
            );
            return false;
        }
        let status = if index.is_some() {
            AgendaStatus::Active
        } else {
            AgendaStatus::Waiting
        };
        self.mode = EngineMode::Manual;
        self.journal.record(Event::ManualOverride {
            day: self.state.current_day.clone(),
            index,
            at: self.clock.now_utc(),
        });
        tracing::info!(index = ?index, "manual override: set event index");
        self.transition(index, status, TransitionCause::Manual);
        true
    }

    /// Step the manual position forward one item.
    pub fn next_event(&mut self) -> bool {
        let next = self.state.current_event_index.map_or(0, |i| i + 1);
        if next >= self.items().len() {
            return false;
        }
        self.set_event_index(Some(next))
    }

    /// Step the manual position back one item.
    pub fn previous_event(&mut self) -> bool {
        match self.state.current_event_index {
            Some(i) if i > 0 => self.set_event_index(Some(i - 1)),
            _ => false,
        }
    }

    /// Drop any manual or follower override and resolve from the clock now.
    ///
    /// Returns whether the displayed position changed.
    pub fn reset_to_real_time(&mut self) -> bool {
        if self.mode != EngineMode::Automatic {
            self.mode = EngineMode::Automatic;
            self.journal.record(Event::ResetToRealTime {
                day: self.state.current_day.clone(),
                at: self.clock.now_utc(),
            });
        }
        let changed = self.tick();
        tracing::info!(day = %self.state.current_day, "reset to real-time mode");
        changed
    }

    /// Force the position a peer display reported and enter follower mode.
    ///
    /// Unknown days, out-of-range indices and status/index pairs the
    /// resolver never produces (an active item without an index, a waiting
    /// or finished day with one) are rejected. Returns whether anything
    /// changed.
    pub fn apply_peer_state(
        &mut self,
        day: &str,
        index: Option<usize>,
        status: AgendaStatus,
        source: &str,
    ) -> bool {
        let Some(len) = self.agenda.day(day).map(|d| d.items.len()) else {
            tracing::warn!(day, source, "peer reported an unknown day, ignoring");
            return false;
        };
        if let Some(i) = index.filter(|&i| i >= len) {
            tracing::warn!(
                index = i,
                len,
                day,
                source,
                "peer reported an out-of-range index, ignoring"
            );
            return false;
        }
        if index.is_some() != status.has_event() {
            tracing::warn!(
                index = ?index,
                %status,
                source,
                "peer reported an inconsistent status, ignoring"
            );
            return false;
        }

        self.mode = EngineMode::Following;
        let mut changed = false;
        if day != self.state.current_day {
            self.switch_day(day.to_string(), false);
            changed = true;
        }
        if (index, status) != (self.state.current_event_index, self.state.status) {
            self.journal.record(Event::SnapshotApplied {
                source: source.to_string(),
                day: day.to_string(),
                index,
                status,
                at: self.clock.now_utc(),
            });
            self.transition(index, status, TransitionCause::Sync);
            changed = true;
        }
        changed
    }

    /// Merge new calendar dates into the agenda and re-detect the day.
    ///
    /// Returns whether the current day switched.
    pub fn update_conference_dates(&mut self, dates: &BTreeMap<DayKey, NaiveDate>) -> bool {
        for unknown in self.agenda.update_dates(dates) {
            tracing::warn!(day = %unknown, "date given for an unconfigured day, ignoring");
        }
        self.check_day()
    }

    // ── Snapshots ────────────────────────────────────────────────────

    pub fn status_snapshot(&self) -> StatusSnapshot {
        let now = self.clock.now();
        let resolution = resolve(self.items(), now.minutes_since_midnight);
        StatusSnapshot {
            current_day: self.state.current_day.clone(),
            current_time: now.hhmmss,
            status: self.state.status,
            current_event_index: self.state.current_event_index,
            next_event: resolution.next_index.and_then(|i| self.items().get(i)).cloned(),
            minutes_until_next: resolution.minutes_until_next,
            mode: self.mode,
            taken_at: self.clock.now_utc(),
        }
    }

    /// The displayed item with progress figures.
    pub fn current_event_details(&self) -> Option<CurrentEvent> {
        let index = self.state.current_event_index?;
        let item = self.items().get(index)?;
        let now = self.clock.now().minutes_since_midnight;
        let running = self.state.status == AgendaStatus::Active && item.contains(now);
        let progress_pct = if running {
            let elapsed = (now - item.start_minutes) as f64;
            (elapsed / item.duration_min.max(1) as f64 * 100.0).round().clamp(0.0, 100.0) as u8
        } else {
            0
        };
        Some(CurrentEvent {
            index,
            total_events: self.items().len(),
            item: item.clone(),
            progress_pct,
            minutes_remaining: running.then(|| item.end_minutes() - now),
            start_minutes: item.start_minutes,
            end_minutes: item.end_minutes(),
        })
    }

    pub fn diagnostics(&self) -> Diagnostics {
        let now = self.clock.now();
        let resolution = resolve(self.items(), now.minutes_since_midnight);
        Diagnostics {
            current_day: self.state.current_day.clone(),
            available_days: self.agenda.day_names(),
            conference_dates: self
                .agenda
                .dates()
                .into_iter()
                .map(|(day, date)| DayDate { day, date })
                .collect(),
            current_time: now.hhmm,
            current_time_with_seconds: now.hhmmss,
            status: self.state.status,
            mode: self.mode,
            current_event_index: self.state.current_event_index,
            total_events: self.items().len(),
            current_event: self.current_event_details(),
            next_event: resolution.next_index.and_then(|i| self.items().get(i)).cloned(),
            minutes_until_next: resolution.minutes_until_next,
            message: resolution.describe(&self.state.current_day, self.items()),
            last_transition_at: self.state.last_transition_at,
            status_history: self.log.recent(10),
            recent_events: self.journal.recent(5),
        }
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn switch_day(&mut self, day: DayKey, manual: bool) {
        let from = std::mem::replace(&mut self.state.current_day, day.clone());
        tracing::info!(from = %from, to = %day, manual, "conference day changed");
        self.journal.record(Event::DayChanged {
            from,
            to: day,
            manual,
            at: self.clock.now_utc(),
        });
        self.transition(None, AgendaStatus::Waiting, TransitionCause::DayChange);
    }

    fn transition(&mut self, index: Option<usize>, status: AgendaStatus, cause: TransitionCause) {
        let at = self.clock.now_utc();
        self.state.current_event_index = index;
        self.state.status = status;
        self.state.last_transition_at = Some(at);
        self.log.push(TransitionRecord {
            at,
            status,
            event_index: index,
            cause,
        });
    }
}
