//! Pure resolution functions: which day is it, and which item is on now.
//!
//! Nothing here reads the clock or mutates state. The engine feeds in the
//! current minute and date and decides what to do with the answer.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::agenda::{AgendaItem, DayKey};

/// Where the display is relative to the day's programme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgendaStatus {
    /// Before the first item (or the day has no items).
    Waiting,
    /// Inside an item's time window.
    Active,
    /// In a gap after one item ended and before the next begins.
    Between,
    /// After the last item's window.
    Completed,
}

impl AgendaStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AgendaStatus::Waiting => "waiting",
            AgendaStatus::Active => "active",
            AgendaStatus::Between => "between",
            AgendaStatus::Completed => "completed",
        }
    }

    /// Whether this status comes with an event index: the running item, or
    /// during a gap the one that just finished.
    pub fn has_event(&self) -> bool {
        matches!(self, AgendaStatus::Active | AgendaStatus::Between)
    }
}

impl std::fmt::Display for AgendaStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving one minute against one day's items.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    pub now_minutes: u32,
    pub status: AgendaStatus,
    /// The active item, or during a gap the most recently finished one.
    pub event_index: Option<usize>,
    /// First item starting strictly after `now_minutes`.
    pub next_index: Option<usize>,
    /// `None` when nothing else starts today.
    pub minutes_until_next: Option<u32>,
}

impl Resolution {
    /// Operator-facing one-liner for logs and diagnostics.
    pub fn describe(&self, day: &str, items: &[AgendaItem]) -> String {
        match self.status {
            AgendaStatus::Waiting if items.is_empty() => format!("No events scheduled for {day}"),
            AgendaStatus::Waiting => match self.minutes_until_next {
                Some(m) => format!("{day} starts in {m} minutes"),
                None => format!("{day} has not started"),
            },
            AgendaStatus::Active => "Event in progress".to_string(),
            AgendaStatus::Between => match self.minutes_until_next {
                Some(m) => format!("Next event in {m} minutes"),
                None => "No more events today".to_string(),
            },
            AgendaStatus::Completed => format!("{day} has concluded"),
        }
    }
}

/// Resolve `now_minutes` against a day's items, which must be sorted by start.
///
/// First match wins: empty day, before the first start, at or after the last
/// end, inside an item, otherwise in a gap. Zero-length items never match the
/// "inside" rule.
pub fn resolve(items: &[AgendaItem], now_minutes: u32) -> Resolution {
    let next_index = items.iter().position(|item| item.start_minutes > now_minutes);
    let minutes_until_next =
        next_index.map(|i| items[i].start_minutes.saturating_sub(now_minutes));
    let resolution = |status: AgendaStatus, event_index: Option<usize>| Resolution {
        now_minutes,
        status,
        event_index,
        next_index,
        minutes_until_next,
    };

    let (Some(first), Some(last)) = (items.first(), items.last()) else {
        return resolution(AgendaStatus::Waiting, None);
    };
    if now_minutes < first.start_minutes {
        return resolution(AgendaStatus::Waiting, None);
    }
    if now_minutes >= last.end_minutes() {
        return resolution(AgendaStatus::Completed, None);
    }

    let started = items.partition_point(|item| item.start_minutes <= now_minutes);
    if let Some(active) = items[..started].iter().rposition(|item| item.contains(now_minutes)) {
        return resolution(AgendaStatus::Active, Some(active));
    }

    let last_finished = items.iter().rposition(|item| item.end_minutes() <= now_minutes);
    resolution(AgendaStatus::Between, last_finished)
}

/// Pick the day of a multi-day event that `today` belongs to.
///
/// An exact date match wins. Otherwise the most recent day already reached
/// is used, and before the event starts the earliest day. `None` only when no
/// days are configured.
pub fn resolve_day(today: NaiveDate, dates: &[(DayKey, NaiveDate)]) -> Option<DayKey> {
    if let Some((name, _)) = dates.iter().find(|(_, date)| *date == today) {
        return Some(name.clone());
    }
    dates
        .iter()
        .filter(|(_, date)| *date < today)
        .max_by_key(|(_, date)| *date)
        .or_else(|| dates.iter().min_by_key(|(_, date)| *date))
        .map(|(name, _)| name.clone())
}
