//! Agenda data: items, days and the multi-day collection.
//!
//! An [`Agenda`] is static configuration. It is built once (either the
//! built-in conference programme or a `custom_agenda` from the config file)
//! and handed to the engine, which never mutates the item lists.

mod builtin;
mod day;
mod item;

use std::collections::{BTreeMap, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub use day::DaySchedule;
pub use item::{
    display_label, format_hhmm, parse_time_of_day, time_to_minutes, AgendaItem, SessionKind,
};

/// Name of a configured day, e.g. `"Day 1"`.
pub type DayKey = String;

/// All days of the event in presentation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agenda {
    #[serde(default)]
    pub days: Vec<DaySchedule>,
}

impl Agenda {
    pub fn new(days: Vec<DaySchedule>) -> Self {
        Self { days }
    }

    pub fn day(&self, name: &str) -> Option<&DaySchedule> {
        self.days.iter().find(|d| d.name == name)
    }

    pub fn contains_day(&self, name: &str) -> bool {
        self.day(name).is_some()
    }

    pub fn day_names(&self) -> Vec<DayKey> {
        self.days.iter().map(|d| d.name.clone()).collect()
    }

    /// `(day, date)` pairs in presentation order.
    pub fn dates(&self) -> Vec<(DayKey, NaiveDate)> {
        self.days
            .iter()
            .map(|d| (d.name.clone(), d.calendar_date))
            .collect()
    }

    /// Items for `name`, or an empty slice for unknown days.
    pub fn items(&self, name: &str) -> &[AgendaItem] {
        self.day(name).map(|d| d.items.as_slice()).unwrap_or(&[])
    }

    /// Overwrite the calendar dates of known days.
    ///
    /// Returns the names that were not configured and therefore ignored.
    pub fn update_dates(&mut self, dates: &BTreeMap<DayKey, NaiveDate>) -> Vec<DayKey> {
        let mut unknown = Vec::new();
        for (name, date) in dates {
            match self.days.iter_mut().find(|d| &d.name == name) {
                Some(day) => day.calendar_date = *date,
                None => unknown.push(name.clone()),
            }
        }
        unknown
    }

    /// Every problem in the configured data; empty when the agenda is sound.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut problems = Vec::new();
        let mut seen = HashSet::new();
        for (i, day) in self.days.iter().enumerate() {
            if !seen.insert(day.name.as_str()) {
                problems.push(ValidationError::DuplicateDay(day.name.clone()));
            }
            if let Some(previous) = i.checked_sub(1).and_then(|p| self.days.get(p)) {
                if day.calendar_date <= previous.calendar_date {
                    problems.push(ValidationError::NonIncreasingDates {
                        day: day.name.clone(),
                        previous: previous.name.clone(),
                    });
                }
            }
            problems.extend(day.validate());
        }
        problems
    }
}

impl Default for Agenda {
    fn default() -> Self {
        Self::default_conference()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn default_conference_is_valid() {
        let agenda = Agenda::default_conference();
        assert_eq!(agenda.day_names(), vec!["Inauguration", "Day 1", "Day 2"]);
        assert!(agenda.validate().is_empty(), "{:?}", agenda.validate());
    }

    #[test]
    fn unknown_day_has_no_items() {
        let agenda = Agenda::default_conference();
        assert!(agenda.items("Day 9").is_empty());
        assert!(!agenda.contains_day("Day 9"));
    }

    #[test]
    fn update_dates_ignores_unknown_days() {
        let mut agenda = Agenda::default_conference();
        let mut dates = BTreeMap::new();
        dates.insert("Day 1".to_string(), d(2026, 3, 2));
        dates.insert("Workshop".to_string(), d(2026, 3, 4));
        let unknown = agenda.update_dates(&dates);
        assert_eq!(unknown, vec!["Workshop".to_string()]);
        assert_eq!(agenda.day("Day 1").unwrap().calendar_date, d(2026, 3, 2));
    }

    #[test]
    fn validate_flags_dates_out_of_order_and_duplicates() {
        let agenda = Agenda::new(vec![
            DaySchedule::new("Day 1", d(2025, 9, 19), Vec::new()),
            DaySchedule::new("Day 2", d(2025, 9, 19), Vec::new()),
            DaySchedule::new("Day 1", d(2025, 9, 21), Vec::new()),
        ]);
        let problems = agenda.validate();
        assert!(problems.contains(&ValidationError::NonIncreasingDates {
            day: "Day 2".into(),
            previous: "Day 1".into(),
        }));
        assert!(problems.contains(&ValidationError::DuplicateDay("Day 1".into())));
    }

    #[test]
    fn agenda_toml_roundtrip() {
        let agenda = Agenda::default_conference();
        let text = toml::to_string_pretty(&agenda).unwrap();
        let parsed: Agenda = toml::from_str(&text).unwrap();
        assert_eq!(parsed, agenda);
    }
}
