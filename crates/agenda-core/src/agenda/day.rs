use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::item::AgendaItem;
use crate::error::ValidationError;

/// One named day of the event and its ordered sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    pub name: String,
    pub calendar_date: NaiveDate,
    #[serde(default)]
    pub items: Vec<AgendaItem>,
}

impl DaySchedule {
    pub fn new(name: impl Into<String>, calendar_date: NaiveDate, items: Vec<AgendaItem>) -> Self {
        Self {
            name: name.into(),
            calendar_date,
            items,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn item(&self, index: usize) -> Option<&AgendaItem> {
        self.items.get(index)
    }

    /// End of the last session, if any.
    pub fn ends_at(&self) -> Option<u32> {
        self.items.last().map(AgendaItem::end_minutes)
    }

    /// Check the ordering assumptions the resolver relies on.
    ///
    /// The engine does not enforce these; this is for operators checking a
    /// configuration before the event.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut problems = Vec::new();
        for (index, item) in self.items.iter().enumerate() {
            if !item.has_valid_time() {
                problems.push(ValidationError::MalformedTime {
                    day: self.name.clone(),
                    index,
                    time: item.time.clone(),
                });
            }
            let Some(previous) = index.checked_sub(1).and_then(|p| self.items.get(p)) else {
                continue;
            };
            if item.start_minutes < previous.start_minutes {
                problems.push(ValidationError::UnsortedItems {
                    day: self.name.clone(),
                    index,
                });
            } else if item.start_minutes < previous.end_minutes() {
                problems.push(ValidationError::OverlappingItems {
                    day: self.name.clone(),
                    index,
                    previous: index - 1,
                });
            }
        }
        problems
    }
}
