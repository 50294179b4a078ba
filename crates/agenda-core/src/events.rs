use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::resolver::AgendaStatus;

/// Every state change in the engine produces an Event.
/// The runtime forwards them to subscribers; diagnostics keep the last few.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The displayed day switched, either by calendar rollover or operator.
    DayChanged {
        from: String,
        to: String,
        manual: bool,
        at: DateTime<Utc>,
    },
    /// Real-time resolution moved to a different item or status.
    AgendaChanged {
        day: String,
        from_index: Option<usize>,
        from_status: AgendaStatus,
        to_index: Option<usize>,
        to_status: AgendaStatus,
        at: DateTime<Utc>,
    },
    /// Operator picked an item by hand.
    ManualOverride {
        day: String,
        index: Option<usize>,
        at: DateTime<Utc>,
    },
    /// Manual or follower mode ended; the clock drives the display again.
    ResetToRealTime {
        day: String,
        at: DateTime<Utc>,
    },
    /// State was forced from a peer display's snapshot.
    SnapshotApplied {
        source: String,
        day: String,
        index: Option<usize>,
        status: AgendaStatus,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::DayChanged { at, .. }
            | Event::AgendaChanged { at, .. }
            | Event::ManualOverride { at, .. }
            | Event::ResetToRealTime { at, .. }
            | Event::SnapshotApplied { at, .. } => *at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_are_tagged_by_type() {
        let event = Event::DayChanged {
            from: "Inauguration".into(),
            to: "Day 1".into(),
            manual: false,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "DayChanged");
        assert_eq!(json["to"], "Day 1");
        let back: Event = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
