use serde::{Deserialize, Serialize};

/// What kind of session an item is. Purely descriptive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Ceremony,
    Address,
    Keynote,
    Panel,
    Workshop,
    Break,
    Registration,
    Awards,
    Closing,
    Conclusion,
    #[serde(other)]
    Other,
}

/// One scheduled session.
///
/// Built once when the agenda is loaded. `start_minutes` is derived from the
/// configured `HH:MM` string; a malformed string becomes minute 0 with a
/// warning instead of failing the whole schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "AgendaItemDef", into = "AgendaItemDef")]
pub struct AgendaItem {
    /// Minutes since local midnight.
    pub start_minutes: u32,
    /// The configured `HH:MM` start, as written.
    pub time: String,
    /// Human label such as `8:15 AM`. Not authoritative.
    pub display_time: String,
    pub title: String,
    pub description: String,
    pub duration_min: u32,
    pub speaker: Option<String>,
    pub kind: Option<SessionKind>,
}

/// On-disk shape of an [`AgendaItem`].
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AgendaItemDef {
    time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_time: Option<String>,
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    duration_min: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    speaker: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    kind: Option<SessionKind>,
}

impl From<AgendaItemDef> for AgendaItem {
    fn from(def: AgendaItemDef) -> Self {
        let start_minutes = time_to_minutes(&def.time);
        let display_time = def
            .display_time
            .unwrap_or_else(|| display_label(start_minutes));
        Self {
            start_minutes,
            time: def.time,
            display_time,
            title: def.title,
            description: def.description,
            duration_min: def.duration_min,
            speaker: def.speaker,
            kind: def.kind,
        }
    }
}

impl From<AgendaItem> for AgendaItemDef {
    fn from(item: AgendaItem) -> Self {
        Self {
            time: item.time,
            display_time: Some(item.display_time),
            title: item.title,
            description: item.description,
            duration_min: item.duration_min,
            speaker: item.speaker,
            kind: item.kind,
        }
    }
}

impl AgendaItem {
    /// Create an item from a `HH:MM` start time.
    pub fn new(time: &str, title: impl Into<String>, duration_min: u32) -> Self {
        AgendaItemDef {
            time: time.to_string(),
            display_time: None,
            title: title.into(),
            description: String::new(),
            duration_min,
            speaker: None,
            kind: None,
        }
        .into()
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_speaker(mut self, speaker: impl Into<String>) -> Self {
        self.speaker = Some(speaker.into());
        self
    }

    pub fn with_kind(mut self, kind: SessionKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// First minute after the item. Equal to the start for zero-length markers.
    pub fn end_minutes(&self) -> u32 {
        self.start_minutes.saturating_add(self.duration_min)
    }

    /// Whether `minute` falls inside `[start, end)`.
    pub fn contains(&self, minute: u32) -> bool {
        self.start_minutes <= minute && minute < self.end_minutes()
    }

    /// Whether the configured start string parsed cleanly.
    pub fn has_valid_time(&self) -> bool {
        parse_time_of_day(&self.time).is_some()
    }
}

/// Parse `HH:MM` (24-hour) into minutes since midnight.
pub fn parse_time_of_day(s: &str) -> Option<u32> {
    let (h, m) = s.trim().split_once(':')?;
    let all_digits = |p: &str| !p.is_empty() && p.bytes().all(|b| b.is_ascii_digit());
    if !all_digits(h) || !all_digits(m) {
        return None;
    }
    let (hours, minutes) = (h.parse::<u32>().ok()?, m.parse::<u32>().ok()?);
    if hours > 23 || minutes > 59 {
        return None;
    }
    Some(hours * 60 + minutes)
}

/// Lenient variant of [`parse_time_of_day`]: malformed input maps to 0.
pub fn time_to_minutes(s: &str) -> u32 {
    parse_time_of_day(s).unwrap_or_else(|| {
        tracing::warn!(time = s, "invalid time string in schedule, treating as 00:00");
        0
    })
}

/// `HH:MM` for a minute-of-day.
pub fn format_hhmm(minutes: u32) -> String {
    format!("{:02}:{:02}", (minutes / 60) % 24, minutes % 60)
}

/// 12-hour label, e.g. `8:15 AM`, `12:00 PM`.
pub fn display_label(minutes: u32) -> String {
    let (h, m) = ((minutes / 60) % 24, minutes % 60);
    let suffix = if h < 12 { "AM" } else { "PM" };
    let h12 = match h % 12 {
        0 => 12,
        other => other,
    };
    format!("{h12}:{m:02} {suffix}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_valid_times() {
        assert_eq!(parse_time_of_day("08:00"), Some(480));
        assert_eq!(parse_time_of_day("8:45"), Some(525));
        assert_eq!(parse_time_of_day("23:59"), Some(1439));
        assert_eq!(parse_time_of_day(" 00:00 "), Some(0));
    }

    #[test]
    fn rejects_malformed_times() {
        for bad in ["", "12", "24:00", "12:60", "ab:cd", "-1:30", "12:3x", "12:"] {
            assert_eq!(parse_time_of_day(bad), None, "{bad}");
        }
    }

    #[test]
    fn malformed_time_defaults_to_midnight() {
        let item = AgendaItem::new("noon", "Lunch", 60);
        assert_eq!(item.start_minutes, 0);
        assert!(!item.has_valid_time());
    }

    #[test]
    fn display_labels_use_twelve_hour_clock() {
        assert_eq!(display_label(0), "12:00 AM");
        assert_eq!(display_label(495), "8:15 AM");
        assert_eq!(display_label(720), "12:00 PM");
        assert_eq!(display_label(810), "1:30 PM");
        assert_eq!(format_hhmm(1020), "17:00");
    }

    #[test]
    fn zero_duration_item_contains_nothing() {
        let item = AgendaItem::new("17:00", "Conclusion", 0);
        assert_eq!(item.end_minutes(), 1020);
        assert!(!item.contains(1020));
    }

    #[test]
    fn deserializes_with_derived_fields() {
        let item: AgendaItem = serde_json::from_str(
            r#"{"time":"14:15","title":"Networking Break","duration_min":30,"kind":"break"}"#,
        )
        .unwrap();
        assert_eq!(item.start_minutes, 855);
        assert_eq!(item.display_time, "2:15 PM");
        assert_eq!(item.kind, Some(SessionKind::Break));
        assert!(item.description.is_empty());
    }

    #[test]
    fn unknown_kind_maps_to_other() {
        let item: AgendaItem =
            serde_json::from_str(r#"{"time":"09:00","title":"Demo","kind":"hackathon"}"#).unwrap();
        assert_eq!(item.kind, Some(SessionKind::Other));
        assert_eq!(item.duration_min, 0);
    }
}
