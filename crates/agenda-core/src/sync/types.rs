//! Core types for cross-display synchronization.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::resolver::AgendaStatus;
use crate::snapshot::StatusSnapshot;

/// Snapshots older than this are ignored by followers.
pub const DEFAULT_STALENESS_MS: u64 = 3_000;

const DISPLAY_ID_PREFIX: &str = "display-";

/// Role of this display on the sync channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Neither publish nor follow.
    #[default]
    Off,
    /// Publish local status for peers.
    Leader,
    /// Apply peer status to the local engine.
    Follower,
}

impl std::str::FromStr for SyncMode {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "off" => Ok(SyncMode::Off),
            "leader" => Ok(SyncMode::Leader),
            "follower" => Ok(SyncMode::Follower),
            other => Err(SyncError::UnknownMode(other.to_string())),
        }
    }
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            SyncMode::Off => "off",
            SyncMode::Leader => "leader",
            SyncMode::Follower => "follower",
        })
    }
}

/// What a display puts on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSnapshot {
    pub current_event_index: Option<usize>,
    pub status: AgendaStatus,
    pub current_day: String,
    /// Venue-local `HH:MM:SS` at publish time.
    pub current_time: String,
    pub timestamp: DateTime<Utc>,
    /// Publishing display; lets a display skip its own messages.
    pub source: String,
}

impl SyncSnapshot {
    pub fn from_status(status: &StatusSnapshot, source: impl Into<String>) -> Self {
        Self {
            current_event_index: status.current_event_index,
            status: status.status,
            current_day: status.current_day.clone(),
            current_time: status.current_time.clone(),
            timestamp: status.taken_at,
            source: source.into(),
        }
    }

    /// Younger than `staleness`. Snapshots stamped further in the future
    /// than `staleness` are rejected too, since their clock is not trusted.
    pub fn is_fresh(&self, now: DateTime<Utc>, staleness: Duration) -> bool {
        let age = now - self.timestamp;
        age < staleness && age > -staleness
    }

    pub fn to_json(&self) -> Result<String, SyncError> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, SyncError> {
        Ok(serde_json::from_str(raw)?)
    }
}

/// Fresh identifier for one running display, e.g. `display-5f0c…`.
///
/// Not persisted: two displays on the same machine must not share one.
pub fn new_display_id() -> String {
    format!("{DISPLAY_ID_PREFIX}{}", Uuid::new_v4())
}

/// Sync error types.
#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Sync channel lock poisoned")]
    Poisoned,

    #[error("Unknown sync mode '{0}' (expected off, leader or follower)")]
    UnknownMode(String),
}
