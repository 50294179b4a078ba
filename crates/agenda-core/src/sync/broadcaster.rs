//! Publishes local status and applies peer status.

use chrono::Duration;

use super::channel::SyncChannel;
use super::types::{new_display_id, SyncError, SyncMode, SyncSnapshot};
use crate::engine::ScheduleEngine;
use crate::snapshot::EngineMode;

/// One display's endpoint on a sync channel.
pub struct SyncBroadcaster {
    channel: Box<dyn SyncChannel>,
    mode: SyncMode,
    staleness: Duration,
    source_id: String,
    /// Last snapshot applied, so a follower re-reading an unchanged channel
    /// does not re-apply the same message.
    last_applied: Option<SyncSnapshot>,
}

impl SyncBroadcaster {
    pub fn new(channel: impl SyncChannel + 'static, mode: SyncMode, staleness_ms: u64) -> Self {
        Self {
            channel: Box::new(channel),
            mode,
            staleness: Duration::milliseconds(i64::try_from(staleness_ms).unwrap_or(i64::MAX)),
            source_id: new_display_id(),
            last_applied: None,
        }
    }

    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = source_id.into();
        self
    }

    pub fn mode(&self) -> SyncMode {
        self.mode
    }

    pub fn source_id(&self) -> &str {
        &self.source_id
    }

    /// Write the engine's current status to the channel.
    pub fn publish(&self, engine: &ScheduleEngine) -> Result<SyncSnapshot, SyncError> {
        let snapshot = SyncSnapshot::from_status(&engine.status_snapshot(), self.source_id.clone());
        self.channel.publish(&snapshot.to_json()?)?;
        tracing::debug!(
            day = %snapshot.current_day,
            status = %snapshot.status,
            index = ?snapshot.current_event_index,
            "published sync snapshot"
        );
        Ok(snapshot)
    }

    /// Apply the newest peer snapshot, if it is fresh and not our own.
    ///
    /// A following engine whose leader has gone quiet (nothing published, or
    /// only stale snapshots) goes back to real time. Returns whether the
    /// engine changed.
    pub fn poll(&mut self, engine: &mut ScheduleEngine) -> Result<bool, SyncError> {
        let Some(raw) = self.channel.latest()? else {
            return Ok(Self::release(engine));
        };
        let snapshot = SyncSnapshot::from_json(&raw)?;
        if snapshot.source == self.source_id {
            return Ok(false);
        }
        if !snapshot.is_fresh(engine.now_utc(), self.staleness) {
            tracing::debug!(
                source = %snapshot.source,
                at = %snapshot.timestamp,
                "ignoring stale sync snapshot"
            );
            return Ok(Self::release(engine));
        }
        if self.last_applied.as_ref() == Some(&snapshot) {
            return Ok(false);
        }
        let changed = engine.apply_peer_state(
            &snapshot.current_day,
            snapshot.current_event_index,
            snapshot.status,
            &snapshot.source,
        );
        self.last_applied = Some(snapshot);
        Ok(changed)
    }

    fn release(engine: &mut ScheduleEngine) -> bool {
        if engine.mode() != EngineMode::Following {
            return false;
        }
        tracing::info!(day = %engine.current_day(), "leader went quiet, resuming real time");
        engine.reset_to_real_time();
        true
    }

    /// Do whatever this display's role calls for. Returns whether the local
    /// engine changed (only ever for followers).
    pub fn sync(&mut self, engine: &mut ScheduleEngine) -> Result<bool, SyncError> {
        match self.mode {
            SyncMode::Off => Ok(false),
            SyncMode::Leader => self.publish(engine).map(|_| false),
            SyncMode::Follower => self.poll(engine),
        }
    }
}
