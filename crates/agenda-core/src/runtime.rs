//! Async driver for one display.
//!
//! [`DisplayRunner`] moves a [`ScheduleEngine`] into a tokio task and owns it
//! there. The task multiplexes the tick interval, the day-check interval,
//! the sync interval and an override command channel, so the engine only
//! ever has one writer. Everyone else talks to it through an
//! [`EngineHandle`] and receives copies.
//!
//! ```ignore
//! let (handle, task) = DisplayRunner::new(engine, RunnerConfig::default()).spawn();
//! let mut status = handle.watch_status();
//! while status.changed().await.is_ok() {
//!     render(&status.borrow());
//! }
//! ```

use std::collections::BTreeMap;
use std::time::Duration;

use chrono::NaiveDate;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval, Interval, MissedTickBehavior};

use crate::agenda::DayKey;
use crate::engine::ScheduleEngine;
use crate::events::Event;
use crate::snapshot::{Diagnostics, StatusSnapshot};
use crate::storage::Config;
use crate::sync::{SyncBroadcaster, SyncMode};

const COMMAND_BUFFER: usize = 32;
const EVENT_BUFFER: usize = 64;

/// Periods of the runner's background work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunnerConfig {
    pub tick_interval: Duration,
    pub day_check_interval: Duration,
    pub publish_interval: Duration,
    pub poll_interval: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(1),
            day_check_interval: Duration::from_secs(60),
            publish_interval: Duration::from_secs(1),
            poll_interval: Duration::from_secs(2),
        }
    }
}

impl From<&Config> for RunnerConfig {
    fn from(config: &Config) -> Self {
        Self {
            tick_interval: Duration::from_millis(config.engine.tick_interval_ms),
            day_check_interval: Duration::from_secs(config.engine.day_check_interval_secs),
            publish_interval: Duration::from_millis(config.sync.publish_interval_ms),
            poll_interval: Duration::from_millis(config.sync.poll_interval_ms),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    #[error("display runner has stopped")]
    Stopped,
}

enum Command {
    SetDay {
        day: DayKey,
        reply: oneshot::Sender<bool>,
    },
    SetEventIndex {
        index: Option<usize>,
        reply: oneshot::Sender<bool>,
    },
    Next {
        reply: oneshot::Sender<bool>,
    },
    Previous {
        reply: oneshot::Sender<bool>,
    },
    ResetToRealTime {
        reply: oneshot::Sender<bool>,
    },
    UpdateDates {
        dates: BTreeMap<DayKey, NaiveDate>,
        reply: oneshot::Sender<bool>,
    },
    Snapshot {
        reply: oneshot::Sender<StatusSnapshot>,
    },
    Diagnostics {
        reply: oneshot::Sender<Box<Diagnostics>>,
    },
    Shutdown,
}

/// Owns the engine until the task ends.
pub struct DisplayRunner {
    engine: ScheduleEngine,
    sync: Option<SyncBroadcaster>,
    config: RunnerConfig,
}

impl DisplayRunner {
    pub fn new(engine: ScheduleEngine, config: RunnerConfig) -> Self {
        Self {
            engine,
            sync: None,
            config,
        }
    }

    /// Publish or follow over `sync`. A broadcaster in `Off` mode is dropped.
    pub fn with_sync(mut self, sync: SyncBroadcaster) -> Self {
        self.sync = (sync.mode() != SyncMode::Off).then_some(sync);
        self
    }

    /// Start the task. It stops on [`EngineHandle::shutdown`] or once every
    /// handle is dropped, and yields the engine back.
    pub fn spawn(self) -> (EngineHandle, JoinHandle<ScheduleEngine>) {
        let (command_tx, command_rx) = mpsc::channel(COMMAND_BUFFER);
        let (status_tx, status_rx) = watch::channel(self.engine.status_snapshot());
        let (events_tx, _) = broadcast::channel(EVENT_BUFFER);
        let handle = EngineHandle {
            commands: command_tx,
            status: status_rx,
            events: events_tx.clone(),
        };
        let task = tokio::spawn(self.run(command_rx, status_tx, events_tx));
        (handle, task)
    }

    async fn run(
        mut self,
        mut commands: mpsc::Receiver<Command>,
        status_tx: watch::Sender<StatusSnapshot>,
        events_tx: broadcast::Sender<Event>,
    ) -> ScheduleEngine {
        let sync_period = match self.sync.as_ref().map(SyncBroadcaster::mode) {
            Some(SyncMode::Follower) => self.config.poll_interval,
            _ => self.config.publish_interval,
        };
        let mut tick = skipping_interval(self.config.tick_interval);
        let mut day_check = skipping_interval(self.config.day_check_interval);
        let mut sync_timer = skipping_interval(sync_period);

        tracing::info!(
            day = %self.engine.current_day(),
            sync = ?self.sync.as_ref().map(SyncBroadcaster::mode),
            "display runner started"
        );

        loop {
            let changed = tokio::select! {
                _ = tick.tick() => self.engine.tick(),
                _ = day_check.tick() => self.engine.check_day(),
                _ = sync_timer.tick(), if self.sync.is_some() => self.sync_once(),
                command = commands.recv() => match command {
                    Some(Command::Shutdown) | None => break,
                    Some(command) => self.handle(command),
                },
            };

            for event in self.engine.drain_events() {
                // No subscribers is fine.
                let _ = events_tx.send(event);
            }
            if changed {
                status_tx.send_replace(self.engine.status_snapshot());
            }
        }

        tracing::info!(day = %self.engine.current_day(), "display runner stopped");
        self.engine
    }

    fn sync_once(&mut self) -> bool {
        let Some(sync) = self.sync.as_mut() else {
            return false;
        };
        match sync.sync(&mut self.engine) {
            Ok(changed) => changed,
            Err(e) => {
                tracing::warn!(error = %e, mode = %sync.mode(), "display sync failed");
                false
            }
        }
    }

    /// Apply one command. Returns whether the published status should change.
    fn handle(&mut self, command: Command) -> bool {
        fn answer(reply: oneshot::Sender<bool>, changed: bool) -> bool {
            // The caller may have given up waiting.
            let _ = reply.send(changed);
            changed
        }

        match command {
            Command::SetDay { day, reply } => answer(reply, self.engine.set_current_day(&day)),
            Command::SetEventIndex { index, reply } => {
                answer(reply, self.engine.set_event_index(index))
            }
            Command::Next { reply } => answer(reply, self.engine.next_event()),
            Command::Previous { reply } => answer(reply, self.engine.previous_event()),
            Command::ResetToRealTime { reply } => {
                let changed = self.engine.reset_to_real_time();
                let _ = reply.send(changed);
                // The mode changed even when the position did not.
                true
            }
            Command::UpdateDates { dates, reply } => {
                answer(reply, self.engine.update_conference_dates(&dates))
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.engine.status_snapshot());
                false
            }
            Command::Diagnostics { reply } => {
                let _ = reply.send(Box::new(self.engine.diagnostics()));
                false
            }
            Command::Shutdown => false,
        }
    }
}

fn skipping_interval(period: Duration) -> Interval {
    let mut timer = interval(period);
    timer.set_missed_tick_behavior(MissedTickBehavior::Skip);
    timer
}

/// Cheap, cloneable access to a running display.
#[derive(Clone)]
pub struct EngineHandle {
    commands: mpsc::Sender<Command>,
    status: watch::Receiver<StatusSnapshot>,
    events: broadcast::Sender<Event>,
}

impl EngineHandle {
    /// Last published status.
    pub fn status(&self) -> StatusSnapshot {
        self.status.borrow().clone()
    }

    /// Receiver notified whenever the displayed position changes.
    pub fn watch_status(&self) -> watch::Receiver<StatusSnapshot> {
        self.status.clone()
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<T>) -> Command,
    ) -> Result<T, RuntimeError> {
        let (reply, response) = oneshot::channel();
        self.commands
            .send(command(reply))
            .await
            .map_err(|_| RuntimeError::Stopped)?;
        response.await.map_err(|_| RuntimeError::Stopped)
    }

    pub async fn set_current_day(&self, day: impl Into<DayKey>) -> Result<bool, RuntimeError> {
        let day = day.into();
        self.request(|reply| Command::SetDay { day, reply }).await
    }

    pub async fn set_event_index(&self, index: Option<usize>) -> Result<bool, RuntimeError> {
        self.request(|reply| Command::SetEventIndex { index, reply })
            .await
    }

    pub async fn next_event(&self) -> Result<bool, RuntimeError> {
        self.request(|reply| Command::Next { reply }).await
    }

    pub async fn previous_event(&self) -> Result<bool, RuntimeError> {
        self.request(|reply| Command::Previous { reply }).await
    }

    pub async fn reset_to_real_time(&self) -> Result<bool, RuntimeError> {
        self.request(|reply| Command::ResetToRealTime { reply }).await
    }

    pub async fn update_conference_dates(
        &self,
        dates: BTreeMap<DayKey, NaiveDate>,
    ) -> Result<bool, RuntimeError> {
        self.request(|reply| Command::UpdateDates { dates, reply })
            .await
    }

    /// Fresh snapshot taken inside the task, after any queued commands.
    pub async fn snapshot(&self) -> Result<StatusSnapshot, RuntimeError> {
        self.request(|reply| Command::Snapshot { reply }).await
    }

    pub async fn diagnostics(&self) -> Result<Diagnostics, RuntimeError> {
        self.request(|reply| Command::Diagnostics { reply })
            .await
            .map(|d| *d)
    }

    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.commands
            .send(Command::Shutdown)
            .await
            .map_err(|_| RuntimeError::Stopped)
    }
}
