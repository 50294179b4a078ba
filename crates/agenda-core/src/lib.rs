//! # Agenda Core Library
//!
//! This library provides the core logic for a conference agenda display. It
//! answers "what is on now" from a multi-day agenda and a venue wall clock.
//! All operations are available through the standalone `agenda` CLI binary,
//! which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Resolver**: Pure functions mapping a date to a conference day and a
//!   minute of the day to an item and status
//! - **Schedule Engine**: A wall-clock-based state machine that requires the
//!   caller to periodically invoke `tick()` and `check_day()`
//! - **Runtime**: A tokio task that owns one engine and drives those calls
//! - **Sync**: Leader/follower snapshot exchange between displays
//! - **Storage**: TOML-based configuration
//!
//! ## Key Components
//!
//! - [`ScheduleEngine`]: Core display state machine
//! - [`Agenda`]: Days and items the engine runs on
//! - [`DisplayRunner`]: Async driver with an [`EngineHandle`] for overrides
//! - [`SyncBroadcaster`]: Cross-display snapshot publishing and following
//! - [`Config`]: Display configuration management

pub mod agenda;
pub mod clock;
pub mod engine;
pub mod error;
pub mod events;
pub mod history;
pub mod resolver;
pub mod runtime;
pub mod snapshot;
pub mod storage;
pub mod sync;

pub use agenda::{Agenda, AgendaItem, DayKey, DaySchedule, SessionKind};
pub use clock::{Clock, ClockReading, ManualClock, SystemClock};
pub use engine::{EngineState, ScheduleEngine};
pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use history::{TransitionCause, TransitionLog, TransitionRecord};
pub use resolver::{resolve, resolve_day, AgendaStatus, Resolution};
pub use runtime::{DisplayRunner, EngineHandle, RunnerConfig, RuntimeError};
pub use snapshot::{CurrentEvent, DayDate, Diagnostics, EngineMode, StatusSnapshot};
pub use storage::Config;
pub use sync::{
    FileChannel, MemoryChannel, SyncBroadcaster, SyncChannel, SyncError, SyncMode, SyncSnapshot,
};
