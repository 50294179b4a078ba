pub mod check;
pub mod config;
pub mod run;
pub mod schedule;
pub mod status;

use agenda_core::{Config, ScheduleEngine, SystemClock};

/// Engine on the configured agenda and venue clock.
pub fn engine_from_config(config: &Config) -> ScheduleEngine {
    ScheduleEngine::new(
        config.agenda(),
        SystemClock::new(config.clock.utc_offset_minutes),
    )
    .with_history_capacity(config.engine.history_capacity)
}

/// Engine positioned on `day` (or the detected day) and resolved once.
pub fn resolved_engine(
    config: &Config,
    day: Option<&str>,
) -> Result<ScheduleEngine, Box<dyn std::error::Error>> {
    let mut engine = engine_from_config(config);
    if let Some(day) = day {
        if !engine.set_current_day(day) {
            return Err(unknown_day(day, &engine).into());
        }
    }
    engine.tick();
    Ok(engine)
}

pub fn unknown_day(day: &str, engine: &ScheduleEngine) -> String {
    format!(
        "unknown day '{day}' (configured: {})",
        engine.available_days().join(", ")
    )
}
