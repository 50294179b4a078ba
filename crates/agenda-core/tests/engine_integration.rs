//! Integration tests for the schedule engine on the built-in programme.
//!
//! Drives a full conference day minute by minute through the public API and
//! checks day detection, overrides and configuration-supplied agendas.

use agenda_core::{
    resolve, Agenda, AgendaItem, AgendaStatus, Config, DaySchedule, EngineMode, Event,
    ManualClock, ScheduleEngine,
};
use chrono::NaiveDate;

const IST: i32 = 330;

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 9, day).unwrap()
}

fn conference_at(day: u32, hour: u32, minute: u32) -> (ScheduleEngine, ManualClock) {
    let clock = ManualClock::at_local(date(day), hour, minute, IST).unwrap();
    (ScheduleEngine::new(Agenda::default_conference(), clock.clone()), clock)
}

#[test]
fn builtin_programme_is_valid() {
    let agenda = Agenda::default_conference();
    assert!(agenda.validate().is_empty());
    assert_eq!(agenda.day_names(), vec!["Inauguration", "Day 1", "Day 2"]);
}

#[test]
fn inauguration_afternoon() {
    let (mut engine, clock) = conference_at(18, 12, 25);
    assert_eq!(engine.current_day(), "Inauguration");
    engine.tick();
    assert_eq!(engine.status(), AgendaStatus::Active);
    assert_eq!(engine.current_event().unwrap().title, "Welcome Address");

    // The zero-length conclusion marker closes the day.
    clock.advance_minutes(145); // 14:50
    engine.tick();
    assert_eq!(engine.status(), AgendaStatus::Completed);
    assert_eq!(engine.diagnostics().message, "Inauguration has concluded");
}

#[test]
fn morning_before_doors_open() {
    let (mut engine, _) = conference_at(19, 8, 0);
    assert!(!engine.tick());
    let snapshot = engine.status_snapshot();
    assert_eq!(snapshot.status, AgendaStatus::Waiting);
    assert_eq!(snapshot.minutes_until_next, Some(15));
    assert_eq!(snapshot.next_event.unwrap().title, "Registration & Welcome");
    assert_eq!(engine.diagnostics().message, "Day 1 starts in 15 minutes");
}

#[test]
fn whole_day_walk_only_reports_real_changes() {
    let (mut engine, clock) = conference_at(19, 0, 0);
    let mut changes = 0;
    let mut previous = (engine.current_event_index(), engine.status());

    for _ in 0..24 * 60 {
        let changed = engine.tick();
        let now = (engine.current_event_index(), engine.status());
        assert_eq!(changed, now != previous);
        let expected = resolve(engine.items(), engine.now().minutes_since_midnight);
        assert_eq!(now, (expected.event_index, expected.status));
        if changed {
            changes += 1;
        }
        previous = now;
        clock.advance_minutes(1);
        engine.check_day();
        if engine.current_day() != "Day 1" {
            break;
        }
    }

    // Six back-to-back items, then the day completes.
    assert_eq!(changes, 7);
    assert_eq!(engine.history().len(), 8);
}

#[test]
fn rollover_into_next_day() {
    let (mut engine, clock) = conference_at(19, 23, 59);
    engine.tick();
    assert_eq!(engine.status(), AgendaStatus::Completed);

    clock.advance_minutes(1);
    assert!(engine.check_day());
    assert_eq!(engine.current_day(), "Day 2");
    assert_eq!(engine.status(), AgendaStatus::Waiting);
    assert_eq!(engine.current_event_index(), None);
    assert!(engine
        .drain_events()
        .iter()
        .any(|e| matches!(e, Event::DayChanged { to, .. } if to == "Day 2")));
}

#[test]
fn manual_override_then_reset_matches_fresh_resolution() {
    let (mut engine, clock) = conference_at(19, 9, 10);
    engine.tick();
    assert!(engine.set_event_index(Some(2)));
    assert_eq!(engine.mode(), EngineMode::Manual);

    clock.advance_minutes(100); // 10:50
    assert!(!engine.tick());
    engine.reset_to_real_time();

    let fresh = resolve(engine.items(), engine.now().minutes_since_midnight);
    assert_eq!(engine.current_event_index(), fresh.event_index);
    assert_eq!(engine.status(), fresh.status);
    assert_eq!(engine.current_event().unwrap().title, "Morning Tea & Networking");
}

#[test]
fn operator_previews_another_day() {
    let (mut engine, _) = conference_at(19, 9, 10);
    engine.tick();
    assert!(engine.set_current_day("Day 2"));
    assert_eq!(engine.current_event_index(), None);
    assert_eq!(engine.status(), AgendaStatus::Waiting);
    engine.tick();
    // 09:10 on Day 2's programme: the guest speech is on.
    assert_eq!(engine.status(), AgendaStatus::Active);
    assert_eq!(engine.current_event_index(), Some(1));
}

#[test]
fn diagnostics_serialize_for_operators() {
    let (mut engine, _) = conference_at(19, 9, 50);
    engine.tick();
    let json = serde_json::to_value(engine.diagnostics()).unwrap();
    assert_eq!(json["current_day"], "Day 1");
    assert_eq!(json["status"], "active");
    assert_eq!(json["mode"], "automatic");
    assert_eq!(json["current_event"]["index"], 3);
    assert_eq!(json["current_event"]["progress_pct"], 8);
    assert_eq!(json["conference_dates"][0]["date"], "2025-09-18");
}

#[test]
fn agenda_from_config_file_drives_the_engine() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        r#"
[clock]
utc_offset_minutes = 0

[[custom_agenda.days]]
name = "Workshop Day"
calendar_date = "2026-03-02"

[[custom_agenda.days.items]]
time = "10:00"
title = "Hands-on Lab"
duration_min = 90
kind = "workshop"

[[custom_agenda.days.items]]
time = "12:00"
title = "Lunch"
duration_min = 45
kind = "break"
"#,
    )
    .unwrap();

    let config = Config::load_from(&path).unwrap();
    let day = NaiveDate::from_ymd_opt(2026, 3, 2).unwrap();
    let clock = ManualClock::at_local(day, 11, 45, config.clock.utc_offset_minutes).unwrap();
    let mut engine = ScheduleEngine::new(config.agenda(), clock)
        .with_history_capacity(config.engine.history_capacity);

    engine.tick();
    assert_eq!(engine.current_day(), "Workshop Day");
    assert_eq!(engine.status(), AgendaStatus::Between);
    assert_eq!(engine.current_event_index(), Some(0));
    assert_eq!(engine.status_snapshot().minutes_until_next, Some(15));
}

#[test]
fn malformed_times_degrade_instead_of_failing() {
    let agenda = Agenda::new(vec![DaySchedule::new(
        "Day 1",
        date(19),
        vec![
            AgendaItem::new("25:00", "Broken", 30),
            AgendaItem::new("09:00", "Keynote", 30),
        ],
    )]);
    assert!(!agenda.validate().is_empty());

    let clock = ManualClock::at_local(date(19), 0, 10, IST).unwrap();
    let mut engine = ScheduleEngine::new(agenda, clock);
    engine.tick();
    // The broken item sits at midnight.
    assert_eq!(engine.status(), AgendaStatus::Active);
    assert_eq!(engine.current_event_index(), Some(0));
}
