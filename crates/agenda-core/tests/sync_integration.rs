//! Integration tests for display sync over a shared snapshot file.
//!
//! Two engines stand in for two screens at the venue: the leader publishes
//! into a file, the follower reads it and mirrors the leader's position.

use agenda_core::{
    Agenda, AgendaStatus, EngineMode, FileChannel, ManualClock, ScheduleEngine, SyncBroadcaster,
    SyncChannel, SyncMode, SyncSnapshot,
};
use chrono::{Duration, NaiveDate};

const STALENESS_MS: u64 = 3_000;

fn screen(hour: u32, minute: u32) -> (ScheduleEngine, ManualClock) {
    let date = NaiveDate::from_ymd_opt(2025, 9, 19).unwrap();
    let clock = ManualClock::at_local(date, hour, minute, 330).unwrap();
    (ScheduleEngine::new(Agenda::default_conference(), clock.clone()), clock)
}

fn triple(engine: &ScheduleEngine) -> (String, Option<usize>, AgendaStatus) {
    (
        engine.current_day().to_string(),
        engine.current_event_index(),
        engine.status(),
    )
}

#[test]
fn follower_mirrors_every_leader_position() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sync.json");
    let leader_sync = SyncBroadcaster::new(FileChannel::new(&path), SyncMode::Leader, STALENESS_MS);
    let mut follower_sync =
        SyncBroadcaster::new(FileChannel::new(&path), SyncMode::Follower, STALENESS_MS);

    let (mut leader, leader_clock) = screen(8, 0);
    let (mut follower, follower_clock) = screen(8, 0);

    let overrides: [(&str, Option<usize>); 4] = [
        ("Day 1", Some(3)),
        ("Day 1", None),
        ("Inauguration", Some(11)),
        ("Day 2", Some(0)),
    ];
    for (day, index) in overrides {
        leader_clock.advance(Duration::seconds(1));
        follower_clock.advance(Duration::seconds(1));
        leader.set_current_day(day);
        leader.set_event_index(index);

        leader_sync.publish(&leader).unwrap();
        follower_sync.poll(&mut follower).unwrap();
        assert_eq!(triple(&follower), triple(&leader));
        assert_eq!(follower.mode(), EngineMode::Following);
    }
}

#[test]
fn published_file_is_the_wire_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let channel = FileChannel::new(dir.path().join("sync.json"));
    let sync = SyncBroadcaster::new(channel.clone(), SyncMode::Leader, STALENESS_MS)
        .with_source_id("display-lobby");
    let (mut leader, _) = screen(9, 50);
    leader.tick();

    let published = sync.publish(&leader).unwrap();
    let raw = channel.latest().unwrap().unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["current_day"], "Day 1");
    assert_eq!(json["current_event_index"], 3);
    assert_eq!(json["status"], "active");
    assert_eq!(json["current_time"], "09:50:00");
    assert_eq!(json["source"], "display-lobby");
    assert_eq!(SyncSnapshot::from_json(&raw).unwrap(), published);
}

#[test]
fn dead_leader_is_ignored_once_stale() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sync.json");
    let leader_sync = SyncBroadcaster::new(FileChannel::new(&path), SyncMode::Leader, STALENESS_MS);
    let mut follower_sync =
        SyncBroadcaster::new(FileChannel::new(&path), SyncMode::Follower, STALENESS_MS);

    let (mut leader, _) = screen(9, 50);
    let (mut follower, follower_clock) = screen(9, 50);
    leader.set_event_index(Some(5));
    leader_sync.publish(&leader).unwrap();

    // The leader stops publishing; its last file lingers.
    follower_clock.advance(Duration::milliseconds(3_500));
    assert!(!follower_sync.sync(&mut follower).unwrap());
    assert_eq!(follower.mode(), EngineMode::Automatic);

    // The follower carries on by itself.
    follower.tick();
    assert_eq!(follower.current_event_index(), Some(3));
}

#[test]
fn follower_unfreezes_after_leader_dies() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sync.json");
    let leader_sync = SyncBroadcaster::new(FileChannel::new(&path), SyncMode::Leader, STALENESS_MS);
    let mut follower_sync =
        SyncBroadcaster::new(FileChannel::new(&path), SyncMode::Follower, STALENESS_MS);

    let (mut leader, _) = screen(8, 20);
    let (mut follower, follower_clock) = screen(8, 20);
    leader.tick();
    leader_sync.publish(&leader).unwrap();
    assert!(follower_sync.sync(&mut follower).unwrap());
    assert_eq!(triple(&follower), triple(&leader));
    assert_eq!(follower.mode(), EngineMode::Following);

    // Two hours on, the leader's registration snapshot is all that is left.
    follower_clock.advance_minutes(120);
    assert!(follower_sync.sync(&mut follower).unwrap());
    follower.tick();
    assert_eq!(follower.mode(), EngineMode::Automatic);
    assert_eq!(follower.current_event_index(), Some(3));
    assert_eq!(follower.status(), AgendaStatus::Active);
    assert_eq!(follower.current_event().unwrap().title, "Panel Discussion 1: E-Government 5.0");
}

#[test]
fn follower_can_leave_and_rejoin() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sync.json");
    let leader_sync = SyncBroadcaster::new(FileChannel::new(&path), SyncMode::Leader, STALENESS_MS);
    let mut follower_sync =
        SyncBroadcaster::new(FileChannel::new(&path), SyncMode::Follower, STALENESS_MS);

    let (mut leader, leader_clock) = screen(9, 50);
    let (mut follower, follower_clock) = screen(9, 50);
    leader.set_event_index(Some(1));
    leader_sync.publish(&leader).unwrap();
    assert!(follower_sync.poll(&mut follower).unwrap());

    follower.reset_to_real_time();
    assert_eq!(follower.mode(), EngineMode::Automatic);
    assert_eq!(follower.current_event_index(), Some(3));

    leader_clock.advance(Duration::seconds(1));
    follower_clock.advance(Duration::seconds(1));
    leader_sync.publish(&leader).unwrap();
    assert!(follower_sync.poll(&mut follower).unwrap());
    assert_eq!(follower.current_event_index(), Some(1));
    assert_eq!(follower.mode(), EngineMode::Following);
}
