use agenda_core::agenda::{format_hhmm, parse_time_of_day};
use agenda_core::{resolve, AgendaStatus, Config};
use serde_json::json;

use super::{engine_from_config, resolved_engine, unknown_day};

pub fn days(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let engine = engine_from_config(&config);
    let agenda = engine.agenda();

    if json {
        let days: Vec<_> = agenda
            .days
            .iter()
            .map(|d| {
                json!({
                    "name": d.name,
                    "date": d.calendar_date,
                    "items": d.len(),
                    "current": d.name == engine.current_day(),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&days)?);
        return Ok(());
    }

    for day in &agenda.days {
        let marker = if day.name == engine.current_day() { "*" } else { " " };
        println!(
            "{marker} {:<14} {}  {} items",
            day.name,
            day.calendar_date,
            day.len()
        );
    }
    Ok(())
}

pub fn run(day: Option<&str>, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let engine = resolved_engine(&config, day)?;

    if json {
        println!("{}", serde_json::to_string_pretty(engine.items())?);
        return Ok(());
    }

    println!("{}", engine.current_day());
    if engine.items().is_empty() {
        println!("  (no events scheduled)");
    }
    for (i, item) in engine.items().iter().enumerate() {
        let on_now = engine.status() == AgendaStatus::Active
            && engine.current_event_index() == Some(i);
        let marker = if on_now { ">" } else { " " };
        let speaker = item
            .speaker
            .as_deref()
            .map(|s| format!(" ({s})"))
            .unwrap_or_default();
        println!(
            "{marker} {:>8}  {}-{}  {}{speaker}",
            item.display_time,
            format_hhmm(item.start_minutes),
            format_hhmm(item.end_minutes()),
            item.title,
        );
    }
    Ok(())
}

pub fn resolve_at(day: &str, at: &str) -> Result<(), Box<dyn std::error::Error>> {
    let minutes =
        parse_time_of_day(at).ok_or_else(|| format!("invalid time '{at}', expected HH:MM"))?;
    let config = Config::load()?;
    let engine = engine_from_config(&config);
    let Some(schedule) = engine.agenda().day(day) else {
        return Err(unknown_day(day, &engine).into());
    };

    let items = schedule.items.as_slice();
    let resolution = resolve(items, minutes);
    let title = |index: Option<usize>| {
        index
            .and_then(|i| items.get(i))
            .map(|item| item.title.clone())
    };
    let output = json!({
        "day": day,
        "at": format_hhmm(minutes),
        "status": resolution.status,
        "event_index": resolution.event_index,
        "event": title(resolution.event_index),
        "next_index": resolution.next_index,
        "next_event": title(resolution.next_index),
        "minutes_until_next": resolution.minutes_until_next,
        "message": resolution.describe(day, items),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
