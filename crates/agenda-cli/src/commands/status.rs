use agenda_core::Config;

use super::resolved_engine;

pub fn run(day: Option<&str>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let engine = resolved_engine(&config, day)?;
    println!("{}", serde_json::to_string_pretty(&engine.status_snapshot())?);
    Ok(())
}

pub fn diagnostics() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let engine = resolved_engine(&config, None)?;
    println!("{}", serde_json::to_string_pretty(&engine.diagnostics())?);
    Ok(())
}
