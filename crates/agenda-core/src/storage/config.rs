//! TOML-based display configuration.
//!
//! Stores:
//! - Venue clock offset
//! - Engine tick and day-check intervals
//! - Cross-display sync role and channel
//! - An optional custom agenda replacing the built-in programme
//!
//! Configuration is stored at `~/.config/agenda-display/config.toml`.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::data_dir;
use crate::agenda::Agenda;
use crate::clock::DEFAULT_UTC_OFFSET_MINUTES;
use crate::error::ConfigError;
use crate::history::DEFAULT_HISTORY_CAPACITY;
use crate::sync::{SyncMode, DEFAULT_STALENESS_MS};

/// Venue clock configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClockConfig {
    /// Minutes east of UTC. 330 is India Standard Time.
    #[serde(default = "default_utc_offset_minutes")]
    pub utc_offset_minutes: i32,
}

/// Periodic work of the display runner.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
    #[serde(default = "default_day_check_interval_secs")]
    pub day_check_interval_secs: u64,
    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,
}

/// Cross-display sync configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub mode: SyncMode,
    /// Shared snapshot file. Defaults to `sync.json` in the data directory.
    #[serde(default)]
    pub channel_file: Option<PathBuf>,
    #[serde(default = "default_publish_interval_ms")]
    pub publish_interval_ms: u64,
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    #[serde(default = "default_staleness_ms")]
    pub staleness_ms: u64,
}

/// Display configuration.
///
/// Serialized to/from TOML at `~/.config/agenda-display/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub clock: ClockConfig,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub sync: SyncConfig,
    /// Agenda override. The built-in programme is used when absent.
    #[serde(default)]
    pub custom_agenda: Option<Agenda>,
}

// Default functions
fn default_utc_offset_minutes() -> i32 {
    DEFAULT_UTC_OFFSET_MINUTES
}
fn default_tick_interval_ms() -> u64 {
    1_000
}
fn default_day_check_interval_secs() -> u64 {
    60
}
fn default_history_capacity() -> usize {
    DEFAULT_HISTORY_CAPACITY
}
fn default_publish_interval_ms() -> u64 {
    1_000
}
fn default_poll_interval_ms() -> u64 {
    2_000
}
fn default_staleness_ms() -> u64 {
    DEFAULT_STALENESS_MS
}

impl Default for ClockConfig {
    fn default() -> Self {
        Self {
            utc_offset_minutes: default_utc_offset_minutes(),
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            day_check_interval_secs: default_day_check_interval_secs(),
            history_capacity: default_history_capacity(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            mode: SyncMode::Off,
            channel_file: None,
            publish_interval_ms: default_publish_interval_ms(),
            poll_interval_ms: default_poll_interval_ms(),
            staleness_ms: default_staleness_ms(),
        }
    }
}

impl Config {
    fn get_json_value_by_path<'a>(
        root: &'a serde_json::Value,
        key: &str,
    ) -> Option<&'a serde_json::Value> {
        if key.is_empty() {
            return None;
        }

        let mut current = root;
        for part in key.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    fn set_json_value_by_path(
        root: &mut serde_json::Value,
        key: &str,
        value: &str,
    ) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let unknown = || ConfigError::UnknownKey(key.to_string());

        let mut parts = key.split('.').peekable();
        if key.is_empty() {
            return Err(unknown());
        }

        let mut current = root;
        while let Some(part) = parts.next() {
            if parts.peek().is_some() {
                current = current.get_mut(part).ok_or_else(unknown)?;
                continue;
            }

            let obj = current.as_object_mut().ok_or_else(unknown)?;
            let existing = obj.get(part).ok_or_else(unknown)?;
            let new_value = match existing {
                serde_json::Value::Bool(_) => serde_json::Value::Bool(
                    value.parse::<bool>().map_err(|e| invalid(e.to_string()))?,
                ),
                serde_json::Value::Number(_) => {
                    if let Ok(n) = value.parse::<i64>() {
                        serde_json::Value::Number(n.into())
                    } else {
                        return Err(invalid(format!("cannot parse '{value}' as integer")));
                    }
                }
                serde_json::Value::Object(_) | serde_json::Value::Array(_) => {
                    serde_json::from_str(value).map_err(|e| invalid(e.to_string()))?
                }
                // Unset optional: structured JSON if it parses, plain text otherwise.
                serde_json::Value::Null => serde_json::from_str(value)
                    .unwrap_or_else(|_| serde_json::Value::String(value.into())),
                serde_json::Value::String(_) => serde_json::Value::String(value.into()),
            };

            obj.insert(part.to_string(), new_value);
            return Ok(());
        }

        Err(unknown())
    }

    pub fn path() -> Result<PathBuf, ConfigError> {
        Ok(data_dir()?.join("config.toml"))
    }

    /// Load from disk, writing the defaults on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if the config file exists but cannot be parsed,
    /// or if the default config cannot be written to disk.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&Self::path()?)
    }

    /// Like [`Config::load`] for an explicit file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                let cfg: Config = toml::from_str(&content).map_err(|e| ConfigError::LoadFailed {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                })?;
                cfg.validate()?;
                Ok(cfg)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let cfg = Self::default();
                cfg.save_to(path)?;
                tracing::info!(path = %path.display(), "wrote default configuration");
                Ok(cfg)
            }
            Err(e) => Err(ConfigError::LoadFailed {
                path: path.to_path_buf(),
                message: e.to_string(),
            }),
        }
    }

    /// Persist to disk.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written to disk.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |message: String| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message,
        };
        let content = toml::to_string_pretty(self).map_err(|e| save_failed(e.to_string()))?;
        std::fs::write(path, content).map_err(|e| save_failed(e.to_string()))?;
        Ok(())
    }

    /// Get a config value as string by dot-separated key.
    pub fn get(&self, key: &str) -> Option<String> {
        let json = serde_json::to_value(self).ok()?;
        let val = Self::get_json_value_by_path(&json, key)?;
        match val {
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }

    /// Change a value by dot-separated key without saving.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown or the value does not fit it.
    pub fn update(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: key.to_string(),
            message,
        };
        let mut json = serde_json::to_value(&*self).map_err(|e| invalid(e.to_string()))?;
        Self::set_json_value_by_path(&mut json, key, value)?;
        let updated: Config = serde_json::from_value(json).map_err(|e| invalid(e.to_string()))?;
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Set a config value by key and save. Returns error if key is unknown.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is unknown, the value cannot be parsed,
    /// or the config cannot be saved.
    pub fn set(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.update(key, value)?;
        self.save()
    }

    /// Range checks serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |key: &str, message: &str| {
            Err(ConfigError::InvalidValue {
                key: key.to_string(),
                message: message.to_string(),
            })
        };
        if !(-720..=840).contains(&self.clock.utc_offset_minutes) {
            return invalid("clock.utc_offset_minutes", "must be between -720 and 840");
        }
        if self.engine.tick_interval_ms == 0 {
            return invalid("engine.tick_interval_ms", "must be positive");
        }
        if self.engine.day_check_interval_secs == 0 {
            return invalid("engine.day_check_interval_secs", "must be positive");
        }
        if self.engine.history_capacity == 0 {
            return invalid("engine.history_capacity", "must be positive");
        }
        if self.sync.publish_interval_ms == 0 || self.sync.poll_interval_ms == 0 {
            return invalid("sync", "publish and poll intervals must be positive");
        }
        Ok(())
    }

    /// Agenda to drive the display with.
    pub fn agenda(&self) -> Agenda {
        self.custom_agenda
            .clone()
            .unwrap_or_else(Agenda::default_conference)
    }

    /// Where sync snapshots are exchanged.
    pub fn sync_channel_path(&self) -> Result<PathBuf, ConfigError> {
        match &self.sync.channel_file {
            Some(path) => Ok(path.clone()),
            None => Ok(data_dir()?.join("sync.json")),
        }
    }

    /// Load from disk, returning default on error.
    /// This is a convenience method that never fails.
    pub fn load_or_default() -> Self {
        Self::load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "falling back to default configuration");
            Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_roundtrip() {
        let cfg = Config::default();
        let toml_str = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.clock.utc_offset_minutes, 330);
        assert_eq!(parsed.sync.mode, SyncMode::Off);
        assert!(parsed.custom_agenda.is_none());
    }

    #[test]
    fn missing_sections_take_defaults() {
        let parsed: Config = toml::from_str("[sync]\nmode = \"follower\"\n").unwrap();
        assert_eq!(parsed.sync.mode, SyncMode::Follower);
        assert_eq!(parsed.sync.poll_interval_ms, 2_000);
        assert_eq!(parsed.engine.tick_interval_ms, 1_000);
        assert_eq!(parsed.engine.day_check_interval_secs, 60);
    }

    #[test]
    fn get_supports_dot_path_keys() {
        let cfg = Config::default();
        assert_eq!(cfg.get("clock.utc_offset_minutes").as_deref(), Some("330"));
        assert_eq!(cfg.get("sync.mode").as_deref(), Some("off"));
        assert_eq!(cfg.get("sync.staleness_ms").as_deref(), Some("3000"));
        assert!(cfg.get("sync.missing_key").is_none());
        assert!(cfg.get("").is_none());
    }

    #[test]
    fn update_changes_nested_values() {
        let mut cfg = Config::default();
        cfg.update("sync.mode", "leader").unwrap();
        cfg.update("clock.utc_offset_minutes", "-300").unwrap();
        cfg.update("sync.channel_file", "/tmp/agenda-sync.json").unwrap();
        assert_eq!(cfg.sync.mode, SyncMode::Leader);
        assert_eq!(cfg.clock.utc_offset_minutes, -300);
        assert_eq!(
            cfg.sync.channel_file.as_deref(),
            Some(Path::new("/tmp/agenda-sync.json"))
        );
    }

    #[test]
    fn update_rejects_unknown_key() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.update("sync.nonexistent_key", "1"),
            Err(ConfigError::UnknownKey(_))
        ));
        assert!(matches!(cfg.update("", "1"), Err(ConfigError::UnknownKey(_))));
    }

    #[test]
    fn update_rejects_bad_values_and_keeps_old_config() {
        let mut cfg = Config::default();
        assert!(matches!(
            cfg.update("engine.tick_interval_ms", "fast"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.update("sync.mode", "primary"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert!(matches!(
            cfg.update("clock.utc_offset_minutes", "2000"),
            Err(ConfigError::InvalidValue { .. })
        ));
        assert_eq!(cfg.clock.utc_offset_minutes, 330);
        assert_eq!(cfg.sync.mode, SyncMode::Off);
    }

    #[test]
    fn custom_agenda_can_be_set_as_json() {
        let mut cfg = Config::default();
        cfg.update(
            "custom_agenda",
            r#"{"days":[{"name":"Only Day","calendar_date":"2026-01-10",
                "items":[{"time":"09:00","title":"Opening","duration_min":30}]}]}"#,
        )
        .unwrap();
        let agenda = cfg.agenda();
        assert_eq!(agenda.day_names(), vec!["Only Day"]);
        assert_eq!(agenda.items("Only Day")[0].start_minutes, 540);
    }

    #[test]
    fn agenda_defaults_to_builtin_programme() {
        assert_eq!(Config::default().agenda(), Agenda::default_conference());
    }

    #[test]
    fn load_from_writes_defaults_then_reads_them_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let first = Config::load_from(&path).unwrap();
        assert!(path.exists());

        let mut changed = first.clone();
        changed.update("sync.mode", "follower").unwrap();
        changed.save_to(&path).unwrap();

        let second = Config::load_from(&path).unwrap();
        assert_eq!(second.sync.mode, SyncMode::Follower);
    }

    #[test]
    fn load_from_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[clock\nutc_offset_minutes = ").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::LoadFailed { .. })
        ));
    }

    #[test]
    fn custom_agenda_survives_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let cfg = Config {
            custom_agenda: Some(Agenda::default_conference()),
            ..Config::default()
        };
        cfg.save_to(&path).unwrap();
        let parsed = Config::load_from(&path).unwrap();
        assert_eq!(parsed.custom_agenda, Some(Agenda::default_conference()));
    }
}
