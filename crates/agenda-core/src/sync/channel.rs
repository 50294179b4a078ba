//! Transports for sync snapshots.
//!
//! A channel is a single last-writer-wins slot: publishing replaces whatever
//! was there, and readers only ever see the newest payload.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use super::types::SyncError;

/// Shared slot carrying the newest serialized snapshot.
pub trait SyncChannel: Send {
    fn publish(&self, payload: &str) -> Result<(), SyncError>;

    /// Newest payload, or `None` if nothing was published yet.
    fn latest(&self) -> Result<Option<String>, SyncError>;
}

/// In-process channel. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryChannel {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryChannel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SyncChannel for MemoryChannel {
    fn publish(&self, payload: &str) -> Result<(), SyncError> {
        let mut slot = self.slot.lock().map_err(|_| SyncError::Poisoned)?;
        *slot = Some(payload.to_string());
        Ok(())
    }

    fn latest(&self) -> Result<Option<String>, SyncError> {
        Ok(self.slot.lock().map_err(|_| SyncError::Poisoned)?.clone())
    }
}

/// One JSON file shared by every display on the machine.
///
/// Writes go to a sibling temp file and are renamed into place, so readers
/// never observe a half-written snapshot.
#[derive(Debug, Clone)]
pub struct FileChannel {
    path: PathBuf,
}

impl FileChannel {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "sync".into());
        name.push(format!(".{}.tmp", std::process::id()));
        self.path.with_file_name(name)
    }
}

impl SyncChannel for FileChannel {
    fn publish(&self, payload: &str) -> Result<(), SyncError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.temp_path();
        std::fs::write(&tmp, payload)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    fn latest(&self) -> Result<Option<String>, SyncError> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) if content.trim().is_empty() => Ok(None),
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
