use crate::error::{ReadmeError, Result};
use crate::io;
use crate::types::{DataRecord, Mode};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

pub const SNAPSHOT_VERSION: u32 = 1;

fn current_version() -> u32 {
    SNAPSHOT_VERSION
}

fn is_false(b: &bool) -> bool {
    !*b
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Persisted wizard progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    #[serde(default = "current_version")]
    pub version: u32,
    pub step_index: usize,
    /// Set once the last step has been completed.
    #[serde(default, skip_serializing_if = "is_false")]
    pub finished: bool,
    #[serde(default)]
    pub data: DataRecord,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Snapshot {
    pub fn new(step_index: usize, data: DataRecord, mode: Mode) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            step_index,
            finished: false,
            data,
            mode: Some(mode),
            saved_at: Some(Utc::now()),
        }
    }

    pub fn finished(mut self, finished: bool) -> Self {
        self.finished = finished;
        self
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a stored snapshot. Snapshots written by a newer format version
    /// are rejected.
    pub fn from_json(text: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(text)?;
        if snapshot.version > SNAPSHOT_VERSION {
            return Err(ReadmeError::UnsupportedSnapshot {
                found: snapshot.version,
                supported: SNAPSHOT_VERSION,
            });
        }
        Ok(snapshot)
    }
}

// ---------------------------------------------------------------------------
// Stores
// ---------------------------------------------------------------------------

/// Keyed slot holding the serialized snapshot.
pub trait SnapshotStore: Send {
    fn read(&self) -> Result<Option<String>>;
    fn write(&self, text: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// Snapshot kept in a single JSON file, replaced atomically on write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for FileStore {
    fn read(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, text: &str) -> Result<()> {
        io::atomic_write(&self.path, text.as_bytes())
    }

    fn clear(&self) -> Result<()> {
        io::remove_if_exists(&self.path).map(|_| ())
    }
}

/// In-process store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(text: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(text.into()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.guard().clone()
    }

    fn guard(&self) -> MutexGuard<'_, Option<String>> {
        self.slot.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SnapshotStore for MemoryStore {
    fn read(&self) -> Result<Option<String>> {
        Ok(self.contents())
    }

    fn write(&self, text: &str) -> Result<()> {
        *self.guard() = Some(text.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.guard() = None;
        Ok(())
    }
}
