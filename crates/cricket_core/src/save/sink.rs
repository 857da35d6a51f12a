//! Persistence boundary.
//!
//! The scoring engine never waits on storage: it hands finished records and
//! snapshots to a `SummarySink` through the background worker.

use std::fs::{rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use uuid::Uuid;

use super::error::SaveError;
use super::format::{decompress_and_deserialize, serialize_and_compress, MatchRecord};
use crate::engine::MatchSnapshot;

pub trait SummarySink: Send + Sync {
    /// Stores a completed (or abandoned) match.
    fn store_summary(&self, record: &MatchRecord) -> Result<(), SaveError>;

    /// Pushes a live snapshot to wherever spectators read from.
    fn publish_snapshot(&self, _snapshot: &MatchSnapshot) -> Result<(), SaveError> {
        Ok(())
    }
}

/// Writes `<match_id>.cmr` (compressed archive) and `<match_id>.json`
/// (readable summary) into one directory.
#[derive(Debug, Clone)]
pub struct FileSummarySink {
    dir: PathBuf,
}

impl FileSummarySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn archive_path(&self, match_id: Uuid) -> PathBuf {
        self.dir.join(format!("{match_id}.cmr"))
    }

    pub fn json_path(&self, match_id: Uuid) -> PathBuf {
        self.dir.join(format!("{match_id}.json"))
    }

    pub fn load(&self, match_id: Uuid) -> Result<MatchRecord, SaveError> {
        load_from_path(&self.archive_path(match_id))
    }
}

impl SummarySink for FileSummarySink {
    fn store_summary(&self, record: &MatchRecord) -> Result<(), SaveError> {
        let data = serialize_and_compress(record)?;
        write_atomic(&self.archive_path(record.match_id), &data)?;

        let json = serde_json::to_vec_pretty(&record.summary)?;
        write_atomic(&self.json_path(record.match_id), &json)?;

        log::info!("Archived match {} ({} bytes)", record.match_id, data.len());
        Ok(())
    }
}

/// Write to a temp file, fsync, then rename over the target.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<(), SaveError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let temp_path = path.with_extension("tmp");
    {
        let mut file = File::create(&temp_path)?;
        file.write_all(data)?;
        file.flush()?;
        file.sync_all()?;
    }
    rename(&temp_path, path)?;

    log::debug!("Saved {} bytes to {:?}", data.len(), path);
    Ok(())
}

pub fn load_from_path(path: &Path) -> Result<MatchRecord, SaveError> {
    if !path.exists() {
        return Err(SaveError::FileNotFound { path: path.display().to_string() });
    }

    let mut file = File::open(path)?;
    let mut data = Vec::new();
    file.read_to_end(&mut data)?;

    let record = decompress_and_deserialize(&data)?;
    log::debug!("Loaded {} bytes from {:?}", data.len(), path);
    Ok(record)
}

/// Keeps everything in memory. Used by tests and by embedders that forward
/// records themselves.
#[derive(Debug, Default)]
pub struct InMemorySink {
    records: Mutex<Vec<MatchRecord>>,
    snapshots: Mutex<Vec<MatchSnapshot>>,
}

impl InMemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<MatchRecord> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn snapshots(&self) -> Vec<MatchSnapshot> {
        self.snapshots.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl SummarySink for InMemorySink {
    fn store_summary(&self, record: &MatchRecord) -> Result<(), SaveError> {
        self.records.lock().unwrap_or_else(|e| e.into_inner()).push(record.clone());
        Ok(())
    }

    fn publish_snapshot(&self, snapshot: &MatchSnapshot) -> Result<(), SaveError> {
        self.snapshots.lock().unwrap_or_else(|e| e.into_inner()).push(snapshot.clone());
        Ok(())
    }
}
