// src/store/cache.rs

use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::{Duration, SystemTime};

use crate::domain::SnapshotId;

/// Raw-HTML captures keyed by (league, snapshot id, page number).
///
/// Readers accept any capture younger than the freshness window.
/// Writers land a process-private temp file and rename it into place,
/// so a key either holds one complete capture or nothing, even with a
/// second copy of the tool running.
#[derive(Debug, Clone)]
pub struct CaptureCache {
    root: PathBuf,
    freshness: Duration,
    enabled: bool,
}

impl CaptureCache {
    pub fn new(root: impl Into<PathBuf>, freshness: Duration) -> Self {
        Self {
            root: root.into(),
            freshness,
            enabled: true,
        }
    }

    /// A cache that never hits and never stores, for `--no-cache` runs.
    pub fn disabled() -> Self {
        Self {
            root: PathBuf::new(),
            freshness: Duration::ZERO,
            enabled: false,
        }
    }

    fn capture_path(&self, league: &str, snapshot_id: &SnapshotId, page: u32) -> PathBuf {
        self.root
            .join(league)
            .join(snapshot_id.to_string())
            .join(format!("page-{page}.html"))
    }

    /// A fresh capture for the key, if one exists. Stale, missing or
    /// unreadable captures all read as absent.
    pub fn lookup(&self, league: &str, snapshot_id: &SnapshotId, page: u32) -> Option<String> {
        if !self.enabled {
            return None;
        }
        let path = self.capture_path(league, snapshot_id, page);
        let modified = fs::metadata(&path).ok()?.modified().ok()?;
        let age = SystemTime::now().duration_since(modified).ok()?;
        if age > self.freshness {
            return None;
        }
        fs::read_to_string(&path).ok()
    }

    /// Record a capture for the key. Best effort: the caller logs a
    /// failure and the run continues without the cache entry.
    pub fn store(
        &self,
        league: &str,
        snapshot_id: &SnapshotId,
        page: u32,
        html: &str,
    ) -> io::Result<()> {
        if !self.enabled {
            return Ok(());
        }
        let path = self.capture_path(league, snapshot_id, page);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let tmp = path.with_extension(format!("tmp-{}", std::process::id()));
        fs::write(&tmp, html)?;
        fs::rename(&tmp, &path)
    }
}
