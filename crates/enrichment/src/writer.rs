//! Snapshot persistence.
//!
//! Each zone has exactly one snapshot file, replaced on every enrichment.
//! A per-zone async mutex gives a single writer per zone, and files are
//! written to a temporary sibling then renamed over the target so static
//! readers see either the previous or the new document, never a partial one.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::NamedTempFile;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use grid_common::{GridError, GridResult, ZoneIdentifier};

use crate::snapshot::SnapshotDocument;

/// Writes snapshot files with single-writer-per-zone discipline.
#[derive(Default)]
pub struct SnapshotWriter {
    locks: Mutex<HashMap<ZoneIdentifier, Arc<Mutex<()>>>>,
}

impl SnapshotWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Exclusive write access for one zone, held until the guard drops.
    ///
    /// Entries whose mutex is referenced only by the map have no holder and
    /// no waiter; they are dropped here, so the map tracks only zones with a
    /// write in flight.
    pub async fn lock(&self, zone: &ZoneIdentifier) -> OwnedMutexGuard<()> {
        let zone_lock = {
            let mut locks = self.locks.lock().await;
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(zone.clone())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        zone_lock.lock_owned().await
    }

    /// Number of zones currently holding a lock entry.
    pub async fn tracked_zones(&self) -> usize {
        self.locks.lock().await.len()
    }

    /// Serialize `document` and atomically replace the file at `path`.
    ///
    /// Callers are expected to hold the zone's [`lock`](Self::lock).
    pub async fn write(&self, path: &Path, document: &SnapshotDocument) -> GridResult<()> {
        let bytes = document.to_bytes()?;
        let target = path.to_path_buf();
        let size = bytes.len();

        tokio::task::spawn_blocking(move || persist_atomically(&target, &bytes))
            .await
            .map_err(|e| GridError::InternalError(format!("snapshot write task failed: {}", e)))??;

        debug!(path = %path.display(), size, "Wrote snapshot");
        Ok(())
    }
}

fn persist_atomically(target: &Path, bytes: &[u8]) -> GridResult<()> {
    let write_error = |message: String| GridError::SnapshotWrite {
        path: target.to_path_buf(),
        message,
    };

    let dir = parent_dir(target);
    std::fs::create_dir_all(&dir).map_err(|e| write_error(e.to_string()))?;

    let mut tmp = NamedTempFile::new_in(&dir).map_err(|e| write_error(e.to_string()))?;
    tmp.write_all(bytes).map_err(|e| write_error(e.to_string()))?;
    tmp.as_file().sync_all().map_err(|e| write_error(e.to_string()))?;
    tmp.persist(target).map_err(|e| write_error(e.error.to_string()))?;
    Ok(())
}

fn parent_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
