//! Shared snapshot of the loaded dataset table.
//!
//! The table is read-only once built. When the source file changes on disk a
//! new snapshot is built off to the side and swapped in under a write lock, so
//! readers always hold either the old table or the new one, never a mix.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::{info, warn};

use super::csv_store;
use super::table::Table;

/// A loaded table plus the outcome of loading it.
#[derive(Debug)]
pub struct Snapshot {
    pub table: Table,
    /// User-visible warning when the source could not be loaded.
    pub warning: Option<String>,
    pub loaded_at: DateTime<Utc>,
    modified: Option<SystemTime>,
}

impl Snapshot {
    /// Load a snapshot; a load failure produces an empty table with a warning.
    pub fn load(path: &Path) -> Self {
        let modified = modified_time(path);
        let (table, warning) = match csv_store::load(path) {
            Ok(table) => (table, None),
            Err(e) => {
                warn!("Failed to load dataset: {}", e);
                (Table::empty(), Some(e.to_string()))
            }
        };

        Self {
            table,
            warning,
            loaded_at: Utc::now(),
            modified,
        }
    }
}

fn modified_time(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

/// Dataset table shared across all sessions.
#[derive(Debug)]
pub struct DatasetCache {
    path: PathBuf,
    current: RwLock<Arc<Snapshot>>,
}

impl DatasetCache {
    /// Load the source once and wrap it for sharing.
    pub fn open(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let snapshot = Snapshot::load(&path);
        Self {
            path,
            current: RwLock::new(Arc::new(snapshot)),
        }
    }

    /// The current snapshot.
    pub async fn snapshot(&self) -> Arc<Snapshot> {
        self.current.read().await.clone()
    }

    /// Reload when the source file's modification time has changed.
    ///
    /// Returns true if a new snapshot was swapped in.
    pub async fn refresh_if_changed(&self) -> bool {
        let on_disk = modified_time(&self.path);
        if self.current.read().await.modified == on_disk {
            return false;
        }

        let path = self.path.clone();
        let fresh = match tokio::task::spawn_blocking(move || Snapshot::load(&path)).await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Dataset reload task failed: {}", e);
                return false;
            }
        };

        let mut current = self.current.write().await;
        // Another request may have swapped in the same revision meanwhile.
        if current.modified == fresh.modified {
            return false;
        }
        info!(
            "Dataset source changed, reloaded {} datasets",
            fresh.table.len()
        );
        *current = Arc::new(fresh);
        true
    }
}
