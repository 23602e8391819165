use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::models::{PresenceRow, PresenceTable};
use crate::store::PresenceStore;

/// Presence store backed by one JSON file.
///
/// The file holds an array of rows sorted by identifier:
///
/// ```json
/// [
///   { "identifier": "76d452ab-89ca-4d0a-a2d1-2ffa9ab61117", "status": 0, "last_change": "1970-01-01T00:00:00Z" }
/// ]
/// ```
///
/// A missing file loads as an empty table. Saves write a uniquely named
/// temporary file in the same directory, sync it, rename it over the
/// original and sync the directory. A crash mid-save leaves the previous
/// table intact.
#[derive(Debug, Clone)]
pub struct JsonPresenceStore {
    path: PathBuf,
}

impl JsonPresenceStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Write `content` to `path` through a synced temporary sibling.
fn write_atomic(path: &Path, content: &[u8]) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)?;

    let mut temp = NamedTempFile::new_in(dir)?;
    temp.write_all(content)?;
    temp.as_file().sync_all()?;
    // dropping the returned handle on failure removes the temporary file
    temp.persist(path).map_err(|e| e.error)?;

    #[cfg(unix)]
    std::fs::File::open(dir)?.sync_all()?;

    Ok(())
}

impl PresenceStore for JsonPresenceStore {
    async fn load(&self) -> StoreResult<PresenceTable> {
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "Presence file missing, starting empty");
                return Ok(PresenceTable::new());
            }
            Err(e) => {
                return Err(StoreError::unavailable(format!(
                    "failed to read {}: {e}",
                    self.path.display()
                )));
            }
        };

        let rows: Vec<PresenceRow> = serde_json::from_slice(&content).map_err(|e| {
            StoreError::unavailable(format!("failed to parse {}: {e}", self.path.display()))
        })?;

        rows.into_iter()
            .map(|row| {
                row.into_entry()
                    .map_err(|e| StoreError::unavailable(format!("bad presence row: {e}")))
            })
            .collect()
    }

    async fn save(&self, table: &PresenceTable) -> StoreResult<()> {
        let rows = PresenceRow::from_table(table);
        let content = serde_json::to_vec_pretty(&rows)
            .map_err(|e| StoreError::write_failed(format!("failed to serialize table: {e}")))?;

        let path = self.path.clone();
        let written = tokio::task::spawn_blocking(move || write_atomic(&path, &content))
            .await
            .map_err(|e| StoreError::write_failed(format!("presence save task failed: {e}")))?;

        if let Err(e) = written {
            warn!(path = %self.path.display(), error = %e, "Presence file replace failed");
            return Err(StoreError::write_failed(format!(
                "failed to replace {}: {e}",
                self.path.display()
            )));
        }

        debug!(path = %self.path.display(), rows = rows.len(), "Presence table saved");
        Ok(())
    }
}
