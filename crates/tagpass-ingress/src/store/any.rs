//! Enum wrapper for presence store dispatch.
//!
//! Native `async fn` in traits is not object-safe, so a backend picked at
//! runtime from configuration is wrapped in an enum instead of a
//! `Box<dyn PresenceStore>`.

use tagpass_core::config::{StorageBackend, StorageSettings};

use crate::connection::{Database, DatabaseConfig};
use crate::error::StoreResult;
use crate::models::PresenceTable;
use crate::store::{JsonPresenceStore, MemoryPresenceStore, PresenceStore, SqlitePresenceStore};

/// Presence store chosen at runtime.
#[derive(Debug)]
pub enum AnyPresenceStore {
    Memory(MemoryPresenceStore),
    Json(JsonPresenceStore),
    Sqlite(SqlitePresenceStore),
}

impl AnyPresenceStore {
    /// Open the backend named in the storage settings.
    ///
    /// # Errors
    /// Returns `StoreError::Unavailable` if the SQLite database cannot be
    /// opened or migrated.
    pub async fn open(settings: &StorageSettings) -> StoreResult<Self> {
        match settings.backend {
            StorageBackend::Json => Ok(Self::Json(JsonPresenceStore::new(&settings.presence_path))),
            StorageBackend::Sqlite => {
                let db = Database::new(DatabaseConfig::new(&settings.presence_path)).await?;
                Ok(Self::Sqlite(SqlitePresenceStore::from_database(&db)))
            }
        }
    }
}

impl PresenceStore for AnyPresenceStore {
    async fn load(&self) -> StoreResult<PresenceTable> {
        match self {
            Self::Memory(store) => store.load().await,
            Self::Json(store) => store.load().await,
            Self::Sqlite(store) => store.load().await,
        }
    }

    async fn save(&self, table: &PresenceTable) -> StoreResult<()> {
        match self {
            Self::Memory(store) => store.save(table).await,
            Self::Json(store) => store.save(table).await,
            Self::Sqlite(store) => store.save(table).await,
        }
    }
}
