#![allow(async_fn_in_trait)]

//! Presence store contract and backends.
//!
//! A store reads and replaces the whole presence table at once. Backends:
//!
//! - [`MemoryPresenceStore`]: in-process table with save-failure injection
//! - [`JsonPresenceStore`]: one JSON file, replaced atomically on save
//! - [`SqlitePresenceStore`]: `presence` table in a SQLite database
//!
//! [`AnyPresenceStore`] picks one of them from configuration.

mod any;
mod json;
mod memory;
mod sqlite;

pub use any::AnyPresenceStore;
pub use json::JsonPresenceStore;
pub use memory::MemoryPresenceStore;
pub use sqlite::SqlitePresenceStore;

use crate::error::StoreResult;
use crate::models::PresenceTable;

/// Full-table presence persistence.
///
/// This trait uses native async trait methods (Edition 2024), so stores are
/// used through generics rather than trait objects.
pub trait PresenceStore: Send + Sync {
    /// Read the whole table.
    async fn load(&self) -> StoreResult<PresenceTable>;

    /// Replace the whole table.
    ///
    /// Must be durable per the backend's contract once it returns `Ok`.
    async fn save(&self, table: &PresenceTable) -> StoreResult<()>;
}

impl<S: PresenceStore> PresenceStore for std::sync::Arc<S> {
    async fn load(&self) -> StoreResult<PresenceTable> {
        S::load(self).await
    }

    async fn save(&self, table: &PresenceTable) -> StoreResult<()> {
        S::save(self, table).await
    }
}
