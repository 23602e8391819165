use sqlx::SqlitePool;
use tracing::debug;

use crate::connection::Database;
use crate::error::{StoreError, StoreResult};
use crate::models::{PresenceRow, PresenceTable};
use crate::store::PresenceStore;

/// Presence store backed by the SQLite `presence` table.
///
/// A save replaces every row inside one transaction: readers see either the
/// old table or the new one.
#[derive(Debug, Clone)]
pub struct SqlitePresenceStore {
    pool: SqlitePool,
}

impl SqlitePresenceStore {
    /// Create a new SQLite presence store
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn from_database(db: &Database) -> Self {
        Self::new(db.pool().clone())
    }
}

impl PresenceStore for SqlitePresenceStore {
    async fn load(&self) -> StoreResult<PresenceTable> {
        let rows = sqlx::query_as::<_, PresenceRow>(
            r#"
            SELECT identifier, status, last_change
            FROM presence
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::unavailable(e.to_string()))?;

        rows.into_iter()
            .map(|row| {
                row.into_entry()
                    .map_err(|e| StoreError::unavailable(format!("bad presence row: {e}")))
            })
            .collect()
    }

    async fn save(&self, table: &PresenceTable) -> StoreResult<()> {
        let write_failed = |e: sqlx::Error| StoreError::write_failed(e.to_string());

        let mut tx = self.pool.begin().await.map_err(write_failed)?;

        sqlx::query("DELETE FROM presence")
            .execute(&mut *tx)
            .await
            .map_err(write_failed)?;

        let rows = PresenceRow::from_table(table);
        for row in &rows {
            sqlx::query(
                r#"
                INSERT INTO presence (identifier, status, last_change)
                VALUES (?, ?, ?)
                "#,
            )
            .bind(&row.identifier)
            .bind(row.status)
            .bind(row.last_change)
            .execute(&mut *tx)
            .await
            .map_err(write_failed)?;
        }

        tx.commit().await.map_err(write_failed)?;

        debug!(rows = rows.len(), "Presence table saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PresenceEntry;
    use chrono::{TimeZone, Utc};
    use tagpass_core::{Identifier, PresenceStatus};

    async fn setup_store() -> SqlitePresenceStore {
        let db = Database::in_memory().await.unwrap();
        SqlitePresenceStore::from_database(&db)
    }

    #[tokio::test]
    async fn test_empty_database_loads_empty_table() {
        let store = setup_store().await;
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_save_replaces_rows() {
        let store = setup_store().await;
        let at = Utc.with_ymd_and_hms(2025, 10, 18, 12, 15, 30).unwrap();

        let mut first = PresenceTable::new();
        first.insert(Identifier::new("a"), PresenceEntry::provisioned());
        first.insert(Identifier::new("b"), PresenceEntry::provisioned());
        store.save(&first).await.unwrap();

        let mut second = PresenceTable::new();
        second.insert(
            Identifier::new("b"),
            PresenceEntry::new(PresenceStatus::Inside, at),
        );
        store.save(&second).await.unwrap();

        assert_eq!(store.load().await.unwrap(), second);
    }

    #[tokio::test]
    async fn test_bad_status_is_unavailable() {
        let store = setup_store().await;
        // bypass the CHECK constraint by recreating the table without it
        sqlx::query("DROP TABLE presence")
            .execute(&store.pool)
            .await
            .unwrap();
        sqlx::query(
            "CREATE TABLE presence (identifier TEXT PRIMARY KEY, status INTEGER, last_change TEXT)",
        )
        .execute(&store.pool)
        .await
        .unwrap();
        sqlx::query("INSERT INTO presence VALUES ('x', 5, '2025-10-18T00:00:00+00:00')")
            .execute(&store.pool)
            .await
            .unwrap();

        assert!(matches!(
            store.load().await,
            Err(StoreError::Unavailable { .. })
        ));
    }

    #[tokio::test]
    async fn test_closed_pool_fails_save() {
        let db = Database::in_memory().await.unwrap();
        let store = SqlitePresenceStore::from_database(&db);
        db.close().await;

        let result = store.save(&PresenceTable::new()).await;
        assert!(matches!(result, Err(StoreError::WriteFailed { .. })));
    }
}
