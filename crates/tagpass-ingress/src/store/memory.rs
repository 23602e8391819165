use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::error::{StoreError, StoreResult};
use crate::models::PresenceTable;
use crate::store::PresenceStore;

/// In-memory presence store.
///
/// Saves can be made to fail on demand, which is how tests reach the
/// engine's not-recorded path.
#[derive(Debug, Default)]
pub struct MemoryPresenceStore {
    table: Mutex<PresenceTable>,
    fail_saves: AtomicBool,
    fail_loads: AtomicBool,
    saves: AtomicUsize,
}

impl MemoryPresenceStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store holding `table`.
    pub fn with_table(table: PresenceTable) -> Self {
        Self {
            table: Mutex::new(table),
            ..Self::default()
        }
    }

    /// Make every following save fail (or succeed again).
    pub fn fail_saves(&self, fail: bool) {
        self.fail_saves.store(fail, Ordering::SeqCst);
    }

    /// Make every following load fail (or succeed again).
    pub fn fail_loads(&self, fail: bool) {
        self.fail_loads.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    pub fn save_count(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }

    /// Copy of the current table.
    pub fn snapshot(&self) -> PresenceTable {
        match self.table.lock() {
            Ok(table) => table.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl PresenceStore for MemoryPresenceStore {
    async fn load(&self) -> StoreResult<PresenceTable> {
        if self.fail_loads.load(Ordering::SeqCst) {
            return Err(StoreError::unavailable("injected load failure"));
        }
        Ok(self.snapshot())
    }

    async fn save(&self, table: &PresenceTable) -> StoreResult<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::write_failed("injected save failure"));
        }
        let mut current = self
            .table
            .lock()
            .map_err(|_| StoreError::write_failed("presence table lock poisoned"))?;
        *current = table.clone();
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PresenceEntry;
    use tagpass_core::Identifier;

    #[tokio::test]
    async fn test_save_replaces_table() {
        let store = MemoryPresenceStore::new();
        let mut table = PresenceTable::new();
        table.insert(Identifier::new("a"), PresenceEntry::provisioned());

        store.save(&table).await.unwrap();

        assert_eq!(store.load().await.unwrap(), table);
        assert_eq!(store.save_count(), 1);

        store.save(&PresenceTable::new()).await.unwrap();
        assert!(store.load().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_injected_failures() {
        let store = MemoryPresenceStore::new();

        store.fail_saves(true);
        let err = store.save(&PresenceTable::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::WriteFailed { .. }));
        assert_eq!(store.save_count(), 0);

        store.fail_loads(true);
        assert!(matches!(
            store.load().await,
            Err(StoreError::Unavailable { .. })
        ));
    }
}
