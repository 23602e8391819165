//! Presence table provisioning.

use tagpass_core::Identifier;
use tracing::info;

use crate::error::StoreResult;
use crate::models::PresenceEntry;
use crate::store::PresenceStore;

/// Add every identifier missing from the presence table.
///
/// New rows start `Outside` at the Unix epoch. Existing rows are left as
/// they are, empty identifiers are skipped, and the table is only saved when
/// something was added.
///
/// Returns the number of rows added.
///
/// This takes no lock. Use it to seed a store before any engine runs on it;
/// once an engine shares the store, go through [`IngressEngine::provision`].
///
/// [`IngressEngine::provision`]: crate::IngressEngine::provision
///
/// # Errors
/// Returns the store error if the table cannot be loaded or saved.
pub async fn provision<S, I>(store: &S, identifiers: I) -> StoreResult<usize>
where
    S: PresenceStore + ?Sized,
    I: IntoIterator<Item = Identifier>,
{
    let mut table = store.load().await?;
    let mut added = 0;

    for identifier in identifiers {
        if identifier.is_empty() || table.contains_key(&identifier) {
            continue;
        }
        table.insert(identifier, PresenceEntry::provisioned());
        added += 1;
    }

    if added > 0 {
        store.save(&table).await?;
    }

    info!(added, total = table.len(), "Presence table provisioned");
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PresenceTable;
    use crate::store::MemoryPresenceStore;
    use chrono::Utc;
    use tagpass_core::PresenceStatus;

    #[tokio::test]
    async fn test_adds_missing_only() {
        let now = Utc::now();
        let mut table = PresenceTable::new();
        table.insert(
            Identifier::new("inside"),
            PresenceEntry::new(PresenceStatus::Inside, now),
        );
        let store = MemoryPresenceStore::with_table(table);

        let added = provision(
            &store,
            ["inside", "new-1", "new-2", "new-1", ""].map(Identifier::from),
        )
        .await
        .unwrap();

        assert_eq!(added, 2);
        let table = store.snapshot();
        assert_eq!(table.len(), 3);
        assert_eq!(
            table[&Identifier::new("inside")],
            PresenceEntry::new(PresenceStatus::Inside, now)
        );
        assert_eq!(
            table[&Identifier::new("new-1")],
            PresenceEntry::provisioned()
        );
    }

    #[tokio::test]
    async fn test_nothing_to_add_skips_save() {
        let store = MemoryPresenceStore::new();
        provision(&store, [Identifier::new("a")]).await.unwrap();
        assert_eq!(store.save_count(), 1);

        let added = provision(&store, [Identifier::new("a")]).await.unwrap();
        assert_eq!(added, 0);
        assert_eq!(store.save_count(), 1);
    }
}
