//! Integration tests for the ingress engine over every store backend.
//!
//! Run with: cargo test --package tagpass-ingress --test engine_integration

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::TimeDelta;
use common::{JANE, JOHN, t0};
use tagpass_core::{Direction, Identifier, PresenceStatus};
use tagpass_ingress::{
    Database, DatabaseConfig, IngressConfig, IngressEngine, JsonPresenceStore,
    MemoryPresenceStore, MemoryRoster, Outcome, PresenceStore, PresenceTable, ReasonCode,
    SqlitePresenceStore, StoreResult,
};
use tempfile::TempDir;
use tokio::sync::{Barrier, Notify};

async fn run_scenario<S: PresenceStore>(store: S) {
    store.save(&common::table()).await.unwrap();
    let engine = IngressEngine::new(
        store,
        MemoryRoster::from_entries(common::roster()),
        IngressConfig::default(),
    );
    let john = Identifier::new(JOHN);
    let jane = Identifier::new(JANE);

    // John walks in
    let decision = engine
        .decide(&john, Some(Direction::Entry), t0())
        .await
        .unwrap();
    assert_eq!(decision.reason(), ReasonCode::Success);
    assert_eq!(decision.roster().unwrap().display_id, 123456);

    // and taps again straight away
    let decision = engine
        .decide(&john, Some(Direction::Entry), t0() + TimeDelta::seconds(10))
        .await
        .unwrap();
    assert_eq!(decision.reason(), ReasonCode::TooSoon);

    // later tries to enter again
    let decision = engine
        .decide(&john, Some(Direction::Entry), t0() + TimeDelta::minutes(5))
        .await
        .unwrap();
    assert_eq!(decision.reason(), ReasonCode::AlreadyInside);
    assert_eq!(decision.outcome(), Outcome::Denied);

    // Jane leaves, then taps exit once more
    let decision = engine
        .decide(&jane, Some(Direction::Exit), t0())
        .await
        .unwrap();
    assert_eq!(decision.reason(), ReasonCode::Success);
    let decision = engine
        .decide(&jane, Some(Direction::Exit), t0() + TimeDelta::minutes(2))
        .await
        .unwrap();
    assert_eq!(decision.reason(), ReasonCode::AlreadyOutside);
    assert!(decision.is_granted());

    // stranger
    let decision = engine
        .decide(&"stranger".into(), Some(Direction::Entry), t0())
        .await
        .unwrap();
    assert_eq!(decision.reason(), ReasonCode::UnknownIdentifier);
    assert!(decision.roster().is_none());

    let table = engine.store().load().await.unwrap();
    assert_eq!(table.len(), 2);
    assert_eq!(table[&john].status, PresenceStatus::Inside);
    assert_eq!(table[&john].last_change, t0());
    assert_eq!(table[&jane].status, PresenceStatus::Outside);
    assert_eq!(table[&jane].last_change, t0());
}

#[tokio::test]
async fn test_scenario_memory_store() {
    run_scenario(MemoryPresenceStore::new()).await;
}

#[tokio::test]
async fn test_scenario_json_store() {
    let dir = TempDir::new().unwrap();
    run_scenario(JsonPresenceStore::new(dir.path().join("presence.json"))).await;
}

#[tokio::test]
async fn test_scenario_sqlite_store() {
    let db = Database::in_memory().await.unwrap();
    run_scenario(SqlitePresenceStore::from_database(&db)).await;
    db.close().await;
}

#[tokio::test]
async fn test_state_survives_reopening_sqlite_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("data/presence.db");
    let john = Identifier::new(JOHN);

    {
        let db = Database::new(DatabaseConfig::new(&path)).await.unwrap();
        let store = SqlitePresenceStore::from_database(&db);
        tagpass_ingress::provision(&store, [john.clone()]).await.unwrap();
        let engine = IngressEngine::new(store, MemoryRoster::new(), IngressConfig::default());
        let decision = engine
            .decide(&john, Some(Direction::Entry), t0())
            .await
            .unwrap();
        assert_eq!(decision.reason(), ReasonCode::Success);
        db.close().await;
    }

    let db = Database::new(DatabaseConfig::new(&path)).await.unwrap();
    let table = SqlitePresenceStore::from_database(&db).load().await.unwrap();
    assert_eq!(table[&john].status, PresenceStatus::Inside);
    assert_eq!(table[&john].last_change, t0());
    db.close().await;
}

#[tokio::test]
async fn test_concurrent_entry_taps_grant_once() {
    const TAPS: usize = 10;

    let store = MemoryPresenceStore::with_table(common::table());
    let engine = Arc::new(IngressEngine::new(
        store,
        MemoryRoster::from_entries(common::roster()),
        IngressConfig::default(),
    ));
    let barrier = Arc::new(Barrier::new(TAPS));

    let mut handles = vec![];
    for _ in 0..TAPS {
        let engine = Arc::clone(&engine);
        let barrier = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            engine
                .decide(&Identifier::new(JOHN), Some(Direction::Entry), t0())
                .await
                .unwrap()
        }));
    }

    let decisions: Vec<_> = futures::future::join_all(handles)
        .await
        .into_iter()
        .map(|result| result.unwrap())
        .collect();

    let successes = decisions
        .iter()
        .filter(|d| d.reason() == ReasonCode::Success)
        .count();
    let too_soon = decisions
        .iter()
        .filter(|d| d.reason() == ReasonCode::TooSoon)
        .count();
    assert_eq!(successes, 1);
    assert_eq!(too_soon, TAPS - 1);
    assert_eq!(engine.store().save_count(), 1);
}

#[tokio::test]
async fn test_concurrent_taps_of_different_identifiers_all_recorded() {
    let dir = TempDir::new().unwrap();
    let store = JsonPresenceStore::new(dir.path().join("presence.json"));
    let identifiers: Vec<Identifier> = (0..8).map(|i| Identifier::new(format!("id-{i}"))).collect();
    tagpass_ingress::provision(&store, identifiers.clone())
        .await
        .unwrap();

    let engine = Arc::new(IngressEngine::new(
        store,
        MemoryRoster::new(),
        IngressConfig::default(),
    ));

    let handles: Vec<_> = identifiers
        .iter()
        .cloned()
        .map(|id| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine
                    .decide(&id, Some(Direction::Entry), t0())
                    .await
                    .unwrap()
            })
        })
        .collect();
    for result in futures::future::join_all(handles).await {
        assert_eq!(result.unwrap().reason(), ReasonCode::Success);
    }

    let table = engine.store().load().await.unwrap();
    assert!(
        identifiers
            .iter()
            .all(|id| table[id].status == PresenceStatus::Inside)
    );
}

#[tokio::test]
async fn test_unknown_identifier_never_saves() {
    let store = MemoryPresenceStore::with_table(common::table());
    let engine = IngressEngine::new(store, MemoryRoster::new(), IngressConfig::default());

    for direction in [Direction::Entry, Direction::Exit] {
        let decision = engine
            .decide(&"nobody".into(), Some(direction), t0())
            .await
            .unwrap();
        assert_eq!(decision.reason(), ReasonCode::UnknownIdentifier);
    }

    assert_eq!(engine.store().save_count(), 0);
    assert_eq!(engine.store().snapshot(), common::table());
}

#[tokio::test]
async fn test_custom_debounce_window() {
    let store = MemoryPresenceStore::with_table(common::table());
    let engine = IngressEngine::new(
        store,
        MemoryRoster::new(),
        IngressConfig::default().debounce(std::time::Duration::from_secs(300)),
    );

    // last change two minutes ago, window five minutes
    let decision = engine
        .decide(&JOHN.into(), Some(Direction::Entry), t0())
        .await
        .unwrap();
    assert_eq!(decision.reason(), ReasonCode::TooSoon);
}

/// Memory store whose first load parks until released.
#[derive(Default)]
struct ParkingStore {
    inner: MemoryPresenceStore,
    parked: AtomicBool,
    loaded: Notify,
    release: Notify,
}

impl PresenceStore for ParkingStore {
    async fn load(&self) -> StoreResult<PresenceTable> {
        let table = self.inner.load().await?;
        if !self.parked.swap(true, Ordering::SeqCst) {
            self.loaded.notify_one();
            self.release.notified().await;
        }
        Ok(table)
    }

    async fn save(&self, table: &PresenceTable) -> StoreResult<()> {
        self.inner.save(table).await
    }
}

#[tokio::test]
async fn test_provision_during_tap_keeps_transition() {
    let store = ParkingStore {
        inner: MemoryPresenceStore::with_table(common::table()),
        ..ParkingStore::default()
    };
    let engine = Arc::new(IngressEngine::new(
        store,
        MemoryRoster::from_entries(common::roster()),
        IngressConfig::default(),
    ));

    let provisioning = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move { engine.provision([Identifier::new("new-badge")]).await })
    };
    engine.store().loaded.notified().await;

    let tap = {
        let engine = Arc::clone(&engine);
        tokio::spawn(async move {
            engine
                .decide(&Identifier::new(JOHN), Some(Direction::Entry), t0())
                .await
        })
    };
    tokio::task::yield_now().await;
    engine.store().release.notify_one();

    assert_eq!(provisioning.await.unwrap().unwrap(), 1);
    let decision = tap.await.unwrap().unwrap();
    assert_eq!(decision.reason(), ReasonCode::Success);

    let table = engine.store().inner.snapshot();
    assert_eq!(table[&Identifier::new(JOHN)].status, PresenceStatus::Inside);
    assert_eq!(table[&Identifier::new(JOHN)].last_change, t0());
    assert!(table.contains_key(&Identifier::new("new-badge")));
}
