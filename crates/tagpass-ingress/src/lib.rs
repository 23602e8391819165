//! Ingress control for the tagpass gate.
//!
//! This crate decides whether a tap is let through, and keeps track of who
//! is inside.
//!
//! # Architecture
//!
//! - [`IngressEngine`]: applies the gate rules to one tap and returns a
//!   [`Decision`]
//! - [`PresenceStore`]: full-table load and save of presence state, with
//!   memory, JSON file and SQLite backends
//! - [`Roster`]: read-only display attributes per identifier
//! - [`IngressEngine::provision`]: adds roster identifiers to the presence
//!   table without racing a decision
//!
//! Policy outcomes are values. A denied tap is `Ok(Decision)` with an
//! `Outcome::Denied`; only store failures surface as [`IngressError`].
//!
//! # Examples
//!
//! ```no_run
//! use tagpass_core::{Direction, Identifier};
//! use tagpass_ingress::{
//!     Database, DatabaseConfig, IngressConfig, IngressEngine, MemoryRoster,
//!     SqlitePresenceStore,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new(DatabaseConfig::new("presence.db")).await?;
//! let roster = MemoryRoster::from_json_file("roster.json")?;
//!
//! let engine = IngressEngine::new(
//!     SqlitePresenceStore::from_database(&db),
//!     roster,
//!     IngressConfig::default(),
//! );
//! let identifiers: Vec<Identifier> = engine.roster().identifiers().cloned().collect();
//! engine.provision(identifiers).await?;
//! let decision = engine
//!     .decide_now(&Identifier::new("76d452ab-89ca-4d0a-a2d1-2ffa9ab61117"), Some(Direction::Entry))
//!     .await?;
//!
//! println!("{decision}");
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod decision;
pub mod engine;
pub mod error;
pub mod messages;
pub mod models;
pub mod provision;
pub mod roster;
pub mod store;

pub use connection::{Database, DatabaseConfig};
pub use decision::{Decision, Outcome, ReasonCode};
pub use engine::{IngressConfig, IngressEngine};
pub use error::{IngressError, IngressResult, StoreError, StoreResult};
pub use messages::DisplayMessages;
pub use models::{PresenceEntry, PresenceRow, PresenceTable, RosterEntry};
pub use provision::provision;
pub use roster::{MemoryRoster, Roster};
pub use store::{
    AnyPresenceStore, JsonPresenceStore, MemoryPresenceStore, PresenceStore, SqlitePresenceStore,
};
