//! Ingress decision engine.
//!
//! The engine applies the gate rules to one tap. Rules run in a fixed order
//! and the first match wins:
//!
//! | # | Condition                                  | Decision                     | Saves |
//! |---|--------------------------------------------|------------------------------|-------|
//! | 1 | empty identifier or no direction           | `Denied(InvalidInput)`       | no    |
//! | 2 | identifier not in the presence table       | `Denied(UnknownIdentifier)`  | no    |
//! | 3 | `now - last_change < debounce`             | `Denied(TooSoon)`            | no    |
//! | 4 | entry while inside                         | `Denied(AlreadyInside)`      | no    |
//! | 5 | exit while outside                         | `Ok(AlreadyOutside)`         | no    |
//! | 6 | otherwise                                  | `Ok(Success)`                | yes   |
//!
//! Load, decide and save run under one engine-wide lock. Stores replace the
//! whole table, so two decisions must never interleave, even for different
//! identifiers. [`IngressEngine::provision`] takes the same lock.
//!
//! # Examples
//!
//! ```
//! use tagpass_core::{Direction, Identifier};
//! use tagpass_ingress::{IngressConfig, IngressEngine, MemoryPresenceStore, MemoryRoster, ReasonCode};
//!
//! # async fn example() -> tagpass_ingress::IngressResult<()> {
//! let engine = IngressEngine::new(
//!     MemoryPresenceStore::new(),
//!     MemoryRoster::new(),
//!     IngressConfig::default(),
//! );
//! engine.provision([Identifier::new("badge-1")]).await?;
//!
//! let first = engine.decide_now(&Identifier::new("badge-1"), Some(Direction::Entry)).await?;
//! assert_eq!(first.reason(), ReasonCode::Success);
//!
//! let retry = engine.decide_now(&Identifier::new("badge-1"), Some(Direction::Entry)).await?;
//! assert_eq!(retry.reason(), ReasonCode::TooSoon);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use tagpass_core::config::IngressSettings;
use tagpass_core::constants::DEFAULT_DEBOUNCE_SECS;
use tagpass_core::{Direction, Identifier, PresenceStatus};
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::decision::{Decision, ReasonCode};
use crate::error::{IngressError, IngressResult, StoreResult};
use crate::roster::Roster;
use crate::store::PresenceStore;

/// Engine settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngressConfig {
    /// Minimum time between two accepted transitions of one identifier
    pub debounce: Duration,
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_secs(DEFAULT_DEBOUNCE_SECS),
        }
    }
}

impl IngressConfig {
    /// Set the debounce window
    pub fn debounce(mut self, window: Duration) -> Self {
        self.debounce = window;
        self
    }
}

impl From<&IngressSettings> for IngressConfig {
    fn from(settings: &IngressSettings) -> Self {
        Self::default().debounce(Duration::from_secs(settings.debounce_secs))
    }
}

/// Ingress engine over a presence store and a roster.
///
/// Share one engine between readers with `Arc<IngressEngine<..>>`.
pub struct IngressEngine<S, R> {
    store: S,
    roster: R,
    debounce: TimeDelta,
    lock: Mutex<()>,
}

impl<S: PresenceStore, R: Roster> IngressEngine<S, R> {
    pub fn new(store: S, roster: R, config: IngressConfig) -> Self {
        Self {
            store,
            roster,
            debounce: TimeDelta::from_std(config.debounce).unwrap_or(TimeDelta::MAX),
            lock: Mutex::new(()),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn roster(&self) -> &R {
        &self.roster
    }

    /// Add identifiers missing from the presence table.
    ///
    /// Runs under the decision lock, so a concurrent tap is never overwritten
    /// by a stale copy of the table. See [`crate::provision()`] for the rules.
    ///
    /// # Errors
    /// Returns the store error if the table cannot be loaded or saved.
    pub async fn provision<I>(&self, identifiers: I) -> StoreResult<usize>
    where
        I: IntoIterator<Item = Identifier>,
    {
        let _guard = self.lock.lock().await;
        crate::provision::provision(&self.store, identifiers).await
    }

    /// Decide a tap at the current time.
    pub async fn decide_now(
        &self,
        identifier: &Identifier,
        direction: Option<Direction>,
    ) -> IngressResult<Decision> {
        self.decide(identifier, direction, Utc::now()).await
    }

    /// Decide a tap of `identifier` in `direction` at `now`.
    ///
    /// Denials are `Ok` decisions. Only a store failure is an error.
    ///
    /// # Errors
    /// - `IngressError::Store` if the presence table cannot be loaded.
    /// - `IngressError::NotRecorded` if a transition was decided but the
    ///   save failed. The error carries the decision that would have been
    ///   returned.
    pub async fn decide(
        &self,
        identifier: &Identifier,
        direction: Option<Direction>,
        now: DateTime<Utc>,
    ) -> IngressResult<Decision> {
        if identifier.is_empty() {
            let decision = Decision::new(ReasonCode::InvalidInput, None);
            return Ok(self.report(identifier, direction, decision));
        }

        let roster = self.roster.lookup(identifier);
        let Some(direction) = direction else {
            let decision = Decision::new(ReasonCode::InvalidInput, roster);
            return Ok(self.report(identifier, None, decision));
        };

        let _guard = self.lock.lock().await;

        let mut table = self.store.load().await?;

        let Some(entry) = table.get_mut(identifier) else {
            return Ok(self.report(
                identifier,
                Some(direction),
                Decision::new(ReasonCode::UnknownIdentifier, roster),
            ));
        };

        let reason = if now.signed_duration_since(entry.last_change) < self.debounce {
            ReasonCode::TooSoon
        } else {
            match (direction, entry.status) {
                (Direction::Entry, PresenceStatus::Inside) => ReasonCode::AlreadyInside,
                (Direction::Exit, PresenceStatus::Outside) => ReasonCode::AlreadyOutside,
                _ => ReasonCode::Success,
            }
        };

        let decision = Decision::new(reason, roster);
        if reason != ReasonCode::Success {
            return Ok(self.report(identifier, Some(direction), decision));
        }

        entry.status = direction.target_status();
        entry.last_change = now;

        if let Err(source) = self.store.save(&table).await {
            warn!(%identifier, %direction, error = %source, "Transition decided but not recorded");
            return Err(IngressError::not_recorded(decision, source));
        }

        Ok(self.report(identifier, Some(direction), decision))
    }

    fn report(
        &self,
        identifier: &Identifier,
        direction: Option<Direction>,
        decision: Decision,
    ) -> Decision {
        let direction = direction.map_or_else(|| "none".to_string(), |d| d.to_string());
        if decision.is_granted() {
            info!(%identifier, %direction, reason = %decision.reason(), "Tap accepted");
        } else {
            warn!(%identifier, %direction, reason = %decision.reason(), "Tap denied");
        }
        decision
    }
}
