//! Roster lookup.

use std::collections::HashMap;
use std::path::Path;

use tagpass_core::Identifier;
use tracing::{info, warn};

use crate::error::{StoreError, StoreResult};
use crate::models::RosterEntry;

/// Read-only identifier to display attributes lookup.
pub trait Roster: Send + Sync {
    fn lookup(&self, identifier: &Identifier) -> Option<RosterEntry>;
}

impl<R: Roster + ?Sized> Roster for std::sync::Arc<R> {
    fn lookup(&self, identifier: &Identifier) -> Option<RosterEntry> {
        (**self).lookup(identifier)
    }
}

/// Roster held in memory, loaded once.
#[derive(Debug, Clone, Default)]
pub struct MemoryRoster {
    entries: HashMap<Identifier, RosterEntry>,
}

impl MemoryRoster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from entries. A later entry for the same identifier
    /// replaces an earlier one.
    pub fn from_entries(entries: impl IntoIterator<Item = RosterEntry>) -> Self {
        let mut roster = Self::new();
        for entry in entries {
            if let Some(previous) = roster.entries.insert(entry.identifier.clone(), entry) {
                warn!(identifier = %previous.identifier, "Duplicate roster identifier, keeping last");
            }
        }
        roster
    }

    /// Load a JSON array of roster entries.
    ///
    /// # Errors
    /// Returns `StoreError::Unavailable` if the file cannot be read or parsed.
    pub fn from_json_file(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            StoreError::unavailable(format!("failed to read roster {}: {e}", path.display()))
        })?;
        let entries: Vec<RosterEntry> = serde_json::from_str(&content).map_err(|e| {
            StoreError::unavailable(format!("failed to parse roster {}: {e}", path.display()))
        })?;

        let roster = Self::from_entries(entries);
        info!(path = %path.display(), entries = roster.len(), "Roster loaded");
        Ok(roster)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Every identifier on the roster.
    pub fn identifiers(&self) -> impl Iterator<Item = &Identifier> {
        self.entries.keys()
    }
}

impl Roster for MemoryRoster {
    fn lookup(&self, identifier: &Identifier) -> Option<RosterEntry> {
        self.entries.get(identifier).cloned()
    }
}
