//! Presence and roster records.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tagpass_core::{Identifier, PresenceStatus};

/// Presence state of one provisioned identifier.
///
/// Created by provisioning as `Outside` at the Unix epoch, so the first tap
/// is never debounced. Changed only by an accepted transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEntry {
    pub status: PresenceStatus,
    pub last_change: DateTime<Utc>,
}

impl PresenceEntry {
    pub fn new(status: PresenceStatus, last_change: DateTime<Utc>) -> Self {
        Self {
            status,
            last_change,
        }
    }

    /// Entry for a freshly provisioned identifier.
    #[must_use]
    pub fn provisioned() -> Self {
        Self::new(PresenceStatus::Outside, DateTime::<Utc>::UNIX_EPOCH)
    }
}

/// Full presence table, the unit of load and save.
pub type PresenceTable = HashMap<Identifier, PresenceEntry>;

/// One row of a persisted presence table.
///
/// Rows are what the JSON backend writes and the SQLite backend selects; the
/// engine only ever sees a [`PresenceTable`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct PresenceRow {
    pub identifier: String,
    pub status: u8,
    pub last_change: DateTime<Utc>,
}

impl PresenceRow {
    /// Build the rows of a table, ordered by identifier.
    pub fn from_table(table: &PresenceTable) -> Vec<Self> {
        let mut rows: Vec<Self> = table
            .iter()
            .map(|(identifier, entry)| Self {
                identifier: identifier.as_str().to_string(),
                status: entry.status.to_u8(),
                last_change: entry.last_change,
            })
            .collect();
        rows.sort_by(|a, b| a.identifier.cmp(&b.identifier));
        rows
    }

    /// Split the row into a table key and entry.
    ///
    /// # Errors
    /// Returns an error if the stored status code is not 0 or 1.
    pub fn into_entry(self) -> tagpass_core::Result<(Identifier, PresenceEntry)> {
        let status = PresenceStatus::from_u8(self.status)?;
        Ok((
            Identifier::new(self.identifier),
            PresenceEntry::new(status, self.last_change),
        ))
    }
}

/// Display attributes for one identifier, owned by the roster.
///
/// # Examples
///
/// ```
/// use tagpass_ingress::models::RosterEntry;
///
/// let entry: RosterEntry = serde_json::from_str(r#"{
///     "identifier": "76d452ab-89ca-4d0a-a2d1-2ffa9ab61117",
///     "display_id": 123456,
///     "first_name": "John",
///     "last_name": "Doe",
///     "program": "Computer Science",
///     "badge": "staff"
/// }"#)?;
///
/// assert_eq!(entry.full_name(), "John Doe");
/// assert!(entry.photo.is_none());
/// assert_eq!(entry.extra["badge"], "staff");
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub identifier: Identifier,

    /// Human-facing numeric ID printed on the card
    pub display_id: u32,

    pub first_name: String,
    pub last_name: String,

    /// Program or department
    #[serde(default)]
    pub program: String,

    /// Path to a photo, if one is on file
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,

    /// Any other columns of the roster source
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl RosterEntry {
    /// First and last name joined by a space.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_provisioned_entry() {
        let entry = PresenceEntry::provisioned();
        assert_eq!(entry.status, PresenceStatus::Outside);
        assert_eq!(entry.last_change.timestamp(), 0);
    }

    #[test]
    fn test_rows_sorted_and_restored() {
        let at = Utc.with_ymd_and_hms(2025, 10, 18, 9, 30, 0).unwrap();
        let mut table = PresenceTable::new();
        table.insert(
            Identifier::new("b"),
            PresenceEntry::new(PresenceStatus::Inside, at),
        );
        table.insert(Identifier::new("a"), PresenceEntry::provisioned());

        let rows = PresenceRow::from_table(&table);
        assert_eq!(rows[0].identifier, "a");
        assert_eq!(rows[1].identifier, "b");
        assert_eq!(rows[1].status, 1);

        let restored: PresenceTable = rows
            .into_iter()
            .map(|row| row.into_entry().unwrap())
            .collect();
        assert_eq!(restored, table);
    }

    #[test]
    fn test_row_with_bad_status() {
        let row = PresenceRow {
            identifier: "x".to_string(),
            status: 7,
            last_change: DateTime::<Utc>::UNIX_EPOCH,
        };
        assert!(row.into_entry().is_err());
    }

    #[test]
    fn test_roster_entry_round_trips_extra_columns() {
        let json = r#"{"identifier":"id-1","display_id":7,"first_name":"Jane","last_name":"Smith","photo":"p/2.jpg","year":3}"#;
        let entry: RosterEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.photo.as_deref(), Some("p/2.jpg"));
        assert_eq!(entry.program, "");
        assert_eq!(entry.extra["year"], 3);

        let back: RosterEntry =
            serde_json::from_str(&serde_json::to_string(&entry).unwrap()).unwrap();
        assert_eq!(back, entry);
    }
}
