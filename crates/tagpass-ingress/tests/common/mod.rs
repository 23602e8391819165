//! Shared fixtures for ingress integration tests.

#![allow(dead_code)]

use chrono::{DateTime, TimeDelta, TimeZone, Utc};
use tagpass_core::{Identifier, PresenceStatus};
use tagpass_ingress::{PresenceEntry, PresenceTable, RosterEntry};

pub const JOHN: &str = "76d452ab-89ca-4d0a-a2d1-2ffa9ab61117";
pub const JANE: &str = "another-uuid-for-testing";

/// Fixed reference time for deterministic decisions.
pub fn t0() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 10, 18, 10, 0, 0).unwrap()
}

pub fn roster_entry(identifier: &str, display_id: u32, first: &str, last: &str) -> RosterEntry {
    RosterEntry {
        identifier: identifier.into(),
        display_id,
        first_name: first.to_string(),
        last_name: last.to_string(),
        program: "Computer Science".to_string(),
        photo: None,
        extra: Default::default(),
    }
}

pub fn roster() -> Vec<RosterEntry> {
    vec![
        roster_entry(JOHN, 123456, "John", "Doe"),
        roster_entry(JANE, 789012, "Jane", "Smith"),
    ]
}

/// John outside and Jane inside, both last changed two minutes before `t0`.
pub fn table() -> PresenceTable {
    let two_minutes_ago = t0() - TimeDelta::minutes(2);
    let mut table = PresenceTable::new();
    table.insert(
        Identifier::new(JOHN),
        PresenceEntry::new(PresenceStatus::Outside, two_minutes_ago),
    );
    table.insert(
        Identifier::new(JANE),
        PresenceEntry::new(PresenceStatus::Inside, two_minutes_ago),
    );
    table
}
