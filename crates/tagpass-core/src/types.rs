use crate::{Result, error::Error};
use serde::{Deserialize, Serialize};
use std::fmt;
use subtle::ConstantTimeEq;

/// Opaque identifier read from a tag.
///
/// The value is kept exactly as decoded from the tag record: no trimming,
/// no case folding. An empty identifier is representable so that callers can
/// hand it to the ingress engine, which rejects it as invalid input.
///
/// # Security
/// Equality is a constant-time byte comparison, so lookups keyed by an
/// identifier do not leak how many leading bytes matched.
#[derive(Debug, Clone, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Identifier(String);

impl Identifier {
    /// Wrap a decoded identifier without normalization.
    pub fn new(value: impl Into<String>) -> Self {
        Identifier(value.into())
    }

    /// Get the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if the identifier holds no bytes.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns `true` if the identifier parses as a UUID.
    #[must_use]
    pub fn is_uuid(&self) -> bool {
        uuid::Uuid::try_parse(&self.0).is_ok()
    }

    /// Consume the identifier and return the inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Identifier {
    fn from(value: &str) -> Self {
        Identifier::new(value)
    }
}

impl From<String> for Identifier {
    fn from(value: String) -> Self {
        Identifier(value)
    }
}

impl PartialEq for Identifier {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl std::hash::Hash for Identifier {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

/// Direction requested at the gate.
///
/// Integer codes match the ones used by the kiosk front ends: `1` for entry,
/// `0` for exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Exit = 0,
    Entry = 1,
}

impl Direction {
    /// Create a direction from its integer code.
    ///
    /// # Errors
    /// Returns `Error::InvalidDirection` if the value is not 0 or 1.
    #[inline]
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Direction::Exit),
            1 => Ok(Direction::Entry),
            _ => Err(Error::InvalidDirection { code: value }),
        }
    }

    /// Convert the direction to its integer code.
    #[inline]
    #[must_use]
    pub fn to_u8(self) -> u8 {
        self as u8
    }

    /// Presence status a successful transition in this direction leads to.
    #[inline]
    #[must_use]
    pub fn target_status(self) -> PresenceStatus {
        match self {
            Direction::Entry => PresenceStatus::Inside,
            Direction::Exit => PresenceStatus::Outside,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Direction::Entry => write!(f, "entry"),
            Direction::Exit => write!(f, "exit"),
        }
    }
}

impl std::str::FromStr for Direction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "entry" | "in" | "1" => Ok(Direction::Entry),
            "exit" | "out" | "0" => Ok(Direction::Exit),
            _ => Err(Error::InvalidDirectionName(s.to_string())),
        }
    }
}

/// Whether an identifier is currently on the premises.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresenceStatus {
    Outside = 0,
    Inside = 1,
}

impl PresenceStatus {
    /// Create a status from its stored code.
    ///
    /// # Errors
    /// Returns `Error::InvalidStatus` if the value is not 0 or 1.
    #[inline]
    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(PresenceStatus::Outside),
            1 => Ok(PresenceStatus::Inside),
            _ => Err(Error::InvalidStatus { code: value }),
        }
    }

    /// Convert the status to its stored code.
    #[inline]
    #[must_use]
    pub fn to_u8(self) -> u8 {
        self as u8
    }
}

impl From<Direction> for PresenceStatus {
    fn from(direction: Direction) -> Self {
        direction.target_status()
    }
}

impl fmt::Display for PresenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PresenceStatus::Inside => write!(f, "inside"),
            PresenceStatus::Outside => write!(f, "outside"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    #[test]
    fn test_identifier_is_not_normalized() {
        let id = Identifier::new(" ABC ");
        assert_eq!(id.as_str(), " ABC ");
        assert_ne!(id, Identifier::new("abc"));
    }

    #[test]
    fn test_identifier_equality_and_hash() {
        let mut map = HashMap::new();
        map.insert(Identifier::new("7c9e6679-7425-40de-944b-e07fc1f90ae7"), 1);
        assert_eq!(
            map.get(&Identifier::new("7c9e6679-7425-40de-944b-e07fc1f90ae7")),
            Some(&1)
        );
        assert!(map.get(&Identifier::new("7c9e6679")).is_none());
    }

    #[test]
    fn test_identifier_empty() {
        assert!(Identifier::default().is_empty());
        assert!(!Identifier::new("x").is_empty());
    }

    #[rstest]
    #[case("7c9e6679-7425-40de-944b-e07fc1f90ae7", true)]
    #[case("not-a-uuid", false)]
    #[case("", false)]
    fn test_identifier_is_uuid(#[case] value: &str, #[case] expected: bool) {
        assert_eq!(Identifier::new(value).is_uuid(), expected);
    }

    #[rstest]
    #[case(0, Direction::Exit)]
    #[case(1, Direction::Entry)]
    fn test_direction_from_u8(#[case] code: u8, #[case] expected: Direction) {
        let direction = Direction::from_u8(code).unwrap();
        assert_eq!(direction, expected);
        assert_eq!(direction.to_u8(), code);
    }

    #[test]
    fn test_direction_from_u8_invalid() {
        assert!(matches!(
            Direction::from_u8(2),
            Err(Error::InvalidDirection { code: 2 })
        ));
    }

    #[rstest]
    #[case("entry", Direction::Entry)]
    #[case("EXIT", Direction::Exit)]
    #[case("in", Direction::Entry)]
    #[case("0", Direction::Exit)]
    fn test_direction_from_str(#[case] input: &str, #[case] expected: Direction) {
        assert_eq!(input.parse::<Direction>().unwrap(), expected);
    }

    #[test]
    fn test_direction_from_str_invalid() {
        assert!("sideways".parse::<Direction>().is_err());
    }

    #[test]
    fn test_direction_target_status() {
        assert_eq!(PresenceStatus::from(Direction::Entry), PresenceStatus::Inside);
        assert_eq!(PresenceStatus::from(Direction::Exit), PresenceStatus::Outside);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(PresenceStatus::from_u8(1).unwrap(), PresenceStatus::Inside);
        assert_eq!(PresenceStatus::Outside.to_u8(), 0);
        assert!(PresenceStatus::from_u8(7).is_err());
    }
}
