//! Decision value returned by the ingress engine.

use std::fmt;

use serde::Serialize;

use crate::messages::DisplayMessages;
use crate::models::RosterEntry;

/// Whether the tap is let through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Ok,
    Denied,
}

/// Rule that produced a decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReasonCode {
    /// Empty identifier or missing direction
    InvalidInput,
    /// Identifier not in the presence table
    UnknownIdentifier,
    /// Debounce window not yet elapsed
    TooSoon,
    /// Entry while inside
    AlreadyInside,
    /// Exit while outside
    AlreadyOutside,
    /// Transition recorded
    Success,
}

impl ReasonCode {
    /// Outcome this reason always yields.
    #[must_use]
    pub fn outcome(self) -> Outcome {
        match self {
            Self::AlreadyOutside | Self::Success => Outcome::Ok,
            Self::InvalidInput | Self::UnknownIdentifier | Self::TooSoon | Self::AlreadyInside => {
                Outcome::Denied
            }
        }
    }

    /// Display message for this reason.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidInput => DisplayMessages::INVALID_INPUT,
            Self::UnknownIdentifier => DisplayMessages::UNKNOWN_IDENTIFIER,
            Self::TooSoon => DisplayMessages::TOO_SOON,
            Self::AlreadyInside => DisplayMessages::ALREADY_INSIDE,
            Self::AlreadyOutside => DisplayMessages::ALREADY_OUTSIDE,
            Self::Success => DisplayMessages::SUCCESS,
        }
    }
}

impl fmt::Display for ReasonCode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::InvalidInput => "invalid_input",
            Self::UnknownIdentifier => "unknown_identifier",
            Self::TooSoon => "too_soon",
            Self::AlreadyInside => "already_inside",
            Self::AlreadyOutside => "already_outside",
            Self::Success => "success",
        };
        f.write_str(name)
    }
}

/// Result of one tap.
///
/// The outcome is derived from the reason, so a decision can never be both
/// `Ok` and `TooSoon`. The roster snapshot is whatever the roster returned
/// for the identifier at decision time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    reason: ReasonCode,
    roster: Option<RosterEntry>,
}

impl Decision {
    pub fn new(reason: ReasonCode, roster: Option<RosterEntry>) -> Self {
        Self { reason, roster }
    }

    pub fn outcome(&self) -> Outcome {
        self.reason.outcome()
    }

    pub fn reason(&self) -> ReasonCode {
        self.reason
    }

    /// Roster data for the identifier, if any was attached.
    pub fn roster(&self) -> Option<&RosterEntry> {
        self.roster.as_ref()
    }

    /// Message to show at the gate.
    pub fn message(&self) -> &'static str {
        self.reason.message()
    }

    /// Returns `true` if the tap is let through.
    #[must_use]
    pub fn is_granted(&self) -> bool {
        self.outcome() == Outcome::Ok
    }

    /// Returns `true` if this decision changed the presence table.
    #[must_use]
    pub fn is_transition(&self) -> bool {
        self.reason == ReasonCode::Success
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.message())?;
        if let Some(entry) = &self.roster {
            write!(f, " ({} #{})", entry.full_name(), entry.display_id)?;
        }
        Ok(())
    }
}
