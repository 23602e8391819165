use thiserror::Error;

use crate::decision::Decision;

/// Presence store failures.
///
/// Backends map their own errors (I/O, SQL, JSON) onto these two variants so
/// the engine can tell a failed read from a failed write.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Presence table could not be read
    #[error("Presence store unavailable: {message}")]
    Unavailable { message: String },

    /// Presence table could not be written
    #[error("Presence store write failed: {message}")]
    WriteFailed { message: String },
}

impl StoreError {
    /// Create a new unavailable error.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    /// Create a new write failure.
    pub fn write_failed(message: impl Into<String>) -> Self {
        Self::WriteFailed {
            message: message.into(),
        }
    }
}

/// Specialized result type for presence store operations
pub type StoreResult<T> = Result<T, StoreError>;

/// Ingress engine failures.
///
/// Policy outcomes, denials included, are never errors: they come back as a
/// [`Decision`]. These variants only describe a store that let the engine
/// down.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngressError {
    /// Presence table could not be loaded; no decision was made
    #[error(transparent)]
    Store(#[from] StoreError),

    /// Transition was decided but could not be persisted
    #[error("Decision not recorded: {source}")]
    NotRecorded {
        decision: Box<Decision>,
        source: StoreError,
    },
}

impl IngressError {
    /// Create a new not-recorded error for a decision whose save failed.
    pub fn not_recorded(decision: Decision, source: StoreError) -> Self {
        Self::NotRecorded {
            decision: Box::new(decision),
            source,
        }
    }

    /// Decision that would have been reported, if one was reached.
    pub fn decision(&self) -> Option<&Decision> {
        match self {
            Self::NotRecorded { decision, .. } => Some(decision),
            Self::Store(_) => None,
        }
    }
}

/// Specialized result type for ingress decisions
pub type IngressResult<T> = Result<T, IngressError>;
