//! Error types for tag reading.
//!
//! The reader knows nothing about NDEF, so these errors only describe the
//! transport and the paging loop. Decoding failures live in
//! `tagpass_ndef::CodecError`.

/// Result type alias for reader operations.
pub type Result<T> = std::result::Result<T, ReaderError>;

/// Errors that can occur while reading tag memory.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReaderError {
    /// Reader answered a page read with a status word other than `90 00`.
    #[error("Reader returned status word {status_word:04X}")]
    TransportFailure { status_word: u16 },

    /// No terminator TLV within the page ceiling.
    #[error("Tag read truncated: no terminator after {pages_read} pages")]
    Truncated { pages_read: usize },

    /// Transport-level failure, such as the tag leaving the field mid-read.
    #[error("Communication error: {message}")]
    Communication { message: String },

    /// Reader is gone.
    #[error("Device disconnected: {device}")]
    Disconnected { device: String },

    /// Reader could not be set up.
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ReaderError {
    /// Create a new transport failure error.
    pub fn transport_failure(status_word: u16) -> Self {
        Self::TransportFailure { status_word }
    }

    /// Create a new truncation error.
    pub fn truncated(pages_read: usize) -> Self {
        Self::Truncated { pages_read }
    }

    /// Create a new communication error.
    pub fn communication(message: impl Into<String>) -> Self {
        Self::Communication {
            message: message.into(),
        }
    }

    /// Create a new disconnected error.
    pub fn disconnected(device: impl Into<String>) -> Self {
        Self::Disconnected {
            device: device.into(),
        }
    }

    /// Create a new configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Returns `true` if no further reads can succeed on this reader.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::Disconnected { .. } | Self::Configuration { .. }
        )
    }
}
