//! Error types for NDEF decoding and encoding.

/// Result type alias for codec operations.
pub type CodecResult<T> = std::result::Result<T, CodecError>;

/// Errors produced while decoding or encoding NDEF data.
///
/// Decoding never panics: any buffer that cannot be fully interpreted maps
/// to one of these variants, and no partially parsed record is returned.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    /// Buffer does not start with the NDEF TLV tag (`0x03`).
    #[error("Not an NDEF message: expected TLV tag 0x03, found {found}")]
    NotNdef { found: String },

    /// Buffer ended before a length, header or field could be read.
    #[error("NDEF data truncated: needed {needed} bytes, {available} available")]
    Truncated { needed: usize, available: usize },

    /// Text record payload is shorter than its status byte announces.
    #[error("Malformed text record: {message}")]
    MalformedTextRecord { message: String },

    /// URI record payload is empty.
    #[error("Malformed URI record: {message}")]
    MalformedUriRecord { message: String },

    /// Text, language code or URI bytes are not valid in their declared encoding.
    #[error("Unsupported encoding: {message}")]
    UnsupportedEncoding { message: String },

    /// Message holds no records.
    #[error("NDEF message contains no records")]
    EmptyMessage,

    /// Strict decoding found no terminator TLV right after the last record.
    #[error("Missing terminator TLV after last record")]
    MissingTerminator,

    /// Message holds no Text record to take an identifier from.
    #[error("NDEF message contains no text record")]
    NoTextRecord,

    /// Language code longer than a Text record status byte can describe.
    #[error("Language code too long: {length} bytes (max 63)")]
    LanguageCodeTooLong { length: usize },

    /// Decoded identifier was rejected by the caller's policy.
    #[error("Invalid identifier: {message}")]
    InvalidIdentifier { message: String },

    /// A record field or the whole message exceeds its length field.
    #[error("{field} too large: {length} bytes (max {max})")]
    TooLarge {
        field: &'static str,
        length: usize,
        max: usize,
    },
}

impl CodecError {
    /// Create a new not-NDEF error from the offending first byte.
    pub fn not_ndef(found: Option<u8>) -> Self {
        Self::NotNdef {
            found: found.map_or_else(|| "empty buffer".to_string(), |b| format!("0x{b:02X}")),
        }
    }

    /// Create a new truncation error.
    pub fn truncated(needed: usize, available: usize) -> Self {
        Self::Truncated { needed, available }
    }

    /// Create a new malformed text record error.
    pub fn malformed_text(message: impl Into<String>) -> Self {
        Self::MalformedTextRecord {
            message: message.into(),
        }
    }

    /// Create a new malformed URI record error.
    pub fn malformed_uri(message: impl Into<String>) -> Self {
        Self::MalformedUriRecord {
            message: message.into(),
        }
    }

    /// Create a new unsupported encoding error.
    pub fn unsupported_encoding(message: impl Into<String>) -> Self {
        Self::UnsupportedEncoding {
            message: message.into(),
        }
    }

    /// Create a new invalid identifier error.
    pub fn invalid_identifier(message: impl Into<String>) -> Self {
        Self::InvalidIdentifier {
            message: message.into(),
        }
    }

    /// Create a new field size error.
    pub fn too_large(field: &'static str, length: usize, max: usize) -> Self {
        Self::TooLarge { field, length, max }
    }
}
