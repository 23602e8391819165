//! NDEF codec for gate tags.
//!
//! Tags carry a single NDEF message inside a `0x03` TLV, followed by the
//! `0xFE` terminator TLV. This crate turns that tag memory image into typed
//! records and back, with no I/O of its own:
//!
//! - [`decode_strict`] / [`decode_lenient`] parse a memory image into an
//!   [`NdefMessage`]; [`decode`] is the strict variant.
//! - [`encode`] and its single-record helpers produce a block-aligned image.
//! - [`extract_identifier`] is the path a tag read takes on its way to the
//!   ingress engine: lenient decode, first Text record, identifier.
//!   [`extract_uuid_identifier`] instead takes the first Text record that
//!   holds a UUID.
//!
//! # Examples
//!
//! ```
//! use tagpass_ndef::{encode_identifier, extract_identifier};
//!
//! let image = encode_identifier("7c9e6679-7425-40de-944b-e07fc1f90ae7")?;
//! assert_eq!(image.len() % 4, 0);
//!
//! let identifier = extract_identifier(&image)?;
//! assert_eq!(identifier.as_str(), "7c9e6679-7425-40de-944b-e07fc1f90ae7");
//! # Ok::<(), tagpass_ndef::CodecError>(())
//! ```

pub mod decoder;
pub mod encoder;
pub mod error;
pub mod message;
pub mod record;
pub mod text;
pub mod uri;

pub use decoder::{decode, decode_lenient, decode_strict};
pub use encoder::{encode, encode_identifier, encode_text, encode_uri};
pub use error::{CodecError, CodecResult};
pub use message::NdefMessage;
pub use record::{NdefRecord, RecordHeader, Tnf};
pub use text::TextRecord;
pub use uri::UriRecord;

use tagpass_core::Identifier;

/// Decode a tag memory image leniently and take the identifier from its
/// first Text record, exactly as written.
///
/// # Errors
/// Any decode error, or `CodecError::NoTextRecord` if the message carries
/// no Text record.
pub fn extract_identifier(buf: &[u8]) -> CodecResult<Identifier> {
    let text = decode_lenient(buf)?.first_text()?;
    Ok(Identifier::new(text.into_text()))
}

/// Decode a tag memory image leniently and take the first Text record that
/// holds a UUID.
///
/// Text records that are malformed or hold something else are skipped.
///
/// # Errors
/// Any decode error, `CodecError::NoTextRecord` if the message carries no
/// Text record, or `CodecError::InvalidIdentifier` if none of them is a UUID.
pub fn extract_uuid_identifier(buf: &[u8]) -> CodecResult<Identifier> {
    let message = decode_lenient(buf)?;
    let mut texts = 0;

    for record in message.iter() {
        let Some(text) = record.as_text() else {
            continue;
        };
        texts += 1;
        if let Ok(text) = text {
            let identifier = Identifier::new(text.into_text());
            if identifier.is_uuid() {
                return Ok(identifier);
            }
        }
    }

    if texts == 0 {
        return Err(CodecError::NoTextRecord);
    }
    Err(CodecError::invalid_identifier(format!(
        "none of {texts} Text record(s) holds a UUID"
    )))
}
