//! Wire-level and policy constants shared by the TagPass crates.
//!
//! Tag memory on NFC Forum Type 2 tags (NTAG21x, Ultralight) is organised in
//! 4-byte pages. User data starts at page 4 and holds a sequence of TLV blocks;
//! the NDEF message lives in a `0x03` TLV and the block list ends with a
//! `0xFE` terminator TLV:
//!
//! ```text
//! page 4:  03 LL D1 01   <- NDEF TLV, length, first record header
//! page 5:  ...           <- record bytes
//! page n:  .. FE 00 00   <- terminator TLV, zero padding
//! ```
//!
//! PC/SC contactless readers expose page reads through the pseudo-APDU
//! `FF B0 00 <page> <len>` and answer with the data followed by the status
//! word `90 00` on success.
//!
//! # Usage
//!
//! ```
//! use tagpass_core::constants::*;
//!
//! let command = [READ_BINARY_CLA, READ_BINARY_INS, 0x00, DEFAULT_BASE_PAGE, DEFAULT_PAGE_SIZE];
//! assert_eq!(command, [0xFF, 0xB0, 0x00, 0x04, 0x04]);
//! ```

// ============================================================================
// TLV Framing
// ============================================================================

/// TLV tag introducing an NDEF message block.
pub const NDEF_TLV_TAG: u8 = 0x03;

/// Terminator TLV marking the end of the TLV area.
///
/// The reader stops requesting pages as soon as this byte shows up in the
/// most recently read page.
pub const TERMINATOR_TLV: u8 = 0xFE;

/// Marker for the three-byte TLV length form (`FF hi lo`).
pub const TLV_LONG_LENGTH: u8 = 0xFF;

/// Largest message length that fits the three-byte TLV length form.
pub const MAX_TLV_LENGTH: usize = 0xFFFE;

/// Encoded tag images are zero padded to a multiple of this size.
pub const BLOCK_SIZE: usize = 4;

// ============================================================================
// NDEF Records
// ============================================================================

/// Well-known record type for Text records.
pub const TEXT_RECORD_TYPE: &[u8] = b"T";

/// Well-known record type for URI records.
pub const URI_RECORD_TYPE: &[u8] = b"U";

/// Mask for the language code length in a Text record status byte.
pub const TEXT_LANGUAGE_LENGTH_MASK: u8 = 0x3F;

/// Bit set in a Text record status byte when the text is UTF-16BE.
pub const TEXT_UTF16_FLAG: u8 = 0x80;

/// Longest language code a Text record status byte can describe.
pub const MAX_LANGUAGE_CODE_LENGTH: usize = 63;

/// Language code written when encoding identifiers.
pub const DEFAULT_LANGUAGE_CODE: &str = "en";

// ============================================================================
// Reader Commands
// ============================================================================

/// Class byte of the PC/SC READ BINARY pseudo-APDU.
pub const READ_BINARY_CLA: u8 = 0xFF;

/// Instruction byte of the PC/SC READ BINARY pseudo-APDU.
pub const READ_BINARY_INS: u8 = 0xB0;

/// Status word returned by the reader on success (`90 00`).
pub const STATUS_SUCCESS: u16 = 0x9000;

/// First page of user memory on Type 2 tags.
pub const DEFAULT_BASE_PAGE: u8 = 4;

/// Bytes requested per read command.
pub const DEFAULT_PAGE_SIZE: u8 = 4;

/// Page ceiling for one tag read (NTAG215 user area, 504 bytes).
pub const DEFAULT_MAX_PAGES: usize = 126;

/// Default interval between presence polls of the reader, in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 250;

// ============================================================================
// Ingress Policy
// ============================================================================

/// Minimum time between two accepted transitions of one identifier.
pub const DEFAULT_DEBOUNCE_SECS: u64 = 60;
