//! NDEF records and their header byte.

use std::fmt;

use bytes::Bytes;
use tagpass_core::constants::{TEXT_RECORD_TYPE, URI_RECORD_TYPE};

use crate::error::{CodecError, CodecResult};
use crate::text::TextRecord;
use crate::uri::UriRecord;

/// Type Name Format, the low three bits of a record header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Tnf {
    Empty = 0x00,
    WellKnown = 0x01,
    MimeMedia = 0x02,
    AbsoluteUri = 0x03,
    External = 0x04,
    Unknown = 0x05,
    Unchanged = 0x06,
    Reserved = 0x07,
}

impl Tnf {
    /// Decode the TNF from the low three bits of `bits`.
    #[must_use]
    pub fn from_bits(bits: u8) -> Self {
        match bits & RecordHeader::TNF_MASK {
            0x00 => Tnf::Empty,
            0x01 => Tnf::WellKnown,
            0x02 => Tnf::MimeMedia,
            0x03 => Tnf::AbsoluteUri,
            0x04 => Tnf::External,
            0x05 => Tnf::Unknown,
            0x06 => Tnf::Unchanged,
            _ => Tnf::Reserved,
        }
    }
}

/// Flags byte at the start of every record.
///
/// ```text
///  bit:  7    6    5    4    3    2..0
///       MB   ME   CF   SR   IL   TNF
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    /// First record of the message.
    pub message_begin: bool,
    /// Last record of the message.
    pub message_end: bool,
    /// Record is a chunk of a larger payload.
    pub chunked: bool,
    /// Payload length is one byte instead of four.
    pub short_record: bool,
    /// An ID length byte follows the payload length.
    pub id_length_present: bool,
    pub tnf: Tnf,
}

impl RecordHeader {
    pub const MB: u8 = 0x80;
    pub const ME: u8 = 0x40;
    pub const CF: u8 = 0x20;
    pub const SR: u8 = 0x10;
    pub const IL: u8 = 0x08;
    pub const TNF_MASK: u8 = 0x07;

    #[must_use]
    pub fn from_byte(byte: u8) -> Self {
        Self {
            message_begin: byte & Self::MB != 0,
            message_end: byte & Self::ME != 0,
            chunked: byte & Self::CF != 0,
            short_record: byte & Self::SR != 0,
            id_length_present: byte & Self::IL != 0,
            tnf: Tnf::from_bits(byte),
        }
    }

    #[must_use]
    pub fn to_byte(self) -> u8 {
        let mut byte = self.tnf as u8;
        if self.message_begin {
            byte |= Self::MB;
        }
        if self.message_end {
            byte |= Self::ME;
        }
        if self.chunked {
            byte |= Self::CF;
        }
        if self.short_record {
            byte |= Self::SR;
        }
        if self.id_length_present {
            byte |= Self::IL;
        }
        byte
    }
}

/// One NDEF record.
///
/// Header flags are not stored: they are consumed while parsing and
/// recomputed from the record's position and sizes when encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefRecord {
    tnf: Tnf,
    record_type: Bytes,
    id: Bytes,
    payload: Bytes,
}

impl NdefRecord {
    /// Create a record, checking that each field fits its length field.
    ///
    /// # Errors
    /// Returns `CodecError::TooLarge` if the type or ID exceed 255 bytes or
    /// the payload exceeds `u32::MAX` bytes.
    pub fn new(
        tnf: Tnf,
        record_type: impl Into<Bytes>,
        id: impl Into<Bytes>,
        payload: impl Into<Bytes>,
    ) -> CodecResult<Self> {
        let record_type = record_type.into();
        let id = id.into();
        let payload = payload.into();

        let max_short = usize::from(u8::MAX);
        if record_type.len() > max_short {
            return Err(CodecError::too_large("record type", record_type.len(), max_short));
        }
        if id.len() > max_short {
            return Err(CodecError::too_large("record id", id.len(), max_short));
        }
        let max_payload = u32::MAX as usize;
        if payload.len() > max_payload {
            return Err(CodecError::too_large("payload", payload.len(), max_payload));
        }

        Ok(Self {
            tnf,
            record_type,
            id,
            payload,
        })
    }

    /// Well-known Text record.
    #[must_use]
    pub fn text(text: &TextRecord) -> Self {
        Self {
            tnf: Tnf::WellKnown,
            record_type: Bytes::from_static(TEXT_RECORD_TYPE),
            id: Bytes::new(),
            payload: text.to_payload(),
        }
    }

    /// Well-known URI record.
    #[must_use]
    pub fn uri(uri: &UriRecord) -> Self {
        Self {
            tnf: Tnf::WellKnown,
            record_type: Bytes::from_static(URI_RECORD_TYPE),
            id: Bytes::new(),
            payload: uri.to_payload(),
        }
    }

    #[must_use]
    pub fn tnf(&self) -> Tnf {
        self.tnf
    }

    #[must_use]
    pub fn record_type(&self) -> &[u8] {
        &self.record_type
    }

    #[must_use]
    pub fn id(&self) -> &[u8] {
        &self.id
    }

    #[must_use]
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Returns `true` if the record type is `"T"`.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.record_type.as_ref() == TEXT_RECORD_TYPE
    }

    /// Returns `true` if the record type is `"U"`.
    #[must_use]
    pub fn is_uri(&self) -> bool {
        self.record_type.as_ref() == URI_RECORD_TYPE
    }

    /// Interpret the payload as a Text record, if the type says it is one.
    pub fn as_text(&self) -> Option<CodecResult<TextRecord>> {
        self.is_text().then(|| TextRecord::parse(&self.payload))
    }

    /// Interpret the payload as a URI record, if the type says it is one.
    pub fn as_uri(&self) -> Option<CodecResult<UriRecord>> {
        self.is_uri().then(|| UriRecord::parse(&self.payload))
    }
}

impl fmt::Display for NdefRecord {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "type={:?} tnf={:?} payload={} bytes",
            String::from_utf8_lossy(&self.record_type),
            self.tnf,
            self.payload.len()
        )?;
        if !self.id.is_empty() {
            write!(f, " id={}", hex::encode(&self.id))?;
        }
        match (self.as_text(), self.as_uri()) {
            (Some(Ok(text)), _) => write!(
                f,
                " text[{}, {}]={:?}",
                text.language_code(),
                if text.is_utf16() { "utf-16" } else { "utf-8" },
                text.text()
            ),
            (_, Some(Ok(uri))) => write!(f, " uri={:?}", uri.as_str()),
            _ => Ok(()),
        }
    }
}
