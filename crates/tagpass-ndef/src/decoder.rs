//! NDEF decoding from raw tag memory.
//!
//! ```text
//! [0x03][len: 1 | FF hi lo][record]...[record][0xFE][padding]
//!
//! record:
//! [flags][type len][payload len: 1 if SR else 4][id len: 1 if IL][type][id][payload]
//! ```
//!
//! Decoding walks records until one carries `ME` or the bytes consumed reach
//! the TLV length. The TLV length is a bound, not the only terminator: tags
//! written by some tools carry a length that disagrees with the records, so
//! whichever limit comes first ends the message.
//!
//! Two entry points share the walk:
//!
//! - [`decode_strict`] also requires the terminator TLV right after the last
//!   record.
//! - [`decode_lenient`] stops after the last record and ignores whatever
//!   follows.

use bytes::{Buf, Bytes};
use tagpass_core::constants::{NDEF_TLV_TAG, TERMINATOR_TLV, TLV_LONG_LENGTH};

use crate::error::{CodecError, CodecResult};
use crate::message::NdefMessage;
use crate::record::{NdefRecord, RecordHeader};
use crate::text::TextRecord;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Terminator {
    Required,
    Ignored,
}

/// Decode a message and require the terminator TLV after the last record.
///
/// # Errors
/// - `NotNdef` if the buffer does not start with `0x03`.
/// - `Truncated` if the buffer ends inside a length, header or field, or
///   before a record with `ME` set or the declared length is reached.
/// - `MalformedTextRecord` / `UnsupportedEncoding` for a bad Text record.
/// - `EmptyMessage` if no record precedes the end of the declared length.
/// - `MissingTerminator` if the byte after the last record is not `0xFE`.
pub fn decode_strict(buf: &[u8]) -> CodecResult<NdefMessage> {
    decode_with(buf, Terminator::Required)
}

/// Decode a message without looking past the last record.
///
/// # Errors
/// Same as [`decode_strict`] except `MissingTerminator`.
pub fn decode_lenient(buf: &[u8]) -> CodecResult<NdefMessage> {
    decode_with(buf, Terminator::Ignored)
}

/// Decode a message written by a conforming writer.
///
/// Alias for [`decode_strict`].
pub fn decode(buf: &[u8]) -> CodecResult<NdefMessage> {
    decode_strict(buf)
}

fn decode_with(buf: &[u8], terminator: Terminator) -> CodecResult<NdefMessage> {
    let mut cursor = buf;

    let tag = cursor.first().copied();
    if tag != Some(NDEF_TLV_TAG) {
        return Err(CodecError::not_ndef(tag));
    }
    cursor.advance(1);

    let declared = read_tlv_length(&mut cursor)?;

    let mut records = Vec::new();
    let mut consumed = 0usize;
    while consumed < declared {
        let before = cursor.remaining();
        let (record, header) = read_record(&mut cursor)?;
        consumed += before - cursor.remaining();
        records.push(record);
        if header.message_end {
            break;
        }
    }

    if terminator == Terminator::Required && cursor.first() != Some(&TERMINATOR_TLV) {
        if records.is_empty() {
            return Err(CodecError::EmptyMessage);
        }
        return Err(CodecError::MissingTerminator);
    }

    NdefMessage::new(records)
}

fn read_tlv_length(cursor: &mut &[u8]) -> CodecResult<usize> {
    let first = take_u8(cursor)?;
    if first != TLV_LONG_LENGTH {
        return Ok(usize::from(first));
    }
    ensure(cursor, 2)?;
    Ok(usize::from(cursor.get_u16()))
}

fn read_record(cursor: &mut &[u8]) -> CodecResult<(NdefRecord, RecordHeader)> {
    let header = RecordHeader::from_byte(take_u8(cursor)?);
    let type_length = usize::from(take_u8(cursor)?);

    let payload_length = if header.short_record {
        usize::from(take_u8(cursor)?)
    } else {
        ensure(cursor, 4)?;
        cursor.get_u32() as usize
    };

    let id_length = if header.id_length_present {
        usize::from(take_u8(cursor)?)
    } else {
        0
    };

    let record_type = take_bytes(cursor, type_length)?;
    let id = take_bytes(cursor, id_length)?;
    let payload = take_bytes(cursor, payload_length)?;

    let record = NdefRecord::new(header.tnf, record_type, id, payload)?;
    if record.is_text() {
        TextRecord::parse(record.payload())?;
    }

    Ok((record, header))
}

fn ensure(cursor: &&[u8], needed: usize) -> CodecResult<()> {
    if cursor.remaining() < needed {
        return Err(CodecError::truncated(needed, cursor.remaining()));
    }
    Ok(())
}

fn take_u8(cursor: &mut &[u8]) -> CodecResult<u8> {
    ensure(cursor, 1)?;
    Ok(cursor.get_u8())
}

fn take_bytes(cursor: &mut &[u8], length: usize) -> CodecResult<Bytes> {
    ensure(cursor, length)?;
    Ok(cursor.copy_to_bytes(length))
}
