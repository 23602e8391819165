//! NDEF encoding into a tag memory image.

use bytes::{BufMut, Bytes, BytesMut};
use tagpass_core::constants::{
    BLOCK_SIZE, DEFAULT_LANGUAGE_CODE, MAX_TLV_LENGTH, NDEF_TLV_TAG, TERMINATOR_TLV,
    TLV_LONG_LENGTH,
};

use crate::error::{CodecError, CodecResult};
use crate::record::{NdefRecord, RecordHeader};
use crate::text::TextRecord;
use crate::uri::UriRecord;

/// Encode records as an NDEF TLV followed by the terminator TLV, zero padded
/// to a whole number of 4-byte blocks.
///
/// `MB` is set on the first record and `ME` on the last; `SR` is used when a
/// payload fits in one length byte and `IL` when the record has an ID.
///
/// # Errors
/// - `EmptyMessage` if `records` is empty.
/// - `TooLarge` if the message does not fit a three-byte TLV length.
pub fn encode(records: &[NdefRecord]) -> CodecResult<Bytes> {
    if records.is_empty() {
        return Err(CodecError::EmptyMessage);
    }

    let mut body = BytesMut::new();
    let last = records.len() - 1;
    for (index, record) in records.iter().enumerate() {
        put_record(&mut body, record, index == 0, index == last);
    }

    if body.len() > MAX_TLV_LENGTH {
        return Err(CodecError::too_large("message", body.len(), MAX_TLV_LENGTH));
    }

    let mut out = BytesMut::with_capacity(body.len() + 8);
    out.put_u8(NDEF_TLV_TAG);
    if body.len() < usize::from(TLV_LONG_LENGTH) {
        out.put_u8(body.len() as u8);
    } else {
        out.put_u8(TLV_LONG_LENGTH);
        out.put_u16(body.len() as u16);
    }
    out.put_slice(&body);
    out.put_u8(TERMINATOR_TLV);

    let padding = (BLOCK_SIZE - out.len() % BLOCK_SIZE) % BLOCK_SIZE;
    out.put_bytes(0x00, padding);

    Ok(out.freeze())
}

/// Encode a single Text record.
///
/// # Errors
/// See [`encode`].
pub fn encode_text(text: &TextRecord) -> CodecResult<Bytes> {
    encode(&[NdefRecord::text(text)])
}

/// Encode a single URI record.
///
/// # Errors
/// See [`encode`].
pub fn encode_uri(uri: &UriRecord) -> CodecResult<Bytes> {
    encode(&[NdefRecord::uri(uri)])
}

/// Encode an identifier the way gate tags carry it: one UTF-8 Text record
/// with language code `en`.
///
/// # Errors
/// See [`encode`].
pub fn encode_identifier(identifier: &str) -> CodecResult<Bytes> {
    encode_text(&TextRecord::new(DEFAULT_LANGUAGE_CODE, identifier)?)
}

fn put_record(out: &mut BytesMut, record: &NdefRecord, first: bool, last: bool) {
    let payload = record.payload();
    let header = RecordHeader {
        message_begin: first,
        message_end: last,
        chunked: false,
        short_record: payload.len() <= usize::from(u8::MAX),
        id_length_present: !record.id().is_empty(),
        tnf: record.tnf(),
    };

    out.put_u8(header.to_byte());
    out.put_u8(record.record_type().len() as u8);
    if header.short_record {
        out.put_u8(payload.len() as u8);
    } else {
        out.put_u32(payload.len() as u32);
    }
    if header.id_length_present {
        out.put_u8(record.id().len() as u8);
    }
    out.put_slice(record.record_type());
    out.put_slice(record.id());
    out.put_slice(payload);
}
