use std::fmt;

use crate::error::{CodecError, CodecResult};
use crate::record::NdefRecord;
use crate::text::TextRecord;

/// Ordered, non-empty sequence of records read from one tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NdefMessage {
    records: Vec<NdefRecord>,
}

impl NdefMessage {
    /// Build a message from its records.
    ///
    /// # Errors
    /// Returns `CodecError::EmptyMessage` if `records` is empty.
    pub fn new(records: Vec<NdefRecord>) -> CodecResult<Self> {
        if records.is_empty() {
            return Err(CodecError::EmptyMessage);
        }
        Ok(Self { records })
    }

    #[must_use]
    pub fn records(&self) -> &[NdefRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    #[must_use]
    pub fn first(&self) -> &NdefRecord {
        &self.records[0]
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NdefRecord> {
        self.records.iter()
    }

    /// First Text record of the message.
    ///
    /// # Errors
    /// Returns `CodecError::NoTextRecord` if no record has type `"T"`, or the
    /// payload error if that record is malformed.
    pub fn first_text(&self) -> CodecResult<TextRecord> {
        self.records
            .iter()
            .find_map(NdefRecord::as_text)
            .unwrap_or(Err(CodecError::NoTextRecord))
    }
}

impl<'a> IntoIterator for &'a NdefMessage {
    type Item = &'a NdefRecord;
    type IntoIter = std::slice::Iter<'a, NdefRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

impl fmt::Display for NdefMessage {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NDEF message, {} record(s)", self.records.len())?;
        for (index, record) in self.records.iter().enumerate() {
            write!(f, "\n  [{index}] {record}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Tnf;
    use crate::uri::UriRecord;
    use bytes::Bytes;

    #[test]
    fn test_empty_message_rejected() {
        assert_eq!(NdefMessage::new(Vec::new()), Err(CodecError::EmptyMessage));
    }

    #[test]
    fn test_first_text_skips_other_records() {
        let message = NdefMessage::new(vec![
            NdefRecord::uri(&UriRecord::new("https://example.org")),
            NdefRecord::text(&TextRecord::new("en", "abc").unwrap()),
        ])
        .unwrap();
        assert_eq!(message.first_text().unwrap().text(), "abc");
        assert!(message.first().is_uri());
    }

    #[test]
    fn test_first_text_missing() {
        let message = NdefMessage::new(vec![
            NdefRecord::new(Tnf::MimeMedia, &b"text/plain"[..], Bytes::new(), &b"x"[..])
                .unwrap(),
        ])
        .unwrap();
        assert_eq!(message.first_text(), Err(CodecError::NoTextRecord));
    }

    #[test]
    fn test_display_lists_records() {
        let message = NdefMessage::new(vec![NdefRecord::uri(&UriRecord::new("tel:123"))]).unwrap();
        let rendered = message.to_string();
        assert!(rendered.starts_with("NDEF message, 1 record(s)"));
        assert!(rendered.contains("uri=\"tel:123\""));
    }
}
