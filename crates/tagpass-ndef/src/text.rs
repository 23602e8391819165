//! Well-known Text record payload.
//!
//! ```text
//! +--------+----------------+----------------------+
//! | status | language code  | text                 |
//! | 1 byte | status & 0x3F  | UTF-8 or UTF-16BE    |
//! +--------+----------------+----------------------+
//! status bit 7: 1 = UTF-16BE, 0 = UTF-8
//! ```

use bytes::{BufMut, Bytes, BytesMut};
use tagpass_core::constants::{
    MAX_LANGUAGE_CODE_LENGTH, TEXT_LANGUAGE_LENGTH_MASK, TEXT_UTF16_FLAG,
};

use crate::error::{CodecError, CodecResult};

/// Decoded Text record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRecord {
    language_code: String,
    is_utf16: bool,
    text: String,
}

impl TextRecord {
    /// Create a UTF-8 Text record.
    ///
    /// # Errors
    /// Returns `CodecError::LanguageCodeTooLong` for codes over 63 bytes and
    /// `CodecError::UnsupportedEncoding` for non-ASCII codes.
    pub fn new(language_code: impl Into<String>, text: impl Into<String>) -> CodecResult<Self> {
        Self::with_encoding(language_code, text, false)
    }

    /// Create a UTF-16BE Text record.
    ///
    /// # Errors
    /// Same as [`TextRecord::new`].
    pub fn utf16(language_code: impl Into<String>, text: impl Into<String>) -> CodecResult<Self> {
        Self::with_encoding(language_code, text, true)
    }

    fn with_encoding(
        language_code: impl Into<String>,
        text: impl Into<String>,
        is_utf16: bool,
    ) -> CodecResult<Self> {
        let language_code = language_code.into();
        validate_language_code(language_code.as_bytes())?;
        Ok(Self {
            language_code,
            is_utf16,
            text: text.into(),
        })
    }

    /// Parse a Text record payload.
    ///
    /// # Errors
    /// - `MalformedTextRecord` if the payload is empty or shorter than the
    ///   language code length announced by the status byte.
    /// - `UnsupportedEncoding` if the language code is not ASCII or the text
    ///   is not valid in the announced encoding.
    pub fn parse(payload: &[u8]) -> CodecResult<Self> {
        let Some((&status, rest)) = payload.split_first() else {
            return Err(CodecError::malformed_text("empty payload"));
        };

        let language_length = usize::from(status & TEXT_LANGUAGE_LENGTH_MASK);
        let is_utf16 = status & TEXT_UTF16_FLAG != 0;

        if rest.len() < language_length {
            return Err(CodecError::malformed_text(format!(
                "language code length {language_length} exceeds payload of {} bytes",
                payload.len()
            )));
        }
        let (language, body) = rest.split_at(language_length);
        validate_language_code(language)?;

        let text = if is_utf16 {
            decode_utf16_be(body)?
        } else {
            String::from_utf8(body.to_vec())
                .map_err(|e| CodecError::unsupported_encoding(format!("text is not UTF-8: {e}")))?
        };

        Ok(Self {
            // validated as ASCII above
            language_code: String::from_utf8_lossy(language).into_owned(),
            is_utf16,
            text,
        })
    }

    /// Serialize to a Text record payload.
    #[must_use]
    pub fn to_payload(&self) -> Bytes {
        let mut status = self.language_code.len() as u8 & TEXT_LANGUAGE_LENGTH_MASK;
        if self.is_utf16 {
            status |= TEXT_UTF16_FLAG;
        }

        let mut out = BytesMut::with_capacity(1 + self.language_code.len() + self.text.len() * 2);
        out.put_u8(status);
        out.put_slice(self.language_code.as_bytes());
        if self.is_utf16 {
            for unit in self.text.encode_utf16() {
                out.put_u16(unit);
            }
        } else {
            out.put_slice(self.text.as_bytes());
        }
        out.freeze()
    }

    #[must_use]
    pub fn language_code(&self) -> &str {
        &self.language_code
    }

    #[must_use]
    pub fn is_utf16(&self) -> bool {
        self.is_utf16
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn into_text(self) -> String {
        self.text
    }
}

fn validate_language_code(code: &[u8]) -> CodecResult<()> {
    if code.len() > MAX_LANGUAGE_CODE_LENGTH {
        return Err(CodecError::LanguageCodeTooLong { length: code.len() });
    }
    if !code.is_ascii() {
        return Err(CodecError::unsupported_encoding("language code is not ASCII"));
    }
    Ok(())
}

fn decode_utf16_be(body: &[u8]) -> CodecResult<String> {
    if body.len() % 2 != 0 {
        return Err(CodecError::unsupported_encoding(format!(
            "UTF-16 text has odd length {}",
            body.len()
        )));
    }
    let units: Vec<u16> = body
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect();
    String::from_utf16(&units)
        .map_err(|e| CodecError::unsupported_encoding(format!("text is not UTF-16: {e}")))
}
