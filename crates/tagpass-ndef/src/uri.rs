//! Well-known URI record payload: one abbreviation code followed by the
//! UTF-8 remainder of the URI.

use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{CodecError, CodecResult};

/// URI identifier codes, indexed by code value.
const URI_PREFIXES: [&str; 36] = [
    "",
    "http://www.",
    "https://www.",
    "http://",
    "https://",
    "tel:",
    "mailto:",
    "ftp://anonymous:anonymous@",
    "ftp://ftp.",
    "ftps://",
    "sftp://",
    "smb://",
    "nfs://",
    "ftp://",
    "dav://",
    "news:",
    "telnet://",
    "imap:",
    "rtsp://",
    "urn:",
    "pop:",
    "sip:",
    "sips:",
    "tftp:",
    "btspp://",
    "btl2cap://",
    "btgoep://",
    "tcpobex://",
    "irdaobex://",
    "file://",
    "urn:epc:id:",
    "urn:epc:tag:",
    "urn:epc:pat:",
    "urn:epc:raw:",
    "urn:epc:",
    "urn:nfc:",
];

/// Decoded URI record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UriRecord {
    uri: String,
}

impl UriRecord {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    /// Parse a URI record payload.
    ///
    /// Codes outside the table are treated as "no abbreviation".
    ///
    /// # Errors
    /// - `MalformedUriRecord` if the payload is empty.
    /// - `UnsupportedEncoding` if the remainder is not UTF-8.
    pub fn parse(payload: &[u8]) -> CodecResult<Self> {
        let Some((&code, rest)) = payload.split_first() else {
            return Err(CodecError::malformed_uri("empty payload"));
        };
        let prefix = URI_PREFIXES.get(usize::from(code)).copied().unwrap_or("");
        let rest = std::str::from_utf8(rest)
            .map_err(|e| CodecError::unsupported_encoding(format!("URI is not UTF-8: {e}")))?;

        Ok(Self {
            uri: format!("{prefix}{rest}"),
        })
    }

    /// Serialize with the longest matching abbreviation.
    #[must_use]
    pub fn to_payload(&self) -> Bytes {
        let (code, prefix) = URI_PREFIXES
            .iter()
            .enumerate()
            .skip(1)
            .filter(|(_, prefix)| self.uri.starts_with(*prefix))
            .max_by_key(|(_, prefix)| prefix.len())
            .map_or((0, ""), |(code, prefix)| (code, *prefix));

        let rest = &self.uri[prefix.len()..];
        let mut out = BytesMut::with_capacity(1 + rest.len());
        out.put_u8(code as u8);
        out.put_slice(rest.as_bytes());
        out.freeze()
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}
