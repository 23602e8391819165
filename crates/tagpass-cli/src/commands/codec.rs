//! `decode` and `encode`: tag memory images as hex.

use anyhow::Context;
use tagpass_ndef::{TextRecord, decode_lenient, decode_strict, encode_text};

/// Bytes per tag page, used to group hex output.
const PAGE_BYTES: usize = 4;

/// Parse a hex dump, ignoring whitespace and `:` separators.
pub fn parse_hex(input: &str) -> anyhow::Result<Vec<u8>> {
    let digits: String = input
        .chars()
        .filter(|c| !c.is_whitespace() && *c != ':')
        .collect();
    hex::decode(&digits).context("tag memory is not valid hex")
}

/// Render an image as uppercase hex, one tag page per group.
pub fn format_pages(image: &[u8]) -> String {
    image
        .chunks(PAGE_BYTES)
        .map(hex::encode_upper)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Decode a hex image and describe the message it carries.
pub fn decode(input: &str, strict: bool) -> anyhow::Result<String> {
    let image = parse_hex(input)?;
    let message = if strict {
        decode_strict(&image)
    } else {
        decode_lenient(&image)
    }
    .context("tag memory does not hold a valid NDEF message")?;
    Ok(message.to_string())
}

/// Encode `text` as a single Text record image.
pub fn encode(text: &str, language: &str, utf16: bool) -> anyhow::Result<String> {
    let record = if utf16 {
        TextRecord::utf16(language, text)
    } else {
        TextRecord::new(language, text)
    }
    .context("invalid text record")?;
    let image = encode_text(&record)?;
    Ok(format_pages(&image))
}
