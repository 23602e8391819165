//! Common helpers for codec integration tests.

#![allow(dead_code)]

use proptest::prelude::*;
use tagpass_ndef::TextRecord;

/// Strategy for language codes a status byte can describe (0-63 ASCII bytes).
pub fn language_code() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-zA-Z-]{0,63}").expect("Failed to create language code regex")
}

/// Strategy for identifiers as provisioning writes them.
pub fn uuid_identifier() -> impl Strategy<Value = String> {
    prop::string::string_regex("[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}")
        .expect("Failed to create UUID regex")
}

/// Strategy for arbitrary Text records in either encoding.
pub fn text_record() -> impl Strategy<Value = TextRecord> {
    (language_code(), any::<String>(), any::<bool>()).prop_map(|(language, text, utf16)| {
        if utf16 {
            TextRecord::utf16(language, text).expect("language code within limits")
        } else {
            TextRecord::new(language, text).expect("language code within limits")
        }
    })
}

/// Split a tag memory image into 4-byte pages as the reader returns them.
pub fn pages(image: &[u8]) -> Vec<Vec<u8>> {
    image.chunks(4).map(<[u8]>::to_vec).collect()
}
