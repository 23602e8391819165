//! Integration tests for reader sessions driven by scripted tag sources.
//!
//! Run with: cargo test --package tagpass-reader --test session_tests

use std::time::Duration;

use tagpass_core::Identifier;
use tagpass_ndef::{CodecError, TextRecord, encode_identifier, encode_text};
use tagpass_reader::mock::{MockTagSource, MockTransport};
use tagpass_reader::{ReaderConfig, ReaderError, ReaderSession, SessionConfig, TagEvent};

fn tag(identifier: &str) -> MockTransport {
    MockTransport::from_memory(encode_identifier(identifier).unwrap(), 4)
}

#[tokio::test]
async fn test_taps_arrive_in_order() {
    let source = MockTagSource::new()
        .with_tag(tag("alpha"))
        .with_idle()
        .with_idle()
        .with_tag(tag("beta"))
        .with_tag(tag("alpha"));
    let mut handle = ReaderSession::new(source, SessionConfig::default()).start();

    let mut identifiers = Vec::new();
    while let Some(event) = handle.recv().await {
        if let TagEvent::TagRead(identifier) = event {
            identifiers.push(identifier);
        }
    }

    assert_eq!(
        identifiers,
        vec![
            Identifier::new("alpha"),
            Identifier::new("beta"),
            Identifier::new("alpha"),
        ]
    );
    handle.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_page_ceiling_reported_as_truncated() {
    let source = MockTagSource::new().with_tag(tag("7c9e6679-7425-40de-944b-e07fc1f90ae7"));
    let config = SessionConfig {
        reader: ReaderConfig::default().max_pages(4),
        ..SessionConfig::default()
    };
    let mut handle = ReaderSession::new(source, config).start();

    let event = handle.recv().await.unwrap();

    assert_eq!(
        event,
        TagEvent::TagError(ReaderError::Truncated { pages_read: 4 })
    );
}

#[tokio::test]
async fn test_tag_without_text_record_is_undecodable() {
    let image = tagpass_ndef::encode_uri(&tagpass_ndef::UriRecord::new("https://example.org"))
        .unwrap();
    let source = MockTagSource::new().with_tag(MockTransport::from_memory(image, 4));
    let mut handle = ReaderSession::new(source, SessionConfig::default()).start();

    let event = handle.recv().await.unwrap();

    assert_eq!(event, TagEvent::Undecodable(CodecError::NoTextRecord));
}

#[tokio::test]
async fn test_identifier_taken_verbatim_from_text_record() {
    let record = TextRecord::new("fr", "  Badge-42 ").unwrap();
    let image = encode_text(&record).unwrap();
    let source = MockTagSource::new().with_tag(MockTransport::from_memory(image, 4));
    let mut handle = ReaderSession::new(source, SessionConfig::default()).start();

    let event = handle.recv().await.unwrap();

    assert_eq!(event, TagEvent::TagRead(Identifier::new("  Badge-42 ")));
}

#[tokio::test]
async fn test_tag_at_custom_base_page() {
    let image = encode_identifier("late-start").unwrap();
    let source = MockTagSource::new().with_tag(MockTransport::from_memory(image, 16));
    let config = SessionConfig {
        reader: ReaderConfig::default().base_page(16),
        ..SessionConfig::default()
    };
    let mut handle = ReaderSession::new(source, config).start();

    let event = handle.recv().await.unwrap();

    assert_eq!(event, TagEvent::TagRead(Identifier::new("late-start")));
}

#[tokio::test]
async fn test_shutdown_stops_idle_worker() {
    let mut source = MockTagSource::new();
    for _ in 0..10_000 {
        source = source.with_idle();
    }
    let config = SessionConfig {
        poll_interval: Duration::from_millis(1),
        ..SessionConfig::default()
    };
    let handle = ReaderSession::new(source, config).start();

    tokio::time::timeout(Duration::from_secs(5), handle.shutdown())
        .await
        .expect("shutdown timed out")
        .unwrap();
}

#[tokio::test]
async fn test_fatal_poll_error_is_last_event() {
    let source = MockTagSource::new()
        .with_error(ReaderError::configuration("context lost"))
        .with_tag(tag("never-read"));
    let mut handle = ReaderSession::new(source, SessionConfig::default()).start();

    let first = handle.recv().await.unwrap();
    let second = handle.recv().await;

    assert!(matches!(
        first,
        TagEvent::TagError(ReaderError::Configuration { .. })
    ));
    assert_eq!(second, None);
}
