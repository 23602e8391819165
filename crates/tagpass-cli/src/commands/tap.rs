//! `tap`: replay one tag memory dump through the whole pipeline.

use tagpass_core::config::ReaderSettings;
use tagpass_core::{Direction, GateConfig};
use tagpass_ingress::{IngressEngine, PresenceStore, Roster};
use tagpass_reader::mock::MockTransport;
use tagpass_reader::{ReaderConfig, TagReader, read_tag_event};

use crate::commands::codec::parse_hex;
use crate::gate::{self, handle_event};
use crate::stats::SessionStats;

pub async fn execute(
    config: &GateConfig,
    image_hex: &str,
    direction: Direction,
) -> anyhow::Result<String> {
    let image = parse_hex(image_hex)?;
    let engine = gate::build_engine(config).await?;
    Ok(tap(&engine, &config.reader, image, direction).await)
}

/// Serve `image` as tag memory, read it like a presented tag and decide.
pub async fn tap<S: PresenceStore, R: Roster>(
    engine: &IngressEngine<S, R>,
    settings: &ReaderSettings,
    image: Vec<u8>,
    direction: Direction,
) -> String {
    let reader = TagReader::new(ReaderConfig::from(settings));
    let mut transport = MockTransport::from_memory(image, settings.base_page);
    let event = read_tag_event(&reader, &mut transport, settings.require_uuid);

    let mut stats = SessionStats::new();
    handle_event(engine, event, direction, &mut stats).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use tagpass_core::Identifier;
    use tagpass_ingress::{
        IngressConfig, MemoryPresenceStore, MemoryRoster, PresenceEntry, PresenceTable,
    };
    use tagpass_ndef::encode_identifier;

    fn engine(id: &str) -> IngressEngine<MemoryPresenceStore, MemoryRoster> {
        let mut table = PresenceTable::new();
        table.insert(Identifier::new(id), PresenceEntry::provisioned());
        IngressEngine::new(
            MemoryPresenceStore::with_table(table),
            MemoryRoster::new(),
            IngressConfig::default(),
        )
    }

    #[rstest]
    #[case(Direction::Entry, "OK")]
    #[case(Direction::Exit, "OK - Already outside")]
    #[tokio::test]
    async fn test_tap_decides(#[case] direction: Direction, #[case] expected: &str) {
        let engine = engine("badge-1");
        let image = encode_identifier("badge-1").unwrap().to_vec();

        let line = tap(&engine, &ReaderSettings::default(), image, direction).await;
        assert_eq!(line, expected);
    }

    #[tokio::test]
    async fn test_tap_unknown_identifier() {
        let engine = engine("badge-1");
        let image = encode_identifier("badge-2").unwrap().to_vec();

        let line = tap(&engine, &ReaderSettings::default(), image, Direction::Entry).await;
        assert_eq!(line, "DENIED - User not found in access control list");
    }

    #[tokio::test]
    async fn test_tap_require_uuid() {
        let engine = engine("badge-1");
        let image = encode_identifier("badge-1").unwrap().to_vec();
        let settings = ReaderSettings {
            require_uuid: true,
            ..ReaderSettings::default()
        };

        let line = tap(&engine, &settings, image, Direction::Entry).await;
        assert_eq!(line, "DENIED - Invalid input");
        assert_eq!(engine.store().save_count(), 0);
    }

    #[tokio::test]
    async fn test_tap_without_terminator_is_reader_error() {
        let engine = engine("badge-1");
        let settings = ReaderSettings {
            max_pages: 8,
            ..ReaderSettings::default()
        };

        let line = tap(&engine, &settings, vec![0x03; 64], Direction::Entry).await;
        assert!(line.starts_with("ERROR - Tag read truncated"));
    }
}
