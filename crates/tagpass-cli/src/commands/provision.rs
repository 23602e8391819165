//! `provision`: seed the presence store with roster identifiers.

use tagpass_core::{GateConfig, Identifier};
use tracing::info;

use crate::gate;

/// Add `identifiers` to the store, or every roster identifier when none are
/// given. Returns how many were added.
pub async fn execute(config: &GateConfig, identifiers: Vec<String>) -> anyhow::Result<usize> {
    let engine = gate::build_engine(config).await?;

    let identifiers: Vec<Identifier> = if identifiers.is_empty() {
        engine.roster().identifiers().cloned().collect()
    } else {
        identifiers.into_iter().map(Identifier::from).collect()
    };

    let added = engine.provision(identifiers).await?;
    info!(added, "Provisioning complete");
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tagpass_ingress::PresenceStore;
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> GateConfig {
        let mut config = GateConfig::default();
        config.storage.presence_path = dir.path().join("presence.json");
        config.storage.roster_path = dir.path().join("roster.json");
        config
    }

    #[tokio::test]
    async fn test_provision_from_roster_file() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        std::fs::write(
            &config.storage.roster_path,
            r#"[
                {"identifier": "a", "display_id": 1, "first_name": "Ana", "last_name": "Lima"},
                {"identifier": "b", "display_id": 2, "first_name": "Bo", "last_name": "Berg"}
            ]"#,
        )
        .unwrap();

        assert_eq!(execute(&config, vec![]).await.unwrap(), 2);
        assert_eq!(execute(&config, vec![]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_provision_explicit_identifiers() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);

        let added = execute(&config, vec!["x".to_string(), "y".to_string()])
            .await
            .unwrap();
        assert_eq!(added, 2);

        let engine = gate::build_engine(&config).await.unwrap();
        let table = engine.store().load().await.unwrap();
        assert!(table.contains_key(&Identifier::new("x")));
        assert!(table.contains_key(&Identifier::new("y")));
    }
}
