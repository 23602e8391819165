//! Wiring between the reader session and the ingress engine.

use std::path::Path;

use anyhow::Context;
use tagpass_core::{Direction, GateConfig};
use tagpass_ingress::{
    AnyPresenceStore, Decision, IngressConfig, IngressEngine, MemoryRoster, PresenceStore,
    ReasonCode, Roster,
};
use tagpass_reader::{ReaderSession, SessionConfig, TagEvent, TagSource};
use tracing::{info, warn};

use crate::stats::SessionStats;

/// Engine over the configured store backend and the roster file.
pub type GateEngine = IngressEngine<AnyPresenceStore, MemoryRoster>;

/// Open the configured store and roster and build the engine.
pub async fn build_engine(config: &GateConfig) -> anyhow::Result<GateEngine> {
    let store = AnyPresenceStore::open(&config.storage)
        .await
        .with_context(|| {
            format!(
                "failed to open presence store at {}",
                config.storage.presence_path.display()
            )
        })?;
    let roster = load_roster(&config.storage.roster_path)?;

    Ok(IngressEngine::new(
        store,
        roster,
        IngressConfig::from(&config.ingress),
    ))
}

/// Load the roster file. A missing file gives an empty roster.
pub fn load_roster(path: &Path) -> anyhow::Result<MemoryRoster> {
    if !path.exists() {
        warn!(path = %path.display(), "Roster file not found, display attributes unavailable");
        return Ok(MemoryRoster::new());
    }

    MemoryRoster::from_json_file(path)
        .with_context(|| format!("failed to load roster from {}", path.display()))
}

/// Feed one tag event to the engine and render the line shown at the gate.
pub async fn handle_event<S, R>(
    engine: &IngressEngine<S, R>,
    event: TagEvent,
    direction: Direction,
    stats: &mut SessionStats,
) -> String
where
    S: PresenceStore,
    R: Roster,
{
    match event {
        TagEvent::TagRead(identifier) => {
            match engine.decide_now(&identifier, Some(direction)).await {
                Ok(decision) => {
                    stats.record_decision(&decision);
                    decision.to_string()
                }
                Err(e) => {
                    stats.record_error();
                    format!("ERROR - {e}")
                }
            }
        }
        TagEvent::Undecodable(e) => {
            warn!(error = %e, "Tag content not usable");
            let decision = Decision::new(ReasonCode::InvalidInput, None);
            stats.record_decision(&decision);
            decision.to_string()
        }
        TagEvent::TagError(e) => {
            stats.record_error();
            format!("ERROR - {e}")
        }
    }
}

/// Run a reader session until the source stops or Ctrl-C, printing one line
/// per tap.
pub async fn drive_session<T, S, R>(
    source: T,
    config: SessionConfig,
    engine: &IngressEngine<S, R>,
    direction: Direction,
    stats: &mut SessionStats,
) -> anyhow::Result<()>
where
    T: TagSource,
    S: PresenceStore,
    R: Roster,
{
    let mut session = ReaderSession::new(source, config).start();
    info!(%direction, "Waiting for tags");

    loop {
        tokio::select! {
            event = session.recv() => match event {
                Some(event) => {
                    let line = handle_event(engine, event, direction, stats).await;
                    println!("{line}");
                }
                None => {
                    info!("Reader session ended");
                    break;
                }
            },
            _ = tokio::signal::ctrl_c() => {
                info!("Interrupted");
                break;
            }
        }
    }

    session.shutdown().await?;
    Ok(())
}
