//! `run`: live gate session on a PC/SC reader.

use tagpass_core::{Direction, GateConfig};

#[cfg(feature = "hardware-pcsc")]
pub async fn execute(config: &GateConfig, direction: Direction) -> anyhow::Result<()> {
    use anyhow::Context;
    use tagpass_reader::SessionConfig;
    use tagpass_reader::pcsc::PcscTagSource;
    use tracing::info;

    use crate::gate;
    use crate::stats::SessionStats;

    let source = PcscTagSource::open(config.reader.reader_name.as_deref())
        .context("failed to open PC/SC reader")?;
    info!(reader = %source.reader_name().to_string_lossy(), "Reader opened");

    let engine = gate::build_engine(config).await?;
    let mut stats = SessionStats::new();

    let result = gate::drive_session(
        source,
        SessionConfig::from(&config.reader),
        &engine,
        direction,
        &mut stats,
    )
    .await;

    println!("{stats}");
    result
}

#[cfg(not(feature = "hardware-pcsc"))]
pub async fn execute(_config: &GateConfig, _direction: Direction) -> anyhow::Result<()> {
    anyhow::bail!("reader support not built; rebuild with `--features hardware-pcsc`")
}
