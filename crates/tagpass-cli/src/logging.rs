//! Logging initialization.
//!
//! The filter comes from `TAGPASS_LOG`, then `RUST_LOG`, then the `[logging]`
//! section of the gate configuration. Logs go to stderr so command output on
//! stdout stays clean.

use tagpass_core::config::LoggingSettings;
use tracing_subscriber::EnvFilter;

/// Environment variable overriding the configured filter.
pub const LOG_ENV: &str = "TAGPASS_LOG";

/// Install the global subscriber.
///
/// `verbose` raises the configured level to `debug` unless an environment
/// filter is set.
///
/// # Errors
///
/// Returns an error if the filter directive cannot be parsed or a global
/// subscriber is already installed.
pub fn init(settings: &LoggingSettings, verbose: bool) -> anyhow::Result<()> {
    let filter = build_filter(settings, verbose)?;

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    if settings.json {
        builder
            .json()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))?;
    } else {
        builder
            .compact()
            .try_init()
            .map_err(|e| anyhow::anyhow!("failed to install logger: {e}"))?;
    }

    Ok(())
}

fn build_filter(settings: &LoggingSettings, verbose: bool) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_env(LOG_ENV) {
        return Ok(filter);
    }
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    let level = if verbose { "debug" } else { settings.level.as_str() };
    Ok(EnvFilter::try_new(level)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_level_parses() {
        let settings = LoggingSettings {
            level: "tagpass_reader=debug,info".to_string(),
            json: false,
        };
        assert!(build_filter(&settings, false).is_ok());
    }

    #[test]
    fn test_bad_directive_rejected_without_env_override() {
        if std::env::var_os(LOG_ENV).is_some() || std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let settings = LoggingSettings {
            level: "tagpass=notalevel".to_string(),
            json: false,
        };
        assert!(build_filter(&settings, false).is_err());
    }
}
