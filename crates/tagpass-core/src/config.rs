//! Gate configuration.
//!
//! A single TOML file describes one gate: which reader to poll and how to
//! page through tag memory, the debounce window of the ingress engine, and
//! where the presence table and roster live.
//!
//! ```toml
//! [reader]
//! reader_name = "ACS ACR122U PICC Interface 00 00"
//! max_pages = 126
//!
//! [ingress]
//! debounce_secs = 60
//! default_direction = "entry"
//!
//! [storage]
//! backend = "sqlite"
//! presence_path = "/var/lib/tagpass/presence.db"
//! roster_path = "/var/lib/tagpass/roster.json"
//! ```
//!
//! Every field has a default, so an empty or missing file yields a usable
//! configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_BASE_PAGE, DEFAULT_DEBOUNCE_SECS, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE,
    DEFAULT_POLL_INTERVAL_MS,
};
use crate::error::{Error, Result};
use crate::types::Direction;

/// Main gate configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Tag reader settings.
    pub reader: ReaderSettings,

    /// Ingress policy settings.
    pub ingress: IngressSettings,

    /// Presence store and roster locations.
    pub storage: StorageSettings,

    /// Log output settings.
    pub logging: LoggingSettings,
}

/// Tag reader settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderSettings {
    /// PC/SC reader name. The first reader found is used when unset.
    pub reader_name: Option<String>,

    /// First page requested from the tag.
    pub base_page: u8,

    /// Bytes requested per read command.
    pub page_size: u8,

    /// Maximum number of pages read before giving up on a tag.
    pub max_pages: usize,

    /// Interval between presence polls, in milliseconds.
    pub poll_interval_ms: u64,

    /// Reject identifiers that are not UUIDs.
    pub require_uuid: bool,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            reader_name: None,
            base_page: DEFAULT_BASE_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
            require_uuid: false,
        }
    }
}

/// Ingress policy settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngressSettings {
    /// Minimum seconds between two accepted transitions of one identifier.
    pub debounce_secs: u64,

    /// Direction used when a tap carries none.
    pub default_direction: Direction,
}

impl Default for IngressSettings {
    fn default() -> Self {
        Self {
            debounce_secs: DEFAULT_DEBOUNCE_SECS,
            default_direction: Direction::Entry,
        }
    }
}

/// Presence store backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageBackend {
    /// JSON file holding the whole presence table.
    #[default]
    Json,

    /// SQLite database.
    Sqlite,
}

/// Presence store and roster locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub backend: StorageBackend,
    pub presence_path: PathBuf,
    pub roster_path: PathBuf,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Json,
            presence_path: PathBuf::from("presence.json"),
            roster_path: PathBuf::from("roster.json"),
        }
    }
}

/// Log output settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Filter directive, e.g. `info` or `tagpass_reader=debug,info`.
    pub level: String,

    /// Emit JSON lines instead of compact text.
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl GateConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, cannot be parsed, or
    /// fails validation.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not valid TOML for this schema or
    /// fails validation.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the config cannot be serialized or written.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Check value ranges that serde cannot express.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.reader.page_size == 0 {
            return Err(Error::Config("reader.page_size must be at least 1".into()));
        }
        if self.reader.max_pages == 0 {
            return Err(Error::Config("reader.max_pages must be at least 1".into()));
        }
        if self.reader.poll_interval_ms == 0 {
            return Err(Error::Config(
                "reader.poll_interval_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
