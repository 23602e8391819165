//! # tagpass
//!
//! Gate controller for NFC badges.
//!
//! ```bash
//! # live session on the configured PC/SC reader
//! tagpass --config /etc/tagpass/gate.toml run --direction entry
//!
//! # replay a tag memory dump without hardware
//! tagpass tap "03 2A D1 01 26 54 02 65 6E ..."
//!
//! # inspect or produce tag images
//! tagpass decode 0308D1010454026...
//! tagpass encode 76d452ab-89ca-4d0a-a2d1-2ffa9ab61117
//!
//! # seed the presence store from the roster
//! tagpass provision
//! ```

#![forbid(unsafe_code)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tagpass_core::{Direction, GateConfig};
use tracing::debug;

mod commands;
mod gate;
mod logging;
mod stats;

#[derive(Parser, Debug)]
#[command(name = "tagpass")]
#[command(version, about = "NFC badge gate controller")]
struct Cli {
    /// Gate configuration file
    #[arg(short, long, default_value = "tagpass.toml")]
    config: PathBuf,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the gate on the configured reader until Ctrl-C
    Run {
        /// Direction of every tap; defaults to the configured direction
        #[arg(short, long)]
        direction: Option<Direction>,
    },

    /// Replay one tag memory dump (hex) through reader, codec and engine
    Tap {
        /// Tag memory starting at the first user page
        image: String,

        #[arg(short, long)]
        direction: Option<Direction>,
    },

    /// Decode a tag memory dump (hex) and describe its records
    Decode {
        image: String,

        /// Reject trailing bytes between the message and the terminator
        #[arg(long)]
        strict: bool,
    },

    /// Encode text as a tag memory image (hex, one group per page)
    Encode {
        text: String,

        /// Language code of the Text record
        #[arg(long, default_value = "en")]
        lang: String,

        /// Store the text as UTF-16BE
        #[arg(long)]
        utf16: bool,
    },

    /// Add identifiers to the presence store; all roster identifiers if none given
    Provision { identifiers: Vec<String> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = GateConfig::load(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;
    logging::init(&config.logging, cli.verbose)?;
    debug!(config = %cli.config.display(), "Configuration loaded");

    let default_direction = config.ingress.default_direction;

    match cli.command {
        Command::Run { direction } => {
            commands::run::execute(&config, direction.unwrap_or(default_direction)).await?;
        }
        Command::Tap { image, direction } => {
            let line = commands::tap::execute(
                &config,
                &image,
                direction.unwrap_or(default_direction),
            )
            .await?;
            println!("{line}");
        }
        Command::Decode { image, strict } => {
            println!("{}", commands::codec::decode(&image, strict)?);
        }
        Command::Encode { text, lang, utf16 } => {
            println!("{}", commands::codec::encode(&text, &lang, utf16)?);
        }
        Command::Provision { identifiers } => {
            let added = commands::provision::execute(&config, identifiers).await?;
            println!("{added} identifier(s) added");
        }
    }

    Ok(())
}
