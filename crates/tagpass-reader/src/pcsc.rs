//! PC/SC transport and tag source.
//!
//! Works with any PC/SC contactless reader that maps `FF B0` onto a Type 2
//! tag page read (ACR122U and most USB desk readers do).

use std::ffi::{CStr, CString};
use std::time::Duration;

use pcsc::{Card, Context, MAX_BUFFER_SIZE, Protocols, ReaderState, Scope, ShareMode, State};
use tracing::{debug, info};

use crate::traits::{ApduResponse, TagSource, Transport};
use crate::{ReaderError, Result};

/// Transport over a connected PC/SC card handle.
pub struct PcscTransport {
    card: Card,
}

impl PcscTransport {
    pub fn new(card: Card) -> Self {
        Self { card }
    }
}

impl Transport for PcscTransport {
    fn transmit(&mut self, command: &[u8]) -> Result<ApduResponse> {
        let mut buffer = [0u8; MAX_BUFFER_SIZE];
        let raw = self
            .card
            .transmit(command, &mut buffer)
            .map_err(map_card_error)?;
        ApduResponse::from_raw(raw)
    }
}

/// Tag source watching one PC/SC reader for card arrivals.
pub struct PcscTagSource {
    context: Context,
    reader: CString,
    known_state: State,
    present: bool,
}

impl PcscTagSource {
    /// Open the named reader, or the first one found when `reader_name` is
    /// `None`.
    ///
    /// # Errors
    /// - `Configuration` if the PC/SC service is unavailable or the named
    ///   reader does not exist.
    /// - `Disconnected` if no reader is attached.
    pub fn open(reader_name: Option<&str>) -> Result<Self> {
        let context = Context::establish(Scope::User).map_err(|e| {
            ReaderError::configuration(format!("failed to establish PC/SC context: {e}"))
        })?;

        let readers = context
            .list_readers_owned()
            .map_err(|e| match e {
                pcsc::Error::NoReadersAvailable => ReaderError::disconnected("no PC/SC reader attached"),
                other => ReaderError::configuration(format!("failed to list readers: {other}")),
            })?;

        let reader = match reader_name {
            Some(name) => readers
                .into_iter()
                .find(|r| r.to_string_lossy() == name)
                .ok_or_else(|| ReaderError::configuration(format!("reader not found: {name}")))?,
            None => readers
                .into_iter()
                .next()
                .ok_or_else(|| ReaderError::disconnected("no PC/SC reader attached"))?,
        };

        info!(reader = %reader.to_string_lossy(), "PC/SC reader opened");

        Ok(Self {
            context,
            reader,
            known_state: State::UNAWARE,
            present: false,
        })
    }

    /// Name of the reader being watched.
    pub fn reader_name(&self) -> &CStr {
        &self.reader
    }

    fn connect(&self) -> Result<PcscTransport> {
        let card = self
            .context
            .connect(&self.reader, ShareMode::Shared, Protocols::ANY)
            .map_err(map_card_error)?;
        Ok(PcscTransport::new(card))
    }
}

impl TagSource for PcscTagSource {
    type Transport = PcscTransport;

    fn wait_for_tag(&mut self, timeout: Duration) -> Result<Option<PcscTransport>> {
        let mut states = [ReaderState::new(self.reader.clone(), self.known_state)];
        match self.context.get_status_change(Some(timeout), &mut states) {
            Ok(()) => {}
            Err(pcsc::Error::Timeout) => return Ok(None),
            Err(e) => return Err(map_reader_error(&self.reader, e)),
        }

        let event = states[0].event_state();
        self.known_state = event - State::CHANGED;

        if event.intersects(State::UNKNOWN | State::UNAVAILABLE) {
            return Err(ReaderError::disconnected(self.reader.to_string_lossy()));
        }

        let present = event.contains(State::PRESENT);
        let arrived = present && !self.present;
        self.present = present;

        if !arrived {
            return Ok(None);
        }

        debug!(reader = %self.reader.to_string_lossy(), "Tag entered the field");
        self.connect().map(Some)
    }
}

fn map_card_error(error: pcsc::Error) -> ReaderError {
    match error {
        pcsc::Error::ReaderUnavailable | pcsc::Error::UnknownReader | pcsc::Error::NoService => {
            ReaderError::disconnected(error.to_string())
        }
        other => ReaderError::communication(other.to_string()),
    }
}

fn map_reader_error(reader: &CStr, error: pcsc::Error) -> ReaderError {
    match error {
        pcsc::Error::ReaderUnavailable
        | pcsc::Error::UnknownReader
        | pcsc::Error::NoService
        | pcsc::Error::ServiceStopped => ReaderError::disconnected(reader.to_string_lossy()),
        other => ReaderError::communication(format!("status change failed: {other}")),
    }
}
