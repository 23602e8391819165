//! Seams between the tag reader and the hardware.

use std::time::Duration;

use bytes::Bytes;
use tagpass_core::constants::STATUS_SUCCESS;

use crate::{ReaderError, Result};

/// Reply to one command: response data plus the trailing status word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApduResponse {
    pub data: Bytes,
    pub status_word: u16,
}

impl ApduResponse {
    pub fn new(data: impl Into<Bytes>, status_word: u16) -> Self {
        Self {
            data: data.into(),
            status_word,
        }
    }

    /// Successful reply carrying `data`.
    pub fn success(data: impl Into<Bytes>) -> Self {
        Self::new(data, STATUS_SUCCESS)
    }

    /// Split a raw reply into data and the trailing `SW1 SW2` pair.
    ///
    /// # Errors
    /// Returns `ReaderError::Communication` if the reply is shorter than the
    /// status word.
    pub fn from_raw(raw: &[u8]) -> Result<Self> {
        if raw.len() < 2 {
            return Err(ReaderError::communication(format!(
                "reply of {} bytes has no status word",
                raw.len()
            )));
        }
        let (data, status) = raw.split_at(raw.len() - 2);
        Ok(Self::new(
            Bytes::copy_from_slice(data),
            u16::from_be_bytes([status[0], status[1]]),
        ))
    }

    /// Returns `true` for status word `90 00`.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.status_word == STATUS_SUCCESS
    }
}

/// Channel to a tag in the reader's field.
///
/// Implementations block until the reply arrives. One transport is one tag
/// presentation; a new tap yields a new transport from the [`TagSource`].
pub trait Transport: Send {
    /// Send one command and return the reply.
    ///
    /// # Errors
    /// Returns an error only for transport-level failures. A reply carrying
    /// an error status word is still `Ok`.
    fn transmit(&mut self, command: &[u8]) -> Result<ApduResponse>;
}

/// Source of tag presentations.
pub trait TagSource: Send + 'static {
    type Transport: Transport;

    /// Block until a new tag enters the field or `timeout` elapses.
    ///
    /// Returns `Ok(None)` on timeout. A tag that stays in the field is
    /// reported once.
    ///
    /// # Errors
    /// Fatal errors (`Disconnected`, `Configuration`) end a reader session.
    fn wait_for_tag(&mut self, timeout: Duration) -> Result<Option<Self::Transport>>;
}
