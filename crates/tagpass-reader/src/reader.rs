//! Paged tag memory reader.
//!
//! Type 2 tags expose their memory as 4-byte pages. The reader requests one
//! page at a time with `FF B0 00 <page> <len>`, starting at the first user
//! page, and stops as soon as the terminator TLV shows up in the page it just
//! read:
//!
//! ```text
//! page 4  03 2B D1 01   -> append, no 0xFE
//! page 5  27 54 02 65   -> append, no 0xFE
//! ...
//! page 15 37 FE 00 00   -> append, 0xFE found, done
//! ```
//!
//! The bytes are returned as read. Interpreting them is the codec's job.

use bytes::{Bytes, BytesMut};
use tagpass_core::config::ReaderSettings;
use tagpass_core::constants::{
    DEFAULT_BASE_PAGE, DEFAULT_MAX_PAGES, DEFAULT_PAGE_SIZE, READ_BINARY_CLA, READ_BINARY_INS,
    TERMINATOR_TLV,
};
use tracing::{debug, warn};

use crate::traits::Transport;
use crate::{ReaderError, Result};

/// Paging parameters for one tag read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReaderConfig {
    /// First page requested.
    pub base_page: u8,

    /// Bytes requested per command and appended per page.
    pub page_size: u8,

    /// Pages read before giving up with `Truncated`.
    pub max_pages: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            base_page: DEFAULT_BASE_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            max_pages: DEFAULT_MAX_PAGES,
        }
    }
}

impl ReaderConfig {
    /// Set the first page requested
    pub fn base_page(mut self, page: u8) -> Self {
        self.base_page = page;
        self
    }

    /// Set the bytes requested per page
    pub fn page_size(mut self, size: u8) -> Self {
        self.page_size = size;
        self
    }

    /// Set the page ceiling
    pub fn max_pages(mut self, pages: usize) -> Self {
        self.max_pages = pages;
        self
    }
}

impl From<&ReaderSettings> for ReaderConfig {
    fn from(settings: &ReaderSettings) -> Self {
        Self {
            base_page: settings.base_page,
            page_size: settings.page_size,
            max_pages: settings.max_pages,
        }
    }
}

/// Reads the TLV area of a tag page by page.
#[derive(Debug, Clone, Default)]
pub struct TagReader {
    config: ReaderConfig,
}

impl TagReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    /// Page read command for `page`.
    #[must_use]
    pub fn read_command(&self, page: u8) -> [u8; 5] {
        [
            READ_BINARY_CLA,
            READ_BINARY_INS,
            0x00,
            page,
            self.config.page_size,
        ]
    }

    /// Read pages until one contains the terminator TLV.
    ///
    /// Returns the concatenation of every page read, the terminating page
    /// included. At most `page_size` bytes of each reply are kept.
    ///
    /// # Errors
    /// - `TransportFailure` if a reply carries a status word other than `90 00`.
    /// - `Truncated` if `max_pages` pages (or the end of the page address
    ///   space) pass without a terminator.
    /// - Any error the transport itself returns.
    pub fn read_tag<T: Transport + ?Sized>(&self, transport: &mut T) -> Result<Bytes> {
        let page_size = usize::from(self.config.page_size);
        let mut buffer = BytesMut::with_capacity(page_size * 16);
        let mut page = self.config.base_page;

        for pages_read in 1..=self.config.max_pages {
            let response = transport.transmit(&self.read_command(page))?;
            if !response.is_success() {
                warn!(
                    page,
                    status_word = format_args!("{:04X}", response.status_word),
                    "Page read rejected"
                );
                return Err(ReaderError::transport_failure(response.status_word));
            }

            let data = &response.data[..response.data.len().min(page_size)];
            buffer.extend_from_slice(data);

            if data.contains(&TERMINATOR_TLV) {
                debug!(pages = pages_read, bytes = buffer.len(), "Tag read complete");
                return Ok(buffer.freeze());
            }

            page = match page.checked_add(1) {
                Some(next) => next,
                None => return Err(ReaderError::truncated(pages_read)),
            };
        }

        warn!(
            pages = self.config.max_pages,
            "No terminator found before page ceiling"
        );
        Err(ReaderError::truncated(self.config.max_pages))
    }
}
