//! Scripted transport serving a tag memory image.

use std::collections::HashMap;

use bytes::Bytes;
use tagpass_core::constants::{READ_BINARY_CLA, READ_BINARY_INS};

use crate::traits::{ApduResponse, Transport};
use crate::{ReaderError, Result};

/// Bytes per tag page.
const PAGE_BYTES: usize = 4;

/// Status word for an instruction the mock does not understand.
const SW_INS_NOT_SUPPORTED: u16 = 0x6D00;

/// Mock transport backed by a memory image.
///
/// Page `base_page` maps to the first four bytes of the image; memory past
/// the end of the image reads as zeros. Every requested page is recorded so
/// tests can check exactly how far the reader went.
///
/// # Examples
///
/// ```
/// use tagpass_reader::mock::MockTransport;
/// use tagpass_reader::TagReader;
///
/// let mut transport = MockTransport::from_memory(vec![0x03, 0x00, 0xFE, 0x00], 4);
/// let image = TagReader::default().read_tag(&mut transport)?;
/// assert_eq!(image.as_ref(), &[0x03, 0x00, 0xFE, 0x00]);
/// assert_eq!(transport.requested_pages(), &[4]);
/// # Ok::<(), tagpass_reader::ReaderError>(())
/// ```
#[derive(Debug, Clone)]
pub struct MockTransport {
    memory: Bytes,
    base_page: u8,
    reply_length: Option<usize>,
    failures: HashMap<u8, u16>,
    disconnect_page: Option<u8>,
    requested: Vec<u8>,
}

impl MockTransport {
    /// Serve `memory` starting at `base_page`.
    pub fn from_memory(memory: impl Into<Bytes>, base_page: u8) -> Self {
        Self {
            memory: memory.into(),
            base_page,
            reply_length: None,
            failures: HashMap::new(),
            disconnect_page: None,
            requested: Vec::new(),
        }
    }

    /// Serve the given pages in order starting at `base_page`.
    pub fn from_pages<I>(base_page: u8, pages: I) -> Self
    where
        I: IntoIterator<Item = [u8; PAGE_BYTES]>,
    {
        let memory: Vec<u8> = pages.into_iter().flatten().collect();
        Self::from_memory(memory, base_page)
    }

    /// Answer every read with `length` bytes regardless of the requested length.
    pub fn reply_length(mut self, length: usize) -> Self {
        self.reply_length = Some(length);
        self
    }

    /// Answer reads of `page` with `status_word` and no data.
    pub fn fail_at(mut self, page: u8, status_word: u16) -> Self {
        self.failures.insert(page, status_word);
        self
    }

    /// Fail with a communication error when `page` is requested.
    pub fn disconnect_at(mut self, page: u8) -> Self {
        self.disconnect_page = Some(page);
        self
    }

    /// Pages requested so far, in order.
    pub fn requested_pages(&self) -> &[u8] {
        &self.requested
    }

    fn page_data(&self, page: u8, length: usize) -> Bytes {
        let Some(index) = page.checked_sub(self.base_page) else {
            return Bytes::from(vec![0u8; length]);
        };
        let offset = usize::from(index) * PAGE_BYTES;
        (offset..offset + length)
            .map(|i| self.memory.get(i).copied().unwrap_or(0))
            .collect::<Vec<u8>>()
            .into()
    }
}

impl Transport for MockTransport {
    fn transmit(&mut self, command: &[u8]) -> Result<ApduResponse> {
        let &[cla, ins, _p1, page, le] = command else {
            return Ok(ApduResponse::new(Bytes::new(), SW_INS_NOT_SUPPORTED));
        };
        if cla != READ_BINARY_CLA || ins != READ_BINARY_INS {
            return Ok(ApduResponse::new(Bytes::new(), SW_INS_NOT_SUPPORTED));
        }

        self.requested.push(page);

        if self.disconnect_page == Some(page) {
            return Err(ReaderError::communication("tag left the field"));
        }
        if let Some(&status_word) = self.failures.get(&page) {
            return Ok(ApduResponse::new(Bytes::new(), status_word));
        }

        let length = self.reply_length.unwrap_or(usize::from(le));
        Ok(ApduResponse::success(self.page_data(page, length)))
    }
}
