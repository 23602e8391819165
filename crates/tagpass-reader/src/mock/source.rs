//! Scripted tag source.

use std::collections::VecDeque;
use std::time::Duration;

use crate::mock::MockTransport;
use crate::traits::TagSource;
use crate::{ReaderError, Result};

/// Mock tag source replaying a fixed script of taps, idle polls and errors.
///
/// Once the script runs out the source reports the reader as disconnected,
/// which ends any session driving it.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use tagpass_reader::mock::{MockTagSource, MockTransport};
/// use tagpass_reader::TagSource;
///
/// let mut source = MockTagSource::new()
///     .with_idle()
///     .with_tag(MockTransport::from_memory(vec![0xFE, 0, 0, 0], 4));
///
/// assert!(source.wait_for_tag(Duration::ZERO)?.is_none());
/// assert!(source.wait_for_tag(Duration::ZERO)?.is_some());
/// assert!(source.wait_for_tag(Duration::ZERO).is_err());
/// # Ok::<(), tagpass_reader::ReaderError>(())
/// ```
#[derive(Debug, Default)]
pub struct MockTagSource {
    script: VecDeque<Result<Option<MockTransport>>>,
}

impl MockTagSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Present a tag.
    pub fn with_tag(mut self, transport: MockTransport) -> Self {
        self.script.push_back(Ok(Some(transport)));
        self
    }

    /// Let one poll time out with no tag.
    pub fn with_idle(mut self) -> Self {
        self.script.push_back(Ok(None));
        self
    }

    /// Fail one poll.
    pub fn with_error(mut self, error: ReaderError) -> Self {
        self.script.push_back(Err(error));
        self
    }
}

impl TagSource for MockTagSource {
    type Transport = MockTransport;

    fn wait_for_tag(&mut self, _timeout: Duration) -> Result<Option<MockTransport>> {
        self.script
            .pop_front()
            .unwrap_or_else(|| Err(ReaderError::disconnected("mock tag source exhausted")))
    }
}
