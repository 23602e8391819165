//! Reader session.
//!
//! The session owns a [`TagSource`] and runs the blocking read loop on a
//! dedicated blocking thread. Every tap turns into one [`TagEvent`] on a
//! bounded channel, so the async side never touches the reader:
//!
//! ```text
//! ┌──────────────────────────────┐        ┌──────────────┐
//! │ blocking worker              │        │              │
//! │ wait_for_tag → read_tag      │──────► │ TagEvent     │──────► integration
//! │ → extract_identifier         │        │ (mpsc)       │        (ingress engine)
//! └──────────────────────────────┘        └──────────────┘
//! ```
//!
//! # Examples
//!
//! ```no_run
//! use tagpass_reader::mock::{MockTagSource, MockTransport};
//! use tagpass_reader::session::{ReaderSession, SessionConfig, TagEvent};
//!
//! # async fn example() -> tagpass_reader::Result<()> {
//! let source = MockTagSource::new();
//! let mut handle = ReaderSession::new(source, SessionConfig::default()).start();
//!
//! while let Some(event) = handle.recv().await {
//!     match event {
//!         TagEvent::TagRead(identifier) => println!("tap: {identifier}"),
//!         TagEvent::TagError(error) => eprintln!("reader: {error}"),
//!         TagEvent::Undecodable(error) => eprintln!("tag: {error}"),
//!     }
//! }
//!
//! handle.shutdown().await?;
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tagpass_core::Identifier;
use tagpass_core::config::ReaderSettings;
use tagpass_core::constants::DEFAULT_POLL_INTERVAL_MS;
use tagpass_ndef::CodecError;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::reader::{ReaderConfig, TagReader};
use crate::traits::{TagSource, Transport};
use crate::{ReaderError, Result};

/// Outcome of one tag presentation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagEvent {
    /// Tag read and decoded to an identifier.
    TagRead(Identifier),

    /// Reader or transport failed.
    ///
    /// A fatal error (see [`ReaderError::is_fatal`]) is the last event of
    /// the session.
    TagError(ReaderError),

    /// Tag memory was read but holds no usable identifier.
    Undecodable(CodecError),
}

/// Session settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    /// Paging parameters for each read.
    pub reader: ReaderConfig,

    /// Upper bound on one presence poll. Shutdown is observed between polls.
    pub poll_interval: Duration,

    /// Reject identifiers that are not UUIDs.
    pub require_uuid: bool,

    /// Events buffered before the worker waits for the consumer.
    pub channel_capacity: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            reader: ReaderConfig::default(),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            require_uuid: false,
            channel_capacity: 16,
        }
    }
}

impl From<&ReaderSettings> for SessionConfig {
    fn from(settings: &ReaderSettings) -> Self {
        Self {
            reader: ReaderConfig::from(settings),
            poll_interval: Duration::from_millis(settings.poll_interval_ms),
            require_uuid: settings.require_uuid,
            ..Self::default()
        }
    }
}

/// Read one presented tag and turn the result into an event.
///
/// This is the body of the session loop, usable on its own when a single
/// tag should be processed without a session.
pub fn read_tag_event<T: Transport + ?Sized>(
    reader: &TagReader,
    transport: &mut T,
    require_uuid: bool,
) -> TagEvent {
    let image = match reader.read_tag(transport) {
        Ok(image) => image,
        Err(e) => {
            warn!(error = %e, "Tag read failed");
            return TagEvent::TagError(e);
        }
    };

    let extracted = if require_uuid {
        tagpass_ndef::extract_uuid_identifier(&image)
    } else {
        tagpass_ndef::extract_identifier(&image)
    };

    match extracted {
        Ok(identifier) => {
            info!(%identifier, bytes = image.len(), "Tag read");
            TagEvent::TagRead(identifier)
        }
        Err(e) => {
            warn!(error = %e, bytes = image.len(), "Tag memory could not be decoded");
            TagEvent::Undecodable(e)
        }
    }
}

/// Reader session, ready to start.
pub struct ReaderSession<S: TagSource> {
    source: S,
    config: SessionConfig,
}

impl<S: TagSource> ReaderSession<S> {
    pub fn new(source: S, config: SessionConfig) -> Self {
        Self { source, config }
    }

    /// Spawn the blocking worker and return the handle receiving its events.
    ///
    /// Must be called from within a Tokio runtime.
    pub fn start(self) -> ReaderSessionHandle {
        let (event_tx, event_rx) = mpsc::channel(self.config.channel_capacity.max(1));
        let stop = Arc::new(AtomicBool::new(false));

        let worker_stop = Arc::clone(&stop);
        let worker = tokio::task::spawn_blocking(move || {
            run_session(self.source, self.config, event_tx, worker_stop);
        });

        ReaderSessionHandle {
            event_rx,
            stop,
            worker,
        }
    }
}

/// Handle for receiving tag events from a running session.
pub struct ReaderSessionHandle {
    event_rx: mpsc::Receiver<TagEvent>,
    stop: Arc<AtomicBool>,
    worker: JoinHandle<()>,
}

impl ReaderSessionHandle {
    /// Receive the next tag event.
    ///
    /// Returns `None` once the worker has stopped and every buffered event
    /// has been received.
    pub async fn recv(&mut self) -> Option<TagEvent> {
        self.event_rx.recv().await
    }

    /// Stop the worker and wait for it to exit.
    ///
    /// The worker notices the request after its current poll or read, so this
    /// waits at most one poll interval plus one tag read.
    ///
    /// # Errors
    /// Returns `ReaderError::Communication` if the worker panicked.
    pub async fn shutdown(self) -> Result<()> {
        let Self {
            event_rx,
            stop,
            worker,
        } = self;

        stop.store(true, Ordering::Release);
        // unblocks a worker waiting on a full channel
        drop(event_rx);

        match worker.await {
            Ok(()) => Ok(()),
            Err(e) if e.is_cancelled() => Ok(()),
            Err(e) => {
                error!(error = %e, "Reader worker panicked");
                Err(ReaderError::communication(format!("reader worker panicked: {e}")))
            }
        }
    }
}

fn run_session<S: TagSource>(
    mut source: S,
    config: SessionConfig,
    events: mpsc::Sender<TagEvent>,
    stop: Arc<AtomicBool>,
) {
    let reader = TagReader::new(config.reader.clone());
    info!(
        base_page = config.reader.base_page,
        max_pages = config.reader.max_pages,
        "Reader session started"
    );

    while !stop.load(Ordering::Acquire) {
        let event = match source.wait_for_tag(config.poll_interval) {
            Ok(None) => continue,
            Ok(Some(mut transport)) => read_tag_event(&reader, &mut transport, config.require_uuid),
            Err(e) if e.is_fatal() => {
                error!(error = %e, "Reader unavailable, ending session");
                let _ = events.blocking_send(TagEvent::TagError(e));
                break;
            }
            Err(e) => {
                warn!(error = %e, "Presence poll failed");
                TagEvent::TagError(e)
            }
        };

        if events.blocking_send(event).is_err() {
            debug!("Event receiver dropped");
            break;
        }
    }

    info!("Reader session stopped");
}
