//! Tag reader for the tagpass gate.
//!
//! This crate talks to contactless readers. It pages through the memory of a
//! Type 2 tag until the terminator TLV turns up and hands the raw image to
//! the NDEF codec. The hardware sits behind two small traits so that the
//! whole read path runs against scripted mocks in tests:
//!
//! - [`Transport`]: one command in, one reply out, for the tag currently in
//!   the field.
//! - [`TagSource`]: blocks until a new tag arrives and yields its transport.
//!
//! [`TagReader`] implements the paging loop over any transport.
//! [`ReaderSession`] runs a tag source on a blocking worker and turns every
//! tap into a [`TagEvent`].
//!
//! # Features
//!
//! - `hardware-pcsc`: PC/SC backed transport and tag source (`pcsc` module).
//!
//! # Examples
//!
//! ```
//! use tagpass_reader::TagReader;
//! use tagpass_reader::mock::MockTransport;
//!
//! let image = tagpass_ndef::encode_identifier("visitor-17")?;
//! let mut transport = MockTransport::from_memory(image.clone(), 4);
//!
//! let read = TagReader::default().read_tag(&mut transport)?;
//! assert_eq!(read, image);
//! assert_eq!(tagpass_ndef::extract_identifier(&read)?.as_str(), "visitor-17");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod error;
pub mod mock;
#[cfg(feature = "hardware-pcsc")]
pub mod pcsc;
pub mod reader;
pub mod session;
pub mod traits;

pub use error::{ReaderError, Result};
pub use reader::{ReaderConfig, TagReader};
pub use session::{ReaderSession, ReaderSessionHandle, SessionConfig, TagEvent, read_tag_event};
pub use traits::{ApduResponse, TagSource, Transport};
