//! Mock transports and tag sources for tests and hardware-free replay.

mod source;
mod transport;

pub use source::MockTagSource;
pub use transport::MockTransport;
