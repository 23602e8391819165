//! Display messages for ingress decisions
//!
//! These are the strings a gate shows after a tap. Each [`ReasonCode`] has
//! exactly one message.
//!
//! # Usage
//!
//! ```
//! use tagpass_ingress::messages::DisplayMessages;
//!
//! let message = DisplayMessages::TOO_SOON;
//! println!("{}", message); // "DENIED - Too soon, try again later"
//! ```
//!
//! [`ReasonCode`]: crate::decision::ReasonCode

/// Display messages for ingress decisions
///
/// Messages start with the outcome (`OK` or `DENIED`) so they read correctly
/// on a single-line display without any color.
pub struct DisplayMessages;

impl DisplayMessages {
    /// Empty identifier or no direction selected
    pub const INVALID_INPUT: &'static str = "DENIED - Invalid input";

    /// Identifier has no row in the presence table
    pub const UNKNOWN_IDENTIFIER: &'static str = "DENIED - User not found in access control list";

    /// Last accepted transition is within the debounce window
    pub const TOO_SOON: &'static str = "DENIED - Too soon, try again later";

    /// Entry requested while already inside
    pub const ALREADY_INSIDE: &'static str = "DENIED - Already inside";

    /// Exit requested while already outside
    pub const ALREADY_OUTSIDE: &'static str = "OK - Already outside";

    /// Transition accepted and recorded
    pub const SUCCESS: &'static str = "OK";
}
