//! Subcommand implementations.

pub mod codec;
pub mod provision;
pub mod run;
pub mod tap;
