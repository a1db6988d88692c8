//! Gateway configuration
//!
//! The gateway reads a six-line text file at startup. Every line that is
//! missing or malformed keeps its compiled-in default and is reported as a
//! [`ConfigIssue`]; a bad file never stops the gateway.

pub mod parser;
pub mod types;

pub use types::*;
