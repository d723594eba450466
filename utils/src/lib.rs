//! Shared utilities for the DAO vote client.

pub mod logging;

pub use logging::{init_logging, LogFormat, LogFormatError};
