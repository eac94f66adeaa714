//! Logging utilities.
//!
//! Library code only talks to the `log` facade; this module is where a
//! binary installs the `env_logger` backend.

mod init;

pub use init::{init_logging, LoggingConfig};
