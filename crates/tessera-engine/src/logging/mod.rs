//! Logging utilities.
//!
//! Renderers log through the `log` facade only. Hosts that have no logger of
//! their own can call [`init_logging`] early in `main`.

mod init;

pub use init::{init_logging, LoggingConfig};
