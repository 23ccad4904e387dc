//! # antitrace Utilities
//!
//! Shared logging and environment helpers for antitrace.
//!
//! The logging module is the diagnostic sink used by the monitor: write-only,
//! tagged with [`LOG_TARGET`], and safe to call from any thread.

pub mod env;
pub mod logging;

// Re-export commonly used logging functions for convenience
pub use logging::{
    init_console_logging, init_logging, init_logging_with_level, LogFormat, LogLevel, LoggingError, LOG_TARGET,
};
pub use tracing::{debug, error, info, trace, warn};
