//! # antitrace-core
//!
//! Tracer detection primitives for antitrace.
//!
//! This crate provides:
//! - The status field parser (digits of a `/proc/<pid>/status` line as an integer)
//! - Status sources (procfs, or any file)
//! - The polling tracer monitor and its cancellable background thread
//! - One-shot environment probes (loaded libraries, `su`, emulators, ports)
//!
//! ## Platform Support
//!
//! - **Linux / Android**: reads `/proc/<pid>/status`
//! - **Other platforms**: builds, but the procfs source is unavailable, so a
//!   monitor stops on its first iteration
//!
//! Nothing here terminates the process. Detection is reported to a
//! [`TracerResponder`]; the `antitrace` crate supplies the one that exits.

pub mod cancel;
pub mod config;
pub mod error;
pub mod monitor;
pub mod parser;
pub mod prelude;
pub mod probes;
pub mod source;
pub mod types;

pub use cancel::CancelToken;
pub use config::{FieldLocator, MonitorConfig};
// Re-export commonly used types
pub use error::{FieldError, MonitorError, MonitorResult};
pub use monitor::{MonitorExit, MonitorHandle, TracerMonitor, TracerResponder, Verdict};
pub use source::{FileStatusSource, StatusSource};
pub use types::TracerId;
