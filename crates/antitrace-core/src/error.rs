//! # Error Types
//!
//! Error handling for the tracer monitor.
//!
//! We use `thiserror` to generate `Error` trait implementations and messages.
//!
//! Note that a detected tracer is *not* an error. It is reported as a
//! [`Verdict`](crate::monitor::Verdict) and routed to a
//! [`TracerResponder`](crate::monitor::TracerResponder).

use std::io;

use thiserror::Error;

/// Errors raised while extracting a numeric field from a status line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldError
{
    /// The line carried more digits than the accumulator holds, or the
    /// concatenated value does not fit in an `i64`.
    #[error("field value too long: {digits} digits")]
    ValueTooLong
    {
        /// Number of digit characters seen before giving up
        digits: usize,
    },
}

/// Main error type for monitor operations
///
/// ## Error Categories
///
/// 1. **Source errors**: SourceUnavailable, Read. Both stop the monitor for good.
/// 2. **Lifecycle errors**: SpawnFailed, AlreadyRunning
#[derive(Error, Debug)]
pub enum MonitorError
{
    /// The status source could not be opened
    ///
    /// This happens when:
    /// - The pseudo-file does not exist (no procfs, sandboxed process)
    /// - The process lacks permission to read it
    ///
    /// The monitor treats this as permanent and stops polling.
    #[error("status source {source_name} unavailable: {source}")]
    SourceUnavailable
    {
        /// Human-readable name of the source, usually its path
        source_name: String,
        /// Underlying I/O error
        source: io::Error,
    },

    /// Reading a line from an already opened source failed
    #[error("failed to read status source {source_name}: {source}")]
    Read
    {
        /// Human-readable name of the source
        source_name: String,
        /// Underlying I/O error
        source: io::Error,
    },

    /// The background thread could not be created
    #[error("failed to spawn monitor thread: {0}")]
    SpawnFailed(#[source] io::Error),

    /// A monitor has already been started for this library instance
    #[error("tracer monitor is already running")]
    AlreadyRunning,
}

/// Convenience type alias for `Result<T, MonitorError>`
///
/// ```rust
/// use antitrace_core::error::MonitorResult;
/// fn foo() -> MonitorResult<()>
/// {
///     Ok(())
/// }
/// ```
pub type MonitorResult<T> = std::result::Result<T, MonitorError>;
