//! The production reaction to a detected tracer.

use antitrace_core::{TracerId, TracerResponder};

/// Status the host process exits with when a tracer is detected.
pub const EXIT_STATUS: i32 = 0;

/// Ends the host process as soon as a tracer is reported.
///
/// The exit is deliberately quiet: no unwinding, no error dialog, nothing
/// beyond the warning the monitor has already logged.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExitResponder;

impl TracerResponder for ProcessExitResponder
{
    fn tracer_detected(&self, _tracer: TracerId)
    {
        std::process::exit(EXIT_STATUS);
    }
}
