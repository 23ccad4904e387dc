//! # Tracer Monitor
//!
//! Polls the process status record and reports when a tracer is attached.
//!
//! ## Lifecycle
//!
//! 1. Build a monitor: `TracerMonitor::new(source, config)`
//! 2. Start it on its own thread: `MonitorHandle::spawn(monitor, responder)`
//! 3. Each iteration opens the source, finds the tracer line, parses it and
//!    closes the source again, then sleeps for `config.interval`
//! 4. The loop ends when:
//!    - a tracer id above `config.threshold` is seen: the responder is called
//!    - the source cannot be opened or read: the monitor stops for good and
//!      the process keeps running unmonitored
//!    - the [`CancelToken`] is cancelled, checked before every iteration and
//!      during every sleep
//!
//! The monitor never terminates the process itself. That decision belongs to
//! the [`TracerResponder`] supplied by the caller.
//!
//! ## Diagnostics
//!
//! Each parsed tracer id produces one `debug` event and a detection produces
//! one `warn` event, all with target [`LOG_TARGET`].

use std::thread::{self, JoinHandle};

use antitrace_utils::LOG_TARGET;
use tracing::{debug, warn};

use crate::cancel::CancelToken;
use crate::config::MonitorConfig;
use crate::error::{FieldError, MonitorError, MonitorResult};
use crate::parser::parse_status_field;
use crate::source::{StatusLines, StatusSource};
use crate::types::TracerId;

/// Name of the background thread.
pub const MONITOR_THREAD_NAME: &str = "antitrace-monitor";

/// Outcome of a single iteration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict
{
    /// The tracer field was read and is at or below the threshold.
    Clean(TracerId),
    /// The tracer field is above the threshold.
    TracerDetected(TracerId),
    /// No line matched the configured locator.
    FieldMissing,
    /// The tracer line was found but its value could not be represented.
    Malformed(FieldError),
}

impl Verdict
{
    #[must_use]
    pub fn is_traced(&self) -> bool
    {
        matches!(self, Verdict::TracerDetected(_))
    }
}

/// Why [`TracerMonitor::run`] returned.
#[derive(Debug)]
pub enum MonitorExit
{
    /// A tracer above the threshold was observed.
    TracerDetected(TracerId),
    /// The status source could not be opened or read.
    SourceLost(MonitorError),
    /// The cancel token was triggered.
    Cancelled,
}

/// Reaction to a detected tracer.
///
/// Runs on the monitor thread right after detection. The production
/// responder exits the process; tests record the id instead.
pub trait TracerResponder: Send + 'static
{
    fn tracer_detected(&self, tracer: TracerId);
}

impl<F> TracerResponder for F
where
    F: Fn(TracerId) + Send + 'static,
{
    fn tracer_detected(&self, tracer: TracerId)
    {
        self(tracer);
    }
}

/// Reads one status source on a fixed interval and judges its tracer field.
pub struct TracerMonitor<S>
{
    source: S,
    config: MonitorConfig,
}

impl<S: StatusSource> TracerMonitor<S>
{
    pub fn new(source: S, config: MonitorConfig) -> Self
    {
        Self { source, config }
    }

    #[must_use]
    pub fn config(&self) -> &MonitorConfig
    {
        &self.config
    }

    #[must_use]
    pub fn source(&self) -> &S
    {
        &self.source
    }

    /// Run one iteration: open, locate, parse, close.
    ///
    /// Reading stops at the first line selected by the locator.
    ///
    /// ## Errors
    ///
    /// - `SourceUnavailable`: the source could not be opened
    /// - `Read`: a line could not be read
    pub fn inspect(&self) -> MonitorResult<Verdict>
    {
        let reader = self.source.open().map_err(|source| MonitorError::SourceUnavailable {
            source_name: self.source.describe(),
            source,
        })?;

        for (index, line) in StatusLines::new(reader).enumerate() {
            let line = line.map_err(|source| MonitorError::Read {
                source_name: self.source.describe(),
                source,
            })?;
            let Some(field) = self.config.locator.select(index, &line) else {
                continue;
            };
            return Ok(self.judge(parse_status_field(Some(field))));
        }

        Ok(Verdict::FieldMissing)
    }

    fn judge(&self, parsed: Result<TracerId, FieldError>) -> Verdict
    {
        match parsed {
            Ok(tracer) => {
                debug!(target: LOG_TARGET, tracer_id = tracer.raw(), "tracer id: {tracer}");
                if tracer.exceeds(self.config.threshold) {
                    Verdict::TracerDetected(tracer)
                } else {
                    Verdict::Clean(tracer)
                }
            }
            Err(err) => {
                warn!(target: LOG_TARGET, error = %err, "tracer field unreadable");
                Verdict::Malformed(err)
            }
        }
    }

    /// Poll until a tracer is detected, the source is lost, or `cancel` fires.
    pub fn run(&self, cancel: &CancelToken) -> MonitorExit
    {
        loop {
            if cancel.is_cancelled() {
                return MonitorExit::Cancelled;
            }

            match self.inspect() {
                Ok(Verdict::TracerDetected(tracer)) => {
                    warn!(target: LOG_TARGET, tracer_id = tracer.raw(), "being traced, tracer pid: {tracer}");
                    return MonitorExit::TracerDetected(tracer);
                }
                Ok(_) => {}
                Err(err) => {
                    debug!(target: LOG_TARGET, error = %err, "status source lost, monitor stopping");
                    return MonitorExit::SourceLost(err);
                }
            }

            if cancel.wait_timeout(self.config.interval) {
                return MonitorExit::Cancelled;
            }
        }
    }
}

/// Owner-side view of a monitor running on its own thread.
///
/// Dropping the handle detaches the thread; it keeps polling until it exits
/// on its own. Call [`MonitorHandle::stop`] to end it.
#[derive(Debug)]
pub struct MonitorHandle
{
    cancel: CancelToken,
    thread: JoinHandle<MonitorExit>,
}

impl MonitorHandle
{
    /// Start `monitor` on a new thread named [`MONITOR_THREAD_NAME`].
    ///
    /// When the run loop reports a detection, `responder` is invoked on that
    /// thread before it finishes.
    ///
    /// ## Errors
    ///
    /// `SpawnFailed` if the OS refuses to create the thread.
    pub fn spawn<S, R>(monitor: TracerMonitor<S>, responder: R) -> MonitorResult<Self>
    where
        S: StatusSource + 'static,
        R: TracerResponder,
    {
        let cancel = CancelToken::new();
        let token = cancel.clone();
        let thread = thread::Builder::new()
            .name(MONITOR_THREAD_NAME.to_string())
            .spawn(move || {
                let exit = monitor.run(&token);
                if let MonitorExit::TracerDetected(tracer) = exit {
                    responder.tracer_detected(tracer);
                }
                exit
            })
            .map_err(MonitorError::SpawnFailed)?;

        Ok(Self { cancel, thread })
    }

    /// A token that cancels this monitor.
    #[must_use]
    pub fn cancel_token(&self) -> CancelToken
    {
        self.cancel.clone()
    }

    /// Ask the monitor to stop at its next suspension point.
    pub fn cancel(&self)
    {
        self.cancel.cancel();
    }

    #[must_use]
    pub fn is_finished(&self) -> bool
    {
        self.thread.is_finished()
    }

    /// Wait for the monitor to exit on its own.
    ///
    /// Returns `None` if the monitor thread panicked.
    #[must_use]
    pub fn join(self) -> Option<MonitorExit>
    {
        self.thread.join().ok()
    }

    /// Cancel the monitor and wait for it to finish.
    #[must_use]
    pub fn stop(self) -> Option<MonitorExit>
    {
        self.cancel();
        self.join()
    }
}
