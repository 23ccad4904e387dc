//! Process-wide monitor slot behind the load and unload hooks.
//!
//! At most one monitor runs per loaded library. The slot keeps its handle so
//! unloading can cancel it; a monitor that has already exited on its own
//! (source lost) frees the slot for a later start.

use std::sync::{Mutex, MutexGuard, PoisonError};

use antitrace_core::{
    FileStatusSource, MonitorConfig, MonitorError, MonitorExit, MonitorHandle, MonitorResult, StatusSource,
    TracerMonitor, TracerResponder,
};
use antitrace_utils::{debug, error, info, init_console_logging, init_logging, warn, LoggingError, LOG_TARGET};
use once_cell::sync::Lazy;

use crate::hooks::{JInt, JNI_VERSION_1_6};
use crate::responder::ProcessExitResponder;

static MONITOR: Lazy<Mutex<Option<MonitorHandle>>> = Lazy::new(|| Mutex::new(None));

fn slot() -> MutexGuard<'static, Option<MonitorHandle>>
{
    MONITOR.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Start a monitor with a custom source, configuration and responder.
///
/// ## Errors
///
/// - `AlreadyRunning`: a monitor started earlier is still polling
/// - `SpawnFailed`: the thread could not be created
pub fn start_with<S, R>(config: MonitorConfig, source: S, responder: R) -> MonitorResult<()>
where
    S: StatusSource + 'static,
    R: TracerResponder,
{
    let mut slot = slot();
    if slot.as_ref().is_some_and(|handle| !handle.is_finished()) {
        return Err(MonitorError::AlreadyRunning);
    }

    let description = source.describe();
    let interval = config.interval;
    let threshold = config.threshold;
    *slot = Some(MonitorHandle::spawn(TracerMonitor::new(source, config), responder)?);

    info!(
        target: LOG_TARGET,
        source = %description,
        interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX),
        threshold,
        "tracer monitor started"
    );
    Ok(())
}

/// Start the production monitor: this process's procfs status, environment
/// configuration, and [`ProcessExitResponder`].
///
/// ## Errors
///
/// See [`start_with`].
pub fn start() -> MonitorResult<()>
{
    start_with(
        MonitorConfig::from_env(),
        FileStatusSource::current_process(),
        ProcessExitResponder,
    )
}

/// Cancel the running monitor and wait for its thread to finish.
///
/// Returns `None` when no monitor was started or its thread panicked.
pub fn stop() -> Option<MonitorExit>
{
    // Release the slot before joining so a concurrent `start_with` never blocks on the join.
    let handle = slot().take()?;
    handle.stop()
}

/// True while a started monitor is still polling.
#[must_use]
pub fn is_running() -> bool
{
    slot().as_ref().is_some_and(|handle| !handle.is_finished())
}

/// Body of `JNI_OnLoad`: set up logging, start the monitor, report the JNI version.
///
/// Neither step can fail the load. A host that already installed a tracing
/// subscriber keeps it, an unusable log file falls back to console output,
/// and a monitor that cannot start is only logged.
pub fn on_load() -> JInt
{
    match init_logging() {
        Ok(()) => {}
        Err(LoggingError::FileError(reason)) => {
            if let Err(err) = init_console_logging() {
                debug!(target: LOG_TARGET, error = %err, "keeping existing log subscriber");
            }
            warn!(target: LOG_TARGET, %reason, "log file unavailable, logging to console only");
        }
        Err(err) => debug!(target: LOG_TARGET, error = %err, "keeping existing log subscriber"),
    }
    debug!(target: LOG_TARGET, "library loaded");

    match start() {
        Ok(()) | Err(MonitorError::AlreadyRunning) => {}
        Err(err) => error!(target: LOG_TARGET, error = %err, "failed to start tracer monitor"),
    }

    JNI_VERSION_1_6
}

/// Body of `JNI_OnUnload`: stop the monitor.
pub fn on_unload()
{
    debug!(target: LOG_TARGET, "library unloading");
    if let Some(exit) = stop() {
        debug!(target: LOG_TARGET, ?exit, "tracer monitor stopped");
    }
}
