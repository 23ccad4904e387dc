//! # Logging Utilities
//!
//! The diagnostic sink for antitrace, built on `tracing`.
//!
//! Every event the monitor emits carries the fixed target [`LOG_TARGET`], so a
//! host that installs its own subscriber can route or silence antitrace output
//! with a single filter directive (`RUST_LOG=antitrace=debug`).
//!
//! This module provides:
//! - Multiple output formats (JSON for production, pretty for development)
//! - Environment variable configuration
//! - Log level filtering
//! - Optional daily-rolling file output, written synchronously so the last
//!   event before a process exit is on disk
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use antitrace_utils::{init_logging, LOG_TARGET};
//!
//! // Reads RUST_LOG / ANTITRACE_LOG_FORMAT / ANTITRACE_LOG_FILE
//! init_logging().expect("Failed to initialize logging");
//!
//! tracing::info!(target: LOG_TARGET, "monitor started");
//! ```
//!
//! ## Environment Variables
//!
//! - `RUST_LOG`: Set log level filter (e.g., `RUST_LOG=debug`, `RUST_LOG=antitrace=debug`)
//! - `ANTITRACE_LOG_FORMAT`: Set output format (`json` or `pretty`, default: `pretty`)
//! - `ANTITRACE_LOG_FILE`: Optional path to log file (if not set, logs only to console)
//!
//! ## Initializing more than once
//!
//! The library is loaded into a host process that may already own a global
//! subscriber. Initialization therefore never panics: a second call returns
//! [`LoggingError::InitializationFailed`] and leaves the existing subscriber in place.
//! A log file that cannot be created is reported as [`LoggingError::FileError`]
//! before any subscriber is installed, so the caller can retry with
//! [`init_console_logging`].

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::{env, io};

use tracing::Level;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::ChronoUtc;
use tracing_subscriber::fmt::{self};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry};

/// Component label attached to every diagnostic event.
pub const LOG_TARGET: &str = "antitrace";

/// Environment variable selecting the output format.
pub const LOG_FORMAT_ENV: &str = "ANTITRACE_LOG_FORMAT";

/// Environment variable naming an optional log file.
pub const LOG_FILE_ENV: &str = "ANTITRACE_LOG_FILE";

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat
{
    /// Pretty-printed, human-readable format (default for development)
    Pretty,
    /// JSON format (default for production)
    Json,
}

impl FromStr for LogFormat
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "pretty" | "dev" | "development" => Ok(LogFormat::Pretty),
            "json" | "prod" | "production" => Ok(LogFormat::Json),
            _ => Err(LoggingError::InvalidFormat(s.to_string())),
        }
    }
}

/// Log level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel
{
    /// Error level
    Error,
    /// Warning level
    Warn,
    /// Info level (default)
    Info,
    /// Debug level
    Debug,
    /// Trace level (most verbose)
    Trace,
}

impl From<LogLevel> for Level
{
    fn from(level: LogLevel) -> Self
    {
        match level {
            LogLevel::Error => Level::ERROR,
            LogLevel::Warn => Level::WARN,
            LogLevel::Info => Level::INFO,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Trace => Level::TRACE,
        }
    }
}

impl FromStr for LogLevel
{
    type Err = LoggingError;

    fn from_str(s: &str) -> Result<Self, Self::Err>
    {
        match s.to_lowercase().as_str() {
            "error" | "err" => Ok(LogLevel::Error),
            "warn" | "warning" => Ok(LogLevel::Warn),
            "info" => Ok(LogLevel::Info),
            "debug" | "dbg" => Ok(LogLevel::Debug),
            "trace" => Ok(LogLevel::Trace),
            _ => Err(LoggingError::InvalidLevel(s.to_string())),
        }
    }
}

/// Initialize logging with default settings
///
/// Reads configuration from environment variables:
/// - `RUST_LOG`: Log level filter (e.g., `debug`, `antitrace=debug`)
/// - `ANTITRACE_LOG_FORMAT`: Output format (`json` or `pretty`, default: `pretty`)
/// - `ANTITRACE_LOG_FILE`: Optional path to log file
///
/// ## Errors
///
/// Returns an error if:
/// - A global subscriber is already installed
/// - `ANTITRACE_LOG_FORMAT` holds an unknown format
/// - The log file or its directory cannot be created
pub fn init_logging() -> Result<(), LoggingError>
{
    let (format, default_level) = env_settings()?;
    init_logging_internal(format, default_level, log_file_from_env().as_deref())
}

/// Initialize console-only logging, ignoring `ANTITRACE_LOG_FILE`
///
/// Used as the fallback when [`init_logging`] reports a [`LoggingError::FileError`].
///
/// ## Errors
///
/// Returns an error if a global subscriber is already installed or
/// `ANTITRACE_LOG_FORMAT` holds an unknown format.
pub fn init_console_logging() -> Result<(), LoggingError>
{
    let (format, default_level) = env_settings()?;
    init_logging_internal(format, default_level, None)
}

/// Initialize logging with explicit level and format
///
/// ## Example
///
/// ```rust,no_run
/// use antitrace_utils::{init_logging_with_level, LogFormat, LogLevel};
///
/// init_logging_with_level(LogLevel::Debug, LogFormat::Pretty)
///     .expect("Failed to initialize logging");
/// ```
///
/// ## Errors
///
/// Returns an error if a global subscriber is already installed or the log
/// file cannot be created.
pub fn init_logging_with_level(level: LogLevel, format: LogFormat) -> Result<(), LoggingError>
{
    init_logging_internal(format, level.into(), log_file_from_env().as_deref())
}

fn env_settings() -> Result<(LogFormat, Level), LoggingError>
{
    let format = match env::var(LOG_FORMAT_ENV) {
        Ok(raw) => raw.parse::<LogFormat>()?,
        Err(_) => LogFormat::Pretty,
    };

    // Read log level from RUST_LOG or default to INFO
    let default_level = env::var("RUST_LOG")
        .ok()
        .and_then(|raw| raw.parse::<LogLevel>().ok())
        .map_or(Level::INFO, Into::into);

    Ok((format, default_level))
}

fn log_file_from_env() -> Option<PathBuf>
{
    env::var_os(LOG_FILE_ENV).map(PathBuf::from)
}

fn init_logging_internal(format: LogFormat, default_level: Level, log_file: Option<&Path>) -> Result<(), LoggingError>
{
    // RUST_LOG can override the default level with more specific filters
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level.to_string()));

    match format {
        LogFormat::Pretty => {
            let console_layer = fmt::layer()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_ansi(true)
                .with_writer(io::stdout)
                .with_filter(env_filter.clone());

            if let Some(file_path) = log_file {
                let file_layer = fmt::layer()
                    .with_writer(file_writer(file_path)?)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_ansi(false) // No ANSI in files
                    .with_filter(env_filter);

                Registry::default().with(console_layer).with(file_layer).try_init()?;
            } else {
                Registry::default().with(console_layer).try_init()?;
            }
        }
        LogFormat::Json => {
            let console_layer = fmt::layer()
                .json()
                .with_target(true)
                .with_thread_ids(true)
                .with_thread_names(true)
                .with_timer(ChronoUtc::rfc_3339())
                .with_current_span(true)
                .with_span_list(true)
                .with_writer(io::stdout)
                .with_filter(env_filter.clone());

            if let Some(file_path) = log_file {
                let file_layer = fmt::layer()
                    .json()
                    .with_writer(file_writer(file_path)?)
                    .with_target(true)
                    .with_thread_ids(true)
                    .with_thread_names(true)
                    .with_timer(ChronoUtc::rfc_3339())
                    .with_current_span(true)
                    .with_span_list(true)
                    .with_filter(env_filter);

                Registry::default().with(console_layer).with(file_layer).try_init()?;
            } else {
                Registry::default().with(console_layer).try_init()?;
            }
        }
    }

    Ok(())
}

/// Daily-rolling file writer for `path`.
///
/// Events are written straight to the file on the emitting thread. The
/// monitor may exit the process right after its last warning, and a
/// background writer would lose it.
fn file_writer(path: &Path) -> Result<RollingFileAppender, LoggingError>
{
    let directory = path
        .parent()
        .filter(|dir| !dir.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| LoggingError::FileError(format!("{}: not a file name", path.display())))?;

    RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix(file_name)
        .build(directory)
        .map_err(|err| LoggingError::FileError(format!("{}: {err}", path.display())))
}

/// Logging initialization error
#[derive(Debug, thiserror::Error)]
pub enum LoggingError
{
    /// Invalid log format
    #[error("Unknown log format: {0}. Use 'pretty' or 'json'")]
    InvalidFormat(String),

    /// Invalid log level
    #[error("Unknown log level: {0}. Use 'error', 'warn', 'info', 'debug', or 'trace'")]
    InvalidLevel(String),

    /// A global subscriber was already installed
    #[error("Failed to initialize logging: {0}")]
    InitializationFailed(String),

    /// The log file could not be opened
    #[error("Failed to open log file {0}")]
    FileError(String),
}

impl From<tracing_subscriber::util::TryInitError> for LoggingError
{
    fn from(err: tracing_subscriber::util::TryInitError) -> Self
    {
        LoggingError::InitializationFailed(err.to_string())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn test_log_format_from_str()
    {
        assert_eq!(LogFormat::from_str("pretty").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("json").unwrap(), LogFormat::Json);
        assert_eq!(LogFormat::from_str("dev").unwrap(), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str("PROD").unwrap(), LogFormat::Json);
        assert!(matches!(
            LogFormat::from_str("xml"),
            Err(LoggingError::InvalidFormat(raw)) if raw == "xml"
        ));
    }

    #[test]
    fn test_log_level_from_str()
    {
        assert_eq!(LogLevel::from_str("error").unwrap(), LogLevel::Error);
        assert_eq!(LogLevel::from_str("warning").unwrap(), LogLevel::Warn);
        assert_eq!(LogLevel::from_str("info").unwrap(), LogLevel::Info);
        assert_eq!(LogLevel::from_str("dbg").unwrap(), LogLevel::Debug);
        assert_eq!(LogLevel::from_str("trace").unwrap(), LogLevel::Trace);
        assert!(LogLevel::from_str("loud").is_err());
    }

    #[test]
    fn test_log_level_to_tracing_level()
    {
        assert_eq!(Level::from(LogLevel::Error), Level::ERROR);
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::Info), Level::INFO);
        assert_eq!(Level::from(LogLevel::Debug), Level::DEBUG);
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    }

    #[test]
    fn test_second_initialization_is_an_error_not_a_panic()
    {
        // The first call may already have happened in another test thread.
        let _ = init_logging_with_level(LogLevel::Warn, LogFormat::Pretty);
        let second = init_logging_with_level(LogLevel::Warn, LogFormat::Json);
        assert!(matches!(second, Err(LoggingError::InitializationFailed(_))));
    }

    #[test]
    fn test_uncreatable_log_directory_is_an_error_not_a_panic()
    {
        let result = file_writer(Path::new("/proc/definitely/not/a/dir/antitrace.log"));
        assert!(matches!(result, Err(LoggingError::FileError(reason)) if reason.contains("/proc/definitely")));
    }

    #[test]
    fn test_file_events_are_on_disk_before_the_writer_is_dropped()
    {
        let dir = tempfile::tempdir().unwrap();
        let writer = file_writer(&dir.path().join("antitrace.log")).unwrap();
        let subscriber = tracing_subscriber::fmt().with_writer(writer).with_ansi(false).finish();

        let written = tracing::subscriber::with_default(subscriber, || {
            tracing::warn!(target: LOG_TARGET, "being traced, tracer pid: 4242");
            std::fs::read_dir(dir.path())
                .unwrap()
                .map(|entry| std::fs::read_to_string(entry.unwrap().path()).unwrap())
                .collect::<String>()
        });

        assert!(written.contains("being traced, tracer pid: 4242"), "{written:?}");
        assert!(written.contains(LOG_TARGET));
    }
}
