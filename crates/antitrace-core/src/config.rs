//! Monitor configuration.
//!
//! Defaults reproduce the shipped behaviour: a tracer id above 1000 ends the
//! process, the status record is polled every five seconds, and the field is
//! found by its `TracerPid` key.
//!
//! ## Environment Variables
//!
//! - `ANTITRACE_TRACER_THRESHOLD`: tracer ids strictly above this terminate the host
//! - `ANTITRACE_POLL_INTERVAL_MS`: delay between iterations, in milliseconds,
//!   never below [`MIN_POLL_INTERVAL`]
//! - `ANTITRACE_FIELD_LINE`: read the field positionally from this zero-based line

use std::time::Duration;

use antitrace_utils::env::{env_or, env_parse};

use crate::parser::split_status_line;

/// Tracer ids strictly greater than this are treated as an attached debugger.
pub const DEFAULT_TRACER_THRESHOLD: i64 = 1000;

/// Delay between two reads of the status record.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

/// Smallest interval accepted from the environment.
pub const MIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Key of the tracer field in `/proc/<pid>/status`.
pub const TRACER_PID_KEY: &str = "TracerPid";

/// Zero-based line holding `TracerPid` in the historical status layout.
pub const LEGACY_TRACER_LINE: usize = 5;

pub const THRESHOLD_ENV: &str = "ANTITRACE_TRACER_THRESHOLD";
pub const INTERVAL_ENV: &str = "ANTITRACE_POLL_INTERVAL_MS";
pub const FIELD_LINE_ENV: &str = "ANTITRACE_FIELD_LINE";

/// How the tracer line is found within the status record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldLocator
{
    /// First line whose key (text before `:`) equals this string.
    Key(String),
    /// The line at this zero-based index, whatever its key.
    Line(usize),
}

impl FieldLocator
{
    /// Locate by the `TracerPid` key.
    #[must_use]
    pub fn tracer_pid() -> Self
    {
        FieldLocator::Key(TRACER_PID_KEY.to_string())
    }

    /// Text to hand to the parser if `line` (at `index`) is the tracer line.
    ///
    /// Positional lookup parses the whole line; key lookup parses only the
    /// value so digits in a key can never leak into the result.
    #[must_use]
    pub fn select<'a>(&self, index: usize, line: &'a str) -> Option<&'a str>
    {
        match self {
            FieldLocator::Line(wanted) => (index == *wanted).then_some(line),
            FieldLocator::Key(key) => match split_status_line(line) {
                Some((found, value)) if found == key => Some(value),
                _ => None,
            },
        }
    }
}

impl Default for FieldLocator
{
    fn default() -> Self
    {
        Self::tracer_pid()
    }
}

/// Tunables for [`TracerMonitor`](crate::monitor::TracerMonitor).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig
{
    /// Tracer ids strictly above this value trigger the responder.
    pub threshold: i64,
    /// Sleep between iterations.
    pub interval: Duration,
    /// How the tracer line is found.
    pub locator: FieldLocator,
}

impl Default for MonitorConfig
{
    fn default() -> Self
    {
        Self {
            threshold: DEFAULT_TRACER_THRESHOLD,
            interval: DEFAULT_POLL_INTERVAL,
            locator: FieldLocator::default(),
        }
    }
}

impl MonitorConfig
{
    /// Defaults overridden by `ANTITRACE_*` environment variables.
    ///
    /// An interval below [`MIN_POLL_INTERVAL`] is raised to it.
    #[must_use]
    pub fn from_env() -> Self
    {
        let defaults = Self::default();
        Self {
            threshold: env_or(THRESHOLD_ENV, defaults.threshold),
            interval: env_parse::<u64>(INTERVAL_ENV)
                .map_or(defaults.interval, |ms| Duration::from_millis(ms).max(MIN_POLL_INTERVAL)),
            locator: env_parse::<usize>(FIELD_LINE_ENV).map_or(defaults.locator, FieldLocator::Line),
        }
    }

    #[must_use]
    pub fn with_threshold(mut self, threshold: i64) -> Self
    {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_interval(mut self, interval: Duration) -> Self
    {
        self.interval = interval;
        self
    }

    #[must_use]
    pub fn with_locator(mut self, locator: FieldLocator) -> Self
    {
        self.locator = locator;
        self
    }
}
