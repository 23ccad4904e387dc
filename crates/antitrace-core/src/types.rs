//! Value types shared by the parser and the monitor.

use std::fmt;

/// Identifier of the process tracing us, as reported by the status source.
///
/// `0` conventionally means "not traced". The parser produces
/// [`TracerId::ABSENT`] (`-1`) when it is handed no line at all.
///
/// ## Why wrap it in a struct?
///
/// The raw value is compared against a threshold and logged in several
/// places; a newtype keeps it from being confused with our own pid or with
/// an arbitrary counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TracerId(pub i64);

impl TracerId
{
    /// Sentinel returned for an absent input line.
    pub const ABSENT: TracerId = TracerId(-1);

    /// The "not traced" value.
    pub const NONE: TracerId = TracerId(0);

    /// Raw numeric value.
    #[must_use]
    pub const fn raw(self) -> i64
    {
        self.0
    }

    /// True when this id is strictly above `threshold`.
    #[must_use]
    pub const fn exceeds(self, threshold: i64) -> bool
    {
        self.0 > threshold
    }
}

impl From<i64> for TracerId
{
    fn from(raw: i64) -> Self
    {
        TracerId(raw)
    }
}

impl From<TracerId> for i64
{
    fn from(id: TracerId) -> Self
    {
        id.0
    }
}

impl fmt::Display for TracerId
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result
    {
        write!(f, "{}", self.0)
    }
}
