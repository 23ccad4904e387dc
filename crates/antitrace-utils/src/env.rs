//! Environment variable overrides.
//!
//! Missing or unparseable values fall back to the caller's default; an
//! override can never stop the monitor from starting.

use std::str::FromStr;

/// Parse `name` as `T`, trimming surrounding whitespace.
///
/// Returns `None` when the variable is unset or does not parse.
#[must_use]
pub fn env_parse<T: FromStr>(name: &str) -> Option<T>
{
    std::env::var(name).ok().and_then(|raw| raw.trim().parse::<T>().ok())
}

/// Parse `name` as `T`, or return `default`.
#[must_use]
pub fn env_or<T: FromStr>(name: &str, default: T) -> T
{
    env_parse(name).unwrap_or(default)
}
