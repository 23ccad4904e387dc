//! # Status Field Parser
//!
//! Extracts the numeric value embedded in one status line.
//!
//! The rule is deliberately blunt: every ASCII digit in the line is collected
//! in order and the concatenation is read as a base-10 integer. Nothing else
//! in the line matters, so `"TracerPid:\t1234"` and `"a1b2c3d4"` both yield
//! `1234`. There is no sign, grouping or separator handling.
//!
//! Digits accumulate in a fixed-capacity buffer of [`MAX_FIELD_DIGITS`]
//! entries. Lines with more digits, or with a value past `i64::MAX`, are
//! rejected with [`FieldError::ValueTooLong`] instead of being truncated.

use smallvec::SmallVec;

use crate::error::FieldError;
use crate::types::TracerId;

/// Maximum number of digits a status field may carry.
pub const MAX_FIELD_DIGITS: usize = 19;

type DigitBuffer = SmallVec<[u8; MAX_FIELD_DIGITS]>;

/// Parse the numeric field of a status line.
///
/// - `None` yields [`TracerId::ABSENT`] (`-1`).
/// - A line without digits yields `0`.
///
/// ## Errors
///
/// [`FieldError::ValueTooLong`] when the line has more than
/// [`MAX_FIELD_DIGITS`] digits or the value overflows `i64`.
///
/// ## Example
///
/// ```rust
/// use antitrace_core::parser::parse_status_field;
/// use antitrace_core::types::TracerId;
///
/// assert_eq!(parse_status_field(Some("TracerPid:\t1234")), Ok(TracerId(1234)));
/// assert_eq!(parse_status_field(Some("State:\tS (sleeping)")), Ok(TracerId(0)));
/// assert_eq!(parse_status_field(None), Ok(TracerId::ABSENT));
/// ```
pub fn parse_status_field(line: Option<&str>) -> Result<TracerId, FieldError>
{
    let Some(line) = line else {
        return Ok(TracerId::ABSENT);
    };

    let mut digits = DigitBuffer::new();
    for digit in line.bytes().filter(u8::is_ascii_digit) {
        if digits.len() == MAX_FIELD_DIGITS {
            return Err(FieldError::ValueTooLong {
                digits: count_digits(line),
            });
        }
        digits.push(digit - b'0');
    }

    digits
        .iter()
        .try_fold(0_i64, |value, &digit| value.checked_mul(10)?.checked_add(i64::from(digit)))
        .map(TracerId)
        .ok_or(FieldError::ValueTooLong { digits: digits.len() })
}

/// Split a `key:\tvalue` status line into its trimmed key and value.
///
/// Returns `None` when the line has no `:` separator.
#[must_use]
pub fn split_status_line(line: &str) -> Option<(&str, &str)>
{
    line.split_once(':').map(|(key, value)| (key.trim(), value.trim()))
}

fn count_digits(line: &str) -> usize
{
    line.bytes().filter(u8::is_ascii_digit).count()
}
