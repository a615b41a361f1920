//! Timestamp normalization for export lines.
//!
//! The timestamp column is the least stable part of the export format:
//! revisions have shipped strict ISO-8601, space-separated date-times,
//! month-name notations with AM/PM, bare clock times, and slash-delimited
//! dates — sometimes with a scraped username glued to the front or a
//! trailing URL glued to the back. [`normalize_timestamp`] tries a fixed,
//! ordered list of format strategies and returns `None` rather than
//! erroring when none match; the caller decides whether a missing
//! timestamp invalidates the record.
//!
//! All successful parses are normalized to UTC. A source value without an
//! offset is assumed to already be UTC; a value with a well-formed offset
//! is converted.
//!
//! # Example
//!
//! ```
//! use postpack::timestamp::normalize_timestamp;
//! use chrono::{TimeZone, Utc};
//!
//! let ts = normalize_timestamp("2024-01-05T10:00:00+00:00").unwrap();
//! assert_eq!(ts, Utc.with_ymd_and_hms(2024, 1, 5, 10, 0, 0).unwrap());
//!
//! assert!(normalize_timestamp("nat").is_none());
//! assert!(normalize_timestamp("").is_none());
//! ```

use chrono::{DateTime, NaiveDateTime, NaiveTime, SubsecRound, Utc};
use tracing::debug;

/// Space-separated and month-name notations, tried in order after the
/// ISO strategies.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%b %d %Y, %I:%M %p",
    "%B %d %Y, %I:%M %p",
];

/// Generic best-effort fallback covering slash-delimited and other
/// common notations seen in older export revisions.
const FALLBACK_FORMATS: &[&str] = &[
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%m/%d/%y %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y-%m-%d %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%m/%d/%Y %I:%M %p",
    "%b %d, %Y %I:%M %p",
];

/// Outcome of one pass over the format ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Parsed {
    /// A full date-time, normalized to UTC.
    Full(DateTime<Utc>),
    /// Only a clock time matched (bare `HH:MM AM/PM`). Date-incomplete:
    /// a record always requires a full date, so this counts as a parse
    /// failure for validity.
    TimeOnly,
}

/// Converts a raw timestamp token into a canonical UTC instant.
///
/// The literal `"nat"` (case-insensitive) and the empty string are
/// explicit no-timestamp sentinels and short-circuit to `None` without
/// attempting any format.
///
/// Decoration stripping:
/// - a trailing ` http...` segment (a URL the tokenizer accidentally
///   captured) is truncated before parsing;
/// - a leading username token is dropped and the parse retried, but only
///   after the ladder fails on the full value and only when the value
///   carries no AM/PM marker — the marker means the space belongs to a
///   bare clock time, not a username.
///
/// Failure is never fatal: a diagnostic is logged and `None` returned.
pub fn normalize_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();

    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nat") {
        return None;
    }

    // Heuristic (a): truncate a trailing URL.
    let candidate = match trimmed.find(" http") {
        Some(idx) => trimmed[..idx].trim_end(),
        None => trimmed,
    };

    match try_formats(candidate) {
        Some(Parsed::Full(dt)) => return Some(dt),
        Some(Parsed::TimeOnly) => {
            debug!(token = candidate, "timestamp is date-incomplete (bare clock time)");
            return None;
        }
        None => {}
    }

    // Heuristic (b): drop a leading username token and retry. Skipped
    // when an AM/PM marker is present, since that space belongs to the
    // time.
    if let Some(idx) = candidate.find(' ') {
        if !has_meridiem(candidate) {
            let stripped = candidate[idx + 1..].trim_start();
            debug!(token = candidate, "leading token stripped, retrying timestamp parse");
            match try_formats(stripped) {
                Some(Parsed::Full(dt)) => return Some(dt),
                Some(Parsed::TimeOnly) => {
                    debug!(token = stripped, "timestamp is date-incomplete (bare clock time)");
                    return None;
                }
                None => {}
            }
        }
    }

    debug!(token = trimmed, "no timestamp format matched");
    None
}

/// Runs the ordered format ladder over one candidate string.
fn try_formats(s: &str) -> Option<Parsed> {
    // 1. Strict ISO-8601 date-time. RFC 3339 converts a well-formed
    //    offset; otherwise the offset/fraction suffix is discarded and
    //    the naive value assumed UTC.
    if s.contains('T') {
        // Fractional seconds are discarded, not rounded: the canonical
        // instant is seconds precision.
        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Some(Parsed::Full(dt.to_utc().trunc_subsecs(0)));
        }
        let bare = s.find(['+', 'Z', '.']).map_or(s, |idx| &s[..idx]);
        if let Ok(naive) = NaiveDateTime::parse_from_str(bare, "%Y-%m-%dT%H:%M:%S") {
            return Some(Parsed::Full(naive.and_utc()));
        }
    }

    // 2-4. Space-separated and month-name notations.
    for fmt in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Parsed::Full(naive.and_utc()));
        }
    }

    // 5. Bare clock time: recognized so the diagnostic can say
    //    "date-incomplete" rather than "unparsed".
    if NaiveTime::parse_from_str(s, "%I:%M %p").is_ok() {
        return Some(Parsed::TimeOnly);
    }

    // 6. Generic fallback ladder.
    for fmt in FALLBACK_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Parsed::Full(naive.and_utc()));
        }
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(Parsed::Full(dt.to_utc()));
    }

    None
}

/// Whether the value carries an AM/PM marker.
fn has_meridiem(s: &str) -> bool {
    let upper = s.to_ascii_uppercase();
    upper.contains("AM") || upper.contains("PM")
}
