//! Time zone parsing and conversion helpers.
//!
//! What this module provides:
//! - [`parse_ts_to_utc`]: Parse RFC-3339 timestamps with an explicit offset and convert to UTC.
//! - [`parse_date`]: Parse a bare ISO-8601 calendar date (`2024-03-01`).
//! - [`local_to_utc`]: Convert a naive local timestamp in a [`chrono_tz::Tz`] to UTC the way
//!   calendar boundaries need it.
//! - [`parse_tz`]: Parse an IANA zone name (e.g., "America/New_York").
//!
//! Notes:
//! - Ambiguous local times happen during “fall back” when a wall time occurs twice.
//!   The earlier instant wins.
//! - Nonexistent local times happen during “spring forward” when a wall time is skipped.
//!   The first valid minute after the gap wins.
//!
//! Examples
//! - RFC-3339 with offset to UTC:
//!   "2024-03-10T09:30:00-05:00" -> "2024-03-10T14:30:00Z"
//! - New York “fall back” ambiguity (2024-11-03 01:30 occurs twice): 05:30Z.
//! - New York “spring forward” gap (2024-03-10 02:30 is skipped): 07:00Z.

use anyhow::Context;
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Longest DST gap searched past, in minutes.
const MAX_GAP_MINUTES: u32 = 120;

/// RFC-3339 with offset -> UTC.
pub fn parse_ts_to_utc(s: &str) -> anyhow::Result<DateTime<Utc>> {
    let dt = DateTime::parse_from_rfc3339(s.trim()).with_context(|| format!("bad rfc3339: {s}"))?;
    Ok(dt.with_timezone(&Utc))
}

/// `YYYY-MM-DD` -> calendar date.
pub fn parse_date(s: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").with_context(|| format!("bad date: {s}"))
}

/// Parse an IANA time zone name.
pub fn parse_tz(name: &str) -> anyhow::Result<Tz> {
    name.trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .with_context(|| format!("bad tz: {name}"))
}

/// Convert a naive local timestamp to UTC.
///
/// Ambiguous times resolve to the earliest instant; nonexistent ones shift forward
/// minute by minute to the first valid instant.
///
/// Errors:
/// - Returns an error if no valid instant exists within two hours after a gap.
pub fn local_to_utc(naive: NaiveDateTime, tz: Tz) -> anyhow::Result<DateTime<Utc>> {
    use chrono::offset::LocalResult::*;
    match tz.from_local_datetime(&naive) {
        Single(dt) | Ambiguous(dt, _) => Ok(dt.with_timezone(&Utc)),
        None => {
            let mut t = naive;
            for _ in 0..MAX_GAP_MINUTES {
                t += chrono::Duration::minutes(1);
                if let Single(dt) | Ambiguous(dt, _) = tz.from_local_datetime(&t) {
                    return Ok(dt.with_timezone(&Utc));
                }
            }
            Err(anyhow::anyhow!("nonexistent local time {naive} in {tz}"))
        }
    }
}
