//! Date parsing and days-on-market derivation.
//!
//! Providers ship dates in several formats (bare dates, naive timestamps,
//! timestamps with offsets, `Z`-suffixed ISO-8601). Anything unparseable is
//! treated as absent, never an error.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::Dates;

/// Parse a provider date string into a naive UTC timestamp.
///
/// Tries ISO-8601 first (with `Z` normalized to `+00:00`), then each
/// fallback pattern in order. Returns `None` for absent, blank, or
/// unparseable input.
pub fn parse_date(value: Option<&str>) -> Option<NaiveDateTime> {
    let text = value?.trim();
    if text.is_empty() {
        return None;
    }

    let iso_candidate = text.replace('Z', "+00:00");
    if let Ok(dt) = DateTime::parse_from_rfc3339(&iso_candidate) {
        return Some(dt.naive_utc());
    }

    if let Ok(d) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(d.and_time(NaiveTime::MIN));
    }
    for pattern in [
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, pattern) {
            return Some(dt);
        }
    }
    if let Ok(dt) = DateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%z") {
        return Some(dt.naive_utc());
    }
    None
}

/// Whole days a listing spent on market: `removed` (or `last_seen` when the
/// listing is still live) minus `listed`.
///
/// `None` when either endpoint is missing or the delta is negative; a
/// negative delta means corrupt provider data and is excluded rather than
/// surfaced.
pub fn days_on_market(dates: &Dates) -> Option<i64> {
    let listed = parse_date(dates.listed.as_deref())?;
    let end = parse_date(dates.removed.as_deref())
        .or_else(|| parse_date(dates.last_seen.as_deref()))?;
    let delta = (end - listed).num_days();
    if delta < 0 {
        return None;
    }
    Some(delta)
}
