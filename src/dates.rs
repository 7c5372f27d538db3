//! Timestamp parsing pinned to the Warsaw civil time zone.
//!
//! No naive timestamp leaves this module: every parser returns a
//! `DateTime<Tz>` in [`CIVIL_TZ`], attaching the zone explicitly when the
//! source text carries no offset.

use chrono::{DateTime, Duration, FixedOffset, LocalResult, NaiveDate, NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

/// Zone used for every source timestamp that carries no offset.
pub const CIVIL_TZ: Tz = chrono_tz::Europe::Warsaw;

/// Numeric listing format used by the stock-exchange and wire listings.
pub const LISTING_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Current instant in the civil zone.
pub fn now_civil() -> DateTime<Tz> {
    Utc::now().with_timezone(&CIVIL_TZ)
}

/// Attach the civil zone to a naive local time.
///
/// In the autumn fold the standard-time reading (the later instant) wins.
/// Times that fall into the spring gap are moved forward by an hour.
pub fn localize(naive: NaiveDateTime) -> DateTime<Tz> {
    match CIVIL_TZ.from_local_datetime(&naive) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(_, standard) => standard,
        LocalResult::None => {
            let shifted = naive + Duration::hours(1);
            match CIVIL_TZ.from_local_datetime(&shifted) {
                LocalResult::Single(dt) | LocalResult::Ambiguous(_, dt) => dt,
                LocalResult::None => CIVIL_TZ.from_utc_datetime(&naive),
            }
        }
    }
}

/// Parse a zone-less timestamp with a fixed format, interpreting it in the
/// civil zone.
pub fn parse_local(s: &str, fmt: &str) -> Option<DateTime<Tz>> {
    NaiveDateTime::parse_from_str(s.trim(), fmt).ok().map(localize)
}

/// Parse an ISO-8601 timestamp as found in `<time datetime=...>` attributes.
///
/// Values with an offset are converted into the civil zone; values without one
/// are taken as civil local time.
pub fn parse_iso(s: &str) -> Option<DateTime<Tz>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&CIVIL_TZ));
    }

    let formats_with_tz = [
        "%Y-%m-%dT%H:%M:%S%.f%:z",
        "%Y-%m-%d %H:%M:%S%.f%:z",
        "%Y-%m-%dT%H:%M%:z",
        "%Y-%m-%d %H:%M%:z",
        "%Y-%m-%dT%H:%M:%S%.f%z",
        "%Y-%m-%d %H:%M:%S%.f%z",
        "%Y-%m-%dT%H:%M%z",
        "%Y-%m-%d %H:%M%z",
    ];
    for fmt in &formats_with_tz {
        if let Ok(dt) = DateTime::<FixedOffset>::parse_from_str(s, fmt) {
            return Some(dt.with_timezone(&CIVIL_TZ));
        }
    }

    let formats_naive = [
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
        "%Y-%m-%d %H:%M",
    ];
    for fmt in &formats_naive {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(localize(naive));
        }
    }

    // Date-only values mean local midnight.
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(localize)
}
