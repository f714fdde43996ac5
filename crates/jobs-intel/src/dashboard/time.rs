use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

use super::domain::LooseTimestamp;

/// Label used whenever a timestamp is missing or unparseable.
pub const FALLBACK_LABEL: &str = "Recently";

/// Integers below this are epoch seconds, everything else epoch milliseconds.
const SECONDS_THRESHOLD: i64 = 10_000_000_000;

const DAYS_PER_MONTH: i64 = 30;

/// Human-readable age of `value` relative to the current clock.
pub fn relative_time(value: Option<&LooseTimestamp>) -> String {
    relative_time_at(value, Utc::now())
}

/// Human-readable age of `value` relative to `now`.
///
/// Ages past thirty days are always reported in flat 30-day months; there is
/// no year bucket.
pub fn relative_time_at(value: Option<&LooseTimestamp>, now: DateTime<Utc>) -> String {
    let Some(moment) = value.and_then(resolve_moment) else {
        return FALLBACK_LABEL.to_string();
    };

    let elapsed_ms = now.timestamp_millis() - moment.timestamp_millis();
    let minutes = elapsed_ms.div_euclid(60_000);
    if minutes < 1 {
        return "Just now".to_string();
    }
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = minutes / 60;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    let days = hours / 24;
    if days < DAYS_PER_MONTH {
        return format!("{days}d ago");
    }
    format!("{}mo ago", days / DAYS_PER_MONTH)
}

/// Abbreviated calendar date (`Oct 18, 2026`), or an empty string when the
/// value is not a recognisable date. Integer timestamps are not accepted here.
pub fn format_date(value: Option<&LooseTimestamp>) -> String {
    let parsed = match value {
        Some(LooseTimestamp::Text(raw)) => parse_moment(raw),
        _ => None,
    };

    parsed
        .map(|moment| moment.format("%b %-d, %Y").to_string())
        .unwrap_or_default()
}

fn resolve_moment(value: &LooseTimestamp) -> Option<DateTime<Utc>> {
    match value {
        LooseTimestamp::Text(raw) => {
            parse_moment(raw).or_else(|| whole_integer(raw).and_then(from_epoch))
        }
        LooseTimestamp::Number(number) => {
            if number.is_finite() {
                from_epoch(number.trunc() as i64)
            } else {
                None
            }
        }
    }
}

/// Zoned layouts outside RFC 3339, e.g. a `+0200` offset without a colon.
const ZONED_PATTERNS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%d %H:%M:%S%.f%z"];

/// Naive date-time layouts, read as UTC. `%.f` also matches a missing
/// fraction.
const NAIVE_DATETIME_PATTERNS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%d %B %Y %H:%M:%S",
    "%B %d, %Y %H:%M:%S",
];

/// Date-only layouts, read as UTC midnight. When parsing, `%B` accepts both
/// full and abbreviated month names.
const DATE_PATTERNS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%d %B %Y", "%B %d, %Y", "%B %d %Y"];

/// Parses the calendar-date shapes the feeds emit: RFC 3339, RFC 2822 (RSS
/// `pubDate`), ISO without a zone (with or without seconds and fractions),
/// slash-separated dates and day-month-year text. Naive values are taken as
/// UTC.
pub fn parse_moment(raw: &str) -> Option<DateTime<Utc>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(trimmed) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(dt) = ZONED_PATTERNS
        .iter()
        .find_map(|pattern| DateTime::parse_from_str(trimmed, pattern).ok())
    {
        return Some(dt.with_timezone(&Utc));
    }
    if let Some(naive) = NAIVE_DATETIME_PATTERNS
        .iter()
        .find_map(|pattern| NaiveDateTime::parse_from_str(trimmed, pattern).ok())
    {
        return Some(Utc.from_utc_datetime(&naive));
    }

    DATE_PATTERNS
        .iter()
        .find_map(|pattern| NaiveDate::parse_from_str(trimmed, pattern).ok())
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Integer read for numeric strings: an optional sign and digits only, with
/// surrounding whitespace ignored. Anything else is not a timestamp.
fn whole_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    let digits = trimmed.strip_prefix(['-', '+']).unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

fn from_epoch(value: i64) -> Option<DateTime<Utc>> {
    let millis = if value < SECONDS_THRESHOLD {
        value.checked_mul(1000)?
    } else {
        value
    };
    Utc.timestamp_millis_opt(millis).single()
}
