// src/domain/dates.rs

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};

/// Numeric timestamps below this are seconds, at or above it milliseconds.
pub const MILLIS_THRESHOLD: i64 = 1_000_000_000_000;

const MAX_UNWRAP_DEPTH: usize = 4;

// Wrapper keys tried, in order, when a date arrives as an object.
const WRAPPER_KEYS: &[&str] = &["$date", "$numberLong", "date", "value"];

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
];

/// Parse one loosely-typed date value.
///
/// Accepts ISO-like strings, Unix timestamps (seconds or milliseconds,
/// chosen by magnitude) and the usual wrapper objects (`{"$date": ..}`,
/// `{"seconds": .., "nanoseconds": ..}`, ...). Returns `None` for anything
/// else, including out-of-range timestamps.
pub fn parse_date_value(value: &Value) -> Option<DateTime<Utc>> {
    parse_at_depth(value, 0)
}

fn parse_at_depth(value: &Value, depth: usize) -> Option<DateTime<Utc>> {
    match value {
        Value::String(s) => parse_date_str(s),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                timestamp_from_number(i)
            } else {
                n.as_f64().and_then(timestamp_from_float)
            }
        }
        Value::Object(map) if depth < MAX_UNWRAP_DEPTH => unwrap_object(map, depth),
        _ => None,
    }
}

fn unwrap_object(map: &Map<String, Value>, depth: usize) -> Option<DateTime<Utc>> {
    // Firestore-style { seconds, nanoseconds } / { _seconds, _nanoseconds }
    for (secs_key, nanos_key) in [("seconds", "nanoseconds"), ("_seconds", "_nanoseconds")] {
        if let Some(secs) = map.get(secs_key) {
            let nanos = map
                .get(nanos_key)
                .and_then(integer)
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(0);
            return match integer(secs) {
                Some(secs) => Utc.timestamp_opt(secs, nanos).single(),
                None => parse_at_depth(secs, depth + 1),
            };
        }
    }

    for key in WRAPPER_KEYS {
        let Some(inner) = map.get(*key) else {
            continue;
        };
        // {"$numberLong": "1700000000000"}
        if let Value::String(s) = inner {
            if let Ok(n) = s.trim().parse::<i64>() {
                return timestamp_from_number(n);
            }
        }
        if let Some(parsed) = parse_at_depth(inner, depth + 1) {
            return Some(parsed);
        }
    }

    None
}

// 1700000000 or "1700000000"
fn integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Interpret an integer as a Unix timestamp, seconds or milliseconds by
/// magnitude.
pub fn timestamp_from_number(n: i64) -> Option<DateTime<Utc>> {
    if n.unsigned_abs() < MILLIS_THRESHOLD.unsigned_abs() {
        Utc.timestamp_opt(n, 0).single()
    } else {
        Utc.timestamp_millis_opt(n).single()
    }
}

fn timestamp_from_float(f: f64) -> Option<DateTime<Utc>> {
    if !f.is_finite() {
        return None;
    }
    let millis = if f.abs() < MILLIS_THRESHOLD as f64 {
        f * 1000.0
    } else {
        f
    };
    if millis.abs() > i64::MAX as f64 {
        return None;
    }
    Utc.timestamp_millis_opt(millis.round() as i64).single()
}

pub fn parse_date_str(raw: &str) -> Option<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return date
            .and_hms_opt(0, 0, 0)
            .map(|naive| Utc.from_utc_datetime(&naive));
    }

    DateTime::parse_from_rfc2822(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}
