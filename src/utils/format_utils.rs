use chrono::{DateTime, Local, NaiveDateTime, TimeZone};

const DISPLAY_FORMAT: &str = "%-m/%-d/%Y, %-I:%M:%S %p";

/// Renders an ISO-8601 timestamp in local time, or returns it verbatim
/// when it can't be parsed.
pub fn format_timestamp(timestamp: &str) -> String {
    format_timestamp_in(timestamp, &Local)
}

pub fn format_timestamp_in<Tz>(timestamp: &str, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    if let Ok(parsed) = DateTime::parse_from_rfc3339(timestamp) {
        return parsed.with_timezone(tz).format(DISPLAY_FORMAT).to_string();
    }

    // Timestamps without an offset are taken as already local.
    match NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%dT%H:%M:%S%.f") {
        Ok(naive) => naive.format(DISPLAY_FORMAT).to_string(),
        Err(_) => timestamp.to_string(),
    }
}
