//! Record key timestamps.
//!
//! Keys are whatever the Go `log` package printed in front of a line:
//! `YYYY/MM/DD HH:MM:SS`, optionally with microseconds, optionally followed
//! by a `file.go:42:` source prefix. Keys are wall-clock times with no zone,
//! so they are kept as [`jiff::civil::DateTime`].

use std::fmt::Write as _;

/// Parsed record key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    /// Wall-clock date and time of the log line.
    pub value: jiff::civil::DateTime,
    /// The key as it appeared in the log.
    pub original: String,
}

impl Timestamp {
    /// Parse the leading date (and time, if present) of a record key.
    ///
    /// Returns `None` when the key does not open with a `YYYY/MM/DD` date.
    pub fn parse(key: &str) -> Option<Self> {
        let mut parts = key.split_whitespace();
        let date = parts.next()?;
        let time = parts.next();

        let value = match time {
            Some(time) => Self::parse_date_time(date, time)
                .or_else(|| Self::parse_date(date))?,
            None => Self::parse_date(date)?,
        };

        Some(Self {
            value,
            original: key.to_string(),
        })
    }

    fn parse_date_time(date: &str, time: &str) -> Option<jiff::civil::DateTime> {
        let joined = format!("{date} {time}");
        jiff::civil::DateTime::strptime("%Y/%m/%d %H:%M:%S", &joined)
            .or_else(|_| jiff::civil::DateTime::strptime("%Y/%m/%d %H:%M:%S%.f", &joined))
            .ok()
    }

    fn parse_date(date: &str) -> Option<jiff::civil::DateTime> {
        let date = jiff::civil::Date::strptime("%Y/%m/%d", date).ok()?;
        Some(date.to_datetime(jiff::civil::Time::midnight()))
    }

    /// Format with a strftime-compatible format string.
    ///
    /// Falls back to the original key if the format cannot be rendered.
    pub fn format_with(&self, format: &str) -> String {
        let mut out = String::new();
        if write!(out, "{}", self.value.strftime(format)).is_err() {
            return self.original.clone();
        }
        out
    }
}

/// Render a record key for display.
///
/// Without a format, or when the key does not parse, the key is kept as is.
pub fn display_key(key: &str, format: Option<&str>) -> String {
    match (format, Timestamp::parse(key)) {
        (Some(format), Some(ts)) => ts.format_with(format),
        _ => key.to_string(),
    }
}
