// src/core/utils/time.rs
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};

/// Returns the current wall-clock time. Pure validators take `now`
/// explicitly; only the form-state container and services call this.
pub fn now_utc() -> DateTime<Utc> {
    Utc::now()
}

/// Combines a `YYYY-MM-DD` date and an `HH:MM` time into a UTC timestamp.
/// Returns `None` when either part does not parse.
pub fn parse_date_time(date: &str, time: &str) -> Option<DateTime<Utc>> {
    let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d").ok()?;
    let time = NaiveTime::parse_from_str(time.trim(), "%H:%M").ok()?;
    Some(Utc.from_utc_datetime(&date.and_time(time)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn parses_date_and_time() {
        let parsed = parse_date_time("2031-06-15", "09:30").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2031-06-15T09:30:00+00:00");
    }

    #[test]
    fn accepts_single_digit_hour() {
        let parsed = parse_date_time("2031-06-15", "9:05").unwrap();
        assert_eq!(parsed.hour(), 9);
        assert_eq!(parsed.minute(), 5);
    }

    #[test]
    fn rejects_malformed_input() {
        assert!(parse_date_time("2031-13-01", "09:30").is_none());
        assert!(parse_date_time("not-a-date", "09:30").is_none());
        assert!(parse_date_time("2031-06-15", "25:00").is_none());
        assert!(parse_date_time("2031-06-15", "").is_none());
    }
}
