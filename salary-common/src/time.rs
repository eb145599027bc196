//! Timestamp utilities

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Format used for dates written to CSV files
pub const CSV_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Format a timestamp the way the CSV store writes it
pub fn format_csv_date(ts: &DateTime<Utc>) -> String {
    ts.format(CSV_DATE_FORMAT).to_string()
}

/// Parse the date spellings found across historical datasets.
///
/// Timezone-less values are taken as UTC. Returns `None` when no known
/// format matches.
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Some(ts.with_timezone(&Utc));
    }

    const DATE_TIME_FORMATS: [&str; 4] = [
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
    ];
    for fmt in DATE_TIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(value, fmt) {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|naive| Utc.from_utc_datetime(&naive));
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    #[test]
    fn test_now_returns_recent_timestamp() {
        let timestamp = now();
        assert!(timestamp.timestamp() > 946_684_800); // 2000-01-01 00:00:00 UTC
        assert!(timestamp.timestamp() < 4_102_444_800); // 2100-01-01 00:00:00 UTC
    }

    #[test]
    fn test_parse_csv_written_format() {
        let ts = parse_date("2024-03-05 14:30:00").unwrap();
        assert_eq!((ts.year(), ts.month(), ts.day()), (2024, 3, 5));
        assert_eq!((ts.hour(), ts.minute()), (14, 30));
    }

    #[test]
    fn test_parse_isoformat_with_microseconds() {
        // Shape produced by datetime.isoformat(sep=" ")
        let ts = parse_date("2024-03-05 14:30:00.123456").unwrap();
        assert_eq!(ts.second(), 0);
        assert_eq!(ts.day(), 5);
    }

    #[test]
    fn test_parse_rfc3339_with_offset() {
        let ts = parse_date("2024-03-05T14:30:00+02:00").unwrap();
        assert_eq!(ts.hour(), 12);
    }

    #[test]
    fn test_parse_date_only_forms() {
        assert_eq!(parse_date("2022-01-01").unwrap().year(), 2022);
        assert_eq!(parse_date("2022/07/09").unwrap().month(), 7);
        let dmy = parse_date("09/07/2022").unwrap();
        assert_eq!((dmy.day(), dmy.month()), (9, 7));
    }

    #[test]
    fn test_parse_garbage_is_none() {
        assert!(parse_date("").is_none());
        assert!(parse_date("   ").is_none());
        assert!(parse_date("yesterday").is_none());
        assert!(parse_date("2022-13-45").is_none());
    }

    #[test]
    fn test_format_round_trips_through_parse() {
        let ts = Utc.with_ymd_and_hms(2023, 11, 2, 8, 15, 42).unwrap();
        assert_eq!(parse_date(&format_csv_date(&ts)), Some(ts));
    }
}
