//! Placeholder-aware time handling.
//!
//! The extraction pipeline cannot always tell the time of day, and stores
//! "date known, time unknown" as exactly midnight UTC instead of leaving the
//! field empty. An instant is a placeholder iff its UTC hour and minute are
//! both 0; seconds are ignored. Stored data depends on this exact rule.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

/// Parse a stored instant. Accepts RFC 3339, Postgres text form
/// ("2025-01-08 20:00:00+00"), offset-less datetimes (read as UTC) and bare
/// dates (midnight UTC, i.e. a placeholder). Anything else is `None`.
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in ["%Y-%m-%d %H:%M:%S%.f%#z", "%Y-%m-%dT%H:%M:%S%.f%#z"] {
        if let Ok(dt) = DateTime::parse_from_str(raw, fmt) {
            return Some(dt.with_timezone(&Utc));
        }
    }

    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// True unless the instant sits on the midnight-UTC placeholder.
pub fn instant_has_real_time(instant: &DateTime<Utc>) -> bool {
    !(instant.hour() == 0 && instant.minute() == 0)
}

/// Whether a stored instant carries a real time of day. Unparseable input
/// has no real time.
pub fn has_real_time(raw: &str) -> bool {
    parse_instant(raw)
        .map(|dt| instant_has_real_time(&dt))
        .unwrap_or(false)
}

/// `HH:mm` in the presentation timezone, or `""` for a placeholder or
/// unparseable instant.
pub fn format_time(raw: &str, tz: &Tz) -> String {
    match parse_instant(raw) {
        Some(dt) if instant_has_real_time(&dt) => dt.with_timezone(tz).format("%H:%M").to_string(),
        _ => String::new(),
    }
}

/// Like [`format_time`], but shows `placeholder` (e.g. "TBA") instead of
/// an empty string.
pub fn display_time(raw: &str, tz: &Tz, placeholder: &str) -> String {
    let formatted = format_time(raw, tz);
    if formatted.is_empty() {
        placeholder.to_string()
    } else {
        formatted
    }
}

/// "20:00 - 22:30" when both ends are real, the start alone when the end is
/// missing or a placeholder, `""` when the start has no real time.
pub fn format_time_range(start: &str, end: Option<&str>, tz: &Tz) -> String {
    let start = format_time(start, tz);
    if start.is_empty() {
        return start;
    }
    match end.map(|e| format_time(e, tz)) {
        Some(end) if !end.is_empty() => format!("{} - {}", start, end),
        _ => start,
    }
}

/// Calendar date of the instant in the presentation timezone.
pub fn local_date(raw: &str, tz: &Tz) -> Option<NaiveDate> {
    parse_instant(raw).map(|dt| dt.with_timezone(tz).date_naive())
}

/// `YYYY-MM-DD` in UTC, or the raw text before `T` when unparseable.
pub fn utc_date_key(raw: &str) -> String {
    match parse_instant(raw) {
        Some(dt) => dt.date_naive().format("%Y-%m-%d").to_string(),
        None => raw.trim().split('T').next().unwrap_or_default().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn berlin() -> Tz {
        chrono_tz::Europe::Berlin
    }

    #[test]
    fn test_midnight_utc_is_placeholder() {
        assert!(!has_real_time("2025-01-08T00:00:00Z"));
        assert!(!has_real_time("2025-01-08T00:00:00+00:00"));
        assert!(!has_real_time("2025-01-08T00:00:00.000Z"));
        assert!(has_real_time("2025-01-08T20:00:00Z"));
    }

    #[test]
    fn test_seconds_are_ignored() {
        // hour == 0 and minute == 0 regardless of seconds
        assert!(!has_real_time("2025-01-08T00:00:01Z"));
        assert!(!has_real_time("2025-01-08T00:00:59Z"));
        assert!(has_real_time("2025-01-08T00:01:00Z"));
    }

    #[test]
    fn test_rule_applies_in_utc_not_local() {
        // Local midnight in Berlin is 23:00 UTC the day before: a real time.
        assert!(has_real_time("2025-01-08T00:00:00+01:00"));
        // 01:00 in Berlin is midnight UTC: a placeholder.
        assert!(!has_real_time("2025-01-08T01:00:00+01:00"));
    }

    #[test]
    fn test_unparseable_has_no_real_time() {
        assert!(!has_real_time(""));
        assert!(!has_real_time("morgen früh"));
        assert_eq!(parse_instant("2025-13-40T10:00:00Z"), None);
    }

    #[test]
    fn test_parse_variants() {
        let expected = Utc.with_ymd_and_hms(2025, 1, 8, 20, 0, 0).unwrap();
        assert_eq!(parse_instant("2025-01-08T20:00:00Z"), Some(expected));
        assert_eq!(parse_instant("2025-01-08 20:00:00+00"), Some(expected));
        assert_eq!(parse_instant("2025-01-08T21:00:00+01:00"), Some(expected));
        assert_eq!(parse_instant("2025-01-08T20:00:00"), Some(expected));
        assert_eq!(parse_instant("2025-01-08T20:00"), Some(expected));
        assert_eq!(
            parse_instant("2025-01-08"),
            Some(Utc.with_ymd_and_hms(2025, 1, 8, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_format_time_in_presentation_timezone() {
        assert_eq!(format_time("2025-01-08T19:05:00Z", &berlin()), "20:05");
        assert_eq!(format_time("2025-07-08T19:05:00Z", &berlin()), "21:05");
        assert_eq!(format_time("2025-01-08T00:00:00Z", &berlin()), "");
        assert_eq!(format_time("garbage", &berlin()), "");
    }

    #[test]
    fn test_display_time_uses_placeholder_label() {
        assert_eq!(display_time("2025-01-08T00:00:00Z", &berlin(), "TBA"), "TBA");
        assert_eq!(display_time("2025-01-08T08:30:00Z", &berlin(), "TBA"), "09:30");
    }

    #[test]
    fn test_format_time_range() {
        let tz = berlin();
        assert_eq!(
            format_time_range("2025-01-08T07:00:00Z", Some("2025-01-08T11:30:00Z"), &tz),
            "08:00 - 12:30"
        );
        assert_eq!(
            format_time_range("2025-01-08T07:00:00Z", Some("2025-01-09T00:00:00Z"), &tz),
            "08:00"
        );
        assert_eq!(format_time_range("2025-01-08T07:00:00Z", None, &tz), "08:00");
        assert_eq!(
            format_time_range("2025-01-08T00:00:00Z", Some("2025-01-08T11:30:00Z"), &tz),
            ""
        );
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        // 23:30 UTC is already the next day in Berlin.
        assert_eq!(
            local_date("2025-01-08T23:30:00Z", &berlin()),
            NaiveDate::from_ymd_opt(2025, 1, 9)
        );
        assert_eq!(local_date("nope", &berlin()), None);
    }

    #[test]
    fn test_utc_date_key() {
        assert_eq!(utc_date_key("2025-01-08T23:30:00Z"), "2025-01-08");
        assert_eq!(utc_date_key("2025-01-09T00:30:00+01:00"), "2025-01-08");
        assert_eq!(utc_date_key("2025-01-08Tgarbage"), "2025-01-08");
        assert_eq!(utc_date_key(""), "");
    }
}
