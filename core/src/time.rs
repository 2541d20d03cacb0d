use anyhow::{anyhow, Result};
use chrono::{DateTime, Datelike, Duration, NaiveDate, Utc};

/// Monday on or before the given date.
pub fn monday_of(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// 1-based week number of `date` counted from `first_week_monday`, which
/// must itself be a Monday. Numbering is continuous across month and year
/// boundaries.
pub fn week_number(date: NaiveDate, first_week_monday: NaiveDate) -> i64 {
    (monday_of(date) - first_week_monday).num_days() / 7 + 1
}

/// Monday and Sunday of the given week number relative to the anchor.
pub fn week_date_range(first_week_monday: NaiveDate, week: i64) -> (NaiveDate, NaiveDate) {
    let start = first_week_monday + Duration::weeks(week - 1);
    (start, start + Duration::days(6))
}

pub fn format_week_range(start: NaiveDate, end: NaiveDate) -> String {
    // chrono's %a/%b are always English, so this stays locale-independent.
    format!("{} - {}", start.format("%a %b %d %Y"), end.format("%a %b %d %Y"))
}

pub fn month_short_name(month: u32) -> &'static str {
    match month {
        1 => "jan",
        2 => "feb",
        3 => "mar",
        4 => "apr",
        5 => "may",
        6 => "jun",
        7 => "jul",
        8 => "aug",
        9 => "sep",
        10 => "oct",
        11 => "nov",
        12 => "dec",
        _ => "",
    }
}

/// Parses a stored entry date. Accepts a plain calendar day (2024-01-15) or
/// an RFC 3339 timestamp, whose date part is taken in UTC.
pub fn parse_entry_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();

    if let Ok(d) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Ok(d);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.with_timezone(&Utc).date_naive());
    }

    Err(anyhow!("Could not parse date: {}", input))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn test_monday_of_snaps_back_to_monday() {
        // 2024-01-01 is a Monday
        assert_eq!(monday_of(ymd(2024, 1, 1)), ymd(2024, 1, 1));
        assert_eq!(monday_of(ymd(2024, 1, 3)), ymd(2024, 1, 1));
        assert_eq!(monday_of(ymd(2024, 1, 7)), ymd(2024, 1, 1));
        // Across a month boundary
        assert_eq!(monday_of(ymd(2024, 2, 1)), ymd(2024, 1, 29));
    }

    #[test]
    fn test_week_number_is_continuous_across_years() {
        let anchor = ymd(2024, 12, 30); // Monday
        assert_eq!(week_number(ymd(2024, 12, 30), anchor), 1);
        assert_eq!(week_number(ymd(2025, 1, 2), anchor), 1);
        assert_eq!(week_number(ymd(2025, 1, 6), anchor), 2);
        assert_eq!(week_number(ymd(2025, 1, 19), anchor), 3);
    }

    #[test]
    fn test_week_date_range() {
        let anchor = ymd(2024, 1, 1);
        assert_eq!(week_date_range(anchor, 1), (ymd(2024, 1, 1), ymd(2024, 1, 7)));
        assert_eq!(week_date_range(anchor, 2), (ymd(2024, 1, 8), ymd(2024, 1, 14)));
    }

    #[test]
    fn test_format_week_range() {
        let label = format_week_range(ymd(2024, 1, 8), ymd(2024, 1, 14));
        assert_eq!(label, "Mon Jan 08 2024 - Sun Jan 14 2024");
    }

    #[test]
    fn test_month_short_name() {
        assert_eq!(month_short_name(1), "jan");
        assert_eq!(month_short_name(12), "dec");
    }

    #[test]
    fn test_parse_entry_date_plain_day() {
        assert_eq!(parse_entry_date("2024-01-15").unwrap(), ymd(2024, 1, 15));
        assert_eq!(parse_entry_date(" 2024-01-15 ").unwrap(), ymd(2024, 1, 15));
    }

    #[test]
    fn test_parse_entry_date_timestamp_is_utc_anchored() {
        assert_eq!(
            parse_entry_date("2024-01-15T12:30:00Z").unwrap(),
            ymd(2024, 1, 15)
        );
        // 01:00 at +03:00 is still the previous day in UTC
        assert_eq!(
            parse_entry_date("2024-01-15T01:00:00+03:00").unwrap(),
            ymd(2024, 1, 14)
        );
    }

    #[test]
    fn test_parse_entry_date_rejects_garbage() {
        assert!(parse_entry_date("next tuesday").is_err());
        assert!(parse_entry_date("").is_err());
    }
}
