use chrono::{DateTime, NaiveDate, NaiveDateTime};

use super::model::RawCell;

/// Offset-aware layouts (`+0000` or `+00:00`), normalized to UTC.
const OFFSET_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f%z",
    "%Y-%m-%d %H:%M:%S%.f %z",
];

/// Datetime layouts tried in order after the offset-aware ones.
const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%m/%d/%Y %H:%M:%S%.f",
    "%m/%d/%Y %H:%M",
    "%d/%m/%Y %H:%M:%S%.f",
    "%d/%m/%Y %H:%M",
];

/// Date-only layouts; parsed as midnight.
const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%Y%m%d",
    "%b %d, %Y",
    "%b %d %Y",
    "%d-%b-%Y",
    "%d %b %Y",
];

/// Coerce a cell to a timestamp. `None` means the row's time is absent.
///
/// Month-first is preferred for slash dates; day-first is only reached when
/// the first field cannot be a month. Numeric cells are Unix epoch seconds.
pub fn to_timestamp(cell: &RawCell) -> Option<NaiveDateTime> {
    match cell {
        RawCell::Text(s) => parse_timestamp(s),
        RawCell::Number(secs) => from_epoch_seconds(*secs),
        RawCell::Missing => None,
    }
}

/// Epoch seconds (fractions kept to the nanosecond) as a UTC timestamp.
pub fn from_epoch_seconds(secs: f64) -> Option<NaiveDateTime> {
    if !secs.is_finite() {
        return None;
    }
    let whole = secs.floor();
    if whole < i64::MIN as f64 || whole > i64::MAX as f64 {
        return None;
    }
    let nanos = (((secs - whole) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(whole as i64, nanos).map(|t| t.naive_utc())
}

pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.naive_utc());
    }
    for fmt in OFFSET_FORMATS {
        if let Ok(dt) = DateTime::parse_from_str(s, fmt) {
            return Some(dt.naive_utc());
        }
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    parse_partial_date(s)
}

/// `YYYY` or `YYYY-MM`, anchored to the first day of the period.
fn parse_partial_date(s: &str) -> Option<NaiveDateTime> {
    let (year, month) = match s.split_once('-') {
        Some((y, m)) => (y, m),
        None => (s, "1"),
    };
    let all_digits = |t: &str| !t.is_empty() && t.bytes().all(|b| b.is_ascii_digit());
    if year.len() != 4 || !all_digits(year) || month.len() > 2 || !all_digits(month) {
        return None;
    }
    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, 1)?.and_hms_opt(0, 0, 0)
}

/// Coerce a cell to a finite float. `None` means the row's value is absent.
pub fn to_value(cell: &RawCell) -> Option<f64> {
    match cell {
        RawCell::Number(v) => Some(*v).filter(|v| v.is_finite()),
        RawCell::Text(s) => parse_value(s),
        RawCell::Missing => None,
    }
}

/// Standard decimal parsing: optional sign, decimal point, exponent.
/// Blank, non-numeric, NaN and infinite tokens are rejected.
pub fn parse_value(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, mi, s)
            .unwrap()
    }

    #[test]
    fn iso_dates_and_datetimes() {
        assert_eq!(parse_timestamp("2024-01-01"), Some(ymd_hms(2024, 1, 1, 0, 0, 0)));
        assert_eq!(
            parse_timestamp("2024-01-01 13:45:10"),
            Some(ymd_hms(2024, 1, 1, 13, 45, 10))
        );
        assert_eq!(
            parse_timestamp("2024-01-01T13:45"),
            Some(ymd_hms(2024, 1, 1, 13, 45, 0))
        );
    }

    #[test]
    fn rfc3339_offsets_are_normalized_to_utc() {
        assert_eq!(
            parse_timestamp("2024-03-05T10:00:00-05:00"),
            Some(ymd_hms(2024, 3, 5, 15, 0, 0))
        );
    }

    #[test]
    fn slash_dates_prefer_month_first() {
        assert_eq!(parse_timestamp("01/02/2024"), Some(ymd_hms(2024, 1, 2, 0, 0, 0)));
        assert_eq!(parse_timestamp("25/02/2024"), Some(ymd_hms(2024, 2, 25, 0, 0, 0)));
        assert_eq!(
            parse_timestamp("2024/02/25 08:30"),
            Some(ymd_hms(2024, 2, 25, 8, 30, 0))
        );
    }

    #[test]
    fn offsets_without_colon_are_normalized_to_utc() {
        assert_eq!(
            parse_timestamp("2024-01-01T10:00:00+0000"),
            Some(ymd_hms(2024, 1, 1, 10, 0, 0))
        );
        assert_eq!(
            parse_timestamp("2024-01-01 10:00:00.5-0500"),
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_milli_opt(15, 0, 0, 500)
        );
        assert_eq!(
            parse_timestamp("2024-01-01 10:00:00 +0200"),
            Some(ymd_hms(2024, 1, 1, 8, 0, 0))
        );
    }

    #[test]
    fn month_name_dates() {
        let jan5 = Some(ymd_hms(2024, 1, 5, 0, 0, 0));
        assert_eq!(parse_timestamp("Jan 5, 2024"), jan5);
        assert_eq!(parse_timestamp("January 5, 2024"), jan5);
        assert_eq!(parse_timestamp("05-Jan-2024"), jan5);
        assert_eq!(parse_timestamp("5 January 2024"), jan5);
    }

    #[test]
    fn year_and_month_only() {
        assert_eq!(parse_timestamp("2024"), Some(ymd_hms(2024, 1, 1, 0, 0, 0)));
        assert_eq!(parse_timestamp("2024-03"), Some(ymd_hms(2024, 3, 1, 0, 0, 0)));
        assert_eq!(parse_timestamp("2024-13"), None);
        assert_eq!(parse_timestamp("202"), None);
    }

    #[test]
    fn numeric_cells_are_epoch_seconds() {
        assert_eq!(
            to_timestamp(&RawCell::Number(1_704_067_200.0)),
            Some(ymd_hms(2024, 1, 1, 0, 0, 0))
        );
        assert_eq!(
            to_timestamp(&RawCell::Number(1_704_067_200.25)),
            NaiveDate::from_ymd_opt(2024, 1, 1)
                .unwrap()
                .and_hms_milli_opt(0, 0, 0, 250)
        );
        assert_eq!(to_timestamp(&RawCell::Number(f64::NAN)), None);
    }

    #[test]
    fn garbage_timestamps_are_absent() {
        assert_eq!(parse_timestamp("bad-date"), None);
        assert_eq!(parse_timestamp("   "), None);
        assert_eq!(parse_timestamp("2024-13-01"), None);
        assert_eq!(to_timestamp(&RawCell::Missing), None);
    }

    #[test]
    fn values_accept_signs_and_decimals() {
        assert_eq!(parse_value("10"), Some(10.0));
        assert_eq!(parse_value(" -3.5 "), Some(-3.5));
        assert_eq!(parse_value("+2"), Some(2.0));
        assert_eq!(parse_value("1e3"), Some(1000.0));
        assert_eq!(parse_value(".5"), Some(0.5));
    }

    #[test]
    fn blanks_and_tokens_are_missing_not_zero() {
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("   "), None);
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value("NaN"), None);
        assert_eq!(parse_value("inf"), None);
        assert_eq!(parse_value("1,5"), None);
        assert_eq!(to_value(&RawCell::Number(f64::NAN)), None);
        assert_eq!(to_value(&RawCell::Number(4.0)), Some(4.0));
    }
}
