use std::fmt;

use time::{format_description::BorrowedFormatItem, macros::format_description, Date, PrimitiveDateTime};

const DATETIME_SPACE: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");
const DATETIME_T: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]");
const DATETIME_MINUTES: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");
const DATE_ONLY: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TimestampError {
    #[error("empty timestamp")]
    Empty,
    #[error("unrecognized timestamp '{0}'")]
    Unrecognized(String),
}

/// Parse a meter timestamp.
///
/// Accepted forms (surrounding whitespace ignored):
/// - `YYYY-MM-DD HH:MM:SS`
/// - `YYYY-MM-DDTHH:MM:SS`
/// - `YYYY-MM-DD HH:MM`
/// - `YYYY-MM-DD` (midnight)
///
/// The year is four unsigned digits; `-0001-01-01` or `+2024-01-01` are rejected.
pub fn parse_timestamp(raw: &str) -> Result<PrimitiveDateTime, TimestampError> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(TimestampError::Empty);
    }
    // `[year]` alone would also take a leading sign.
    if !s.starts_with(|c: char| c.is_ascii_digit()) {
        return Err(TimestampError::Unrecognized(s.to_string()));
    }

    [DATETIME_SPACE, DATETIME_T, DATETIME_MINUTES]
        .into_iter()
        .find_map(|fmt| PrimitiveDateTime::parse(s, fmt).ok())
        .or_else(|| Date::parse(s, DATE_ONLY).ok().map(Date::midnight))
        .ok_or_else(|| TimestampError::Unrecognized(s.to_string()))
}

/// `YYYY-MM-DD HH:MM:SS`, the same shape the input files use.
pub fn format_timestamp(ts: PrimitiveDateTime) -> String {
    format!(
        "{} {:02}:{:02}:{:02}",
        ts.date(),
        ts.hour(),
        ts.minute(),
        ts.second()
    )
}

/// An ISO-8601 calendar week (Monday through Sunday), ordered by week-year
/// then week number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IsoWeek {
    year: i32,
    week: u8,
}

impl IsoWeek {
    pub fn of(date: Date) -> Self {
        let (year, week, _) = date.to_iso_week_date();
        Self { year, week }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn week(&self) -> u8 {
        self.week
    }
}

impl fmt::Display for IsoWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn parses_the_input_file_format() {
        assert_eq!(
            parse_timestamp("2024-01-01 01:00:00"),
            Ok(datetime!(2024-01-01 01:00:00))
        );
    }

    #[test]
    fn parses_alternate_forms() {
        assert_eq!(
            parse_timestamp(" 2024-01-02T13:30:05 "),
            Ok(datetime!(2024-01-02 13:30:05))
        );
        assert_eq!(
            parse_timestamp("2024-01-02 13:30"),
            Ok(datetime!(2024-01-02 13:30:00))
        );
        assert_eq!(
            parse_timestamp("2024-01-02"),
            Ok(datetime!(2024-01-02 00:00:00))
        );
    }

    #[test]
    fn rejects_garbage_and_empty() {
        assert_eq!(parse_timestamp("   "), Err(TimestampError::Empty));
        assert!(matches!(
            parse_timestamp("not-a-date"),
            Err(TimestampError::Unrecognized(_))
        ));
        assert!(parse_timestamp("2024-02-30 00:00:00").is_err());
    }

    #[test]
    fn rejects_signed_years() {
        for raw in ["-9999-01-01 00:00:00", "+2024-01-01 00:00:00", "-0001-12-31"] {
            assert_eq!(
                parse_timestamp(raw),
                Err(TimestampError::Unrecognized(raw.to_string())),
                "{raw}"
            );
        }
    }

    #[test]
    fn formats_with_zero_padding() {
        assert_eq!(
            format_timestamp(datetime!(2024-01-04 01:00:00)),
            "2024-01-04 01:00:00"
        );
    }

    #[test]
    fn iso_week_spans_monday_to_sunday() {
        let week = IsoWeek::of(date!(2024-01-04));
        assert_eq!(week.year(), 2024);
        assert_eq!(week.week(), 1);
        assert_eq!(week.to_string(), "2024-W01");
        assert_eq!(week, IsoWeek::of(date!(2024-01-01)));
        assert_eq!(week, IsoWeek::of(date!(2024-01-07)));
        assert!(week < IsoWeek::of(date!(2024-01-08)));
    }

    #[test]
    fn last_representable_week_is_labelled() {
        let ts = parse_timestamp("9999-12-31 00:00:00").expect("max date parses");
        assert_eq!(IsoWeek::of(ts.date()).to_string(), "9999-W52");
    }

    #[test]
    fn iso_week_year_can_differ_from_calendar_year() {
        let week = IsoWeek::of(date!(2021-01-01));
        assert_eq!(week.to_string(), "2020-W53");
        assert_eq!(week, IsoWeek::of(date!(2020-12-28)));
    }
}
