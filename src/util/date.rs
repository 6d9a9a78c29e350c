use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

// Statements render all dates as dd/mm/yy. Two-digit years go through
// chrono's %y pivot (69-99 -> 1969-1999, 00-68 -> 2000-2068).
pub const STATEMENT_DATE_FORMAT: &str = "%d/%m/%y";
pub const STATEMENT_DATETIME_FORMAT: &str = "%d/%m/%y %H:%M:%S";

pub fn parse_statement_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str, STATEMENT_DATE_FORMAT)
}

pub fn parse_statement_datetime(
    datetime_str: &str,
) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(datetime_str, STATEMENT_DATETIME_FORMAT)
}

lazy_static! {
    static ref STATEMENT_DATE_RE: Regex = Regex::new(r"\b\d{2}/\d{2}/\d{2}\b").unwrap();
}

/// Every parseable dd/mm/yy date in `text`, in order of appearance.
/// Tokens that look like dates but do not resolve to a real calendar day
/// (eg. 45/13/24) are dropped rather than treated as errors.
pub fn extract_statement_dates(text: &str) -> Vec<NaiveDate> {
    STATEMENT_DATE_RE
        .find_iter(text)
        .filter_map(|m| parse_statement_date(m.as_str()).ok())
        .collect()
}

pub fn is_last_day_of_month(date: NaiveDate) -> bool {
    (date + Duration::days(1)).month() != date.month()
}

// Used by both unit and integration tests
pub mod pub_testlib {
    use chrono::{NaiveDate, NaiveDateTime};

    pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    pub fn ymd_hms(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        min: u32,
        sec: u32,
    ) -> NaiveDateTime {
        ymd(year, month, day).and_hms_opt(hour, min, sec).unwrap()
    }
}
