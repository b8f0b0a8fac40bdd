//! Statement dates: filename-derived reference dates and year resolution for
//! the bare `month/day` pairs printed on transaction rows.

use chrono::{Datelike, NaiveDate};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// Map a three-letter English month abbreviation ("Jan") to its number.
pub fn month_from_abbrev(s: &str) -> Option<u32> {
    let month = match s {
        "Jan" => 1,
        "Feb" => 2,
        "Mar" => 3,
        "Apr" => 4,
        "May" => 5,
        "Jun" => 6,
        "Jul" => 7,
        "Aug" => 8,
        "Sep" => 9,
        "Oct" => 10,
        "Nov" => 11,
        "Dec" => 12,
        _ => return None,
    };
    Some(month)
}

/// Pick the calendar year for a `month/day` found on a statement.
///
/// Statements closing in January list trailing transactions from the prior
/// December, except that December 1st is kept in the statement's year.
pub fn resolve(statement_date: NaiveDate, month: u32, day: u32) -> Result<NaiveDate, ParseError> {
    let year = if statement_date.month() == 1 && month == 12 && day != 1 {
        statement_date.year() - 1
    } else {
        statement_date.year()
    };

    NaiveDate::from_ymd_opt(year, month, day).ok_or(ParseError::InvalidDate { year, month, day })
}

/// How an institution encodes the statement date in its file names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilenameDate {
    /// `20240201-statements-1234-.pdf`
    Compact,
    /// `Jan+31,+2024.pdf`
    MonthDayYear,
}

impl FilenameDate {
    fn expected(self) -> &'static str {
        match self {
            Self::Compact => "YYYYMMDD-",
            Self::MonthDayYear => "<Mon>+<Day>,+<Year>.pdf",
        }
    }

    pub fn parse(self, filename: &str) -> Result<NaiveDate, ParseError> {
        let parsed = match self {
            Self::Compact => parse_compact(filename)?,
            Self::MonthDayYear => parse_month_day_year(filename)?,
        };
        parsed.ok_or_else(|| ParseError::FilenameDate {
            filename: filename.to_string(),
            expected: self.expected(),
        })
    }
}

fn parse_compact(filename: &str) -> Result<Option<NaiveDate>, ParseError> {
    let re = Regex::new(r"(\d{8})-")?;
    Ok(re
        .captures(filename)
        .and_then(|caps| NaiveDate::parse_from_str(&caps[1], "%Y%m%d").ok()))
}

fn parse_month_day_year(filename: &str) -> Result<Option<NaiveDate>, ParseError> {
    let re = Regex::new(r"(?P<month>[A-Za-z]+)\+(?P<day>\d+),\+(?P<year>\d{4})\.pdf")?;
    let Some(caps) = re.captures(filename) else {
        return Ok(None);
    };

    let Some(month) = month_from_abbrev(&caps["month"]) else {
        return Ok(None);
    };
    let day: u32 = match caps["day"].parse() {
        Ok(d) => d,
        Err(_) => return Ok(None),
    };
    let year: i32 = match caps["year"].parse() {
        Ok(y) => y,
        Err(_) => return Ok(None),
    };

    Ok(NaiveDate::from_ymd_opt(year, month, day))
}
