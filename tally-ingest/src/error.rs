use chrono::NaiveDate;
use thiserror::Error;

/// Fatal problems while turning one statement into transactions.
///
/// None of these are recovered locally: a statement that fails to parse must
/// not be reported as if it were complete.
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("unable to parse statement date from filename '{filename}' (expected {expected})")]
    FilenameDate {
        filename: String,
        expected: &'static str,
    },

    #[error(
        "statement period parsed out of document ({found}) differs from statement period in filename ({expected})"
    )]
    StatementPeriodMismatch { found: NaiveDate, expected: NaiveDate },

    #[error("line {line_no}: reached a transaction before any transaction date: {line}")]
    UnresolvedTransactionDate { line_no: usize, line: String },

    #[error("line {line_no}: could not tell which column the amount came from (separator of {width} spaces): {line}")]
    UnexpectedSeparatorWidth {
        line_no: usize,
        width: usize,
        line: String,
    },

    #[error("possible parsing error: {source_label} statement had no transactions")]
    EmptyStatement { source_label: String },

    #[error("invalid calendar date {year:04}-{month:02}-{day:02}")]
    InvalidDate { year: i32, month: u32, day: u32 },

    #[error("line {line_no}: invalid amount '{raw}'")]
    InvalidAmount { line_no: usize, raw: String },

    #[error("line {line_no}: dated line inside the transaction table did not match the transaction layout: {line}")]
    MalformedTransactionLine { line_no: usize, line: String },

    #[error("unknown institution '{0}'")]
    UnknownInstitution(String),

    #[error("invalid layout pattern: {0}")]
    Pattern(#[from] regex::Error),
}
