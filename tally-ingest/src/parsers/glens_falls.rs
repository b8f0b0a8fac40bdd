//! Glens Falls National Bank checking statement layout.
//!
//! Expected reconstructed lines:
//!   MISCELLANEOUS DEBITS & CREDITS
//!   Date Description Deposits Withdrawals Balance
//!   Jan 02 BEGINNING BALANCE 1,000.00
//!   Jan 05 PAYROLL ACME INC 1,200.00 2,200.00
//!   Jan 06 ATM WITHDRAWAL   60.00 2,140.00
//!
//! Amounts are printed unsigned in either the Deposits or the Withdrawals
//! column. With the Deposits cell empty the reconstructed separator is three
//! spaces instead of one. Files are named `<Mon>+<Day>,+<Year>.pdf`.

use regex::Regex;

use super::{DatedLines, Layout, MonthFormat, SignRule, StatementParser};
use crate::dates::FilenameDate;
use crate::error::ParseError;
use crate::types::StatementRecord;

pub const SOURCE: &str = "glens_falls_national_bank";

pub fn layout() -> Result<Layout, ParseError> {
    Ok(Layout {
        source: SOURCE,
        filename_date: FilenameDate::MonthDayYear,
        table_start: Regex::new(r"^MISCELLANEOUS DEBITS & CREDITS")?,
        header_rows: 1,
        table_end: vec![Regex::new(r"^FEE RECAP")?],
        drop_page_footer: true,
        date_prefix: Regex::new(
            r"^(?P<month>Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec) (?P<day>\d{1,2}) (?P<rest>.*)$",
        )?,
        month_format: MonthFormat::Abbreviated,
        transaction: Regex::new(
            r"^(?P<name>.+?)(?P<separator>\s+)(?P<amount>[\d,]+\.\d{2})\s+(?P<balance>[\d,]+\.\d{2})$",
        )?,
        sign: SignRule::SeparatorWidth { credit: 1, debit: 3 },
        skip: Some(Regex::new(r"BEGINNING BALANCE|ENDING BALANCE")?),
        dated_lines: DatedLines::Strict,
        statement_period: None,
    })
}

/// Parse reconstructed statement lines into Glens Falls National Bank transactions.
pub fn parse_glens_falls_lines<S: AsRef<str>>(filename: &str, lines: &[S]) -> Result<StatementRecord, ParseError> {
    StatementParser::new(layout()?).parse(filename, lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parses_deposits_and_withdrawals() {
        let lines = [
            "__PARSER__ === Page 1 ===",
            "ACCOUNT SUMMARY",
            "MISCELLANEOUS DEBITS & CREDITS",
            "Date Description Deposits Withdrawals Balance",
            "Dec 30 BEGINNING BALANCE 1,000.00",
            "Dec 31 PAYROLL ACME INC 1,200.00 2,200.00",
            "Jan 06 ATM WITHDRAWAL   60.00 2,140.00",
            "MAIN ST BRANCH",
            "Jan 12 CHECK 1042   1,500.00 640.00",
            "Jan 31 ENDING BALANCE 640.00",
            "FEE RECAP",
            "Jan 31 SERVICE FEE 5.00",
            "x9 0Q 7 zz 11",
        ];
        let record = parse_glens_falls_lines("Statement Jan+31,+2024.pdf", &lines).unwrap();

        let got: Vec<(NaiveDate, &str, String)> = record
            .transactions
            .iter()
            .map(|t| (t.date, t.name.as_str(), t.amount.to_string()))
            .collect();
        assert_eq!(
            got,
            vec![
                (ymd(2023, 12, 31), "PAYROLL ACME INC", "1200.00".to_string()),
                (ymd(2024, 1, 6), "ATM WITHDRAWAL MAIN ST BRANCH", "-60.00".to_string()),
                (ymd(2024, 1, 12), "CHECK 1042", "-1500.00".to_string()),
            ]
        );
        assert_eq!(record.statement_period, ymd(2024, 1, 31));
        assert_eq!(record.source, SOURCE);
    }

    #[test]
    fn test_page_footer_garble_is_dropped() {
        let lines = [
            "__PARSER__ === Page 1 ===",
            "MISCELLANEOUS DEBITS & CREDITS",
            "Date Description Deposits Withdrawals Balance",
            "Mar 03 TRANSFER FROM SAVINGS 300.00 800.00",
            "0431 77A Q 9 13 00",
            "__PARSER__ === Page 2 ===",
            "MISCELLANEOUS DEBITS & CREDITS (CONTINUED)",
            "Date Description Deposits Withdrawals Balance",
            "Mar 09 UTILITY CO   45.10 754.90",
        ];
        let record = parse_glens_falls_lines("Mar+31,+2024.pdf", &lines).unwrap();

        assert_eq!(record.transactions.len(), 2);
        assert_eq!(record.transactions[0].name, "TRANSFER FROM SAVINGS");
        assert_eq!(record.transactions[1].amount, Decimal::from_str("-45.10").unwrap());
    }

    #[test]
    fn test_two_space_separator_is_rejected() {
        let lines = [
            "MISCELLANEOUS DEBITS & CREDITS",
            "Date Description Deposits Withdrawals Balance",
            "Mar 03 TRANSFER  300.00 800.00",
        ];
        let err = parse_glens_falls_lines("Mar+31,+2024.pdf", &lines).unwrap_err();
        assert!(matches!(err, ParseError::UnexpectedSeparatorWidth { line_no: 3, width: 2, .. }));
    }

    #[test]
    fn test_dated_line_without_amounts_is_rejected() {
        let lines = [
            "MISCELLANEOUS DEBITS & CREDITS",
            "Date Description Deposits Withdrawals Balance",
            "Mar 03 TRANSFER 300.00",
        ];
        let err = parse_glens_falls_lines("Mar+31,+2024.pdf", &lines).unwrap_err();
        assert!(matches!(err, ParseError::MalformedTransactionLine { line_no: 3, .. }));
    }

    #[test]
    fn test_bad_filename() {
        let err = parse_glens_falls_lines("20240131-statement.pdf", &["anything"]).unwrap_err();
        assert!(matches!(err, ParseError::FilenameDate { .. }));
    }
}
