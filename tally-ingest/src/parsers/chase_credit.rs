//! Chase credit card statement layout.
//!
//! Expected reconstructed lines inside ACCOUNT ACTIVITY:
//!   Date of Transaction Merchant Name or Transaction Description $ Amount
//!   PAYMENTS AND OTHER CREDITS
//!   12/28 Payment Thank You-Mobile -250.00
//!   PURCHASE
//!   01/02 AMAZON MKTPL*2K4LS0 Amzn.com/bill WA 23.17
//!   Order Number 113-5521873-4452216
//!
//! Amounts carry their own sign. Files are named `YYYYMMDD-statements-NNNN-.pdf`.

use regex::Regex;

use super::{DatedLines, Layout, MonthFormat, SignRule, StatementParser};
use crate::dates::FilenameDate;
use crate::error::ParseError;
use crate::types::StatementRecord;

pub const SOURCE: &str = "chase_credit_card";

pub fn layout() -> Result<Layout, ParseError> {
    Ok(Layout {
        source: SOURCE,
        filename_date: FilenameDate::Compact,
        table_start: Regex::new(r"Transaction\s+Merchant Name or Transaction Description")?,
        header_rows: 0,
        table_end: vec![
            Regex::new(r"Page \d+ of \d+")?,
            Regex::new(r"Totals Year-to-Date")?,
            Regex::new(r"^INTEREST CHARGES")?,
        ],
        drop_page_footer: false,
        date_prefix: Regex::new(r"^(?P<month>\d{2})/(?P<day>\d{2})\s+(?P<rest>.+)$")?,
        month_format: MonthFormat::Numeric,
        transaction: Regex::new(r"^(?P<name>.+?)(?P<separator>\s+)(?P<amount>-?[\d,]*\.\d{2})$")?,
        sign: SignRule::AsPrinted,
        skip: Some(Regex::new(
            r"^(PAYMENTS AND OTHER CREDITS|PURCHASES?|FEES CHARGED|INTEREST CHARGED|CASH ADVANCES?|BALANCE TRANSFERS?|TOTAL .*)$",
        )?),
        dated_lines: DatedLines::Lenient,
        statement_period: Some(Regex::new(
            r"Statement Date:\s*(?P<month>\d{2})/(?P<day>\d{2})/(?P<year>\d{2})$",
        )?),
    })
}

/// Parse reconstructed statement lines into Chase credit card transactions.
pub fn parse_chase_credit_lines<S: AsRef<str>>(filename: &str, lines: &[S]) -> Result<StatementRecord, ParseError> {
    StatementParser::new(layout()?).parse(filename, lines)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_single_purchase() {
        let lines = [
            "Transaction Merchant Name or Transaction Description",
            "01/15 COFFEE SHOP 4.50",
            "Page 1 of 1",
        ];
        let record = parse_chase_credit_lines("20240201-statement.pdf", &lines).unwrap();

        assert_eq!(record.source, SOURCE);
        assert_eq!(record.statement_period, ymd(2024, 2, 1));
        assert_eq!(record.transactions.len(), 1);
        let t = &record.transactions[0];
        assert_eq!(t.date, ymd(2024, 1, 15));
        assert_eq!(t.name, "COFFEE SHOP");
        assert_eq!(t.amount, dec("4.50"));
    }

    #[test]
    fn test_merchant_named_total_is_kept() {
        let lines = [
            "Transaction Merchant Name or Transaction Description",
            "01/15 COFFEE SHOP 4.50",
            "01/20 TOTAL WINE & MORE 45.00",
            "TOTAL PURCHASES FOR THIS PERIOD $49.50",
            "Page 1 of 1",
        ];
        let record = parse_chase_credit_lines("20240201-statement.pdf", &lines).unwrap();

        let names: Vec<&str> = record.transactions.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["COFFEE SHOP", "TOTAL WINE & MORE"]);
        assert_eq!(record.transactions[1].date, ymd(2024, 1, 20));
        assert_eq!(record.transactions[1].amount, dec("45.00"));
    }

    #[test]
    fn test_parses_january_statement() {
        let text = r#"
Statement Date: 01/04/24
ACCOUNT ACTIVITY
Date of
Transaction  Merchant Name or Transaction Description $ Amount
PAYMENTS AND OTHER CREDITS
12/28 Payment Thank You-Mobile -1,250.00
PURCHASE
12/01 NETFLIX.COM 15.49
12/05 AMAZON MKTPL*2K4LS0 Amzn.com/bill WA 23.17
Order Number 113-5521873-4452216
01/02 TRADER JOE S #552 AUSTIN TX 61.08
TOTAL FEES FOR THIS PERIOD $0.00
Page 2 of 4
2024 Totals Year-to-Date
"#;
        let lines: Vec<&str> = text.lines().collect();
        let record = parse_chase_credit_lines("20240104-statements-5555-.pdf", &lines).unwrap();
        let txns = &record.transactions;

        assert_eq!(txns.len(), 4);
        assert_eq!(txns[0].date, ymd(2023, 12, 28));
        assert_eq!(txns[0].amount, dec("-1250.00"));
        // December 1st on a January statement keeps the statement year.
        assert_eq!(txns[1].date, ymd(2024, 12, 1));
        assert_eq!(txns[2].name, "AMAZON MKTPL*2K4LS0 Amzn.com/bill WA Order Number 113-5521873-4452216");
        assert_eq!(txns[2].date, ymd(2023, 12, 5));
        assert_eq!(txns[3].date, ymd(2024, 1, 2));
        assert_eq!(txns[3].amount, dec("61.08"));
    }

    #[test]
    fn test_table_resumes_on_next_page() {
        let lines = [
            "__PARSER__ === Page 1 ===",
            "Transaction Merchant Name or Transaction Description $ Amount",
            "03/02 GROCERY 20.00",
            "Page 1 of 2",
            "__PARSER__ === Page 2 ===",
            "ACCOUNT ACTIVITY (CONTINUED)",
            "Transaction Merchant Name or Transaction Description $ Amount",
            "03/09 HARDWARE STORE 7.25",
            "Page 2 of 2",
        ];
        let record = parse_chase_credit_lines("20240315-statements-5555-.pdf", &lines).unwrap();
        let names: Vec<&str> = record.transactions.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["GROCERY", "HARDWARE STORE"]);
    }

    #[test]
    fn test_statement_date_must_match_filename() {
        let lines = [
            "Statement Date: 02/04/24",
            "Transaction Merchant Name or Transaction Description",
            "01/15 COFFEE SHOP 4.50",
        ];
        let err = parse_chase_credit_lines("20240104-statements-5555-.pdf", &lines).unwrap_err();
        assert!(matches!(err, ParseError::StatementPeriodMismatch { .. }));
    }

    #[test]
    fn test_statement_without_activity_table() {
        let lines = ["Statement Date: 01/04/24", "01/15 COFFEE SHOP 4.50", "Page 1 of 1"];
        let err = parse_chase_credit_lines("20240104-statements-5555-.pdf", &lines).unwrap_err();
        assert!(matches!(err, ParseError::EmptyStatement { .. }));
    }

    #[test]
    fn test_bad_filename() {
        let err = parse_chase_credit_lines("statement.pdf", &["anything"]).unwrap_err();
        assert!(matches!(err, ParseError::FilenameDate { .. }));
    }
}
