//! Line-oriented statement parsers.
//!
//! Every institution shares the same scan: wait for the transaction table
//! header, read rows until a footer or the next section, and fold undated
//! lines into the previous row's description. What differs per bank lives
//! in a [`Layout`].

pub mod chase_credit;
pub mod glens_falls;

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{instrument, trace};

use crate::assemble::assemble;
use crate::dates::{self, FilenameDate, month_from_abbrev};
use crate::error::ParseError;
use crate::lines::is_page_marker;
use crate::types::{StatementRecord, TransactionRecord};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthFormat {
    /// `01`
    Numeric,
    /// `Jan`
    Abbreviated,
}

impl MonthFormat {
    fn parse(self, s: &str) -> Option<u32> {
        match self {
            Self::Numeric => s.parse().ok(),
            Self::Abbreviated => month_from_abbrev(s),
        }
    }
}

/// How the sign of an amount is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignRule {
    /// The amount carries its own sign (`-25.00` is a credit).
    AsPrinted,
    /// Amounts are always printed unsigned; the number of spaces between the
    /// description and the amount tells which column it was printed in.
    SeparatorWidth { credit: usize, debit: usize },
}

/// What to do with a dated table line that is not a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatedLines {
    Lenient,
    Strict,
}

/// Institution-specific pieces plugged into the shared scan.
///
/// Regex capture groups used:
/// - `date_prefix`: `month`, `day`, `rest`
/// - `transaction`: `name`, `separator`, `amount` (optionally `balance`)
/// - `statement_period`: `month`, `day`, `year`
#[derive(Debug, Clone)]
pub struct Layout {
    pub source: &'static str,
    pub filename_date: FilenameDate,
    pub table_start: Regex,
    /// Column-heading lines following `table_start`.
    pub header_rows: usize,
    pub table_end: Vec<Regex>,
    /// Discard the last line of every page (footer garble) and leave the table.
    pub drop_page_footer: bool,
    pub date_prefix: Regex,
    pub month_format: MonthFormat,
    pub transaction: Regex,
    pub sign: SignRule,
    pub skip: Option<Regex>,
    pub dated_lines: DatedLines,
    pub statement_period: Option<Regex>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TableState {
    Outside,
    Inside,
}

/// Per-statement scan state. Owned by one `parse` call and dropped with it.
struct Scan<'a> {
    layout: &'a Layout,
    statement_date: NaiveDate,
    state: TableState,
    header_rows_left: usize,
    current_date: Option<NaiveDate>,
    transactions: Vec<TransactionRecord>,
}

impl<'a> Scan<'a> {
    fn new(layout: &'a Layout, statement_date: NaiveDate) -> Self {
        Self {
            layout,
            statement_date,
            state: TableState::Outside,
            header_rows_left: 0,
            current_date: None,
            transactions: Vec::new(),
        }
    }

    fn enter_table(&mut self) {
        self.state = TableState::Inside;
        self.header_rows_left = self.layout.header_rows;
    }

    fn leave_table(&mut self) {
        self.state = TableState::Outside;
        self.header_rows_left = 0;
    }

    fn check_statement_period(&self, line: &str) -> Result<(), ParseError> {
        let Some(caps) = self.layout.statement_period.as_ref().and_then(|re| re.captures(line)) else {
            return Ok(());
        };

        let found = period_date(&caps)?;
        if found != self.statement_date {
            return Err(ParseError::StatementPeriodMismatch {
                found,
                expected: self.statement_date,
            });
        }
        Ok(())
    }

    fn table_line(&mut self, line_no: usize, line: &str) -> Result<(), ParseError> {
        if self.header_rows_left > 0 {
            self.header_rows_left -= 1;
            return Ok(());
        }
        if line.trim().is_empty() {
            return Ok(());
        }

        let (dated, rest) = self.strip_date(line)?;

        if let Some(caps) = self.layout.transaction.captures(rest) {
            let Some(date) = self.current_date else {
                return Err(ParseError::UnresolvedTransactionDate {
                    line_no,
                    line: line.to_string(),
                });
            };
            let amount = self.signed_amount(line_no, line, &caps)?;
            self.transactions.push(TransactionRecord {
                source: self.layout.source.to_string(),
                date,
                name: caps["name"].trim().to_string(),
                amount,
            });
            return Ok(());
        }

        // Labels only apply to lines the row grammar rejected.
        if self.layout.skip.as_ref().is_some_and(|re| re.is_match(rest)) {
            trace!(line_no, line, "skipping recognized non-transaction line");
            return Ok(());
        }

        if dated {
            return match self.layout.dated_lines {
                DatedLines::Lenient => Ok(()),
                DatedLines::Strict => Err(ParseError::MalformedTransactionLine {
                    line_no,
                    line: line.to_string(),
                }),
            };
        }

        // Wrapped description: belongs to the row above.
        match self.transactions.last_mut() {
            Some(last) => {
                last.name.push(' ');
                last.name.push_str(rest.trim());
                Ok(())
            }
            None => Err(ParseError::UnresolvedTransactionDate {
                line_no,
                line: line.to_string(),
            }),
        }
    }

    /// Strip a leading `month/day` and make it the current transaction date.
    fn strip_date<'l>(&mut self, line: &'l str) -> Result<(bool, &'l str), ParseError> {
        let Some(caps) = self.layout.date_prefix.captures(line) else {
            return Ok((false, line));
        };
        let month = self.layout.month_format.parse(&caps["month"]);
        let day = caps["day"].parse::<u32>().ok();
        let (Some(month), Some(day)) = (month, day) else {
            return Ok((false, line));
        };

        self.current_date = Some(dates::resolve(self.statement_date, month, day)?);
        let rest = caps.name("rest").map_or("", |m| m.as_str());
        Ok((true, rest))
    }

    fn signed_amount(&self, line_no: usize, line: &str, caps: &Captures) -> Result<Decimal, ParseError> {
        let raw = &caps["amount"];
        let amount = Decimal::from_str(&raw.replace(',', "")).map_err(|_| ParseError::InvalidAmount {
            line_no,
            raw: raw.to_string(),
        })?;

        match self.layout.sign {
            SignRule::AsPrinted => Ok(amount),
            SignRule::SeparatorWidth { credit, debit } => {
                let width = caps.name("separator").map_or(0, |m| m.as_str().len());
                if width == credit {
                    Ok(amount)
                } else if width == debit {
                    Ok(-amount)
                } else {
                    Err(ParseError::UnexpectedSeparatorWidth {
                        line_no,
                        width,
                        line: line.to_string(),
                    })
                }
            }
        }
    }
}

fn period_date(caps: &Captures) -> Result<NaiveDate, ParseError> {
    let month: u32 = caps["month"].parse().unwrap_or(0);
    let day: u32 = caps["day"].parse().unwrap_or(0);
    let mut year: i32 = caps["year"].parse().unwrap_or(0);
    if year < 100 {
        year += 2000;
    }
    NaiveDate::from_ymd_opt(year, month, day).ok_or(ParseError::InvalidDate { year, month, day })
}

/// The shared statement state machine, configured by a [`Layout`].
#[derive(Debug, Clone)]
pub struct StatementParser {
    layout: Layout,
}

impl StatementParser {
    pub fn new(layout: Layout) -> Self {
        Self { layout }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Parse the reconstructed lines of one statement.
    ///
    /// `filename` supplies the statement date used to resolve transaction
    /// years and to cross-check any period printed in the document.
    #[instrument(level = "debug", skip_all, fields(source = self.layout.source, filename = %filename))]
    pub fn parse<S: AsRef<str>>(&self, filename: &str, lines: &[S]) -> Result<StatementRecord, ParseError> {
        let layout = &self.layout;
        let statement_date = layout.filename_date.parse(filename)?;
        let mut scan = Scan::new(layout, statement_date);

        for (idx, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            let line_no = idx + 1;

            if is_page_marker(line) {
                scan.leave_table();
                continue;
            }
            if layout.drop_page_footer && lines.get(idx + 1).is_some_and(|next| is_page_marker(next.as_ref())) {
                trace!(line_no, line, "dropping page footer");
                scan.leave_table();
                continue;
            }
            if layout.table_start.is_match(line) {
                scan.enter_table();
                continue;
            }
            if layout.table_end.iter().any(|re| re.is_match(line)) {
                scan.leave_table();
                continue;
            }

            match scan.state {
                TableState::Outside => scan.check_statement_period(line)?,
                TableState::Inside => scan.table_line(line_no, line)?,
            }
        }

        assemble(layout.source, statement_date, scan.transactions)
    }
}

/// Institutions with a known statement layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Institution {
    ChaseCreditCard,
    GlensFallsNationalBank,
}

impl Institution {
    pub const ALL: [Institution; 2] = [Self::ChaseCreditCard, Self::GlensFallsNationalBank];

    /// Label stamped on every record; also the statements sub-directory name.
    pub fn source(self) -> &'static str {
        match self {
            Self::ChaseCreditCard => chase_credit::SOURCE,
            Self::GlensFallsNationalBank => glens_falls::SOURCE,
        }
    }

    pub fn layout(self) -> Result<Layout, ParseError> {
        match self {
            Self::ChaseCreditCard => chase_credit::layout(),
            Self::GlensFallsNationalBank => glens_falls::layout(),
        }
    }

    pub fn parser(self) -> Result<StatementParser, ParseError> {
        Ok(StatementParser::new(self.layout()?))
    }
}

impl fmt::Display for Institution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source())
    }
}

impl FromStr for Institution {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|i| i.source() == s)
            .ok_or_else(|| ParseError::UnknownInstitution(s.to_string()))
    }
}
