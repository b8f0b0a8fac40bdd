use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::info;

use crate::error::ParseError;
use crate::types::{StatementRecord, StatementSummary, TransactionRecord};

/// Summarize a non-empty list of transactions.
pub fn summarize(transactions: &[TransactionRecord]) -> Option<StatementSummary> {
    let oldest = transactions.iter().map(|t| t.date).min()?;
    let newest = transactions.iter().map(|t| t.date).max()?;
    let total: Decimal = transactions.iter().map(|t| t.amount).sum();

    Some(StatementSummary {
        transaction_count: transactions.len(),
        oldest,
        newest,
        total,
    })
}

/// Finish a statement scan. A scan with zero transactions almost always means
/// the table boundaries were not recognized, so it is an error.
pub fn assemble(
    source: &str,
    statement_period: NaiveDate,
    transactions: Vec<TransactionRecord>,
) -> Result<StatementRecord, ParseError> {
    let Some(summary) = summarize(&transactions) else {
        return Err(ParseError::EmptyStatement {
            source_label: source.to_string(),
        });
    };

    info!(
        source,
        statement_period = %statement_period.format("%Y/%m/%d"),
        "Parsed {} transactions (${:.2} from {} to {})",
        summary.transaction_count,
        summary.total,
        summary.oldest.format("%Y/%m/%d"),
        summary.newest.format("%Y/%m/%d"),
    );

    Ok(StatementRecord {
        source: source.to_string(),
        statement_period,
        transactions,
    })
}

impl StatementRecord {
    pub fn summary(&self) -> Option<StatementSummary> {
        summarize(&self.transactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn txn(date: NaiveDate, amount: &str) -> TransactionRecord {
        TransactionRecord {
            source: "test".to_string(),
            date,
            name: "X".to_string(),
            amount: Decimal::from_str(amount).unwrap(),
        }
    }

    #[test]
    fn test_empty_statement_is_error() {
        let period = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let err = assemble("test", period, Vec::new()).unwrap_err();
        assert!(matches!(err, ParseError::EmptyStatement { .. }));
    }

    #[test]
    fn test_summary_uses_date_extremes_and_signed_total() {
        let jan = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
        let txns = vec![txn(jan(20), "10.00"), txn(jan(3), "-2.50"), txn(jan(11), "10")];
        let period = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();

        let record = assemble("test", period, txns).unwrap();
        let summary = record.summary().unwrap();

        assert_eq!(summary.transaction_count, 3);
        assert_eq!(summary.oldest, jan(3));
        assert_eq!(summary.newest, jan(20));
        assert_eq!(summary.total, Decimal::from_str("17.50").unwrap());
        assert_eq!(record.statement_period, period);
    }
}
