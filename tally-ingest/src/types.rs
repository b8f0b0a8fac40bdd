use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One positioned text fragment as emitted by the page decoder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Token {
    pub text: String,
    pub x: f64,
    pub y: f64,
}

impl Token {
    pub fn new(text: impl Into<String>, x: f64, y: f64) -> Self {
        Self {
            text: text.into(),
            x,
            y,
        }
    }
}

/// Normalized output of statement parsers (bank-agnostic)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub source: String,
    pub date: NaiveDate,
    pub name: String,
    /// Positive is money in (deposit / credit-card charge as printed); negative is money out.
    pub amount: Decimal,
}

/// Everything extracted from one statement document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementRecord {
    pub source: String,
    pub statement_period: NaiveDate,
    pub transactions: Vec<TransactionRecord>,
}

/// Summary numbers logged for each parsed statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatementSummary {
    pub transaction_count: usize,
    pub oldest: NaiveDate,
    pub newest: NaiveDate,
    pub total: Decimal,
}
