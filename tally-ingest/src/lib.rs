//! tally-ingest: rebuild statement text from positioned tokens and extract
//! transactions with bank-specific parsers.

pub mod assemble;
pub mod batch;
pub mod dates;
pub mod decoder;
pub mod error;
pub mod lines;
pub mod parsers;
pub mod types;

pub use batch::{load_statement, merge_statements};
pub use decoder::{JsonTokenDump, TokenSource};
pub use error::ParseError;
pub use parsers::{Institution, StatementParser};
pub use types::{StatementRecord, StatementSummary, Token, TransactionRecord};
