//! Whole-document and multi-statement helpers.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::debug;

use crate::decoder::{TokenSource, statement_filename};
use crate::lines::reconstruct_document;
use crate::parsers::Institution;
use crate::types::{StatementRecord, TransactionRecord};

/// Decode, reconstruct and parse one statement document.
pub fn load_statement(source: &dyn TokenSource, institution: Institution, path: &Path) -> Result<StatementRecord> {
    let filename = statement_filename(path).with_context(|| format!("no file name in {}", path.display()))?;
    let pages = source.load_pages(path)?;
    let lines = reconstruct_document(&pages);
    debug!(path = %path.display(), lines = lines.len(), "decoded statement");

    let parser = institution.parser()?;
    let record = parser
        .parse(&filename, &lines)
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(record)
}

/// Flatten statements into one list, newest first. Same-day transactions
/// keep their statement order.
pub fn merge_statements(records: impl IntoIterator<Item = StatementRecord>) -> Vec<TransactionRecord> {
    let mut out: Vec<TransactionRecord> = records.into_iter().flat_map(|r| r.transactions).collect();
    // Fees are listed at the bottom of a statement, so input order is only roughly by date.
    out.sort_by(|a, b| b.date.cmp(&a.date));
    out
}
