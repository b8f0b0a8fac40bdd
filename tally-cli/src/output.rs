//! Delimited-text output for merged transactions.

use anyhow::{Context, Result};
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::Path;
use tally_ingest::TransactionRecord;

pub const DATE_FORMAT: &str = "%Y/%m/%d";

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Name")]
    name: &'a str,
    #[serde(rename = "Amount")]
    amount: String,
    #[serde(rename = "Source")]
    source: &'a str,
}

impl<'a> From<&'a TransactionRecord> for CsvRow<'a> {
    fn from(t: &'a TransactionRecord) -> Self {
        Self {
            date: t.date.format(DATE_FORMAT).to_string(),
            name: &t.name,
            amount: t.amount.to_string(),
            source: &t.source,
        }
    }
}

fn write_rows<W: Write>(w: W, transactions: &[TransactionRecord]) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(w);
    for t in transactions {
        wtr.serialize(CsvRow::from(t))?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_csv(path: &Path, transactions: &[TransactionRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    let file = fs::File::create(path).with_context(|| format!("create {}", path.display()))?;
    write_rows(file, transactions).with_context(|| format!("write {}", path.display()))
}
