//! `tally ingest`: parse every statement under the finances folder and write
//! one merged transaction list.

use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tally_ingest::decoder::TOKEN_DUMP_SUFFIX;
use tally_ingest::{Institution, JsonTokenDump, StatementRecord, load_statement, merge_statements};
use tokio::task::JoinSet;
use tracing::{info, warn};
use walkdir::WalkDir;

use crate::output::write_csv;
use crate::state::FinancesFolder;

/// Token dumps below `dir`, sorted by path so batches are reproducible.
/// An unreadable entry fails discovery rather than shrinking the batch.
pub fn discover_statements(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir) {
        let entry = entry.with_context(|| format!("walking {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_dump = entry
            .file_name()
            .to_str()
            .is_some_and(|s| s.ends_with(TOKEN_DUMP_SUFFIX));
        if is_dump {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Parse all statements on the blocking pool. The first failure cancels the
/// rest; records come back in job order.
pub async fn parse_all(jobs: Vec<(Institution, PathBuf)>) -> Result<Vec<StatementRecord>> {
    let mut set = JoinSet::new();
    let job_count = jobs.len();

    for (idx, (institution, path)) in jobs.into_iter().enumerate() {
        set.spawn_blocking(move || (idx, load_statement(&JsonTokenDump, institution, &path)));
    }

    let mut records: Vec<Option<StatementRecord>> = vec![None; job_count];
    while let Some(joined) = set.join_next().await {
        let (idx, result) = joined.context("statement parse task failed")?;
        match result {
            Ok(record) => records[idx] = Some(record),
            Err(e) => {
                set.abort_all();
                return Err(e);
            }
        }
    }

    Ok(records.into_iter().flatten().collect())
}

pub async fn run_ingest(folder: &FinancesFolder, institutions: &[Institution], out: &Path) -> Result<()> {
    info!(folder = %folder.root().display(), institutions = institutions.len(), "ingesting");
    let mut jobs = Vec::new();
    for &institution in institutions {
        let dir = folder.statements_dir(institution);
        if !dir.is_dir() {
            warn!(institution = %institution, dir = %dir.display(), "no statements directory");
            continue;
        }
        let files = discover_statements(&dir)?;
        info!(institution = %institution, count = files.len(), "found statements");
        jobs.extend(files.into_iter().map(|p| (institution, p)));
    }

    if jobs.is_empty() {
        bail!(
            "no statement token dumps (*{}) found under {}",
            TOKEN_DUMP_SUFFIX,
            folder.statements_root().display()
        );
    }

    let statement_count = jobs.len();
    // Any failed statement aborts before anything is written.
    let records = parse_all(jobs).await?;
    let transactions = merge_statements(records);

    write_csv(out, &transactions)?;
    info!(
        "Wrote {} containing {} transactions from {} statements",
        out.display(),
        transactions.len(),
        statement_count
    );
    println!("Wrote {} transactions to {}", transactions.len(), out.display());
    Ok(())
}
