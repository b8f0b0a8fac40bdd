use anyhow::{Context, Result, bail};
use std::path::{Path, PathBuf};
use tally_ingest::Institution;

/// Directory holding `config.toml`. `TALLY_HOME` overrides `~/.tally`.
pub fn tally_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("TALLY_HOME") {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var_os("HOME").context("neither TALLY_HOME nor HOME is set")?;
    Ok(PathBuf::from(home).join(".tally"))
}

/// The finances folder tree:
///
/// ```text
/// <root>/statements/<source>/*.tokens.json
/// <root>/output/<output_file>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinancesFolder {
    root: PathBuf,
}

impl FinancesFolder {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        if root.as_os_str().is_empty() {
            bail!("finances folder path is empty");
        }
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn statements_root(&self) -> PathBuf {
        self.root.join("statements")
    }

    /// Where token dumps for one institution live.
    pub fn statements_dir(&self, institution: Institution) -> PathBuf {
        self.statements_root().join(institution.source())
    }

    pub fn output_path(&self, output_file: &str) -> PathBuf {
        self.root.join("output").join(output_file)
    }
}
