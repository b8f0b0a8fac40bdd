use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tally_ingest::Institution;

use crate::state::{FinancesFolder, tally_home};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Root holding `statements/<source>/` and `output/`.
    pub finances_folder: Option<PathBuf>,
    /// Default tracing filter when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Institutions processed by `tally ingest` when none are given.
    #[serde(default = "default_institutions")]
    pub institutions: Vec<Institution>,
    /// File name written under `<finances_folder>/output/`.
    #[serde(default = "default_output_file")]
    pub output_file: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_institutions() -> Vec<Institution> {
    Institution::ALL.to_vec()
}

fn default_output_file() -> String {
    "transactions.csv".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            finances_folder: None,
            log_level: default_log_level(),
            institutions: default_institutions(),
            output_file: default_output_file(),
        }
    }
}

/// What one `tally ingest` run reads and writes, after command-line
/// overrides are applied on top of the config file.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestSettings {
    pub folder: FinancesFolder,
    pub institutions: Vec<Institution>,
    pub out: PathBuf,
}

impl Config {
    pub fn validate(&self) -> Result<()> {
        let name = self.output_file.as_str();
        if Path::new(name).file_name().and_then(|n| n.to_str()) != Some(name) {
            bail!("output_file must be a plain file name, got {name:?}");
        }
        if self.institutions.is_empty() {
            bail!("institutions is empty; list at least one of {}", source_labels());
        }
        Ok(())
    }

    pub fn ingest_settings(
        &self,
        folder: Option<PathBuf>,
        institutions: Vec<Institution>,
        out: Option<PathBuf>,
    ) -> Result<IngestSettings> {
        let Some(root) = folder.or_else(|| self.finances_folder.clone()) else {
            bail!("no finances folder (pass --folder or set finances_folder in config)");
        };
        let folder = FinancesFolder::new(root)?;

        let mut institutions = if institutions.is_empty() {
            self.institutions.clone()
        } else {
            institutions
        };
        // `--institution x --institution x` would parse every statement twice.
        let mut seen = Vec::with_capacity(institutions.len());
        institutions.retain(|i| {
            let fresh = !seen.contains(i);
            seen.push(*i);
            fresh
        });

        let out = out.unwrap_or_else(|| folder.output_path(&self.output_file));
        Ok(IngestSettings {
            folder,
            institutions,
            out,
        })
    }
}

fn source_labels() -> String {
    Institution::ALL.iter().map(|i| i.source()).collect::<Vec<_>>().join(", ")
}

pub fn config_path() -> Result<PathBuf> {
    Ok(tally_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

/// A missing file yields the defaults.
pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    parse_config(&s).with_context(|| format!("parse {}", p.display()))
}

pub fn parse_config(s: &str) -> Result<Config> {
    let cfg: Config = toml::from_str(s)?;
    cfg.validate()?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config, p: &Path) -> Result<()> {
    if let Some(dir) = p.parent() {
        fs::create_dir_all(dir).with_context(|| format!("create {}", dir.display()))?;
    }
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(p, s).with_context(|| format!("write {}", p.display()))
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default(), &p)?;
    println!("Wrote {}", p.display());
    Ok(())
}
