use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tally_ingest::lines::reconstruct_document;
use tally_ingest::{Institution, JsonTokenDump, TokenSource, load_statement};
use tracing_subscriber::EnvFilter;

mod config;
mod ingest_cmd;
mod output;
mod state;

use config::{Config, init_config, load_config};

#[derive(Parser, Debug)]
#[command(
    name = "tally",
    version,
    about = "Extract transactions from bank and card statements"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse every statement under the finances folder and write one merged CSV
    Ingest {
        /// Finances folder (defaults to `finances_folder` from config)
        #[arg(long)]
        folder: Option<PathBuf>,

        /// Institution(s) to ingest (default: from config)
        #[arg(long = "institution")]
        institutions: Vec<Institution>,

        /// Output CSV path (default: <folder>/output/<output_file>)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Parse a single statement token dump and print its transactions
    Parse {
        /// Token dump, named `<statement file name>.tokens.json`
        dump: PathBuf,

        #[arg(long)]
        institution: Institution,

        /// Print the statement record as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the reconstructed lines of a token dump
    Lines { dump: PathBuf },

    /// Manage ~/.tally/config.toml
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ConfigCommand {
    /// Write a default config if none exists
    Init,
    /// Print the effective config
    Show,
}

fn init_logging(cfg: &Config) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cfg.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = load_config()?;
    init_logging(&cfg);

    match cli.command {
        Command::Ingest {
            folder,
            institutions,
            out,
        } => {
            let settings = cfg.ingest_settings(folder, institutions, out)?;
            ingest_cmd::run_ingest(&settings.folder, &settings.institutions, &settings.out).await?;
        }

        Command::Parse {
            dump,
            institution,
            json,
        } => {
            let record = load_statement(&JsonTokenDump, institution, &dump)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&record)?);
            } else {
                for t in &record.transactions {
                    println!(
                        "{} | {:>10} | {}",
                        t.date.format(output::DATE_FORMAT),
                        t.amount,
                        t.name
                    );
                }
                if let Some(summary) = record.summary() {
                    println!(
                        "\n{} transactions for statement period {} (${:.2} from {} to {})",
                        summary.transaction_count,
                        record.statement_period.format(output::DATE_FORMAT),
                        summary.total,
                        summary.oldest.format(output::DATE_FORMAT),
                        summary.newest.format(output::DATE_FORMAT),
                    );
                }
            }
        }

        Command::Lines { dump } => {
            let pages = JsonTokenDump
                .load_pages(&dump)
                .with_context(|| format!("loading {}", dump.display()))?;
            for line in reconstruct_document(&pages) {
                println!("{line}");
            }
        }

        Command::Config { command } => match command {
            ConfigCommand::Init => init_config()?,
            ConfigCommand::Show => {
                println!("# {}", config::config_path()?.display());
                println!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
            }
        },
    }

    Ok(())
}
