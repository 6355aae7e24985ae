//! Command-line front end: recurrence checks and backup management.

mod backup;
mod due;
pub mod output;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::errors::{AppError, Result};
use crate::utils::build_info;
use output::Formatter;

pub use backup::{BackupAction, BackupArgs};
pub use due::DueArgs;

#[derive(Debug, Parser)]
#[command(
    name = "pennyfox_cli",
    version,
    about = "Recurring payment checks and database backups"
)]
pub struct Cli {
    /// Directory holding `config/config.json` and `config/settings.json`.
    #[arg(long, global = true, env = "PENNYFOX_HOME")]
    pub home: Option<PathBuf>,

    /// Print without colors or icons.
    #[arg(long, global = true)]
    pub plain: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check whether a recurring payment is due.
    Due(DueArgs),
    /// Manage the backup of the local database.
    Backup(BackupArgs),
    /// Show build metadata.
    Version,
}

/// Parses process arguments and runs the selected command.
pub async fn run_cli() -> Result<()> {
    run(Cli::parse()).await
}

pub async fn run(cli: Cli) -> Result<()> {
    let formatter = Formatter::new(cli.plain);
    match cli.command {
        Command::Due(args) => due::run(&args, &formatter),
        Command::Backup(args) => backup::run(cli.home, args, &formatter).await,
        Command::Version => {
            let meta = build_info::current();
            formatter.print_header(format!("PennyFox {}", meta.version));
            formatter.print_two_column(&meta.rows());
            Ok(())
        }
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d")
        .map_err(|_| AppError::InvalidInput(format!("`{value}` is not a YYYY-MM-DD date")))
}
