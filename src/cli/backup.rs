use std::{path::PathBuf, sync::Arc};

use clap::{Args, Subcommand, ValueEnum};
use pennyfox_backup::{
    AlwaysOnline, BackupCoordinator, BackupMode, BackupSession, BroadcastNotifier,
};
use pennyfox_config::{AppConfig, ConfigManager};
use pennyfox_storage_fs::{FolderTransport, FsFileStore};
use tracing::debug;

use super::output::Formatter;
use crate::errors::Result;

#[derive(Debug, Args)]
pub struct BackupArgs {
    /// Directory holding the active database.
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Folder acting as the remote backup store.
    #[arg(long, global = true)]
    pub remote_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub action: BackupAction,
}

#[derive(Debug, Subcommand)]
pub enum BackupAction {
    /// Show session flags and the state of the remote backup.
    Status,
    /// Sign in to the backup folder and enable automatic uploads.
    Login,
    /// Sign out and disable automatic uploads.
    Logout,
    /// Upload the active database.
    Upload {
        /// Behave like a background upload: skipped when autoupload is off.
        #[arg(long)]
        automatic: bool,
    },
    /// Replace the active database with the remote backup.
    Restore,
    /// Turn automatic uploads on or off.
    Autoupload {
        #[arg(value_enum)]
        state: Toggle,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Toggle {
    On,
    Off,
}

pub(super) async fn run(
    home: Option<PathBuf>,
    args: BackupArgs,
    formatter: &Formatter,
) -> Result<()> {
    let home = home.unwrap_or_else(|| AppConfig::default().resolve_data_dir());
    let manager = Arc::new(ConfigManager::with_base_dir(home.clone())?);
    let config = manager.load()?;
    let data_dir = args
        .data_dir
        .or_else(|| config.data_dir.clone())
        .unwrap_or(home);
    let remote_dir = args
        .remote_dir
        .unwrap_or_else(|| config.resolve_remote_dir());
    debug!(data = %data_dir.display(), remote = %remote_dir.display(), "Backup locations");

    let session = BackupSession::load(manager)?;
    let coordinator = BackupCoordinator::new(
        Arc::new(FolderTransport::new(remote_dir.clone())),
        Arc::new(FsFileStore::new(data_dir)?),
        Arc::new(AlwaysOnline),
        Arc::new(BroadcastNotifier::default()),
        session,
        config.backup,
    );

    match args.action {
        BackupAction::Status => {
            let session = coordinator.session();
            let backup_date = coordinator.backup_date().await?;
            formatter.print_header("Backup");
            formatter.print_two_column(&[
                ("Logged in", yes_no(session.is_logged_in())),
                ("Autoupload", yes_no(session.is_autoupload_enabled())),
                (
                    "Last update",
                    session
                        .last_update()
                        .map(|at| at.to_rfc3339())
                        .unwrap_or_else(|| "never".to_string()),
                ),
                ("Remote folder", remote_dir.display().to_string()),
                (
                    "Remote backup",
                    backup_date
                        .map(|at| at.to_rfc3339())
                        .unwrap_or_else(|| "none".to_string()),
                ),
            ]);
        }
        BackupAction::Login => {
            coordinator.login().await?;
            formatter.print_success("Logged in, autoupload enabled");
        }
        BackupAction::Logout => {
            coordinator.logout().await?;
            formatter.print_success("Logged out");
        }
        BackupAction::Upload { automatic } => {
            let mode = if automatic {
                BackupMode::Automatic
            } else {
                BackupMode::Manual
            };
            if mode == BackupMode::Automatic && !coordinator.session().is_autoupload_enabled() {
                formatter.print_warning("Autoupload is off, nothing uploaded");
                return Ok(());
            }
            coordinator.upload(mode).await?;
            formatter.print_success("Backup uploaded");
        }
        BackupAction::Restore => {
            coordinator.restore().await?;
            formatter.print_success("Database restored from backup");
        }
        BackupAction::Autoupload { state } => {
            coordinator.session().set_autoupload(state == Toggle::On)?;
            formatter.print_success(format!(
                "Autoupload {}",
                if state == Toggle::On { "enabled" } else { "disabled" }
            ));
        }
    }
    coordinator.shutdown();
    Ok(())
}

fn yes_no(flag: bool) -> String {
    if flag { "yes" } else { "no" }.to_string()
}
