//! Orchestrates login, logout, upload and restore against the remote store.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use pennyfox_config::BackupOptions;
use tokio::{
    sync::Semaphore,
    time::{sleep, timeout},
};
use tracing::{debug, error, info, warn};

use crate::{
    BackupError, BackupNotifier, BackupSession, BackupTransport, Clock, Connectivity, FileStore,
    SystemClock, BACKUP_NAME, DATABASE_NAME,
};

type Result<T> = std::result::Result<T, BackupError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackupMode {
    /// Triggered by a data change; skipped when autoupload is off.
    #[default]
    Automatic,
    /// Requested explicitly by the user.
    Manual,
}

/// A single upload request and the number of retries it has consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackupJob {
    pub mode: BackupMode,
    pub attempt: u32,
}

impl BackupJob {
    pub fn new(mode: BackupMode) -> Self {
        Self { mode, attempt: 0 }
    }
}

pub struct BackupCoordinator {
    transport: Arc<dyn BackupTransport>,
    files: Arc<dyn FileStore>,
    connectivity: Arc<dyn Connectivity>,
    notifier: Arc<dyn BackupNotifier>,
    clock: Arc<dyn Clock>,
    session: BackupSession,
    options: BackupOptions,
    upload_guard: Semaphore,
}

impl BackupCoordinator {
    pub fn new(
        transport: Arc<dyn BackupTransport>,
        files: Arc<dyn FileStore>,
        connectivity: Arc<dyn Connectivity>,
        notifier: Arc<dyn BackupNotifier>,
        session: BackupSession,
        options: BackupOptions,
    ) -> Self {
        Self {
            transport,
            files,
            connectivity,
            notifier,
            clock: Arc::new(SystemClock),
            session,
            options,
            upload_guard: Semaphore::new(1),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn session(&self) -> &BackupSession {
        &self.session
    }

    pub fn options(&self) -> &BackupOptions {
        &self.options
    }

    /// Signs in to the remote store and enables automatic uploads.
    pub async fn login(&self) -> Result<()> {
        self.ensure_connected()?;
        match self.transport.login().await {
            Ok(()) => {
                self.session.mark_logged_in()?;
                info!("Logged in to backup service");
                Ok(())
            }
            Err(err) => {
                let err = BackupError::from(err);
                error!(error = %err, "Login failed");
                if err.is_auth_failure() {
                    self.session.reject_login();
                }
                Err(err)
            }
        }
    }

    pub async fn logout(&self) -> Result<()> {
        self.ensure_connected()?;
        match self.transport.logout().await {
            Ok(()) => {
                self.session.mark_logged_out()?;
                info!("Logged out of backup service");
                Ok(())
            }
            Err(err) => {
                let err = BackupError::from(err);
                error!(error = %err, "Logout failed");
                if err.is_auth_failure() {
                    self.session.force_logged_out();
                }
                Err(err)
            }
        }
    }

    /// Whether the remote store holds any files. Offline yields `false`.
    pub async fn is_backup_available(&self) -> Result<bool> {
        if !self.connectivity.is_connected() {
            return Ok(false);
        }
        match self.transport.list_file_names().await {
            Ok(names) => Ok(!names.is_empty()),
            Err(err) => Err(self.fail(err.into(), "Listing backups failed").await),
        }
    }

    /// When the remote backup was written. Offline, or without a backup
    /// blob among the remote files, yields `None`.
    pub async fn backup_date(&self) -> Result<Option<DateTime<Utc>>> {
        if !self.connectivity.is_connected() {
            return Ok(None);
        }
        match self.read_backup_date().await {
            Ok(date) => Ok(date),
            Err(err) => Err(self.fail(err, "Reading backup date failed").await),
        }
    }

    /// Downloads the backup blob and replaces the active database with it.
    pub async fn restore(&self) -> Result<()> {
        self.ensure_connected()?;
        if let Err(err) = self.download_backup().await {
            return Err(self.fail(err, "Download backup failed").await);
        }
        self.session.touch(self.clock.now())?;
        self.notifier.backup_restored();
        info!("Backup restored");
        Ok(())
    }

    /// Uploads the active database, logging in first when needed.
    pub async fn upload(&self, mode: BackupMode) -> Result<()> {
        if mode == BackupMode::Automatic && !self.session.is_autoupload_enabled() {
            debug!("Autoupload disabled, skipping automatic backup");
            return Ok(());
        }
        if !self.session.is_logged_in() {
            self.login().await?;
        }

        let mut job = BackupJob::new(mode);
        self.run_upload(&mut job).await?;
        self.session.touch(self.clock.now())?;
        info!(?mode, retries = job.attempt, "Backup uploaded");
        Ok(())
    }

    /// Closes the upload guard; waiting and future uploads fail with
    /// [`BackupError::ShutDown`].
    pub fn shutdown(&self) {
        self.upload_guard.close();
    }

    async fn read_backup_date(&self) -> Result<Option<DateTime<Utc>>> {
        let names = self.transport.list_file_names().await?;
        if !names.iter().any(|name| name == BACKUP_NAME) {
            return Ok(None);
        }
        Ok(Some(self.transport.backup_timestamp().await?))
    }

    async fn download_backup(&self) -> Result<()> {
        let names = self.transport.list_file_names().await?;
        if !names.iter().any(|name| name == BACKUP_NAME) {
            return Err(BackupError::NoBackupFound);
        }

        let blob = self.transport.download(BACKUP_NAME).await?;
        self.files.write(BACKUP_NAME, &blob).map_err(|err| {
            BackupError::BackupCorrupted(format!("staging downloaded backup failed: {err}"))
        })?;

        if !self.files.move_replacing(BACKUP_NAME, DATABASE_NAME) {
            if let Err(err) = self.files.remove(BACKUP_NAME) {
                warn!(error = %err, "Removing staged backup failed");
            }
            return Err(BackupError::BackupCorrupted(
                "moving downloaded backup file failed".into(),
            ));
        }
        Ok(())
    }

    async fn run_upload(&self, job: &mut BackupJob) -> Result<()> {
        loop {
            self.ensure_connected()?;
            match self.upload_once().await {
                Ok(()) => return Ok(()),
                Err(BackupError::Cancelled) if job.attempt < self.options.max_retries => {
                    job.attempt += 1;
                    warn!(
                        attempt = job.attempt,
                        max_retries = self.options.max_retries,
                        "Backup upload cancelled, retrying"
                    );
                    sleep(self.options.retry_delay()).await;
                }
                Err(BackupError::Cancelled) => {
                    let err = BackupError::RetriesExhausted {
                        attempts: job.attempt + 1,
                    };
                    error!(error = %err, "Enqueue backup failed");
                    return Err(err);
                }
                Err(err) => return Err(self.fail(err, "Enqueue backup failed").await),
            }
        }
    }

    /// One guarded transport call. The permit is released when this returns.
    async fn upload_once(&self) -> Result<()> {
        let _permit = match timeout(self.options.lock_timeout(), self.upload_guard.acquire()).await
        {
            Ok(Ok(permit)) => permit,
            Ok(Err(_)) => return Err(BackupError::ShutDown),
            Err(_) => return Err(BackupError::BackupBusy),
        };

        let snapshot = self.files.open_read(DATABASE_NAME)?;
        match self.transport.upload(snapshot).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(BackupError::Cancelled),
            Err(err) => Err(err.into()),
        }
    }

    /// Logs `err` and, for rejected credentials, signs out before handing it back.
    async fn fail(&self, err: BackupError, context: &'static str) -> BackupError {
        error!(error = %err, "{context}");
        if err.is_auth_failure() {
            self.force_logout().await;
        }
        err
    }

    async fn force_logout(&self) {
        warn!("Backup credentials rejected, signing out");
        if self.connectivity.is_connected() {
            if let Err(err) = self.transport.logout().await {
                debug!(error = %err, "Remote logout after rejected credentials failed");
            }
        }
        self.session.force_logged_out();
    }

    fn ensure_connected(&self) -> Result<()> {
        if self.connectivity.is_connected() {
            Ok(())
        } else {
            Err(BackupError::NetworkUnavailable)
        }
    }
}
