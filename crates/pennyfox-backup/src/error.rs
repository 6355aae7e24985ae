use std::io;

use pennyfox_config::ConfigError;
use thiserror::Error;

use crate::TransportError;

#[derive(Debug, Error)]
pub enum BackupError {
    #[error("No network connection available")]
    NetworkUnavailable,
    #[error("Backup authentication failed: {0}")]
    BackupAuthFailed(String),
    #[error("No backup found")]
    NoBackupFound,
    #[error("Backup corrupted: {0}")]
    BackupCorrupted(String),
    #[error("Another backup upload is still running")]
    BackupBusy,
    #[error("Backup upload cancelled after {attempts} attempts")]
    RetriesExhausted { attempts: u32 },
    #[error("Backup operation cancelled")]
    Cancelled,
    #[error("Backup coordinator shut down")]
    ShutDown,
    #[error("Backup service error: {0}")]
    Service(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Settings error: {0}")]
    Settings(#[from] ConfigError),
}

impl BackupError {
    pub fn is_auth_failure(&self) -> bool {
        matches!(self, BackupError::BackupAuthFailed(_))
    }
}

impl From<TransportError> for BackupError {
    fn from(err: TransportError) -> Self {
        match err {
            TransportError::Authentication(message) => BackupError::BackupAuthFailed(message),
            TransportError::Cancelled => BackupError::Cancelled,
            TransportError::Service(message) => BackupError::Service(message),
        }
    }
}
