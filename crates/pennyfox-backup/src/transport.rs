use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("authentication rejected: {0}")]
    Authentication(String),
    #[error("transfer cancelled")]
    Cancelled,
    #[error("service error: {0}")]
    Service(String),
}

/// Remote store holding the backup blob.
#[async_trait]
pub trait BackupTransport: Send + Sync {
    async fn login(&self) -> Result<(), TransportError>;

    async fn logout(&self) -> Result<(), TransportError>;

    /// Names of the files currently held by the remote store.
    async fn list_file_names(&self) -> Result<Vec<String>, TransportError>;

    /// When the remote backup blob was last written.
    async fn backup_timestamp(&self) -> Result<DateTime<Utc>, TransportError>;

    async fn download(&self, name: &str) -> Result<Vec<u8>, TransportError>;

    /// Uploads a database snapshot as the backup blob. `Ok(false)` means the
    /// transfer was cancelled by the remote side.
    async fn upload(&self, snapshot: Vec<u8>) -> Result<bool, TransportError>;
}
