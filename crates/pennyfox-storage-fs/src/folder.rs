use std::{
    io,
    path::{Path, PathBuf},
};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pennyfox_backup::{BackupTransport, TransportError, BACKUP_NAME};
use tokio::{fs, io::AsyncWriteExt};
use tracing::{debug, info};

use crate::{files::tmp_path, is_staging_file, validate_name};

/// Remote backup store backed by a directory, such as a synced cloud folder
/// or a mounted network share.
#[derive(Debug, Clone)]
pub struct FolderTransport {
    root: PathBuf,
}

impl FolderTransport {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn blob_path(&self, name: &str) -> Result<PathBuf, TransportError> {
        validate_name(name).map_err(|err| TransportError::Service(err.to_string()))?;
        Ok(self.root.join(name))
    }
}

#[async_trait]
impl BackupTransport for FolderTransport {
    async fn login(&self) -> Result<(), TransportError> {
        fs::create_dir_all(&self.root)
            .await
            .map_err(|err| access_denied(&self.root, err))?;
        let metadata = fs::metadata(&self.root)
            .await
            .map_err(|err| access_denied(&self.root, err))?;
        if !metadata.is_dir() || metadata.permissions().readonly() {
            return Err(TransportError::Authentication(format!(
                "backup folder `{}` is not writable",
                self.root.display()
            )));
        }
        info!(folder = %self.root.display(), "Backup folder ready");
        Ok(())
    }

    async fn logout(&self) -> Result<(), TransportError> {
        debug!(folder = %self.root.display(), "Released backup folder");
        Ok(())
    }

    async fn list_file_names(&self) -> Result<Vec<String>, TransportError> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(err) => return Err(io_error(err)),
        };
        let mut names = Vec::new();
        while let Some(entry) = entries.next_entry().await.map_err(io_error)? {
            let is_file = entry
                .file_type()
                .await
                .map(|kind| kind.is_file())
                .unwrap_or(false);
            if !is_file {
                continue;
            }
            if let Some(name) = entry.file_name().to_str() {
                if !is_staging_file(name) {
                    names.push(name.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    async fn backup_timestamp(&self) -> Result<DateTime<Utc>, TransportError> {
        let path = self.blob_path(BACKUP_NAME)?;
        let modified = fs::metadata(&path)
            .await
            .and_then(|meta| meta.modified())
            .map_err(io_error)?;
        Ok(DateTime::<Utc>::from(modified))
    }

    async fn download(&self, name: &str) -> Result<Vec<u8>, TransportError> {
        let path = self.blob_path(name)?;
        fs::read(&path).await.map_err(io_error)
    }

    async fn upload(&self, snapshot: Vec<u8>) -> Result<bool, TransportError> {
        let path = self.blob_path(BACKUP_NAME)?;
        let tmp = tmp_path(&path);
        let mut file = fs::File::create(&tmp).await.map_err(io_error)?;
        file.write_all(&snapshot).await.map_err(io_error)?;
        file.sync_all().await.map_err(io_error)?;
        drop(file);
        fs::rename(&tmp, &path).await.map_err(io_error)?;
        debug!(bytes = snapshot.len(), path = %path.display(), "Backup blob written");
        Ok(true)
    }
}

fn access_denied(root: &Path, err: io::Error) -> TransportError {
    TransportError::Authentication(format!(
        "backup folder `{}` is not accessible: {err}",
        root.display()
    ))
}

fn io_error(err: io::Error) -> TransportError {
    match err.kind() {
        io::ErrorKind::PermissionDenied => TransportError::Authentication(err.to_string()),
        io::ErrorKind::Interrupted => TransportError::Cancelled,
        _ => TransportError::Service(err.to_string()),
    }
}
