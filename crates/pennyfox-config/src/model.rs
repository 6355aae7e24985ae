use std::{path::PathBuf, time::Duration};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stores user-configurable locations and backup tuning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    /// Directory holding the active database. Defaults to the platform data dir.
    pub data_dir: Option<PathBuf>,

    #[serde(skip_serializing_if = "Option::is_none")]
    /// Folder used as the remote backup store, typically a synced cloud folder.
    pub remote_dir: Option<PathBuf>,

    #[serde(default)]
    pub backup: BackupOptions,
}

impl AppConfig {
    pub fn resolve_data_dir(&self) -> PathBuf {
        if let Some(path) = &self.data_dir {
            return path.clone();
        }

        let base = dirs::data_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("PennyFox")
    }

    pub fn resolve_remote_dir(&self) -> PathBuf {
        if let Some(path) = &self.remote_dir {
            return path.clone();
        }

        let base = dirs::document_dir()
            .or_else(dirs::home_dir)
            .unwrap_or_else(|| PathBuf::from("."));

        base.join("PennyFox Backups")
    }
}

/// Timing knobs for the upload path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupOptions {
    #[serde(default = "BackupOptions::default_lock_timeout_ms")]
    pub lock_timeout_ms: u64,
    #[serde(default = "BackupOptions::default_retry_delay_ms")]
    pub retry_delay_ms: u64,
    #[serde(default = "BackupOptions::default_max_retries")]
    pub max_retries: u32,
}

impl Default for BackupOptions {
    fn default() -> Self {
        Self {
            lock_timeout_ms: Self::default_lock_timeout_ms(),
            retry_delay_ms: Self::default_retry_delay_ms(),
            max_retries: Self::default_max_retries(),
        }
    }
}

impl BackupOptions {
    pub fn default_lock_timeout_ms() -> u64 {
        10_000
    }

    pub fn default_retry_delay_ms() -> u64 {
        2_000
    }

    pub fn default_max_retries() -> u32 {
        5
    }

    /// How long an upload waits for the single-flight guard.
    pub fn lock_timeout(&self) -> Duration {
        Duration::from_millis(self.lock_timeout_ms)
    }

    /// Pause before retrying a cancelled upload.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Flags persisted between runs that describe the backup session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackupSettings {
    #[serde(default)]
    pub is_logged_in: bool,
    #[serde(default)]
    pub is_autoupload_enabled: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_backup_fields_fall_back_to_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{"backup":{"max_retries":2}}"#).unwrap();
        assert_eq!(config.backup.max_retries, 2);
        assert_eq!(config.backup.lock_timeout(), Duration::from_secs(10));
        assert_eq!(config.backup.retry_delay(), Duration::from_secs(2));
    }

    #[test]
    fn explicit_dirs_override_platform_defaults() {
        let config = AppConfig {
            data_dir: Some(PathBuf::from("/tmp/pf-data")),
            remote_dir: Some(PathBuf::from("/tmp/pf-remote")),
            ..AppConfig::default()
        };
        assert_eq!(config.resolve_data_dir(), PathBuf::from("/tmp/pf-data"));
        assert_eq!(config.resolve_remote_dir(), PathBuf::from("/tmp/pf-remote"));
    }
}
