use std::{io, sync::Mutex};

use pennyfox_config::{BackupSettings, ConfigError, ConfigManager};

/// Local file access for the database and the staged backup blob.
pub trait FileStore: Send + Sync {
    fn write(&self, name: &str, bytes: &[u8]) -> io::Result<()>;

    fn open_read(&self, name: &str) -> io::Result<Vec<u8>>;

    /// Moves `source` over `destination`, replacing it. Returns `false` when
    /// the move did not happen.
    fn move_replacing(&self, source: &str, destination: &str) -> bool;

    fn remove(&self, name: &str) -> io::Result<()>;
}

/// Persistence for the backup session flags.
pub trait SettingsStore: Send + Sync {
    fn load(&self) -> Result<BackupSettings, ConfigError>;
    fn save(&self, settings: &BackupSettings) -> Result<(), ConfigError>;
}

impl SettingsStore for ConfigManager {
    fn load(&self) -> Result<BackupSettings, ConfigError> {
        self.load_settings()
    }

    fn save(&self, settings: &BackupSettings) -> Result<(), ConfigError> {
        self.save_settings(settings)
    }
}

/// Keeps settings in memory only; nothing survives the process.
#[derive(Debug, Default)]
pub struct MemorySettingsStore {
    settings: Mutex<BackupSettings>,
}

impl MemorySettingsStore {
    pub fn new(settings: BackupSettings) -> Self {
        Self {
            settings: Mutex::new(settings),
        }
    }
}

impl SettingsStore for MemorySettingsStore {
    fn load(&self) -> Result<BackupSettings, ConfigError> {
        Ok(self
            .settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone())
    }

    fn save(&self, settings: &BackupSettings) -> Result<(), ConfigError> {
        *self
            .settings
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = settings.clone();
        Ok(())
    }
}
