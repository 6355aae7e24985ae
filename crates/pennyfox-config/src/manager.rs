use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};

use crate::{AppConfig, BackupSettings, ConfigError};

const TMP_SUFFIX: &str = "tmp";

/// Handles persistence for [`AppConfig`] and [`BackupSettings`].
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_path: PathBuf,
    settings_path: PathBuf,
}

impl ConfigManager {
    pub fn new(config_path: PathBuf, settings_path: PathBuf) -> Self {
        Self {
            config_path,
            settings_path,
        }
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self, ConfigError> {
        let config_dir = base.join("config");
        fs::create_dir_all(&config_dir)?;
        Ok(Self::new(
            config_dir.join("config.json"),
            config_dir.join("settings.json"),
        ))
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn settings_path(&self) -> &Path {
        &self.settings_path
    }

    pub fn load(&self) -> Result<AppConfig, ConfigError> {
        read_json_or_default(&self.config_path)
    }

    pub fn save(&self, config: &AppConfig) -> Result<(), ConfigError> {
        write_json(&self.config_path, config)
    }

    pub fn load_settings(&self) -> Result<BackupSettings, ConfigError> {
        read_json_or_default(&self.settings_path)
    }

    pub fn save_settings(&self, settings: &BackupSettings) -> Result<(), ConfigError> {
        write_json(&self.settings_path, settings)
    }
}

fn read_json_or_default<T>(path: &Path) -> Result<T, ConfigError>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return Ok(T::default());
    }
    let data = fs::read_to_string(path)?;
    serde_json::from_str(&data).map_err(|err| ConfigError::Serde(err.to_string()))
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ConfigError> {
    let json =
        serde_json::to_string_pretty(value).map_err(|err| ConfigError::Serde(err.to_string()))?;
    let tmp = tmp_path(path);
    write_atomic(&tmp, &json)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    Ok(())
}
