use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use pennyfox_config::{BackupSettings, ConfigError};

use crate::{MemorySettingsStore, SettingsStore};

/// Owned backup session state, written through to a [`SettingsStore`] on
/// every change.
pub struct BackupSession {
    store: Arc<dyn SettingsStore>,
    state: Mutex<BackupSettings>,
}

impl BackupSession {
    /// Restores the session from previously persisted settings.
    pub fn load(store: Arc<dyn SettingsStore>) -> Result<Self, ConfigError> {
        let state = store.load()?;
        Ok(Self {
            store,
            state: Mutex::new(state),
        })
    }

    pub fn in_memory(settings: BackupSettings) -> Self {
        Self {
            store: Arc::new(MemorySettingsStore::new(settings.clone())),
            state: Mutex::new(settings),
        }
    }

    pub fn snapshot(&self) -> BackupSettings {
        self.lock().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.lock().is_logged_in
    }

    pub fn is_autoupload_enabled(&self) -> bool {
        self.lock().is_autoupload_enabled
    }

    pub fn last_update(&self) -> Option<DateTime<Utc>> {
        self.lock().last_update
    }

    /// User-facing toggle for automatic uploads.
    pub fn set_autoupload(&self, enabled: bool) -> Result<(), ConfigError> {
        self.update(|state| state.is_autoupload_enabled = enabled)
    }

    pub(crate) fn mark_logged_in(&self) -> Result<(), ConfigError> {
        self.update(|state| {
            state.is_logged_in = true;
            state.is_autoupload_enabled = true;
        })
    }

    pub(crate) fn mark_logged_out(&self) -> Result<(), ConfigError> {
        self.update(|state| {
            state.is_logged_in = false;
            state.is_autoupload_enabled = false;
        })
    }

    pub(crate) fn touch(&self, at: DateTime<Utc>) -> Result<(), ConfigError> {
        self.update(|state| state.last_update = Some(at))
    }

    /// Clears the login flags in memory even when persisting them fails.
    pub(crate) fn force_logged_out(&self) {
        if let Err(err) = self.mark_logged_out() {
            tracing::error!(error = %err, "Failed to persist forced logout");
        }
    }

    /// Rejected credentials clear the login flag only; autoupload is kept.
    pub(crate) fn reject_login(&self) {
        if let Err(err) = self.update(|state| state.is_logged_in = false) {
            tracing::error!(error = %err, "Failed to persist rejected login");
        }
    }

    /// Saves while the lock is held so persisted state follows memory order.
    fn update(&self, apply: impl FnOnce(&mut BackupSettings)) -> Result<(), ConfigError> {
        let mut state = self.lock();
        apply(&mut state);
        self.store.save(&state)
    }

    fn lock(&self) -> MutexGuard<'_, BackupSettings> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
