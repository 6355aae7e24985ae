//! pennyfox-config
//!
//! Application configuration and persisted backup settings.
//! Owns the data structures plus disk persistence helpers.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::ConfigManager;
pub use model::{AppConfig, BackupOptions, BackupSettings};
