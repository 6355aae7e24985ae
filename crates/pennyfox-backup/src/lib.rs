//! pennyfox-backup
//!
//! Coordinates cloud backup of the local database: login and logout,
//! single-flight uploads with bounded retry, and staged restores.
//! Collaborators (transport, file store, connectivity, settings, notifier,
//! clock) are injected as trait objects.

pub mod coordinator;
pub mod error;
pub mod network;
pub mod notify;
pub mod session;
pub mod store;
pub mod time;
pub mod transport;

pub use coordinator::{BackupCoordinator, BackupJob, BackupMode};
pub use error::BackupError;
pub use network::{AlwaysOnline, Connectivity};
pub use notify::{BackupEvent, BackupNotifier, BroadcastNotifier};
pub use session::BackupSession;
pub use store::{FileStore, MemorySettingsStore, SettingsStore};
pub use time::{Clock, SystemClock};
pub use transport::{BackupTransport, TransportError};

/// Name of the backup blob, both remotely and as the local staging file.
pub const BACKUP_NAME: &str = "pennyfox-backup.db";

/// Name of the active local database file.
pub const DATABASE_NAME: &str = "pennyfox.db";
