#![doc(test(attr(deny(warnings))))]

//! PennyFox core: recurring payment scheduling and cloud backup of the
//! local database, plus the `pennyfox_cli` front end.

pub mod cli;
pub mod errors;
pub mod utils;

pub use pennyfox_backup as backup;
pub use pennyfox_config as config;
pub use pennyfox_domain as domain;
pub use pennyfox_storage_fs as storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup debug log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::debug!("PennyFox tracing initialized.");
    });
}
