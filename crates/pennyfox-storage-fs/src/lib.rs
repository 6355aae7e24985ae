//! pennyfox-storage-fs
//!
//! Filesystem collaborators for the backup coordinator: the local database
//! directory and a folder-backed remote store.

mod files;
mod folder;

pub use files::FsFileStore;
pub use folder::FolderTransport;

use std::{io, path::Path};

const TMP_SUFFIX: &str = "tmp";

/// Rejects names that would escape the store's root directory.
fn validate_name(name: &str) -> io::Result<()> {
    let escapes = name.is_empty()
        || name.contains(['/', '\\'])
        || name == "."
        || name == ".."
        || Path::new(name).is_absolute();
    if escapes {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid file name `{name}`"),
        ))
    } else {
        Ok(())
    }
}

fn is_staging_file(name: &str) -> bool {
    name.ends_with(&format!(".{TMP_SUFFIX}"))
}
