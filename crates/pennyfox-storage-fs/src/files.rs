use std::{
    fs::{self, File},
    io::{self, Write},
    path::{Path, PathBuf},
};

use pennyfox_backup::FileStore;
use tracing::error;

use crate::{validate_name, TMP_SUFFIX};

/// Local directory holding the active database and staged backups.
#[derive(Debug, Clone)]
pub struct FsFileStore {
    root: PathBuf,
}

impl FsFileStore {
    pub fn new(root: PathBuf) -> io::Result<Self> {
        fs::create_dir_all(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn path_of(&self, name: &str) -> io::Result<PathBuf> {
        validate_name(name)?;
        Ok(self.root.join(name))
    }
}

impl FileStore for FsFileStore {
    fn write(&self, name: &str, bytes: &[u8]) -> io::Result<()> {
        let path = self.path_of(name)?;
        let tmp = tmp_path(&path);
        write_atomic(&tmp, bytes)?;
        fs::rename(&tmp, &path)
    }

    fn open_read(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.path_of(name)?)
    }

    fn remove(&self, name: &str) -> io::Result<()> {
        fs::remove_file(self.path_of(name)?)
    }

    fn move_replacing(&self, source: &str, destination: &str) -> bool {
        let paths = self
            .path_of(source)
            .and_then(|src| Ok((src, self.path_of(destination)?)));
        let (src, dst) = match paths {
            Ok(paths) => paths,
            Err(err) => {
                error!(error = %err, source, destination, "Rejected file move");
                return false;
            }
        };
        match fs::rename(&src, &dst) {
            Ok(()) => true,
            Err(err) => {
                error!(error = %err, source, destination, "Moving file failed");
                false
            }
        }
    }
}

pub(crate) fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &[u8]) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()?;
    Ok(())
}
