//! One JSON file per key in a data directory.
//!
//! Writes go to a temp file in the same directory and are renamed into place,
//! so a crash mid-write never leaves a truncated value behind. On Unix the
//! files are created with mode 0600.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use dermascan_core::storage_keys;

use crate::error::StorageError;
use crate::store::{KeyValueStore, check_quota};

const TMP_SUFFIX: &str = ".tmp";

#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    quota: Option<u64>,
    closed: bool,
}

impl FileStore {
    /// Open (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>, quota: Option<u64>) -> Result<Self, StorageError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        info!(dir = %dir.display(), quota, "opened file store");
        Ok(Self {
            dir,
            quota,
            closed: false,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StorageError> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'));
        if !valid {
            return Err(StorageError::InvalidKey(key.to_string()));
        }
        Ok(self.dir.join(storage_keys::file_name(key)))
    }

    /// Bytes held by every value file except `exclude`.
    fn used_bytes_excluding(&self, exclude: &Path) -> Result<u64, StorageError> {
        let mut total = 0;
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            let path = entry.path();
            if path == exclude || path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            total += entry.metadata()?.len();
        }
        Ok(total)
    }

    fn ensure_open(&self) -> Result<(), StorageError> {
        if self.closed {
            Err(StorageError::Closed)
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.ensure_open()?;
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.ensure_open()?;
        let path = self.path_for(key)?;
        if self.quota.is_some() {
            let others = self.used_bytes_excluding(&path)?;
            check_quota(self.quota, others, value.len() as u64)?;
        }

        let mut tmp_name = path.as_os_str().to_owned();
        tmp_name.push(TMP_SUFFIX);
        let tmp_path = PathBuf::from(tmp_name);
        fs::write(&tmp_path, value)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&tmp_path, fs::Permissions::from_mode(0o600))?;
        }

        fs::rename(&tmp_path, &path)?;
        debug!(key, bytes = value.len(), "stored value");
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StorageError> {
        self.ensure_open()?;
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    fn close(&mut self) -> Result<(), StorageError> {
        self.closed = true;
        Ok(())
    }
}
