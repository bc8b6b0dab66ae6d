use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use file_lock::{FileLock, FileOptions};

use crate::dirs::ensure_dir_exists;

use super::{validate_key, KvStore, StoreError};

/// Stores every key as its own file under one directory. Access is guarded with
/// advisory file locks, so concurrent processes never read a half written value.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        ensure_dir_exists(&dir).context("ensure storage directory")?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path(&self, key: &str) -> Result<PathBuf, StoreError> {
        validate_key(key)?;
        Ok(self.dir.join(key))
    }
}

fn io_error(key: &str, source: io::Error) -> StoreError {
    StoreError::Io {
        key: key.to_string(),
        source,
    }
}

impl KvStore for FileStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path(key)?;
        let lock_opts = FileOptions::new().read(true);
        let mut lock = match FileLock::lock(&path, true, lock_opts) {
            Ok(lock) => lock,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(io_error(key, err)),
        };

        let mut data = Vec::new();
        lock.file
            .read_to_end(&mut data)
            .map_err(|err| io_error(key, err))?;
        match String::from_utf8(data) {
            Ok(value) => Ok(Some(value)),
            Err(_) => Err(StoreError::Encoding(key.to_string())),
        }
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path(key)?;
        // Truncate only once the lock is held, a reader must never see an empty value.
        let lock_opts = FileOptions::new().write(true).create(true);
        let mut lock = FileLock::lock(&path, true, lock_opts).map_err(|err| io_error(key, err))?;
        lock.file.set_len(0).map_err(|err| io_error(key, err))?;
        lock.file
            .write_all(value.as_bytes())
            .map_err(|err| io_error(key, err))?;
        lock.file.flush().map_err(|err| io_error(key, err))?;
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        let path = self.path(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(io_error(key, err)),
        }
    }
}
