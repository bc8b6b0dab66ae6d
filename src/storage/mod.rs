pub mod file;
pub mod memory;

use std::fmt;
use std::io;
use std::sync::Arc;

use log::warn;
use thiserror::Error;

pub use file::FileStore;
pub use memory::MemoryStore;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("invalid storage key {0:?}")]
    InvalidKey(String),

    #[error("storage io error on key '{key}': {source}")]
    Io {
        key: String,
        #[source]
        source: io::Error,
    },

    #[error("storage value of key '{0}' is not valid utf-8")]
    Encoding(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// Raw persistent key-value backend. Implementations report every failure, the
/// [`Storage`] boundary decides what callers get to see.
pub trait KvStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn store(&self, key: &str, value: &str) -> Result<(), StoreError>;
    fn delete(&self, key: &str) -> Result<(), StoreError>;
}

/// Handle over a [`KvStore`] whose `get`/`set`/`remove` never fail: backend errors are
/// logged and reported as absent data or ignored.
#[derive(Clone)]
pub struct Storage {
    backend: Arc<dyn KvStore>,
}

impl Storage {
    pub fn new<S: KvStore + 'static>(backend: S) -> Self {
        Self {
            backend: Arc::new(backend),
        }
    }

    pub fn from_arc(backend: Arc<dyn KvStore>) -> Self {
        Self { backend }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match self.try_get(key) {
            Ok(value) => value,
            Err(err) => {
                warn!("Read storage key '{key}' failed, treat as missing: {err}");
                None
            }
        }
    }

    pub fn set(&self, key: &str, value: &str) {
        if let Err(err) = self.try_set(key, value) {
            warn!("Write storage key '{key}' failed, value is not persisted: {err}");
        }
    }

    pub fn remove(&self, key: &str) {
        if let Err(err) = self.try_remove(key) {
            warn!("Remove storage key '{key}' failed: {err}");
        }
    }

    pub fn try_get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.backend.load(key)
    }

    pub fn try_set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.backend.store(key, value)
    }

    pub fn try_remove(&self, key: &str) -> Result<(), StoreError> {
        self.backend.delete(key)
    }
}

impl fmt::Debug for Storage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Storage").finish_non_exhaustive()
    }
}

/// Keys are used as file names by [`FileStore`], keep them boring everywhere.
pub(crate) fn validate_key(key: &str) -> Result<(), StoreError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if valid {
        Ok(())
    } else {
        Err(StoreError::InvalidKey(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        for key in ["authToken", "user", "selected-venue", "singer_name", "v1.cache"] {
            assert!(validate_key(key).is_ok(), "{key}");
        }
        for key in ["", ".hidden", "../escape", "a/b", "spaced key"] {
            assert!(
                matches!(validate_key(key), Err(StoreError::InvalidKey(_))),
                "{key}"
            );
        }
    }

    #[test]
    fn test_boundary_swallows_failures() {
        let backend = Arc::new(MemoryStore::new());
        let storage = Storage::from_arc(backend.clone());

        storage.set("user", "alice");
        assert_eq!(storage.get("user"), Some(String::from("alice")));

        backend.set_failing(true);
        // Boundary: never fails, failures look like missing data.
        assert_eq!(storage.get("user"), None);
        storage.set("user", "bob");
        storage.remove("user");

        // Internal view still tells "failed" apart from "absent".
        assert!(matches!(
            storage.try_get("user"),
            Err(StoreError::Unavailable(_))
        ));
        assert!(storage.try_set("user", "bob").is_err());
        assert!(storage.try_remove("user").is_err());

        backend.set_failing(false);
        assert_eq!(storage.get("user"), Some(String::from("alice")));
        assert_eq!(storage.try_get("missing").unwrap(), None);
    }

    #[test]
    fn test_invalid_key_is_swallowed() {
        let storage = Storage::new(MemoryStore::new());
        storage.set("../oops", "value");
        assert_eq!(storage.get("../oops"), None);
        assert!(matches!(
            storage.try_set("../oops", "value"),
            Err(StoreError::InvalidKey(_))
        ));
    }
}
