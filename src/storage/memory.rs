use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use super::{validate_key, KvStore, StoreError};

/// In-process store. Nothing survives the process, which makes it handy for
/// throwaway sessions and tests. `set_failing` simulates a broken backend.
#[derive(Debug, Default)]
pub struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.values.lock().map(|values| values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(&self, key: &str) -> Result<(), StoreError> {
        validate_key(key)?;
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(String::from(
                "memory store is in failing mode",
            )));
        }
        Ok(())
    }

    fn with_values<T>(
        &self,
        f: impl FnOnce(&mut HashMap<String, String>) -> T,
    ) -> Result<T, StoreError> {
        let mut values = self
            .values
            .lock()
            .map_err(|_| StoreError::Unavailable(String::from("memory store lock poisoned")))?;
        Ok(f(&mut values))
    }
}

impl KvStore for MemoryStore {
    fn load(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.check(key)?;
        self.with_values(|values| values.get(key).cloned())
    }

    fn store(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.check(key)?;
        self.with_values(|values| {
            values.insert(key.to_string(), value.to_string());
        })
    }

    fn delete(&self, key: &str) -> Result<(), StoreError> {
        self.check(key)?;
        self.with_values(|values| {
            values.remove(key);
        })
    }
}
