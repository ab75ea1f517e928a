use std::{
    collections::HashMap,
    sync::{Mutex, MutexGuard},
};

use anyhow::anyhow;

use crate::storage::{KeyValueStore, error::StorageError};

/// Process-local store, handy for tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>, StorageError> {
        self.records
            .lock()
            .map_err(|e| StorageError::Internal(anyhow!("memory store poisoned: {e}")))
    }

    pub fn len(&self) -> Result<usize, StorageError> {
        Ok(self.records()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StorageError> {
        Ok(self.len()? == 0)
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.records()?.get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.records()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn set_replaces_value() -> anyhow::Result<()> {
        let store = MemoryStore::new();
        assert!(store.is_empty()?);

        store.set("k", b"one")?;
        store.set("k", b"two")?;

        assert_eq!(store.get("k")?, Some(b"two".to_vec()));
        assert_eq!(store.get("missing")?, None);
        assert_eq!(store.len()?, 1);
        Ok(())
    }

    #[test]
    fn poisoned_lock_is_an_error_not_empty() {
        let store = Arc::new(MemoryStore::new());
        let poisoner = Arc::clone(&store);
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.records.lock().unwrap();
            panic!("poison the store");
        })
        .join();

        assert!(matches!(store.len(), Err(StorageError::Internal(_))));
        assert!(matches!(store.is_empty(), Err(StorageError::Internal(_))));
        assert!(matches!(store.get("k"), Err(StorageError::Internal(_))));
    }
}
