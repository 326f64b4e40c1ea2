use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Result, anyhow};
use tracing::debug;

use super::KeyValueStore;

#[derive(Debug, Default)]
struct Entries {
    values: HashMap<String, (u64, String)>,
    writes: u64,
}

/// In-process key-value store.
///
/// Clones share the same entries, so a caller can keep a handle for
/// inspection after passing one to a [`CartStore`](crate::CartStore).
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: Arc<Mutex<Entries>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Entries>> {
        self.entries
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|e| e.values.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.lock()?;
        Ok(entries.values.get(key).map(|(_, value)| value.clone()))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.lock()?;
        entries.writes += 1;
        let seq = entries.writes;
        entries
            .values
            .insert(key.to_string(), (seq, value.to_string()));
        debug!(key, "stored value in memory");
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.lock()?;
        if entries.values.remove(key).is_some() {
            debug!(key, "deleted value from memory");
        }
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        let entries = self.lock()?;
        let mut keys: Vec<(u64, String)> = entries
            .values
            .iter()
            .map(|(key, (seq, _))| (*seq, key.clone()))
            .collect();
        keys.sort_by(|a, b| b.0.cmp(&a.0));
        Ok(keys.into_iter().map(|(_, key)| key).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_entries() {
        let store = MemoryStore::new();
        let handle = store.clone();

        store.set("cart_u1", "[]").unwrap();
        assert_eq!(handle.get("cart_u1").unwrap().as_deref(), Some("[]"));

        handle.delete("cart_u1").unwrap();
        assert!(store.get("cart_u1").unwrap().is_none());
    }

    #[test]
    fn test_delete_missing_key_is_ok() {
        let store = MemoryStore::new();
        assert!(store.delete("nope").is_ok());
    }

    #[test]
    fn test_keys_most_recent_first() {
        let store = MemoryStore::new();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        store.set("a", "3").unwrap();
        assert_eq!(store.keys().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }
}
