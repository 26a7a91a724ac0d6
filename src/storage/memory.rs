//! In-memory store backend

use std::collections::BTreeMap;
use std::sync::RwLock;

use crate::error::{Error, Result};
use crate::storage::KeyValueStore;

/// In-memory [`KeyValueStore`] backed by a sorted map.
///
/// Used by the test suite and by embedders that keep the keyring ephemeral.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, path: &str) -> Result<Option<Vec<u8>>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| Error::Storage("store lock poisoned".to_string()))?;
        Ok(entries.get(path).cloned())
    }

    fn put(&self, path: &str, value: &[u8]) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::Storage("store lock poisoned".to_string()))?;
        entries.insert(path.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, path: &str) -> Result<()> {
        let mut entries = self
            .entries
            .write()
            .map_err(|_| Error::Storage("store lock poisoned".to_string()))?;
        entries.remove(path);
        Ok(())
    }

    fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let entries = self
            .entries
            .read()
            .map_err(|_| Error::Storage("store lock poisoned".to_string()))?;
        let mut names: Vec<String> = Vec::new();
        for key in entries.keys().filter(|k| k.starts_with(prefix)) {
            let child = match key[prefix.len()..].split('/').next() {
                Some(name) if !name.is_empty() => name,
                _ => continue,
            };
            if names.last().map(String::as_str) != Some(child) {
                names.push(child.to_string());
            }
        }
        Ok(names)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn put_get_delete() {
        let store = MemoryStore::new();
        assert!(store.get("a/b").unwrap().is_none());

        store.put("a/b", b"one").unwrap();
        assert_eq!(store.get("a/b").unwrap().unwrap(), b"one");

        store.put("a/b", b"two").unwrap();
        assert_eq!(store.get("a/b").unwrap().unwrap(), b"two");

        store.delete("a/b").unwrap();
        assert!(store.get("a/b").unwrap().is_none());
        // deleting again is a no-op
        store.delete("a/b").unwrap();
    }

    #[test]
    fn list_returns_immediate_children() {
        let store = MemoryStore::new();
        store.put("key-managers/btc/svc-a", b"{}").unwrap();
        store.put("key-managers/btc/svc-b", b"{}").unwrap();
        store.put("key-managers/eth/svc-c", b"{}").unwrap();

        let names = store.list("key-managers/btc/").unwrap();
        assert_eq!(names, vec!["svc-a", "svc-b"]);
        assert!(store.list("key-managers/sol/").unwrap().is_empty());
    }
}
