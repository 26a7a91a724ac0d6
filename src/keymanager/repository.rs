//! Persistence of [`KeyManager`] records over an abstract key-value store

use std::sync::Arc;

use tracing::debug;

use crate::chain::Chain;
use crate::error::{Error, Result};
use crate::storage::KeyValueStore;

use super::KeyManager;

const RECORD_ROOT: &str = "key-managers";

/// Serializes key-manager aggregates to JSON under
/// `key-managers/{chain}/{service}`.
pub struct KeyManagerRepository {
    store: Arc<dyn KeyValueStore>,
}

impl KeyManagerRepository {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn record_path(chain: Chain, service_name: &str) -> String {
        format!("{RECORD_ROOT}/{chain}/{service_name}")
    }

    fn chain_prefix(chain: Chain) -> String {
        format!("{RECORD_ROOT}/{chain}/")
    }

    pub fn get(&self, chain: Chain, service_name: &str) -> Result<Option<KeyManager>> {
        let path = Self::record_path(chain, service_name);
        let Some(raw) = self.store.get(&path)? else {
            return Ok(None);
        };
        let manager = serde_json::from_slice(&raw)
            .map_err(|e| Error::Serialization(format!("corrupt key manager record: {e}")))?;
        Ok(Some(manager))
    }

    pub fn put(&self, chain: Chain, manager: &KeyManager) -> Result<()> {
        let path = Self::record_path(chain, &manager.service_name);
        let raw = serde_json::to_vec(manager)
            .map_err(|e| Error::Serialization(format!("encode key manager record: {e}")))?;
        debug!(%chain, service = %manager.service_name, keys = manager.key_pairs.len(), "persisting key manager");
        self.store.put(&path, &raw)
    }

    pub fn delete(&self, chain: Chain, service_name: &str) -> Result<()> {
        let path = Self::record_path(chain, service_name);
        debug!(%chain, service = %service_name, "deleting key manager");
        self.store.delete(&path)
    }

    /// Service names with a record under the chain, in store order.
    pub fn list(&self, chain: Chain) -> Result<Vec<String>> {
        self.store.list(&Self::chain_prefix(chain))
    }
}
