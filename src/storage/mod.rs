//! Abstract key-value storage contract
//!
//! The core persists one self-describing JSON record per (chain, service)
//! key manager. The backing store is an external collaborator consumed
//! through this narrow trait; [`MemoryStore`] ships for tests and
//! embedding. No transactional guarantees beyond what the store provides.

use crate::error::Result;

mod memory;

pub use memory::MemoryStore;

/// Narrow Get/Put/Delete/List contract over the persistent store.
///
/// Paths are `/`-separated; `list` returns the immediate child names under
/// a prefix (order not guaranteed sorted).
pub trait KeyValueStore: Send + Sync {
    fn get(&self, path: &str) -> Result<Option<Vec<u8>>>;

    /// Full overwrite of the record at `path`.
    fn put(&self, path: &str, value: &[u8]) -> Result<()>;

    /// Deleting a missing record is not an error.
    fn delete(&self, path: &str) -> Result<()>;

    fn list(&self, prefix: &str) -> Result<Vec<String>>;
}
