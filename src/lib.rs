//! Multi-chain custodial key management core
//!
//! This library provides the signing core of a custodial key service: it
//! generates or imports private keys, derives chain-specific public
//! addresses, signs payload hashes with the chain-appropriate signature
//! scheme, and maintains per-service collections of key pairs (with
//! optional attached metadata and a lock flag) for Bitcoin, Dogecoin,
//! Ethereum, Tron, Solana, TON and Ripple.
//!
//! Persistence goes through the narrow [`storage::KeyValueStore`] contract;
//! routing, transport and process bootstrapping live outside this crate.

pub mod chain;
pub mod encoding;
pub mod error;
pub mod keymanager;
pub mod provider;
pub mod storage;

// Re-export commonly used types for convenience
pub use chain::Chain;
pub use error::{Error, Result};
pub use keymanager::{KeyManager, KeyPair, KeyringService};
pub use provider::{ChainProvider, ProviderRegistry};
pub use storage::{KeyValueStore, MemoryStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
