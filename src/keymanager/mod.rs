//! Key-manager aggregates and their lifecycle
//!
//! A [`KeyManager`] is the persisted aggregate of all key pairs for one
//! (chain, service) pair: an ordered, append-oriented list. It is created
//! implicitly on first key creation and removed as soon as its last key
//! pair is deleted; an empty record is never persisted.

use serde::{Deserialize, Serialize};

mod lifecycle;
mod repository;
mod signing;

pub use lifecycle::KeyringService;
pub use repository::KeyManagerRepository;

/// Arbitrary caller-attached metadata on a key pair
pub type ExternalData = serde_json::Map<String, serde_json::Value>;

/// One private/public key plus its derived address and optional metadata.
///
/// Key bytes are persisted hex-encoded; the address is a pure function of
/// the public key under the owning chain's encoding rules.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPair {
    pub private_key: String,
    pub public_key: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_data: Option<ExternalData>,
    #[serde(
        default,
        rename = "is_lock_external_data",
        skip_serializing_if = "is_false"
    )]
    pub external_data_locked: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// Persisted aggregate of all key pairs for one (chain, service)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyManager {
    pub service_name: String,
    pub key_pairs: Vec<KeyPair>,
}

impl KeyManager {
    pub fn new(service_name: &str) -> Self {
        Self {
            service_name: service_name.to_string(),
            key_pairs: Vec::new(),
        }
    }
}

/// Success payload of a key-pair creation
#[derive(Debug, Clone, Serialize)]
pub struct CreatedKeyPair {
    pub service_name: String,
    pub address: String,
    pub public_key: String,
}

/// Projection of one key pair for read operations; never carries the
/// private key.
#[derive(Debug, Clone, Serialize)]
pub struct AddressEntry {
    pub address: String,
    pub public_key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_data: Option<ExternalData>,
}
