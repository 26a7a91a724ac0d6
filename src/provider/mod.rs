//! Chain providers and the provider registry
//!
//! A [`ChainProvider`] is a pure, stateless bundle of key decoding/
//! generation, address derivation and signing for one chain. Providers are
//! selected through the [`ProviderRegistry`], which is populated once at
//! startup and read-only afterwards.

use std::collections::HashMap;
use std::sync::Arc;

use secp256k1::SecretKey;
use zeroize::Zeroizing;

use crate::chain::Chain;
use crate::error::{Error, Result};

pub mod btc;
pub mod doge;
pub mod eth;
pub mod sol;
pub mod ton;
pub mod trx;
pub mod xrp;

/// Freshly imported or generated key material.
///
/// Private-key bytes are wiped when the value is dropped; callers hex-encode
/// them into the persisted record before that happens.
pub struct KeyMaterial {
    pub private_key: Zeroizing<Vec<u8>>,
    pub public_key: Vec<u8>,
}

// Manual impl so key bytes never reach logs or assertion output.
impl std::fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("private_key", &"<redacted>")
            .field("public_key", &hex::encode(&self.public_key))
            .finish()
    }
}

/// Chain-specific algorithm bundle: key decode/generate, address
/// derivation, signing.
pub trait ChainProvider: Send + Sync {
    fn chain(&self) -> Chain;

    /// Decode the supplied private-key material, or generate a fresh
    /// random key appropriate to the chain's curve when `input` is `None`.
    ///
    /// Accepted import forms are chain-specific and tried in a fixed
    /// priority order; anything else fails with
    /// `validation error: invalid private key`.
    fn import_or_generate(&self, input: Option<&str>) -> Result<KeyMaterial>;

    /// Pure, deterministic projection of a public key onto the chain's
    /// address encoding.
    fn derive_address(&self, public_key: &[u8]) -> Result<String>;

    /// Sign a payload hash with the chain's signature scheme.
    ///
    /// Chains that sign a digest directly require exactly 32 bytes;
    /// Ed25519 chains and XRP accept arbitrary payloads.
    fn sign(&self, private_key: &[u8], payload: &[u8]) -> Result<Vec<u8>>;
}

/// Maps a chain identifier to its provider.
///
/// Registered once at startup; safe for unsynchronized concurrent reads
/// thereafter.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: HashMap<Chain, Arc<dyn ChainProvider>>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with all seven built-in providers.
    pub fn with_default_providers() -> Self {
        let mut registry = Self::new();
        registry.register(Arc::new(btc::BtcProvider));
        registry.register(Arc::new(doge::DogeProvider));
        registry.register(Arc::new(eth::EthProvider));
        registry.register(Arc::new(trx::TrxProvider));
        registry.register(Arc::new(sol::SolProvider));
        registry.register(Arc::new(ton::TonProvider));
        registry.register(Arc::new(xrp::XrpProvider));
        registry
    }

    /// Idempotent: the first provider registered for a chain wins.
    pub fn register(&mut self, provider: Arc<dyn ChainProvider>) {
        self.providers.entry(provider.chain()).or_insert(provider);
    }

    /// Resolve the provider for `chain`.
    ///
    /// Panics when the chain was never registered: that is a wiring bug in
    /// the host process, not a recoverable user error.
    pub fn provider(&self, chain: Chain) -> Arc<dyn ChainProvider> {
        self.providers
            .get(&chain)
            .cloned()
            .unwrap_or_else(|| panic!("no provider registered for chain {chain}"))
    }

    pub fn get(&self, chain: Chain) -> Option<Arc<dyn ChainProvider>> {
        self.providers.get(&chain).cloned()
    }

    pub fn contains(&self, chain: Chain) -> bool {
        self.providers.contains_key(&chain)
    }

    /// Registered chain identifiers, for the routing layer.
    pub fn chains(&self) -> impl Iterator<Item = Chain> + '_ {
        self.providers.keys().copied()
    }
}

/// WIF first, else raw 32-byte hex with optional `0x` prefix.
///
/// The WIF version byte is not checked against any particular network, so
/// foreign-network WIFs import the same scalar they would on mainnet.
pub(crate) fn decode_wif_or_raw_hex(input: &str) -> Result<SecretKey> {
    if let Ok(raw) = bs58::decode(input).with_check(None).into_vec() {
        // version byte + 32 key bytes + optional compressed-pubkey flag
        if raw.len() == 33 || (raw.len() == 34 && raw[33] == 0x01) {
            if let Ok(key) = SecretKey::from_slice(&raw[1..33]) {
                return Ok(key);
            }
        }
    }
    let hex_str = input.strip_prefix("0x").unwrap_or(input);
    if let Ok(bytes) = hex::decode(hex_str) {
        if bytes.len() == 32 {
            if let Ok(key) = SecretKey::from_slice(&bytes) {
                return Ok(key);
            }
        }
    }
    Err(Error::Validation("invalid private key".to_string()))
}

/// Match the trailing 64 hex characters of the input, ignoring whatever
/// precedes them. Legacy behavior inherited from the ETH/TRX import rule.
pub(crate) fn decode_trailing_hex_key(input: &str) -> Result<SecretKey> {
    if !input.is_ascii() || input.len() < 64 {
        return Err(Error::Validation("invalid private key".to_string()));
    }
    let tail = &input[input.len() - 64..];
    if !tail.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::Validation("invalid private key".to_string()));
    }
    let bytes = hex::decode(tail)
        .map_err(|_| Error::Validation("invalid private key".to_string()))?;
    SecretKey::from_slice(&bytes)
        .map_err(|_| Error::Validation("invalid private key".to_string()))
}

/// Exactly 32 hex-encoded bytes, optional `0x` prefix.
pub(crate) fn decode_hex_seed(input: &str) -> Result<[u8; 32]> {
    let hex_str = input.strip_prefix("0x").unwrap_or(input);
    let bytes = hex::decode(hex_str)
        .map_err(|_| Error::Validation("invalid private key".to_string()))?;
    bytes
        .try_into()
        .map_err(|_| Error::Validation("invalid private key".to_string()))
}
