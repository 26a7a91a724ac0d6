//! Signing dispatcher
//!
//! Resolves a (chain, service, address) triple to the stored private key
//! and signs through the chain's provider. Decoded key bytes live in a
//! [`Zeroizing`] buffer so they are wiped on every exit path.

use tracing::info;
use zeroize::{Zeroize, Zeroizing};

use crate::chain::Chain;
use crate::error::{Error, Result};

use super::{KeyPair, KeyringService};

impl KeyringService {
    /// Signs a hex-encoded payload with the key stored under the address
    /// and returns the hex-encoded signature. Hash-based chains require
    /// the payload to decode to exactly 32 bytes.
    pub fn sign(
        &self,
        chain: Chain,
        service_name: &str,
        address: &str,
        hash_hex: &str,
    ) -> Result<String> {
        let payload = hex::decode(hash_hex.trim().trim_start_matches("0x"))
            .map_err(|_| Error::Validation("hash must be hex encoded".to_string()))?;

        let mut pair = self.key_pair_by_address(chain, service_name, address)?;
        let decoded = hex::decode(&pair.private_key);
        pair.private_key.zeroize();
        let private_key = Zeroizing::new(decoded.map_err(|_| {
            Error::InvalidState(format!(
                "stored private key for address {address} is not hex"
            ))
        })?);

        let signature = self.registry().provider(chain).sign(&private_key, &payload)?;
        info!(%chain, service = %service_name, %address, "signed payload");
        Ok(hex::encode(signature))
    }

    /// Linear scan of the service's key pairs for an exact address match.
    /// Crate-internal: the returned pair carries the stored private key.
    pub(crate) fn key_pair_by_address(
        &self,
        chain: Chain,
        service_name: &str,
        address: &str,
    ) -> Result<KeyPair> {
        let manager = self
            .repository()
            .get(chain, service_name)?
            .filter(|m| !m.key_pairs.is_empty())
            .ok_or_else(|| {
                Error::NotFound(format!("no key manager for {chain}/{service_name}"))
            })?;

        let pair = manager
            .key_pairs
            .into_iter()
            .find(|pair| pair.address == address)
            .ok_or_else(|| {
                Error::NotFound(format!(
                    "no key pair with address {address} under {chain}/{service_name}"
                ))
            })?;

        if pair.private_key.is_empty() {
            return Err(Error::InvalidState(format!(
                "key pair for address {address} has no private key"
            )));
        }
        Ok(pair)
    }
}
