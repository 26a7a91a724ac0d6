//! Solana provider
//!
//! Ed25519 keys. Imports accept a 32-byte hex seed or a 64-byte Base58
//! secret (seed followed by the public key); the address is the Base58
//! public key itself, no hashing.

use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroizing;

use crate::chain::Chain;
use crate::error::{Error, Result};
use crate::provider::{ChainProvider, KeyMaterial};

pub struct SolProvider;

impl ChainProvider for SolProvider {
    fn chain(&self) -> Chain {
        Chain::Sol
    }

    fn import_or_generate(&self, input: Option<&str>) -> Result<KeyMaterial> {
        let seed: Zeroizing<[u8; 32]> = match input {
            Some(raw) => Zeroizing::new(decode_seed(raw)?),
            None => {
                let mut seed = Zeroizing::new([0u8; 32]);
                OsRng.fill_bytes(seed.as_mut());
                seed
            }
        };
        let signing_key = SigningKey::from_bytes(&seed);
        Ok(KeyMaterial {
            private_key: Zeroizing::new(seed.to_vec()),
            public_key: signing_key.verifying_key().to_bytes().to_vec(),
        })
    }

    fn derive_address(&self, public_key: &[u8]) -> Result<String> {
        if public_key.len() != 32 {
            return Err(Error::Validation(
                "public key must be 32 bytes".to_string(),
            ));
        }
        Ok(bs58::encode(public_key).into_string())
    }

    fn sign(&self, private_key: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
        let signing_key = signing_key_from_seed(private_key)?;
        Ok(signing_key.sign(payload).to_bytes().to_vec())
    }
}

/// 32-byte hex seed first, else a 64-byte Base58 secret whose embedded
/// public key must match the one derived from the seed half.
fn decode_seed(input: &str) -> Result<[u8; 32]> {
    let hex_str = input.strip_prefix("0x").unwrap_or(input);
    if let Ok(bytes) = hex::decode(hex_str) {
        if let Ok(seed) = <[u8; 32]>::try_from(bytes) {
            return Ok(seed);
        }
    }
    if let Ok(secret) = bs58::decode(input).into_vec() {
        if secret.len() == 64 {
            let mut seed = [0u8; 32];
            seed.copy_from_slice(&secret[..32]);
            let derived = SigningKey::from_bytes(&seed).verifying_key();
            if derived.as_bytes()[..] == secret[32..] {
                return Ok(seed);
            }
        }
    }
    Err(Error::Validation("invalid private key".to_string()))
}

pub(crate) fn signing_key_from_seed(private_key: &[u8]) -> Result<SigningKey> {
    let seed: [u8; 32] = private_key
        .try_into()
        .map_err(|_| Error::Crypto("private key must be a 32-byte seed".to_string()))?;
    Ok(SigningKey::from_bytes(&seed))
}
