//! Ethereum provider
//!
//! secp256k1 keys; imports match the trailing 64 hex characters of the
//! input (legacy matcher, see DESIGN.md). Addresses are the EIP-55
//! checksummed Keccak-256 account hash, signatures recoverable ECDSA
//! in r||s||v form.

use rand::rngs::OsRng;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use zeroize::Zeroizing;

use crate::chain::Chain;
use crate::encoding::{keccak256, to_eip55};
use crate::error::{Error, Result};
use crate::provider::{decode_trailing_hex_key, ChainProvider, KeyMaterial};

pub struct EthProvider;

impl ChainProvider for EthProvider {
    fn chain(&self) -> Chain {
        Chain::Eth
    }

    fn import_or_generate(&self, input: Option<&str>) -> Result<KeyMaterial> {
        let secp = Secp256k1::new();
        let secret_key = match input {
            Some(raw) => decode_trailing_hex_key(raw)?,
            None => SecretKey::new(&mut OsRng),
        };
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Ok(KeyMaterial {
            private_key: Zeroizing::new(secret_key.secret_bytes().to_vec()),
            public_key: public_key.serialize_uncompressed().to_vec(),
        })
    }

    fn derive_address(&self, public_key: &[u8]) -> Result<String> {
        account_hash(public_key).map(|hash| to_eip55(&hash))
    }

    fn sign(&self, private_key: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
        sign_recoverable(private_key, payload)
    }
}

/// Keccak-256 of the uncompressed public key (without the 0x04 prefix),
/// keeping the low 20 bytes. Shared with the Tron provider.
pub(crate) fn account_hash(public_key: &[u8]) -> Result<[u8; 20]> {
    if public_key.len() != 65 || public_key[0] != 0x04 {
        return Err(Error::Validation(
            "public key must be 65 bytes uncompressed".to_string(),
        ));
    }
    let digest = keccak256(&public_key[1..]);
    let mut hash = [0u8; 20];
    hash.copy_from_slice(&digest[12..]);
    Ok(hash)
}

/// Recoverable ECDSA over a 32-byte digest: 64 compact bytes plus the
/// recovery id (0 or 1) as the trailing byte.
pub(crate) fn sign_recoverable(private_key: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
    let secp = Secp256k1::new();
    let message = Message::from_digest_slice(payload)
        .map_err(|_| Error::Validation("hash must be exactly 32 bytes".to_string()))?;
    let secret_key = SecretKey::from_slice(private_key)
        .map_err(|e| Error::Crypto(format!("invalid private key bytes: {e}")))?;
    let signature = secp.sign_ecdsa_recoverable(&message, &secret_key);
    let (recovery_id, compact) = signature.serialize_compact();
    let mut out = Vec::with_capacity(65);
    out.extend_from_slice(&compact);
    out.push(recovery_id.to_i32() as u8);
    Ok(out)
}
