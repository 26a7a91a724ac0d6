//! Ripple provider
//!
//! secp256k1 keys imported as a 32-byte hex seed used directly as the
//! scalar. Classic addresses are hash160 of the compressed public key
//! under version 0x00, Base58Check-encoded with the Ripple alphabet.
//! Signing hashes the payload with SHA-512 and signs the first half.

use rand::rngs::OsRng;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use sha2::{Digest, Sha512};
use zeroize::Zeroizing;

use crate::chain::Chain;
use crate::encoding::{base58check_with_alphabet, hash160};
use crate::error::{Error, Result};
use crate::provider::{decode_hex_seed, ChainProvider, KeyMaterial};

/// Ripple account address version byte (addresses start with "r")
const ACCOUNT_VERSION: u8 = 0x00;

pub struct XrpProvider;

impl ChainProvider for XrpProvider {
    fn chain(&self) -> Chain {
        Chain::Xrp
    }

    fn import_or_generate(&self, input: Option<&str>) -> Result<KeyMaterial> {
        let secp = Secp256k1::new();
        let secret_key = match input {
            Some(raw) => SecretKey::from_slice(&decode_hex_seed(raw)?)
                .map_err(|_| Error::Validation("invalid private key".to_string()))?,
            None => SecretKey::new(&mut OsRng),
        };
        let public_key = PublicKey::from_secret_key(&secp, &secret_key);
        Ok(KeyMaterial {
            private_key: Zeroizing::new(secret_key.secret_bytes().to_vec()),
            public_key: public_key.serialize().to_vec(),
        })
    }

    fn derive_address(&self, public_key: &[u8]) -> Result<String> {
        let public_key = PublicKey::from_slice(public_key)
            .map_err(|e| Error::Validation(format!("invalid public key: {e}")))?;
        Ok(base58check_with_alphabet(
            ACCOUNT_VERSION,
            &hash160(&public_key.serialize()),
            bs58::Alphabet::RIPPLE,
        ))
    }

    fn sign(&self, private_key: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
        let secp = Secp256k1::new();
        // XRP signs the first half of SHA-512 over the payload
        let digest = Sha512::digest(payload);
        let message = Message::from_digest_slice(&digest[..32])
            .map_err(|e| Error::Crypto(format!("digest rejected: {e}")))?;
        let secret_key = SecretKey::from_slice(private_key)
            .map_err(|e| Error::Crypto(format!("invalid private key bytes: {e}")))?;
        let signature = secp.sign_ecdsa(&message, &secret_key);
        Ok(signature.serialize_der().to_vec())
    }
}
