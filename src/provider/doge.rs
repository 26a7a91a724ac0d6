//! Dogecoin provider
//!
//! secp256k1 keys, WIF or raw-hex import, P2PKH addresses under the
//! Dogecoin version byte, plain DER-encoded ECDSA signatures.

use rand::rngs::OsRng;
use secp256k1::{Message, PublicKey, Secp256k1, SecretKey};
use zeroize::Zeroizing;

use crate::chain::Chain;
use crate::encoding::{base58check, hash160};
use crate::error::{Error, Result};
use crate::provider::{decode_wif_or_raw_hex, ChainProvider, KeyMaterial};

/// Dogecoin P2PKH version byte (addresses start with "D")
const P2PKH_VERSION: u8 = 0x1E;

pub struct DogeProvider;

impl ChainProvider for DogeProvider {
    fn chain(&self) -> Chain {
        Chain::Doge
    }

    fn import_or_generate(&self, input: Option<&str>) -> Result<KeyMaterial> {
        let secp = Secp256k1::new();
        let secret_key = match input {
            Some(raw) => decode_wif_or_raw_hex(raw)?,
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
        Ok(base58check(P2PKH_VERSION, &hash160(&public_key.serialize())))
    }

    fn sign(&self, private_key: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
        let secp = Secp256k1::new();
        let message = Message::from_digest_slice(payload)
            .map_err(|_| Error::Validation("hash must be exactly 32 bytes".to_string()))?;
        let secret_key = SecretKey::from_slice(private_key)
            .map_err(|e| Error::Crypto(format!("invalid private key bytes: {e}")))?;
        let signature = secp.sign_ecdsa(&message, &secret_key);
        Ok(signature.serialize_der().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIF: &str = "KzQJ9vR4JeoJicejXmdvjcoDmZHa665diNxt17o3KRw3Hvix5CA5";

    #[test]
    fn wif_import_derives_known_address() {
        let key = DogeProvider.import_or_generate(Some(WIF)).unwrap();
        let address = DogeProvider.derive_address(&key.public_key).unwrap();
        assert_eq!(address, "D9CJPqih9zaKTTgpY1msoQRBUjDbEXNvtJ");
    }

    #[test]
    fn malformed_key_is_rejected() {
        let err = DogeProvider.import_or_generate(Some("123")).unwrap_err();
        assert!(err.to_string().contains("invalid private key"));
    }

    #[test]
    fn random_key_produces_doge_address() {
        let a = DogeProvider.import_or_generate(None).unwrap();
        let b = DogeProvider.import_or_generate(None).unwrap();
        let addr = DogeProvider.derive_address(&a.public_key).unwrap();
        assert!(addr.starts_with('D'));
        assert_ne!(addr, DogeProvider.derive_address(&b.public_key).unwrap());
    }

    #[test]
    fn der_signature_verifies() {
        let key = DogeProvider.import_or_generate(None).unwrap();
        let hash = [9u8; 32];
        let der = DogeProvider.sign(&key.private_key, &hash).unwrap();

        let secp = Secp256k1::new();
        let message = Message::from_digest_slice(&hash).unwrap();
        let signature = secp256k1::ecdsa::Signature::from_der(&der).unwrap();
        let public_key = PublicKey::from_slice(&key.public_key).unwrap();
        secp.verify_ecdsa(&message, &signature, &public_key).unwrap();
    }
}
