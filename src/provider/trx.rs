//! Tron provider
//!
//! Shares the Ethereum key and signature rules; addresses put the Tron
//! version byte 0x41 in front of the Keccak-256 account hash and encode
//! with Base58Check.

use rand::rngs::OsRng;
use secp256k1::{PublicKey, Secp256k1, SecretKey};
use zeroize::Zeroizing;

use crate::chain::Chain;
use crate::encoding::base58check;
use crate::error::Result;
use crate::provider::eth::{account_hash, sign_recoverable};
use crate::provider::{decode_trailing_hex_key, ChainProvider, KeyMaterial};

/// Tron mainnet address version byte (addresses start with "T")
const ADDRESS_VERSION: u8 = 0x41;

pub struct TrxProvider;

impl ChainProvider for TrxProvider {
    fn chain(&self) -> Chain {
        Chain::Trx
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
        account_hash(public_key).map(|hash| base58check(ADDRESS_VERSION, &hash))
    }

    fn sign(&self, private_key: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
        sign_recoverable(private_key, payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str = "4c0883a69102937a9280f1222f7c9b6645e1a3c7bf2e5b4cd0bd58d7f9f5d9b7";

    #[test]
    fn import_derives_known_address() {
        let key = TrxProvider.import_or_generate(Some(KEY)).unwrap();
        let address = TrxProvider.derive_address(&key.public_key).unwrap();
        assert_eq!(address, "TPAYG9ifQaU2T8zNtVqzyzgzKrvawPCwpd");
    }

    #[test]
    fn random_key_produces_tron_address() {
        let key = TrxProvider.import_or_generate(None).unwrap();
        let address = TrxProvider.derive_address(&key.public_key).unwrap();
        assert!(address.starts_with('T'));
        assert_eq!(address.len(), 34);
    }

    #[test]
    fn malformed_key_is_rejected() {
        let err = TrxProvider
            .import_or_generate(Some("1234deadbeef"))
            .unwrap_err();
        assert!(err.to_string().contains("invalid private key"));
    }

    #[test]
    fn signature_is_sixty_five_bytes() {
        let key = TrxProvider.import_or_generate(Some(KEY)).unwrap();
        let signature = TrxProvider.sign(&key.private_key, &[3u8; 32]).unwrap();
        assert_eq!(signature.len(), 65);
        assert!(signature[64] <= 1);
    }
}
