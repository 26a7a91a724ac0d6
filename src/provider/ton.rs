//! TON provider
//!
//! Ed25519 keys imported as a 32-byte hex seed. A TON account address is
//! the representation hash of the wallet contract's initial state, so the
//! derivation builds the v4r2 state-init cell (code reference plus a data
//! cell holding seqno 0, the default wallet id, the public key and an
//! empty plugin dictionary) and renders the bounceable human-readable
//! form: base64url over tag, workchain, hash and a CRC16 checksum.

use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

use crate::chain::Chain;
use crate::error::{Error, Result};
use crate::provider::sol::signing_key_from_seed;
use crate::provider::{decode_hex_seed, ChainProvider, KeyMaterial};

/// Representation hash of the standard wallet v4r2 code cell.
const WALLET_V4R2_CODE_HASH: [u8; 32] = [
    0xfe, 0xb5, 0xff, 0x68, 0x20, 0xe2, 0xff, 0x0d, 0x94, 0x83, 0xe7, 0xe0, 0xd6, 0x2c, 0x81,
    0x7d, 0x84, 0x67, 0x89, 0xfb, 0x4a, 0xe5, 0x80, 0xc8, 0x78, 0x86, 0x6d, 0x95, 0x9d, 0xab,
    0xd5, 0xc0,
];

/// Cell-tree depth of the wallet v4r2 code cell.
const WALLET_V4R2_CODE_DEPTH: u16 = 7;

/// Default wallet id for workchain 0 (0x29A9A317 + workchain)
const WALLET_ID: u32 = 698_983_191;

/// Address tag for the bounceable, non-testnet human-readable form
const BOUNCEABLE_TAG: u8 = 0x11;

const BASECHAIN: u8 = 0x00;

pub struct TonProvider;

impl ChainProvider for TonProvider {
    fn chain(&self) -> Chain {
        Chain::Ton
    }

    fn import_or_generate(&self, input: Option<&str>) -> Result<KeyMaterial> {
        let seed: Zeroizing<[u8; 32]> = match input {
            Some(raw) => Zeroizing::new(decode_hex_seed(raw)?),
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

        // data cell: seqno (32 bits, zero) | wallet id (32 bits) |
        // public key (256 bits) | empty plugin dict (1 bit)
        let mut data = Vec::with_capacity(41);
        data.extend_from_slice(&0u32.to_be_bytes());
        data.extend_from_slice(&WALLET_ID.to_be_bytes());
        data.extend_from_slice(public_key);
        data.push(0x40); // final zero bit plus the completion tag
        let data_hash = cell_hash(321, &data, &[]);

        // state-init cell: no split depth, no tick-tock, code + data refs,
        // no library (5 bits: 0 0 1 1 0)
        let state_init_hash = cell_hash(
            5,
            &[0b0011_0100],
            &[
                (WALLET_V4R2_CODE_HASH, WALLET_V4R2_CODE_DEPTH),
                (data_hash, 0),
            ],
        );

        let mut account = Vec::with_capacity(36);
        account.push(BOUNCEABLE_TAG);
        account.push(BASECHAIN);
        account.extend_from_slice(&state_init_hash);
        let checksum = crc16_xmodem(&account);
        account.extend_from_slice(&checksum.to_be_bytes());
        Ok(URL_SAFE.encode(account))
    }

    fn sign(&self, private_key: &[u8], payload: &[u8]) -> Result<Vec<u8>> {
        let signing_key = signing_key_from_seed(private_key)?;
        Ok(signing_key.sign(payload).to_bytes().to_vec())
    }
}

/// Standard cell representation hash: descriptor bytes, the padded data,
/// then each reference's depth (big-endian u16) followed by its hash.
fn cell_hash(bits: usize, data: &[u8], refs: &[([u8; 32], u16)]) -> [u8; 32] {
    let d1 = refs.len() as u8;
    let d2 = (bits / 8 + bits.div_ceil(8)) as u8;
    let mut hasher = Sha256::new();
    hasher.update([d1, d2]);
    hasher.update(data);
    for (_, depth) in refs {
        hasher.update(depth.to_be_bytes());
    }
    for (hash, _) in refs {
        hasher.update(hash);
    }
    hasher.finalize().into()
}

/// CRC16/XMODEM, the checksum TON uses for human-readable addresses
fn crc16_xmodem(data: &[u8]) -> u16 {
    let mut reg: u16 = 0;
    for byte in data {
        reg ^= u16::from(*byte) << 8;
        for _ in 0..8 {
            reg = if reg & 0x8000 != 0 {
                (reg << 1) ^ 0x1021
            } else {
                reg << 1
            };
        }
    }
    reg
}

#[cfg(test)]
mod tests {
    use super::*;

    const SEED: &str = "4c0883a69102937a9280f1222f7c9b6645e1a3c7bf2e5b4cd0bd58d7f9f5d9b1";
    const ADDRESS: &str = "EQB2trRSt_ZF-gnMRgJhu_oORG6W0T8Ja75CmjnjRR1mRYL0";

    #[test]
    fn seed_import_derives_known_address() {
        let key = TonProvider.import_or_generate(Some(SEED)).unwrap();
        let address = TonProvider.derive_address(&key.public_key).unwrap();
        assert_eq!(address, ADDRESS);
    }

    #[test]
    fn random_key_produces_bounceable_address() {
        let a = TonProvider.import_or_generate(None).unwrap();
        let b = TonProvider.import_or_generate(None).unwrap();
        let addr = TonProvider.derive_address(&a.public_key).unwrap();
        assert!(addr.starts_with("EQ"));
        assert_eq!(addr.len(), 48);
        assert_ne!(addr, TonProvider.derive_address(&b.public_key).unwrap());
    }

    #[test]
    fn malformed_key_is_rejected() {
        let err = TonProvider.import_or_generate(Some("1234dead")).unwrap_err();
        assert!(err.to_string().contains("invalid private key"));
    }

    #[test]
    fn signature_verifies_against_public_key() {
        use ed25519_dalek::{Signature, Verifier, VerifyingKey};

        let key = TonProvider.import_or_generate(Some(SEED)).unwrap();
        let payload = [5u8; 32];
        let signature = TonProvider.sign(&key.private_key, &payload).unwrap();

        let verifying_key =
            VerifyingKey::from_bytes(key.public_key.as_slice().try_into().unwrap()).unwrap();
        let signature = Signature::from_bytes(signature.as_slice().try_into().unwrap());
        verifying_key.verify(&payload, &signature).unwrap();
    }

    #[test]
    fn crc16_known_vector() {
        assert_eq!(crc16_xmodem(b"123456789"), 0x31C3);
    }
}
