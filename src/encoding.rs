//! Shared address-encoding primitives
//!
//! Hashing and checksummed-Base58 helpers used by several chain providers.

use ripemd::Ripemd160;
use sha2::{Digest, Sha256};

/// Calculate the Keccak-256 hash of data
pub fn keccak256(data: &[u8]) -> [u8; 32] {
    use sha3::{Digest, Keccak256};
    let mut hasher = Keccak256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// SHA-256 followed by RIPEMD-160, the classic pay-to-pubkey-hash digest
pub fn hash160(data: &[u8]) -> [u8; 20] {
    let sha = Sha256::digest(data);
    Ripemd160::digest(sha).into()
}

pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    Sha256::digest(Sha256::digest(data)).into()
}

/// Base58Check: version byte, payload, then the first four bytes of a
/// double SHA-256 checksum, encoded with the Bitcoin alphabet.
pub fn base58check(version: u8, payload: &[u8]) -> String {
    base58check_with_alphabet(version, payload, bs58::Alphabet::BITCOIN)
}

pub fn base58check_with_alphabet(
    version: u8,
    payload: &[u8],
    alphabet: &bs58::Alphabet,
) -> String {
    let mut data = Vec::with_capacity(payload.len() + 5);
    data.push(version);
    data.extend_from_slice(payload);
    let checksum = double_sha256(&data);
    data.extend_from_slice(&checksum[..4]);
    bs58::encode(data).with_alphabet(alphabet).into_string()
}

/// Apply the EIP-55 mixed-case checksum to a 20-byte account hash.
pub fn to_eip55(address: &[u8; 20]) -> String {
    let lower = hex::encode(address);
    let digest = keccak256(lower.as_bytes());
    let mut out = String::with_capacity(42);
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = (digest[i / 2] >> (if i % 2 == 0 { 4 } else { 0 })) & 0x0f;
        if c.is_ascii_alphabetic() && nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}
