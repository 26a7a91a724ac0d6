//! Error types for the keyring core

use thiserror::Error;

/// Custom error type for keyring operations
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed or missing input: undecodable private key, wrong hash
    /// length, empty service name. Never retried, never fatal.
    #[error("validation error: {0}")]
    Validation(String),

    /// Missing service or address.
    #[error("not found: {0}")]
    NotFound(String),

    /// A persisted record violates an invariant, e.g. a key pair with
    /// empty private-key material.
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Underlying key-value store failure, wrapped and surfaced.
    #[error("storage error: {0}")]
    Storage(String),

    /// The signing library rejected the key or hash.
    #[error("crypto error: {0}")]
    Crypto(String),

    /// A stored record could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Result type for keyring operations
pub type Result<T> = std::result::Result<T, Error>;
