//! Envelope layer error types.

use thiserror::Error;

/// Result type for envelope operations.
pub type PgpResult<T> = Result<T, PgpError>;

/// Errors that can occur in OpenPGP envelope operations.
#[derive(Debug, Error)]
pub enum PgpError {
    #[error("invalid passphrase")]
    InvalidPassphrase,

    #[error("malformed OpenPGP material: {0}")]
    Malformed(String),

    #[error("message decryption failed (wrong key or tampered data)")]
    Decryption,

    #[error("signature verification failed: {0}")]
    Integrity(String),

    #[error("key {0} has no encryption-capable subkey")]
    NoEncryptionKey(String),

    #[error("OpenPGP operation failed: {0}")]
    Pgp(#[from] pgp::errors::Error),
}
