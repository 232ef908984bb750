//! Recovery protocol error types.

use thiserror::Error;

/// Result type for recovery operations.
pub type RecoveryResult<T> = Result<T, RecoveryError>;

/// Errors surfaced by the recovery gateway and controllers.
///
/// Every error aborts the call and reaches the caller unmodified; nothing is
/// retried, because each step is either pure validation or the single
/// irreversible POST.
#[derive(Debug, Error)]
pub enum RecoveryError {
    /// Bad or missing DTO fields, all reported together.
    #[error(transparent)]
    Validation(#[from] keyhaven_model::ModelError),

    /// Wrong reviewer passphrase or unreadable reviewer key. Deliberately
    /// generic: the surface gives no oracle distinguishing the two to an
    /// attacker probing stolen key material.
    #[error("invalid master password")]
    InvalidMasterPassword,

    #[error("{0}")]
    NotFound(String),

    /// Signature verification failed during decrypt-and-verify.
    #[error("integrity check failed: {0}")]
    Integrity(String),

    /// Residual crypto failure that is neither a passphrase nor an
    /// integrity problem (e.g. malformed armor, missing encryption subkey).
    #[error("crypto error: {0}")]
    Crypto(String),

    /// The request was already reviewed; the server rejected the transition.
    #[error("request already reviewed: {0}")]
    Conflict(String),

    #[error("API request failed: {0}")]
    Api(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}
