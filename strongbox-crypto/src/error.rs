//! Crypto error taxonomy.

use thiserror::Error;

/// Result type for crypto operations.
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors surfaced by key handling and encryption.
///
/// The three crypto kinds are deliberately distinct: `BadFormat` means a
/// key encoding or ciphertext container is structurally broken (a
/// configuration problem), while `WrongKeyOrModifiedCiphertext` means the
/// bytes parsed fine but failed authentication (a data-integrity problem).
/// Callers must be able to tell those apart.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// The host cannot satisfy a cryptographic precondition, such as a
    /// missing secure RNG or insufficient memory for the Argon2id pass.
    #[error("crypto environment failure: {0}")]
    Environment(String),

    /// A key encoding or ciphertext container is structurally invalid.
    #[error("bad format: {0}")]
    BadFormat(String),

    /// Authentication failed: wrong key, wrong password, or the
    /// ciphertext was tampered with or truncated.
    #[error("wrong key or modified ciphertext: {0}")]
    WrongKeyOrModifiedCiphertext(String),

    /// I/O failure during a file or stream operation.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Unified error signaled at the [`EncryptionWrapper`] boundary.
///
/// Every [`CryptoError`] coming out of the engine is re-signaled as this
/// single kind, preserving the original message and source. Callers of the
/// wrapper depend on this one type regardless of which engine is wired in
/// underneath.
///
/// [`EncryptionWrapper`]: crate::EncryptionWrapper
#[derive(Debug, Error)]
#[error("{message}")]
pub struct CryptoFailure {
    message: String,
    #[source]
    source: CryptoError,
}

impl CryptoFailure {
    /// The message of the underlying failure, verbatim.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The original error kind this failure was translated from.
    pub fn cause(&self) -> &CryptoError {
        &self.source
    }
}

impl From<CryptoError> for CryptoFailure {
    fn from(err: CryptoError) -> Self {
        Self {
            message: err.to_string(),
            source: err,
        }
    }
}
