//! Key lifecycle for Strongbox.
//!
//! - [`KeyStorage`]: process-local single-slot cache of the active key.
//! - [`KeyManager`]: the one blessed path for obtaining the active key,
//!   lazily generating and caching it on first use.
//! - [`KeyFile`]: loader for the key file (`[crypto]` section with the
//!   encoded key and, for protected keys, the password).

mod loader;
mod manager;
mod storage;

pub use loader::KeyFile;
pub use manager::KeyManager;
pub use storage::KeyStorage;

use thiserror::Error;

/// Result type for keyring operations.
pub type KeyringResult<T> = Result<T, KeyringError>;

/// Errors from key storage, management, and key-file loading.
///
/// The loader failures stay distinct on purpose: an unreadable file, a
/// file that is not the expected format, and a well-formed file missing a
/// required entry are three different operator mistakes.
#[derive(Debug, Error)]
pub enum KeyringError {
    #[error("cannot read key file {path}: {source}")]
    UnreadableKeyFile {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("key file {path} is not correctly formatted: {reason}")]
    MalformedKeyFile { path: String, reason: String },

    #[error("key file {path} is missing the \"{entry}\" entry")]
    MissingEntry { path: String, entry: &'static str },

    #[error("crypto error: {0}")]
    Crypto(#[from] strongbox_crypto::CryptoError),
}
