//! Key manager: the single entry point for obtaining the active key.

use crate::storage::KeyStorage;
use std::sync::Arc;
use strongbox_crypto::{CryptoResult, Key, KeyGenerator};
use tracing::debug;

/// Composes [`KeyStorage`] and [`KeyGenerator`] behind one entry point.
///
/// [`KeyManager::get_key`] is how the rest of the system obtains the
/// active key: on a cold slot it generates one (using the default secret,
/// if set), caches it, and returns it. Centralizing that here keeps every
/// caller from re-implementing "generate if missing" and ending up with
/// divergent keys in one process.
pub struct KeyManager {
    storage: Arc<KeyStorage>,
    generator: KeyGenerator,
    /// Default password for lazily generated keys. Convenience state
    /// only; never persisted.
    secret: Option<String>,
}

impl KeyManager {
    pub fn new(storage: Arc<KeyStorage>, generator: KeyGenerator) -> Self {
        Self {
            storage,
            generator,
            secret: None,
        }
    }

    /// Generates a new key without touching the stored one.
    pub fn generate(&self, secret: Option<&str>) -> CryptoResult<Key> {
        self.generator.generate(secret)
    }

    /// Parses a key from its printable encoding without storing it.
    pub fn generate_from_ascii(&self, encoded: &str, secret: Option<&str>) -> CryptoResult<Key> {
        self.generator.generate_from_ascii(encoded, secret)
    }

    /// Returns the active key, generating and caching one on first use.
    ///
    /// Idempotent once the slot is filled: repeated calls return the same
    /// key until [`KeyManager::set_key`] replaces it.
    pub fn get_key(&self) -> CryptoResult<Key> {
        self.storage.get_or_try_insert_with(|| {
            debug!("no active key; generating one lazily");
            self.generator.generate(self.secret.as_deref())
        })
    }

    /// Replaces the active key unconditionally.
    pub fn set_key(&self, key: Key) {
        debug!("replacing the active key");
        self.storage.set_key(key);
    }

    /// The default password used when a key is generated lazily.
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    pub fn set_secret(&mut self, secret: Option<String>) {
        self.secret = secret;
    }
}
