//! Key-file loader.
//!
//! A key file is an INI-style (TOML) file carrying the active key in its
//! printable encoding, plus the password for protected keys:
//!
//! ```toml
//! [crypto]
//! key = "sbk1.…"
//! secret = "ThisIsASecret"   # only for password-protected keys
//! ```
//!
//! Loading fails fast, at load time rather than first use, and the three
//! failure shapes stay distinguishable: unreadable file, unparsable file,
//! and a parsable file missing a required entry.

use crate::{KeyringError, KeyringResult};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use strongbox_crypto::{Key, KeyGenerator};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct KeyFileDoc {
    crypto: Option<CryptoSection>,
}

#[derive(Debug, Deserialize)]
struct CryptoSection {
    key: Option<String>,
    secret: Option<String>,
}

/// The contents of a loaded key file.
#[derive(Debug)]
pub struct KeyFile {
    key: String,
    secret: Option<String>,
}

impl KeyFile {
    /// Reads and validates a key file.
    ///
    /// The `key` entry is required; `secret` is optional and, when
    /// present, must be non-empty.
    pub fn load(path: &Path) -> KeyringResult<Self> {
        let text = fs::read_to_string(path).map_err(|source| KeyringError::UnreadableKeyFile {
            path: path.display().to_string(),
            source,
        })?;

        let doc: KeyFileDoc =
            toml::from_str(&text).map_err(|e| KeyringError::MalformedKeyFile {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;

        let section = doc.crypto.ok_or_else(|| KeyringError::MissingEntry {
            path: path.display().to_string(),
            entry: "crypto",
        })?;
        let key = section
            .key
            .filter(|k| !k.is_empty())
            .ok_or_else(|| KeyringError::MissingEntry {
                path: path.display().to_string(),
                entry: "key",
            })?;
        let secret = section.secret.filter(|s| !s.is_empty());

        debug!("loaded key file {}", path.display());
        Ok(Self { key, secret })
    }

    /// The ASCII-encoded key.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// The password, if the file describes a protected key.
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    /// Turns the loaded entries into a [`Key`].
    ///
    /// A corrupt encoding surfaces here as a `BadFormat` crypto error —
    /// still at load time, not at first encrypt.
    pub fn into_key(self, generator: &KeyGenerator) -> KeyringResult<Key> {
        Ok(generator.generate_from_ascii(&self.key, self.secret.as_deref())?)
    }
}
