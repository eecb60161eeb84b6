//! Key factory: random keys, password-protected keys, and parsing of
//! printable key encodings.

use crate::cipher;
use crate::error::{CryptoError, CryptoResult};
use crate::kdf::{derive_key, KdfParams, Salt};
use crate::key::{Key, ProtectedKey, SymmetricKey, KEY_SIZE};
use zeroize::Zeroize;

/// Stateless factory for [`Key`] values.
///
/// This is the only place keys are created. `generate` produces fresh
/// material; `generate_from_ascii` re-hydrates a key persisted through
/// [`Key::to_ascii`].
#[derive(Clone, Copy, Debug, Default)]
pub struct KeyGenerator;

impl KeyGenerator {
    pub fn new() -> Self {
        Self
    }

    /// Generates a new key.
    ///
    /// Without a secret the result is a raw random key. With a secret, a
    /// fresh random key is sealed under an Argon2id-derived wrap key and
    /// the secret is attached to the returned [`Key`].
    pub fn generate(&self, secret: Option<&str>) -> CryptoResult<Key> {
        match secret {
            None => Ok(Key::raw(SymmetricKey::random()?)),
            Some(secret) => {
                let inner = SymmetricKey::random()?;
                let salt = Salt::random()?;
                let wrap_key = derive_key(secret, &salt, &KdfParams::default())?;
                let sealed = cipher::seal(&wrap_key, inner.as_bytes())?;
                Ok(Key::protected(
                    ProtectedKey::new(*salt.as_bytes(), sealed),
                    secret,
                ))
            }
        }
    }

    /// Parses a key from its printable encoding.
    ///
    /// Without a secret, `encoded` must be a raw-key encoding; with one,
    /// a protected-key encoding. Structural problems surface here as
    /// [`CryptoError::BadFormat`] so that configuration errors are caught
    /// at load time. A wrong secret is not detected here: protected blobs
    /// are only unwrapped at first use.
    pub fn generate_from_ascii(&self, encoded: &str, secret: Option<&str>) -> CryptoResult<Key> {
        match secret {
            None => Key::raw_from_ascii(encoded),
            Some(secret) => Key::protected_from_ascii(encoded, secret),
        }
    }
}

/// Unwraps a protected key with its password.
///
/// An authentication failure means the password is wrong or the blob was
/// tampered with; both surface as `WrongKeyOrModifiedCiphertext`.
pub(crate) fn unlock(protected: &ProtectedKey, secret: &str) -> CryptoResult<SymmetricKey> {
    let salt = Salt::from_bytes(*protected.salt());
    let wrap_key = derive_key(secret, &salt, &KdfParams::default())?;

    let mut plaintext = cipher::open(&wrap_key, protected.sealed()).map_err(|err| match err {
        CryptoError::WrongKeyOrModifiedCiphertext(_) => CryptoError::WrongKeyOrModifiedCiphertext(
            "wrong password for protected key (or the key blob was modified)".into(),
        ),
        other => other,
    })?;

    let len = plaintext.len();
    if len != KEY_SIZE {
        plaintext.zeroize();
        return Err(CryptoError::BadFormat(format!(
            "unwrapped key has wrong length: {len}"
        )));
    }
    let mut bytes = [0u8; KEY_SIZE];
    bytes.copy_from_slice(&plaintext);
    plaintext.zeroize();
    Ok(SymmetricKey::from_bytes(bytes))
}
