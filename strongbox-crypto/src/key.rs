//! Key model: raw symmetric keys, password-protected keys, and their
//! printable encodings.
//!
//! A [`Key`] is immutable after construction and holds exactly one of two
//! material variants:
//!
//! - **Raw**: a 32-byte symmetric key usable directly for encryption.
//! - **Protected**: a raw key sealed under an Argon2id-derived wrap key;
//!   the originating password travels with the `Key` and the inner key is
//!   only unwrapped transiently at use time.
//!
//! All key material is zeroized on drop.

use crate::cipher::{NONCE_SIZE, TAG_SIZE};
use crate::error::{CryptoError, CryptoResult};
use crate::kdf::SALT_SIZE;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Symmetric key length in bytes (ChaCha20-Poly1305).
pub const KEY_SIZE: usize = 32;

/// Checksum length appended to raw key encodings.
const CHECKSUM_SIZE: usize = 4;

/// Prefix of the printable encoding of a raw key.
const RAW_PREFIX: &str = "sbk1.";

/// Prefix of the printable encoding of a password-protected key.
const PROTECTED_PREFIX: &str = "sbp1.";

/// A raw 32-byte symmetric key. Zeroized on drop.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct SymmetricKey([u8; KEY_SIZE]);

impl SymmetricKey {
    /// Generates a fresh key from the OS secure RNG.
    pub fn random() -> CryptoResult<Self> {
        let mut bytes = [0u8; KEY_SIZE];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::Environment(format!("secure RNG unavailable: {e}")))?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; KEY_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl std::fmt::Debug for SymmetricKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never expose key bytes through Debug output
        f.write_str("SymmetricKey(..)")
    }
}

/// A raw key sealed under a password-derived wrap key.
///
/// Layout: Argon2id salt ‖ AEAD nonce ‖ sealed key (inner key + tag).
/// The blob alone is useless without the password; it is safe to persist.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub struct ProtectedKey {
    salt: [u8; SALT_SIZE],
    sealed: Vec<u8>,
}

/// Exact sealed-blob length: nonce plus the encrypted inner key.
const SEALED_SIZE: usize = NONCE_SIZE + KEY_SIZE + TAG_SIZE;

impl ProtectedKey {
    pub(crate) fn new(salt: [u8; SALT_SIZE], sealed: Vec<u8>) -> Self {
        debug_assert_eq!(sealed.len(), SEALED_SIZE);
        Self { salt, sealed }
    }

    pub(crate) fn salt(&self) -> &[u8; SALT_SIZE] {
        &self.salt
    }

    pub(crate) fn sealed(&self) -> &[u8] {
        &self.sealed
    }
}

/// The two shapes of key material a [`Key`] can carry.
#[derive(Clone, Debug, Zeroize, ZeroizeOnDrop)]
pub enum KeyMaterial {
    Raw(SymmetricKey),
    Protected(ProtectedKey),
}

/// Immutable key value: material plus the password it is protected with,
/// if any.
///
/// Invariant: the secret is present if and only if the material is
/// password-protected. The constructors enforce this; there is no way to
/// build a raw key carrying a secret or a protected key without one.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct Key {
    material: KeyMaterial,
    secret: Option<String>,
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The secret is a password; keep it out of logs and panics
        f.debug_struct("Key")
            .field("material", &self.material)
            .field("secret", &self.secret.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Key {
    /// Wraps a raw symmetric key. Never carries a secret.
    pub fn raw(key: SymmetricKey) -> Self {
        Self {
            material: KeyMaterial::Raw(key),
            secret: None,
        }
    }

    /// Wraps a password-protected key together with its password.
    pub fn protected(key: ProtectedKey, secret: impl Into<String>) -> Self {
        Self {
            material: KeyMaterial::Protected(key),
            secret: Some(secret.into()),
        }
    }

    pub fn material(&self) -> &KeyMaterial {
        &self.material
    }

    /// The password attached at construction, if the key is protected.
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref()
    }

    pub fn is_password_protected(&self) -> bool {
        matches!(self.material, KeyMaterial::Protected(_))
    }

    /// Printable, self-describing encoding of the key material.
    ///
    /// Round-trips byte-exact through
    /// [`KeyGenerator::generate_from_ascii`](crate::KeyGenerator::generate_from_ascii).
    /// The attached secret is never part of the encoding.
    pub fn to_ascii(&self) -> String {
        match &self.material {
            KeyMaterial::Raw(key) => {
                let mut payload = Vec::with_capacity(KEY_SIZE + CHECKSUM_SIZE);
                payload.extend_from_slice(key.as_bytes());
                payload.extend_from_slice(&checksum(key.as_bytes()));
                let encoded = format!("{RAW_PREFIX}{}", BASE64.encode(&payload));
                payload.zeroize();
                encoded
            }
            KeyMaterial::Protected(key) => {
                let mut payload = Vec::with_capacity(SALT_SIZE + SEALED_SIZE);
                payload.extend_from_slice(key.salt());
                payload.extend_from_slice(key.sealed());
                format!("{PROTECTED_PREFIX}{}", BASE64.encode(&payload))
            }
        }
    }

    /// Parses a raw-key encoding produced by [`Key::to_ascii`].
    ///
    /// Validation is eager: a wrong prefix, undecodable base64, wrong
    /// length, or checksum mismatch is a [`CryptoError::BadFormat`] here,
    /// not a failure at first use.
    pub(crate) fn raw_from_ascii(encoded: &str) -> CryptoResult<Self> {
        let mut payload = decode_payload(encoded, RAW_PREFIX, "raw key")?;
        if payload.len() != KEY_SIZE + CHECKSUM_SIZE {
            payload.zeroize();
            return Err(CryptoError::BadFormat(
                "raw key encoding has wrong length".into(),
            ));
        }
        let (key_bytes, actual) = payload.split_at(KEY_SIZE);
        if actual != checksum(key_bytes) {
            payload.zeroize();
            return Err(CryptoError::BadFormat(
                "raw key encoding failed its checksum (corrupted key)".into(),
            ));
        }
        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(key_bytes);
        payload.zeroize();
        Ok(Self::raw(SymmetricKey::from_bytes(bytes)))
    }

    /// Parses a protected-key encoding and attaches `secret`.
    ///
    /// Structural validation is eager; whether `secret` actually unlocks
    /// the blob is only discovered at first unwrap.
    pub(crate) fn protected_from_ascii(encoded: &str, secret: &str) -> CryptoResult<Self> {
        let payload = decode_payload(encoded, PROTECTED_PREFIX, "protected key")?;
        if payload.len() != SALT_SIZE + SEALED_SIZE {
            return Err(CryptoError::BadFormat(format!(
                "protected key encoding has wrong length: {}",
                payload.len()
            )));
        }
        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(&payload[..SALT_SIZE]);
        let sealed = payload[SALT_SIZE..].to_vec();
        Ok(Self::protected(ProtectedKey::new(salt, sealed), secret))
    }
}

fn checksum(key_bytes: &[u8]) -> [u8; CHECKSUM_SIZE] {
    let digest = Sha256::digest(key_bytes);
    let mut out = [0u8; CHECKSUM_SIZE];
    out.copy_from_slice(&digest[..CHECKSUM_SIZE]);
    out
}

fn decode_payload(encoded: &str, prefix: &str, what: &str) -> CryptoResult<Vec<u8>> {
    let body = encoded.strip_prefix(prefix).ok_or_else(|| {
        CryptoError::BadFormat(format!("not a {what} encoding (missing '{prefix}' prefix)"))
    })?;
    BASE64
        .decode(body)
        .map_err(|e| CryptoError::BadFormat(format!("{what} encoding is not valid base64: {e}")))
}
