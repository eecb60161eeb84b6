//! Authenticated-encryption layer for Strongbox.
//!
//! Provides key handling and encryption using:
//! - Argon2id for key derivation from passwords
//! - ChaCha20-Poly1305 for authenticated encryption of strings
//! - XChaCha20-Poly1305 STREAM for chunked file/stream encryption
//! - Zeroization of key material on drop
//!
//! # Architecture
//!
//! A [`Key`] carries one of two material variants: a raw 32-byte
//! symmetric key, or that key sealed under a password-derived wrap key
//! (with the password attached). The [`KeyGenerator`] is the only place
//! keys are created — fresh random material or re-hydration from the
//! printable encoding produced by [`Key::to_ascii`].
//!
//! The [`Engine`] performs the actual encryption, branching on the key
//! variant and unwrapping protected keys transiently per call. The
//! [`EncryptionWrapper`] sits above it and translates every failure into
//! the single [`CryptoFailure`] kind, so callers never depend on the
//! engine's error vocabulary.
//!
//! Three failure kinds stay distinct below the wrapper: environment
//! problems (no secure RNG, KDF out of memory), structural problems
//! (corrupt key encodings, malformed containers), and integrity problems
//! (wrong key or tampered ciphertext). A corrupted ciphertext is a
//! data-integrity event; a malformed key is a configuration event.

mod cipher;
mod engine;
mod error;
mod kdf;
mod key;
mod keygen;
mod stream;
mod wrapper;

pub use engine::{Encryption, Engine};
pub use error::{CryptoError, CryptoFailure, CryptoResult};
pub use kdf::{derive_key, KdfParams, Salt, SALT_SIZE};
pub use key::{Key, KeyMaterial, ProtectedKey, SymmetricKey, KEY_SIZE};
pub use keygen::KeyGenerator;
pub use wrapper::EncryptionWrapper;
