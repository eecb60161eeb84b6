//! Encryption engine: string, file, and stream operations over a [`Key`].
//!
//! Every operation branches on the key's material variant. Raw keys are
//! used directly; password-protected keys are unwrapped transiently with
//! the attached secret and the unwrapped material is dropped (and
//! zeroized) when the call returns.

use crate::cipher::{self, NONCE_SIZE, TAG_SIZE};
use crate::error::{CryptoError, CryptoResult};
use crate::kdf::{derive_key, KdfParams, Salt, SALT_SIZE};
use crate::key::{Key, KeyMaterial, SymmetricKey};
use crate::keygen;
use crate::stream;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::io::{Read, Write};
use std::path::Path;

/// Prefix of a string ciphertext produced with a key.
const CIPHERTEXT_PREFIX: &str = "sbc1.";

/// Prefix of a string ciphertext produced with a password. The Argon2id
/// salt travels inside the container so the password alone can decrypt.
const PASSWORD_CIPHERTEXT_PREFIX: &str = "sbcp1.";

/// The encryption operations of the system.
///
/// Implemented by [`Engine`]; the error-translation façade
/// ([`crate::EncryptionWrapper`]) wraps any implementation of this trait.
///
/// String ciphertexts are printable ASCII, safe to embed in text files.
/// File and stream variants process input in bounded chunks; memory use
/// is O(chunk size), not O(input size). Stream variants never close the
/// handles they are given — the caller keeps ownership.
pub trait Encryption {
    fn encrypt(&self, plaintext: &[u8], key: &Key) -> CryptoResult<String>;
    fn decrypt(&self, ciphertext: &str, key: &Key) -> CryptoResult<Vec<u8>>;

    fn encrypt_with_password(&self, plaintext: &[u8], password: &str) -> CryptoResult<String>;
    fn decrypt_with_password(&self, ciphertext: &str, password: &str) -> CryptoResult<Vec<u8>>;

    fn encrypt_file(&self, input: &Path, output: &Path, key: &Key) -> CryptoResult<()>;
    fn decrypt_file(&self, input: &Path, output: &Path, key: &Key) -> CryptoResult<()>;

    fn encrypt_file_with_password(
        &self,
        input: &Path,
        output: &Path,
        password: &str,
    ) -> CryptoResult<()>;
    fn decrypt_file_with_password(
        &self,
        input: &Path,
        output: &Path,
        password: &str,
    ) -> CryptoResult<()>;

    fn encrypt_stream(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        key: &Key,
    ) -> CryptoResult<()>;
    fn decrypt_stream(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        key: &Key,
    ) -> CryptoResult<()>;

    fn encrypt_stream_with_password(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        password: &str,
    ) -> CryptoResult<()>;
    fn decrypt_stream_with_password(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        password: &str,
    ) -> CryptoResult<()>;
}

/// The concrete engine over ChaCha20-Poly1305.
#[derive(Clone, Copy, Debug, Default)]
pub struct Engine;

impl Engine {
    pub fn new() -> Self {
        Self
    }
}

/// Resolves a [`Key`] to usable raw material.
///
/// Protected keys are unwrapped with their attached secret; a wrong
/// secret surfaces as `WrongKeyOrModifiedCiphertext`.
pub(crate) fn resolve_key(key: &Key) -> CryptoResult<SymmetricKey> {
    match (key.material(), key.secret()) {
        (KeyMaterial::Raw(raw), _) => Ok(raw.clone()),
        (KeyMaterial::Protected(protected), Some(secret)) => keygen::unlock(protected, secret),
        // Unreachable through the constructors, kept total instead of panicking
        (KeyMaterial::Protected(_), None) => Err(CryptoError::BadFormat(
            "password-protected key has no password attached".into(),
        )),
    }
}

fn decode_container(ciphertext: &str, prefix: &str) -> CryptoResult<Vec<u8>> {
    let body = ciphertext.strip_prefix(prefix).ok_or_else(|| {
        CryptoError::BadFormat(format!("not a ciphertext container (missing '{prefix}' prefix)"))
    })?;
    // A recognized container whose body no longer decodes was modified
    // after encryption; that is an integrity event, not a config error.
    BASE64.decode(body).map_err(|e| {
        CryptoError::WrongKeyOrModifiedCiphertext(format!("ciphertext body is corrupted: {e}"))
    })
}

impl Encryption for Engine {
    fn encrypt(&self, plaintext: &[u8], key: &Key) -> CryptoResult<String> {
        let raw = resolve_key(key)?;
        let sealed = cipher::seal(&raw, plaintext)?;
        Ok(format!("{CIPHERTEXT_PREFIX}{}", BASE64.encode(sealed)))
    }

    fn decrypt(&self, ciphertext: &str, key: &Key) -> CryptoResult<Vec<u8>> {
        let sealed = decode_container(ciphertext, CIPHERTEXT_PREFIX)?;
        let raw = resolve_key(key)?;
        cipher::open(&raw, &sealed)
    }

    fn encrypt_with_password(&self, plaintext: &[u8], password: &str) -> CryptoResult<String> {
        let salt = Salt::random()?;
        let raw = derive_key(password, &salt, &KdfParams::default())?;
        let sealed = cipher::seal(&raw, plaintext)?;

        let mut payload = Vec::with_capacity(SALT_SIZE + sealed.len());
        payload.extend_from_slice(salt.as_bytes());
        payload.extend_from_slice(&sealed);
        Ok(format!("{PASSWORD_CIPHERTEXT_PREFIX}{}", BASE64.encode(payload)))
    }

    fn decrypt_with_password(&self, ciphertext: &str, password: &str) -> CryptoResult<Vec<u8>> {
        let payload = decode_container(ciphertext, PASSWORD_CIPHERTEXT_PREFIX)?;
        if payload.len() < SALT_SIZE + NONCE_SIZE + TAG_SIZE {
            return Err(CryptoError::BadFormat(format!(
                "password ciphertext too short: {} bytes",
                payload.len()
            )));
        }

        let (salt_bytes, sealed) = payload.split_at(SALT_SIZE);
        let mut salt = [0u8; SALT_SIZE];
        salt.copy_from_slice(salt_bytes);

        let raw = derive_key(password, &Salt::from_bytes(salt), &KdfParams::default())?;
        cipher::open(&raw, sealed)
    }

    fn encrypt_file(&self, input: &Path, output: &Path, key: &Key) -> CryptoResult<()> {
        let raw = resolve_key(key)?;
        stream::encrypt_file(input, output, &raw, None)
    }

    fn decrypt_file(&self, input: &Path, output: &Path, key: &Key) -> CryptoResult<()> {
        stream::decrypt_file(input, output, stream::KeySource::Key(key))
    }

    fn encrypt_file_with_password(
        &self,
        input: &Path,
        output: &Path,
        password: &str,
    ) -> CryptoResult<()> {
        let salt = Salt::random()?;
        let raw = derive_key(password, &salt, &KdfParams::default())?;
        stream::encrypt_file(input, output, &raw, Some(&salt))
    }

    fn decrypt_file_with_password(
        &self,
        input: &Path,
        output: &Path,
        password: &str,
    ) -> CryptoResult<()> {
        stream::decrypt_file(input, output, stream::KeySource::Password(password))
    }

    fn encrypt_stream(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        key: &Key,
    ) -> CryptoResult<()> {
        let raw = resolve_key(key)?;
        stream::encrypt_stream(input, output, &raw, None)
    }

    fn decrypt_stream(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        key: &Key,
    ) -> CryptoResult<()> {
        stream::decrypt_stream(input, output, stream::KeySource::Key(key))
    }

    fn encrypt_stream_with_password(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        password: &str,
    ) -> CryptoResult<()> {
        let salt = Salt::random()?;
        let raw = derive_key(password, &salt, &KdfParams::default())?;
        stream::encrypt_stream(input, output, &raw, Some(&salt))
    }

    fn decrypt_stream_with_password(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        password: &str,
    ) -> CryptoResult<()> {
        stream::decrypt_stream(input, output, stream::KeySource::Password(password))
    }
}
