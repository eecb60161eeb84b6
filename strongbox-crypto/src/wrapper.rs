//! Error-translation façade over an [`Encryption`] engine.

use crate::engine::Encryption;
use crate::error::CryptoFailure;
use crate::key::Key;
use std::io::{Read, Write};
use std::path::Path;

/// Wraps an engine so every failure surfaces as the single
/// [`CryptoFailure`] kind, message preserved.
///
/// This is the boundary the rest of the system calls through: callers
/// depend on one stable error type no matter which engine implementation
/// is wired in underneath. The wrapper holds no state beyond the engine
/// and performs no logic of its own.
#[derive(Clone, Debug, Default)]
pub struct EncryptionWrapper<E: Encryption> {
    engine: E,
}

impl<E: Encryption> EncryptionWrapper<E> {
    pub fn new(engine: E) -> Self {
        Self { engine }
    }

    pub fn encrypt(&self, plaintext: &[u8], key: &Key) -> Result<String, CryptoFailure> {
        Ok(self.engine.encrypt(plaintext, key)?)
    }

    pub fn decrypt(&self, ciphertext: &str, key: &Key) -> Result<Vec<u8>, CryptoFailure> {
        Ok(self.engine.decrypt(ciphertext, key)?)
    }

    pub fn encrypt_with_password(
        &self,
        plaintext: &[u8],
        password: &str,
    ) -> Result<String, CryptoFailure> {
        Ok(self.engine.encrypt_with_password(plaintext, password)?)
    }

    pub fn decrypt_with_password(
        &self,
        ciphertext: &str,
        password: &str,
    ) -> Result<Vec<u8>, CryptoFailure> {
        Ok(self.engine.decrypt_with_password(ciphertext, password)?)
    }

    pub fn encrypt_file(
        &self,
        input: &Path,
        output: &Path,
        key: &Key,
    ) -> Result<(), CryptoFailure> {
        Ok(self.engine.encrypt_file(input, output, key)?)
    }

    pub fn decrypt_file(
        &self,
        input: &Path,
        output: &Path,
        key: &Key,
    ) -> Result<(), CryptoFailure> {
        Ok(self.engine.decrypt_file(input, output, key)?)
    }

    pub fn encrypt_file_with_password(
        &self,
        input: &Path,
        output: &Path,
        password: &str,
    ) -> Result<(), CryptoFailure> {
        Ok(self.engine.encrypt_file_with_password(input, output, password)?)
    }

    pub fn decrypt_file_with_password(
        &self,
        input: &Path,
        output: &Path,
        password: &str,
    ) -> Result<(), CryptoFailure> {
        Ok(self.engine.decrypt_file_with_password(input, output, password)?)
    }

    pub fn encrypt_stream(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        key: &Key,
    ) -> Result<(), CryptoFailure> {
        Ok(self.engine.encrypt_stream(input, output, key)?)
    }

    pub fn decrypt_stream(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        key: &Key,
    ) -> Result<(), CryptoFailure> {
        Ok(self.engine.decrypt_stream(input, output, key)?)
    }

    pub fn encrypt_stream_with_password(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        password: &str,
    ) -> Result<(), CryptoFailure> {
        Ok(self.engine.encrypt_stream_with_password(input, output, password)?)
    }

    pub fn decrypt_stream_with_password(
        &self,
        input: &mut dyn Read,
        output: &mut dyn Write,
        password: &str,
    ) -> Result<(), CryptoFailure> {
        Ok(self.engine.decrypt_stream_with_password(input, output, password)?)
    }
}
