//! The wrapper must re-signal every engine failure as the unified
//! [`CryptoFailure`] kind with the original message intact.

use std::io::{Read, Write};
use std::path::Path;
use strongbox_crypto::{
    CryptoError, CryptoResult, Encryption, EncryptionWrapper, Engine, Key, KeyGenerator,
};

/// What a [`FailingEngine`] raises from every operation.
#[derive(Clone, Copy)]
enum FailureKind {
    Environment,
    BadFormat,
    WrongKey,
}

impl FailureKind {
    fn raise(self) -> CryptoError {
        match self {
            FailureKind::Environment => CryptoError::Environment("no secure RNG".into()),
            FailureKind::BadFormat => CryptoError::BadFormat("mangled key encoding".into()),
            FailureKind::WrongKey => {
                CryptoError::WrongKeyOrModifiedCiphertext("ciphertext was tampered with".into())
            }
        }
    }
}

/// Engine stub whose every operation fails with a fixed kind.
struct FailingEngine(FailureKind);

impl Encryption for FailingEngine {
    fn encrypt(&self, _: &[u8], _: &Key) -> CryptoResult<String> {
        Err(self.0.raise())
    }
    fn decrypt(&self, _: &str, _: &Key) -> CryptoResult<Vec<u8>> {
        Err(self.0.raise())
    }
    fn encrypt_with_password(&self, _: &[u8], _: &str) -> CryptoResult<String> {
        Err(self.0.raise())
    }
    fn decrypt_with_password(&self, _: &str, _: &str) -> CryptoResult<Vec<u8>> {
        Err(self.0.raise())
    }
    fn encrypt_file(&self, _: &Path, _: &Path, _: &Key) -> CryptoResult<()> {
        Err(self.0.raise())
    }
    fn decrypt_file(&self, _: &Path, _: &Path, _: &Key) -> CryptoResult<()> {
        Err(self.0.raise())
    }
    fn encrypt_file_with_password(&self, _: &Path, _: &Path, _: &str) -> CryptoResult<()> {
        Err(self.0.raise())
    }
    fn decrypt_file_with_password(&self, _: &Path, _: &Path, _: &str) -> CryptoResult<()> {
        Err(self.0.raise())
    }
    fn encrypt_stream(&self, _: &mut dyn Read, _: &mut dyn Write, _: &Key) -> CryptoResult<()> {
        Err(self.0.raise())
    }
    fn decrypt_stream(&self, _: &mut dyn Read, _: &mut dyn Write, _: &Key) -> CryptoResult<()> {
        Err(self.0.raise())
    }
    fn encrypt_stream_with_password(
        &self,
        _: &mut dyn Read,
        _: &mut dyn Write,
        _: &str,
    ) -> CryptoResult<()> {
        Err(self.0.raise())
    }
    fn decrypt_stream_with_password(
        &self,
        _: &mut dyn Read,
        _: &mut dyn Write,
        _: &str,
    ) -> CryptoResult<()> {
        Err(self.0.raise())
    }
}

#[test]
fn every_error_kind_translates_with_message_preserved() {
    let key = KeyGenerator::new().generate(None).unwrap();

    for kind in [FailureKind::Environment, FailureKind::BadFormat, FailureKind::WrongKey] {
        let wrapper = EncryptionWrapper::new(FailingEngine(kind));
        let original_message = kind.raise().to_string();

        let failure = wrapper.encrypt(b"plaintext", &key).unwrap_err();
        assert_eq!(failure.message(), original_message);
        assert_eq!(failure.to_string(), original_message);

        let failure = wrapper.decrypt("sbc1.AAAA", &key).unwrap_err();
        assert_eq!(failure.message(), original_message);

        let failure = wrapper.encrypt_with_password(b"plaintext", "pw").unwrap_err();
        assert_eq!(failure.message(), original_message);

        let failure = wrapper
            .encrypt_file(Path::new("in"), Path::new("out"), &key)
            .unwrap_err();
        assert_eq!(failure.message(), original_message);
    }
}

#[test]
fn translated_failure_keeps_the_original_kind_as_source() {
    let key = KeyGenerator::new().generate(None).unwrap();
    let wrapper = EncryptionWrapper::new(FailingEngine(FailureKind::WrongKey));

    let failure = wrapper.decrypt("sbc1.AAAA", &key).unwrap_err();
    assert!(matches!(failure.cause(), CryptoError::WrongKeyOrModifiedCiphertext(_)));
}

#[test]
fn wrapper_passes_successful_results_through() {
    let wrapper = EncryptionWrapper::new(Engine::new());
    let key = KeyGenerator::new().generate(None).unwrap();

    let ciphertext = wrapper.encrypt(b"payload", &key).unwrap();
    assert_eq!(wrapper.decrypt(&ciphertext, &key).unwrap(), b"payload");
}
