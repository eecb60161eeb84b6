//! ChaCha20-Poly1305 seal/open over raw symmetric keys.
//!
//! The byte layout is nonce ‖ ciphertext+tag. The nonce is random per
//! call; callers never supply one.

use crate::error::{CryptoError, CryptoResult};
use crate::key::SymmetricKey;
use chacha20poly1305::aead::Aead;
use chacha20poly1305::{ChaCha20Poly1305, Key as AeadKey, KeyInit, Nonce};
use rand::rngs::OsRng;
use rand::RngCore;

/// ChaCha20-Poly1305 nonce length in bytes.
pub const NONCE_SIZE: usize = 12;

/// Poly1305 authentication tag length in bytes.
pub const TAG_SIZE: usize = 16;

/// Encrypts `plaintext`, returning nonce ‖ ciphertext+tag.
pub fn seal(key: &SymmetricKey, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    let cipher = ChaCha20Poly1305::new(AeadKey::from_slice(key.as_bytes()));

    let mut nonce_bytes = [0u8; NONCE_SIZE];
    OsRng
        .try_fill_bytes(&mut nonce_bytes)
        .map_err(|e| CryptoError::Environment(format!("secure RNG unavailable: {e}")))?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|e| CryptoError::Environment(format!("encryption failed: {e}")))?;

    let mut out = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypts bytes produced by [`seal`].
///
/// Too-short input is a structural [`CryptoError::BadFormat`]; an
/// authentication failure (wrong key, tampered or truncated ciphertext)
/// is [`CryptoError::WrongKeyOrModifiedCiphertext`].
pub fn open(key: &SymmetricKey, bytes: &[u8]) -> CryptoResult<Vec<u8>> {
    if bytes.len() < NONCE_SIZE + TAG_SIZE {
        return Err(CryptoError::BadFormat(format!(
            "ciphertext too short: {} bytes",
            bytes.len()
        )));
    }

    let cipher = ChaCha20Poly1305::new(AeadKey::from_slice(key.as_bytes()));
    let (nonce_bytes, ciphertext) = bytes.split_at(NONCE_SIZE);

    cipher
        .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
        .map_err(|_| {
            CryptoError::WrongKeyOrModifiedCiphertext(
                "authentication failed (wrong key or tampered data)".into(),
            )
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seal_open_round_trip() {
        let key = SymmetricKey::random().unwrap();
        let sealed = seal(&key, b"payload").unwrap();
        assert_eq!(open(&key, &sealed).unwrap(), b"payload");
    }

    #[test]
    fn open_with_wrong_key_fails() {
        let key = SymmetricKey::random().unwrap();
        let other = SymmetricKey::random().unwrap();
        let sealed = seal(&key, b"payload").unwrap();

        let err = open(&other, &sealed).unwrap_err();
        assert!(matches!(err, CryptoError::WrongKeyOrModifiedCiphertext(_)));
    }

    #[test]
    fn flipped_byte_fails_authentication() {
        let key = SymmetricKey::random().unwrap();
        let mut sealed = seal(&key, b"payload").unwrap();
        let last = sealed.len() - 1;
        sealed[last] ^= 0xFF;

        let err = open(&key, &sealed).unwrap_err();
        assert!(matches!(err, CryptoError::WrongKeyOrModifiedCiphertext(_)));
    }

    #[test]
    fn too_short_input_is_bad_format() {
        let key = SymmetricKey::random().unwrap();
        let err = open(&key, b"short").unwrap_err();
        assert!(matches!(err, CryptoError::BadFormat(_)));
    }
}
