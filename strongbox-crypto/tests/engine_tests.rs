use pretty_assertions::assert_eq;
use proptest::prelude::*;
use strongbox_crypto::{CryptoError, Encryption, Engine, KeyGenerator};

const PLAINTEXT: &str = "The quick brown fox jumps over the lazy dog";

#[test]
fn encrypt_produces_printable_ciphertext() {
    let key = KeyGenerator::new().generate(None).unwrap();
    let ciphertext = Engine::new().encrypt(PLAINTEXT.as_bytes(), &key).unwrap();

    assert!(ciphertext.is_ascii());
    assert!(ciphertext.chars().all(|c| c.is_ascii_graphic()));
}

#[test]
fn decrypt_recovers_plaintext_via_reloaded_key() {
    let generator = KeyGenerator::new();
    let engine = Engine::new();

    let key = generator.generate(None).unwrap();
    let ciphertext = engine.encrypt(PLAINTEXT.as_bytes(), &key).unwrap();

    let reloaded = generator.generate_from_ascii(&key.to_ascii(), None).unwrap();
    let plaintext = engine.decrypt(&ciphertext, &reloaded).unwrap();

    assert_eq!(String::from_utf8(plaintext).unwrap(), PLAINTEXT);
}

#[test]
fn appended_bytes_fail_integrity_check() {
    let generator = KeyGenerator::new();
    let engine = Engine::new();

    let key = generator.generate(None).unwrap();
    let ciphertext = engine.encrypt(PLAINTEXT.as_bytes(), &key).unwrap();

    let err = engine
        .decrypt(&format!("{ciphertext}{{FakeString}}"), &key)
        .unwrap_err();
    assert!(matches!(err, CryptoError::WrongKeyOrModifiedCiphertext(_)), "got {err:?}");
}

#[test]
fn mutated_ciphertext_body_fails_integrity_check() {
    let generator = KeyGenerator::new();
    let engine = Engine::new();

    let key = generator.generate(None).unwrap();
    let ciphertext = engine.encrypt(PLAINTEXT.as_bytes(), &key).unwrap();

    // Flip one character in the base64 body, keeping the container shape valid
    let mut chars: Vec<char> = ciphertext.chars().collect();
    let body_pos = ciphertext.len() - 2;
    chars[body_pos] = if chars[body_pos] == 'A' { 'B' } else { 'A' };
    let tampered: String = chars.into_iter().collect();

    let err = engine.decrypt(&tampered, &key).unwrap_err();
    assert!(matches!(err, CryptoError::WrongKeyOrModifiedCiphertext(_)), "got {err:?}");
}

#[test]
fn corrupted_key_encoding_is_caught_eagerly() {
    let generator = KeyGenerator::new();
    let key = generator.generate(None).unwrap();

    let err = generator
        .generate_from_ascii(&format!("{}{{FakeString}}", key.to_ascii()), None)
        .unwrap_err();
    assert!(matches!(err, CryptoError::BadFormat(_)), "got {err:?}");
}

#[test]
fn decrypting_with_a_different_key_fails() {
    let generator = KeyGenerator::new();
    let engine = Engine::new();

    let key = generator.generate(None).unwrap();
    let other = generator.generate(None).unwrap();
    let ciphertext = engine.encrypt(PLAINTEXT.as_bytes(), &key).unwrap();

    let err = engine.decrypt(&ciphertext, &other).unwrap_err();
    assert!(matches!(err, CryptoError::WrongKeyOrModifiedCiphertext(_)));
}

#[test]
fn password_protected_key_round_trip() {
    let generator = KeyGenerator::new();
    let engine = Engine::new();

    let key = generator.generate(Some("ThisIsASecretPassword")).unwrap();
    assert!(key.is_password_protected());
    assert_eq!(key.secret(), Some("ThisIsASecretPassword"));

    let ciphertext = engine.encrypt(PLAINTEXT.as_bytes(), &key).unwrap();
    assert!(ciphertext.is_ascii());
    assert!(key.to_ascii().is_ascii());

    let reloaded = generator
        .generate_from_ascii(&key.to_ascii(), Some("ThisIsASecretPassword"))
        .unwrap();
    assert_eq!(reloaded.secret(), Some("ThisIsASecretPassword"));

    let plaintext = engine.decrypt(&ciphertext, &reloaded).unwrap();
    assert_eq!(String::from_utf8(plaintext).unwrap(), PLAINTEXT);
}

#[test]
fn wrong_password_surfaces_at_first_decrypt() {
    let generator = KeyGenerator::new();
    let engine = Engine::new();

    let key = generator.generate(Some("right-password")).unwrap();
    let ciphertext = engine.encrypt(PLAINTEXT.as_bytes(), &key).unwrap();

    // Parsing with the wrong password succeeds: verification is lazy
    let wrong = generator
        .generate_from_ascii(&key.to_ascii(), Some("wrong-password"))
        .unwrap();

    let err = engine.decrypt(&ciphertext, &wrong).unwrap_err();
    assert!(matches!(err, CryptoError::WrongKeyOrModifiedCiphertext(_)));
}

#[test]
fn password_convenience_ops_round_trip() {
    let engine = Engine::new();
    let ciphertext = engine
        .encrypt_with_password(PLAINTEXT.as_bytes(), "pa$$word")
        .unwrap();

    assert!(ciphertext.is_ascii());
    let plaintext = engine.decrypt_with_password(&ciphertext, "pa$$word").unwrap();
    assert_eq!(String::from_utf8(plaintext).unwrap(), PLAINTEXT);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    #[test]
    fn round_trip_arbitrary_plaintexts(plaintext in proptest::collection::vec(any::<u8>(), 0..2048)) {
        let key = KeyGenerator::new().generate(None).unwrap();
        let engine = Engine::new();

        let ciphertext = engine.encrypt(&plaintext, &key).unwrap();
        prop_assert!(ciphertext.is_ascii());
        prop_assert_eq!(engine.decrypt(&ciphertext, &key).unwrap(), plaintext);
    }
}
