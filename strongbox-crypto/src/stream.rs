//! Chunked file and stream encryption.
//!
//! Uses the XChaCha20-Poly1305 STREAM construction (`aead::stream`,
//! 32-bit BE counter) over 64 KiB plaintext chunks, so memory use is
//! bounded by the chunk size regardless of input length. Chunk reordering,
//! truncation, and tampering all fail authentication.
//!
//! Container layout:
//!
//! ```text
//! "SBX1" ‖ mode ‖ [salt, password mode only] ‖ stream nonce prefix
//! (u32-BE chunk length ‖ chunk ciphertext)*
//! ```
//!
//! File operations write to a temporary file in the destination directory
//! and rename it into place only on success, so a failed run never leaves
//! a partial output behind.

use crate::engine::resolve_key;
use crate::error::{CryptoError, CryptoResult};
use crate::kdf::{derive_key, KdfParams, Salt, SALT_SIZE};
use crate::key::{Key, SymmetricKey};
use aead::stream::{DecryptorBE32, EncryptorBE32};
use chacha20poly1305::aead::generic_array::GenericArray;
use chacha20poly1305::{KeyInit, XChaCha20Poly1305};
use rand::rngs::OsRng;
use rand::RngCore;
use std::fs::File;
use std::io::{BufReader, BufWriter, ErrorKind, Read, Write};
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;

/// Container magic.
const MAGIC: &[u8; 4] = b"SBX1";

/// Mode byte: encrypted with a key.
const MODE_KEY: u8 = 0x01;

/// Mode byte: encrypted with a password (salt follows in the header).
const MODE_PASSWORD: u8 = 0x02;

/// Plaintext bytes per chunk.
const CHUNK_SIZE: usize = 64 * 1024;

/// Poly1305 tag per chunk.
const CHUNK_TAG_SIZE: usize = 16;

/// STREAM nonce prefix: XChaCha20 nonce (24) minus the 32-bit counter
/// and the last-block flag.
const NONCE_PREFIX_SIZE: usize = 19;

/// How a decrypt operation obtains its key: a caller-supplied [`Key`], or
/// a password combined with the salt stored in the container header.
pub(crate) enum KeySource<'a> {
    Key(&'a Key),
    Password(&'a str),
}

pub(crate) fn encrypt_stream(
    input: &mut dyn Read,
    output: &mut dyn Write,
    raw: &SymmetricKey,
    salt: Option<&Salt>,
) -> CryptoResult<()> {
    output.write_all(MAGIC)?;
    match salt {
        None => output.write_all(&[MODE_KEY])?,
        Some(salt) => {
            output.write_all(&[MODE_PASSWORD])?;
            output.write_all(salt.as_bytes())?;
        }
    }

    let mut prefix = [0u8; NONCE_PREFIX_SIZE];
    OsRng
        .try_fill_bytes(&mut prefix)
        .map_err(|e| CryptoError::Environment(format!("secure RNG unavailable: {e}")))?;
    output.write_all(&prefix)?;

    let cipher = XChaCha20Poly1305::new(GenericArray::from_slice(raw.as_bytes()));
    let mut encryptor = EncryptorBE32::from_aead(cipher, GenericArray::from_slice(&prefix));

    // One-chunk lookahead so the final chunk is sealed with the STREAM
    // last-block flag, which is what makes truncation detectable.
    let mut current = read_chunk(input)?;
    loop {
        let next = read_chunk(input)?;
        if next.is_empty() {
            let sealed = encryptor
                .encrypt_last(current.as_slice())
                .map_err(|e| CryptoError::Environment(format!("chunk encryption failed: {e}")))?;
            write_framed(output, &sealed)?;
            break;
        }
        let sealed = encryptor
            .encrypt_next(current.as_slice())
            .map_err(|e| CryptoError::Environment(format!("chunk encryption failed: {e}")))?;
        write_framed(output, &sealed)?;
        current = next;
    }

    output.flush()?;
    Ok(())
}

pub(crate) fn decrypt_stream(
    input: &mut dyn Read,
    output: &mut dyn Write,
    source: KeySource<'_>,
) -> CryptoResult<()> {
    let mut magic = [0u8; 4];
    read_header(input, &mut magic)?;
    if &magic != MAGIC {
        return Err(CryptoError::BadFormat(
            "not an encrypted container (bad magic)".into(),
        ));
    }

    let mut mode = [0u8; 1];
    read_header(input, &mut mode)?;

    let raw = match (mode[0], source) {
        (MODE_KEY, KeySource::Key(key)) => resolve_key(key)?,
        (MODE_PASSWORD, KeySource::Password(password)) => {
            let mut salt = [0u8; SALT_SIZE];
            read_header(input, &mut salt)?;
            derive_key(password, &Salt::from_bytes(salt), &KdfParams::default())?
        }
        (MODE_KEY, KeySource::Password(_)) => {
            return Err(CryptoError::BadFormat(
                "container was encrypted with a key, not a password".into(),
            ));
        }
        (MODE_PASSWORD, KeySource::Key(_)) => {
            return Err(CryptoError::BadFormat(
                "container was encrypted with a password, not a key".into(),
            ));
        }
        (other, _) => {
            return Err(CryptoError::BadFormat(format!(
                "unknown container mode byte: {other:#04x}"
            )));
        }
    };

    let mut prefix = [0u8; NONCE_PREFIX_SIZE];
    read_header(input, &mut prefix)?;

    let cipher = XChaCha20Poly1305::new(GenericArray::from_slice(raw.as_bytes()));
    let mut decryptor = DecryptorBE32::from_aead(cipher, GenericArray::from_slice(&prefix));

    let mut current = read_framed(input)?.ok_or_else(truncated)?;
    loop {
        match read_framed(input)? {
            Some(next) => {
                let plaintext = decryptor
                    .decrypt_next(current.as_slice())
                    .map_err(|_| integrity_failure())?;
                output.write_all(&plaintext)?;
                current = next;
            }
            None => {
                let plaintext = decryptor
                    .decrypt_last(current.as_slice())
                    .map_err(|_| integrity_failure())?;
                output.write_all(&plaintext)?;
                break;
            }
        }
    }

    output.flush()?;
    Ok(())
}

pub(crate) fn encrypt_file(
    input: &Path,
    output: &Path,
    raw: &SymmetricKey,
    salt: Option<&Salt>,
) -> CryptoResult<()> {
    debug!("encrypting {} -> {}", input.display(), output.display());
    let mut reader = BufReader::new(File::open(input)?);
    write_atomically(output, |writer| encrypt_stream(&mut reader, writer, raw, salt))
}

pub(crate) fn decrypt_file(
    input: &Path,
    output: &Path,
    source: KeySource<'_>,
) -> CryptoResult<()> {
    debug!("decrypting {} -> {}", input.display(), output.display());
    let mut reader = BufReader::new(File::open(input)?);
    write_atomically(output, |writer| decrypt_stream(&mut reader, writer, source))
}

/// Runs `op` against a temporary file in `output`'s directory and renames
/// it into place only if `op` succeeds. On failure the temporary file is
/// removed when dropped, so the destination is never left partial.
fn write_atomically(
    output: &Path,
    op: impl FnOnce(&mut dyn Write) -> CryptoResult<()>,
) -> CryptoResult<()> {
    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let temp = NamedTempFile::new_in(dir)?;
    let mut writer = BufWriter::new(temp);

    op(&mut writer)?;

    let temp = writer
        .into_inner()
        .map_err(|e| CryptoError::Io(e.into_error()))?;
    temp.persist(output).map_err(|e| CryptoError::Io(e.error))?;
    Ok(())
}

/// Reads up to one chunk of plaintext; an empty result means EOF.
fn read_chunk(input: &mut dyn Read) -> CryptoResult<Vec<u8>> {
    let mut buf = vec![0u8; CHUNK_SIZE];
    let mut filled = 0;
    while filled < CHUNK_SIZE {
        let n = input.read(&mut buf[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    buf.truncate(filled);
    Ok(buf)
}

fn write_framed(output: &mut dyn Write, sealed: &[u8]) -> CryptoResult<()> {
    let len = u32::try_from(sealed.len())
        .map_err(|_| CryptoError::Environment("chunk exceeds frame size".into()))?;
    output.write_all(&len.to_be_bytes())?;
    output.write_all(sealed)?;
    Ok(())
}

/// Reads one length-framed ciphertext chunk; `None` at clean EOF.
///
/// A partial length header or a short chunk body means the container was
/// cut off, which is an integrity failure, not a format error.
fn read_framed(input: &mut dyn Read) -> CryptoResult<Option<Vec<u8>>> {
    let mut len_bytes = [0u8; 4];
    let mut filled = 0;
    while filled < len_bytes.len() {
        let n = input.read(&mut len_bytes[filled..])?;
        if n == 0 {
            if filled == 0 {
                return Ok(None);
            }
            return Err(truncated());
        }
        filled += n;
    }

    let len = u32::from_be_bytes(len_bytes) as usize;
    if len < CHUNK_TAG_SIZE || len > CHUNK_SIZE + CHUNK_TAG_SIZE {
        return Err(integrity_failure());
    }

    let mut chunk = vec![0u8; len];
    input.read_exact(&mut chunk).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            truncated()
        } else {
            CryptoError::Io(e)
        }
    })?;
    Ok(Some(chunk))
}

/// Reads a fixed-size header field; cutting the header short is a
/// structural problem with the container.
fn read_header(input: &mut dyn Read, buf: &mut [u8]) -> CryptoResult<()> {
    input.read_exact(buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            CryptoError::BadFormat("container header is truncated".into())
        } else {
            CryptoError::Io(e)
        }
    })
}

fn truncated() -> CryptoError {
    CryptoError::WrongKeyOrModifiedCiphertext("container is truncated".into())
}

fn integrity_failure() -> CryptoError {
    CryptoError::WrongKeyOrModifiedCiphertext(
        "chunk authentication failed (wrong key or tampered data)".into(),
    )
}
