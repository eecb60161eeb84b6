//! Argon2id key derivation.

use crate::error::{CryptoError, CryptoResult};
use crate::key::{SymmetricKey, KEY_SIZE};
use argon2::{Algorithm, Argon2, Params, Version};
use rand::rngs::OsRng;
use rand::RngCore;
use zeroize::Zeroize;

/// Argon2id salt length in bytes.
pub const SALT_SIZE: usize = 16;

/// Random salt for password-based key derivation.
#[derive(Clone, Debug)]
pub struct Salt([u8; SALT_SIZE]);

impl Salt {
    /// Generates a fresh random salt from the OS secure RNG.
    pub fn random() -> CryptoResult<Self> {
        let mut bytes = [0u8; SALT_SIZE];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::Environment(format!("secure RNG unavailable: {e}")))?;
        Ok(Self(bytes))
    }

    pub fn from_bytes(bytes: [u8; SALT_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; SALT_SIZE] {
        &self.0
    }
}

/// Argon2id cost parameters.
///
/// The defaults follow the argon2 crate's recommended parameters. The
/// derivation is intentionally expensive; hosts without enough memory for
/// `m_cost` fail with [`CryptoError::Environment`].
#[derive(Clone, Debug)]
pub struct KdfParams {
    /// Memory cost in KiB.
    pub m_cost: u32,
    /// Number of passes.
    pub t_cost: u32,
    /// Degree of parallelism.
    pub p_cost: u32,
}

impl Default for KdfParams {
    fn default() -> Self {
        Self {
            m_cost: Params::DEFAULT_M_COST,
            t_cost: Params::DEFAULT_T_COST,
            p_cost: Params::DEFAULT_P_COST,
        }
    }
}

/// Derives a 32-byte key from a password and salt using Argon2id.
pub fn derive_key(password: &str, salt: &Salt, params: &KdfParams) -> CryptoResult<SymmetricKey> {
    let params = Params::new(params.m_cost, params.t_cost, params.p_cost, Some(KEY_SIZE))
        .map_err(|e| CryptoError::Environment(format!("invalid Argon2id parameters: {e}")))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut out = [0u8; KEY_SIZE];
    argon2
        .hash_password_into(password.as_bytes(), salt.as_bytes(), &mut out)
        .map_err(|e| CryptoError::Environment(format!("Argon2id derivation failed: {e}")))?;

    let key = SymmetricKey::from_bytes(out);
    out.zeroize();
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_password_and_salt_derive_same_key() {
        let salt = Salt::from_bytes(*b"0123456789abcdef");
        let a = derive_key("correct horse", &salt, &KdfParams::default()).unwrap();
        let b = derive_key("correct horse", &salt, &KdfParams::default()).unwrap();
        assert_eq!(a.as_bytes(), b.as_bytes());
    }

    #[test]
    fn different_salts_derive_different_keys() {
        let a = derive_key("pw", &Salt::from_bytes([1u8; SALT_SIZE]), &KdfParams::default())
            .unwrap();
        let b = derive_key("pw", &Salt::from_bytes([2u8; SALT_SIZE]), &KdfParams::default())
            .unwrap();
        assert_ne!(a.as_bytes(), b.as_bytes());
    }
}
