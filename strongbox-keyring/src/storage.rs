//! Process-local single-slot key cache.

use std::sync::{Mutex, PoisonError};
use strongbox_crypto::Key;

/// Holds at most one [`Key`] for the lifetime of the process.
///
/// The slot is guarded by a lock, and lazy initialization goes through
/// [`KeyStorage::get_or_try_insert_with`], which holds the lock across
/// the whole check-then-generate-then-store sequence. Two callers racing
/// on a cold slot therefore observe the same key; without this, the
/// loser's key would be silently discarded and data already encrypted
/// with it would become undecryptable.
///
/// No hidden singleton: construct one and pass it (typically behind an
/// `Arc`) to the collaborators that need it.
#[derive(Debug, Default)]
pub struct KeyStorage {
    slot: Mutex<Option<Key>>,
}

impl KeyStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached key, if one has been set.
    pub fn get_key(&self) -> Option<Key> {
        self.lock().clone()
    }

    /// Replaces the slot unconditionally (last write wins).
    pub fn set_key(&self, key: Key) {
        *self.lock() = Some(key);
    }

    /// Returns the cached key, or stores and returns the result of `init`.
    ///
    /// The lock is held for the duration of `init`, so the slot is filled
    /// at most once per cold start.
    pub fn get_or_try_insert_with<E>(
        &self,
        init: impl FnOnce() -> Result<Key, E>,
    ) -> Result<Key, E> {
        let mut slot = self.lock();
        match &*slot {
            Some(key) => Ok(key.clone()),
            None => {
                let key = init()?;
                *slot = Some(key.clone());
                Ok(key)
            }
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<Key>> {
        // A panic while holding the lock cannot corrupt an Option swap;
        // recover the guard instead of propagating the poison.
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
