//! In-process token store. Absent on every fresh instance.

use std::sync::{Mutex, PoisonError};

use super::{Slots, StorageKeys, StoreError, StoredSession, TokenStore};
use crate::api::User;

#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    keys: StorageKeys,
    slots: Mutex<Slots>,
}

impl MemoryTokenStore {
    #[must_use]
    pub fn new(keys: StorageKeys) -> Self {
        Self { keys, slots: Mutex::new(Slots::new()) }
    }

    #[must_use]
    pub fn keys(&self) -> &StorageKeys {
        &self.keys
    }

    /// Write a raw slot value, bypassing encoding.
    pub fn set_raw(&self, key: &str, value: &str) {
        self.lock().insert(key.to_owned(), value.to_owned());
    }

    #[must_use]
    pub fn get_raw(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl TokenStore for MemoryTokenStore {
    fn save(&self, token: &str, user: &User) -> Result<(), StoreError> {
        super::encode_slots(&mut self.lock(), &self.keys, token, user)
    }

    fn load(&self) -> Option<StoredSession> {
        super::decode_slots(&self.lock(), &self.keys)
    }

    fn clear(&self) -> Result<(), StoreError> {
        super::remove_slots(&mut self.lock(), &self.keys);
        Ok(())
    }

    fn token(&self) -> Option<String> {
        super::token_slot(&self.lock(), &self.keys)
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
