//! Token store: persisted bearer token + user record.
//!
//! DESIGN
//! ======
//! Both implementations keep the same two string slots a browser would keep
//! in `localStorage`: the raw token and the JSON-encoded user, under
//! namespaced keys. Slot decoding is shared so corrupt-record handling is
//! identical across media.
//!
//! ERROR HANDLING
//! ==============
//! `load` never fails. Anything short of a well-formed pair is treated as
//! absent so a damaged store falls back to signed-out.

pub mod file;
pub mod memory;

use std::collections::BTreeMap;

use crate::api::User;

pub use file::FileTokenStore;
pub use memory::MemoryTokenStore;

pub const DEFAULT_NAMESPACE: &str = "safe";

/// Errors from writing or removing persisted slots.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to encode stored session: {0}")]
    Encode(#[from] serde_json::Error),
}

/// A token and the user it belongs to, as read back from storage.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredSession {
    pub token: String,
    pub user: User,
}

/// Persistent storage for the current session credentials.
pub trait TokenStore: Send + Sync {
    /// Persist both slots. Readers never see one without the other.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the medium cannot be written.
    fn save(&self, token: &str, user: &User) -> Result<(), StoreError>;

    /// The stored pair, or `None` if either slot is missing or unreadable.
    fn load(&self) -> Option<StoredSession>;

    /// Remove both slots. Clearing an empty store succeeds.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the medium cannot be written.
    fn clear(&self) -> Result<(), StoreError>;

    /// Raw token slot, independent of the user slot.
    fn token(&self) -> Option<String>;

    fn has_token(&self) -> bool {
        self.token().is_some()
    }
}

// =============================================================================
// SLOT LAYOUT
// =============================================================================

/// Namespaced slot names, e.g. `safe_auth_token` / `safe_user_data`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageKeys {
    pub token: String,
    pub user: String,
}

impl StorageKeys {
    #[must_use]
    pub fn new(namespace: &str) -> Self {
        Self { token: format!("{namespace}_auth_token"), user: format!("{namespace}_user_data") }
    }
}

impl Default for StorageKeys {
    fn default() -> Self {
        Self::new(DEFAULT_NAMESPACE)
    }
}

pub(crate) type Slots = BTreeMap<String, String>;

pub(crate) fn token_slot(slots: &Slots, keys: &StorageKeys) -> Option<String> {
    slots.get(&keys.token).filter(|t| !t.is_empty()).cloned()
}

pub(crate) fn decode_slots(slots: &Slots, keys: &StorageKeys) -> Option<StoredSession> {
    let token = token_slot(slots, keys)?;
    let raw_user = slots.get(&keys.user)?;
    match serde_json::from_str::<User>(raw_user) {
        Ok(user) => Some(StoredSession { token, user }),
        Err(e) => {
            tracing::warn!(key = %keys.user, error = %e, "stored user record is corrupt; treating session as absent");
            None
        }
    }
}

pub(crate) fn encode_slots(slots: &mut Slots, keys: &StorageKeys, token: &str, user: &User) -> Result<(), StoreError> {
    let raw_user = serde_json::to_string(user)?;
    slots.insert(keys.token.clone(), token.to_owned());
    slots.insert(keys.user.clone(), raw_user);
    Ok(())
}

pub(crate) fn remove_slots(slots: &mut Slots, keys: &StorageKeys) {
    slots.remove(&keys.token);
    slots.remove(&keys.user);
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
