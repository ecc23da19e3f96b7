//! File-backed token store.
//!
//! The file is a flat JSON object of slot name -> string value, so unrelated
//! keys written by other tools under a different namespace are preserved.
//! Writes land in a sibling temp file that is renamed over the target, so a
//! reader in another process sees either the previous pair or the new one.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use super::{Slots, StorageKeys, StoreError, StoredSession, TokenStore};
use crate::api::User;

#[derive(Debug)]
pub struct FileTokenStore {
    path: PathBuf,
    keys: StorageKeys,
    write_lock: Mutex<()>,
}

impl FileTokenStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, keys: StorageKeys) -> Self {
        Self { path: path.into(), keys, write_lock: Mutex::new(()) }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_slots(&self) -> Slots {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Slots::new(),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "token store unreadable");
                return Slots::new();
            }
        };
        match serde_json::from_str::<Slots>(&raw) {
            Ok(slots) => slots,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "token store file is corrupt");
                Slots::new()
            }
        }
    }

    fn write_slots(&self, slots: &Slots) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let body = serde_json::to_vec_pretty(slots)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl TokenStore for FileTokenStore {
    fn save(&self, token: &str, user: &User) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut slots = self.read_slots();
        super::encode_slots(&mut slots, &self.keys, token, user)?;
        self.write_slots(&slots)
    }

    fn load(&self) -> Option<StoredSession> {
        super::decode_slots(&self.read_slots(), &self.keys)
    }

    fn clear(&self) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let mut slots = self.read_slots();
        if !slots.contains_key(&self.keys.token) && !slots.contains_key(&self.keys.user) {
            return Ok(());
        }
        super::remove_slots(&mut slots, &self.keys);
        if slots.is_empty() {
            return match fs::remove_file(&self.path) {
                Err(e) if e.kind() != ErrorKind::NotFound => Err(e.into()),
                _ => Ok(()),
            };
        }
        self.write_slots(&slots)
    }

    fn token(&self) -> Option<String> {
        super::token_slot(&self.read_slots(), &self.keys)
    }
}

#[cfg(test)]
#[path = "file_test.rs"]
mod tests;
