//! OS credential store backend.
//!
//! Uses the `keyring` crate, which maps to:
//! - macOS Keychain
//! - Windows Credential Manager
//! - Linux Secret Service (GNOME Keyring, KDE Wallet) or kernel keyutils
//!
//! Entries are owned by the OS account that created them, which is what
//! scopes an envelope to one user on one machine.

use super::KeyStore;
use crate::error::{Result, SecretBoxError};
use crate::seal::{MasterKey, Scope};

/// Key store backed by the platform credential store.
#[derive(Debug, Default, Clone, Copy)]
pub struct KeychainStore;

impl KeychainStore {
    pub fn new() -> Self {
        Self
    }

    fn entry(&self, scope: &Scope) -> Result<keyring::Entry> {
        keyring::Entry::new(scope.service(), scope.account())
            .map_err(|e| SecretBoxError::KeyStore(format!("Keychain entry failed: {}", e)))
    }
}

impl KeyStore for KeychainStore {
    fn load(&self, scope: &Scope) -> Result<Option<MasterKey>> {
        let entry = self.entry(scope)?;
        match entry.get_password() {
            Ok(value) => MasterKey::from_base64(&value).map(Some),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(err) => Err(SecretBoxError::KeyStore(format!(
                "Keychain read failed: {}",
                err
            ))),
        }
    }

    /// `keyring` has no create-if-absent call, so a writer racing another
    /// first seal can still land between the check and the write. Reading
    /// the entry back narrows that window: a writer that finds someone
    /// else's key reports `KeyExists` and the caller adopts the stored key.
    fn store(&self, scope: &Scope, key: &MasterKey) -> Result<()> {
        let exists = || {
            SecretBoxError::KeyExists(format!("{}/{}", scope.service(), scope.account()))
        };
        let entry = self.entry(scope)?;
        if self.load(scope)?.is_some() {
            return Err(exists());
        }
        entry
            .set_password(&key.to_base64())
            .map_err(|e| SecretBoxError::KeyStore(format!("Keychain write failed: {}", e)))?;

        match self.load(scope)? {
            Some(stored) if stored == *key => Ok(()),
            _ => Err(exists()),
        }
    }
}
