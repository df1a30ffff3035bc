use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::KeyStore;
use crate::error::{Result, SecretBoxError};
use crate::seal::{MasterKey, Scope};

/// In-process key store. Keys live as long as the store.
#[derive(Debug, Default)]
pub struct MemoryKeyStore {
    keys: Mutex<HashMap<Scope, MasterKey>>,
}

impl MemoryKeyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, scope: &Scope) -> Result<bool> {
        Ok(self.lock()?.contains_key(scope))
    }

    fn lock(&self) -> Result<MutexGuard<'_, HashMap<Scope, MasterKey>>> {
        self.keys
            .lock()
            .map_err(|_| SecretBoxError::KeyStore("Memory key store poisoned".to_string()))
    }
}

impl KeyStore for MemoryKeyStore {
    fn load(&self, scope: &Scope) -> Result<Option<MasterKey>> {
        Ok(self.lock()?.get(scope).cloned())
    }

    fn store(&self, scope: &Scope, key: &MasterKey) -> Result<()> {
        let mut keys = self.lock()?;
        if keys.contains_key(scope) {
            return Err(SecretBoxError::KeyExists(format!(
                "{}/{}",
                scope.service(),
                scope.account()
            )));
        }
        keys.insert(scope.clone(), key.clone());
        Ok(())
    }
}
