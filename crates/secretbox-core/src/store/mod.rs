//! Master key storage.
//!
//! A [`KeyStore`] holds at most one [`MasterKey`] per [`Scope`]. Stores never
//! overwrite an existing key: losing it would make every envelope sealed
//! under it unrecoverable.

mod keychain;
mod keyfile;
mod memory;

pub use keychain::KeychainStore;
pub use keyfile::KeyfileStore;
pub use memory::MemoryKeyStore;

use crate::error::Result;
use crate::seal::{MasterKey, Scope};

/// Persistence for per-scope master keys.
pub trait KeyStore {
    /// Fetch the key for `scope`, or `None` if it was never created.
    fn load(&self, scope: &Scope) -> Result<Option<MasterKey>>;

    /// Persist a newly created key for `scope`.
    ///
    /// Fails with [`KeyExists`](crate::SecretBoxError::KeyExists) when a key is already
    /// present, including one written by a concurrent caller. Callers
    /// should then [`load`](KeyStore::load) and use the stored key.
    fn store(&self, scope: &Scope, key: &MasterKey) -> Result<()>;
}
