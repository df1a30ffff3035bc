//! Account-scoped sealing.
//!
//! A [`Sealer`] turns plaintext bytes into an opaque blob that only the same
//! [`Scope`] (and the same optional entropy) can turn back. The envelope and
//! file layers never look inside the blob.
//!
//! ## Security Model
//!
//! - One random master key per scope, held by a [`KeyStore`](crate::store::KeyStore)
//!   (OS credential store by default)
//! - Per-call secret mixes the master key with the caller's entropy (BLAKE3 keyed hash)
//! - Blob is an age file encrypted to that secret
//!
//! We defend against:
//! - Copying the envelope to another account or machine
//! - Decrypting with the wrong auxiliary entropy
//!
//! We do NOT defend against:
//! - Code running as the same user with access to the credential store

pub mod age_sealer;
pub mod key;

pub use age_sealer::AgeSealer;
pub use key::{MasterKey, KEY_LENGTH};

use crate::error::Result;

/// Service name used for the default scope.
pub const DEFAULT_SERVICE: &str = "secretbox";

/// Key slot a seal is bound to.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Scope {
    service: String,
    account: String,
}

impl Scope {
    pub fn new(service: impl Into<String>, account: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            account: account.into(),
        }
    }

    /// Scope for the account running this process.
    pub fn current_user(service: impl Into<String>) -> Self {
        Self::new(service, current_login_name())
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn account(&self) -> &str {
        &self.account
    }
}

fn current_login_name() -> String {
    ["USER", "USERNAME", "LOGNAME"]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .map(|value| value.trim().to_string())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| "default".to_string())
}

/// Protect/unprotect capability.
pub trait Sealer {
    /// Seal `plaintext` for `scope`, optionally bound to `entropy`.
    fn seal(&self, plaintext: &[u8], entropy: Option<&[u8]>, scope: &Scope) -> Result<Vec<u8>>;

    /// Recover plaintext. Fails unless `scope` and `entropy` match the seal.
    fn unseal(&self, sealed: &[u8], entropy: Option<&[u8]>, scope: &Scope) -> Result<Vec<u8>>;
}

impl<T: Sealer + ?Sized> Sealer for Box<T> {
    fn seal(&self, plaintext: &[u8], entropy: Option<&[u8]>, scope: &Scope) -> Result<Vec<u8>> {
        (**self).seal(plaintext, entropy, scope)
    }

    fn unseal(&self, sealed: &[u8], entropy: Option<&[u8]>, scope: &Scope) -> Result<Vec<u8>> {
        (**self).unseal(sealed, entropy, scope)
    }
}
