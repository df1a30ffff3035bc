//! Age-backed sealer.
//!
//! The blob is an age passphrase file. The passphrase is never typed by
//! anyone: it is a BLAKE3 keyed hash of the scope's master key and the
//! caller's entropy, so it changes whenever either does.
//!
//! Note: age always runs scrypt over a passphrase, so each seal and unseal
//! costs on the order of a second.

use std::io::{Read, Write};
use std::iter;

use age::secrecy::SecretString;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use super::{MasterKey, Scope, Sealer};
use crate::error::{Result, SecretBoxError};
use crate::store::KeyStore;

/// Domain separator mixed into every derived passphrase.
const PASSPHRASE_CONTEXT: &[u8] = b"secretbox/seal/v1";

/// Sealer that keeps one master key per scope in a [`KeyStore`].
#[derive(Debug)]
pub struct AgeSealer<S> {
    store: S,
}

impl<S: KeyStore> AgeSealer<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Load the scope's key, creating one on first use.
    ///
    /// If another writer creates the key first, the stored key wins and the
    /// freshly generated one is dropped unused.
    fn key_for_seal(&self, scope: &Scope) -> Result<MasterKey> {
        if let Some(key) = self.store.load(scope)? {
            return Ok(key);
        }
        let key = MasterKey::generate()?;
        match self.store.store(scope, &key) {
            Ok(()) => {
                tracing::info!(
                    service = scope.service(),
                    account = scope.account(),
                    "created master key"
                );
                Ok(key)
            }
            Err(SecretBoxError::KeyExists(slot)) => {
                tracing::debug!(slot = %slot, "master key created concurrently");
                self.store.load(scope)?.ok_or_else(|| {
                    SecretBoxError::KeyStore(format!("Key for {} disappeared", slot))
                })
            }
            Err(err) => Err(err),
        }
    }
}

impl<S: KeyStore> Sealer for AgeSealer<S> {
    fn seal(&self, plaintext: &[u8], entropy: Option<&[u8]>, scope: &Scope) -> Result<Vec<u8>> {
        let key = self.key_for_seal(scope)?;
        let passphrase = derive_passphrase(&key, entropy);

        let encryptor = age::Encryptor::with_user_passphrase(passphrase);
        let mut sealed = Vec::new();
        let mut writer = encryptor
            .wrap_output(&mut sealed)
            .map_err(|e| SecretBoxError::Seal(format!("Failed to create encryptor: {}", e)))?;
        writer
            .write_all(plaintext)
            .map_err(|e| SecretBoxError::Seal(format!("Encryption write failed: {}", e)))?;
        writer
            .finish()
            .map_err(|e| SecretBoxError::Seal(format!("Encryption finish failed: {}", e)))?;

        tracing::debug!(
            plaintext_len = plaintext.len(),
            sealed_len = sealed.len(),
            with_entropy = entropy.is_some(),
            "sealed"
        );
        Ok(sealed)
    }

    fn unseal(&self, sealed: &[u8], entropy: Option<&[u8]>, scope: &Scope) -> Result<Vec<u8>> {
        let key = match self.store.load(scope) {
            Ok(Some(key)) => key,
            Ok(None) => {
                tracing::debug!(account = scope.account(), "no master key for scope");
                return Err(SecretBoxError::UnsealFailed);
            }
            Err(err) => {
                tracing::debug!(error = %err, "master key unavailable");
                return Err(SecretBoxError::UnsealFailed);
            }
        };
        let identity = age::scrypt::Identity::new(derive_passphrase(&key, entropy));

        let decryptor = age::Decryptor::new(sealed).map_err(|e| {
            tracing::debug!(error = %e, "not an age blob");
            SecretBoxError::UnsealFailed
        })?;
        let mut reader = decryptor
            .decrypt(iter::once(&identity as &dyn age::Identity))
            .map_err(|e| {
                tracing::debug!(error = %e, "age rejected the blob");
                SecretBoxError::UnsealFailed
            })?;

        let mut plaintext = Vec::new();
        reader.read_to_end(&mut plaintext).map_err(|e| {
            tracing::debug!(error = %e, "age stream truncated or tampered");
            SecretBoxError::UnsealFailed
        })?;

        tracing::debug!(plaintext_len = plaintext.len(), "unsealed");
        Ok(plaintext)
    }
}

fn derive_passphrase(key: &MasterKey, entropy: Option<&[u8]>) -> SecretString {
    let mut hasher = blake3::Hasher::new_keyed(key.as_bytes());
    hasher.update(PASSPHRASE_CONTEXT);
    match entropy {
        Some(bytes) => {
            hasher.update(&[1]);
            hasher.update(bytes);
        }
        None => {
            hasher.update(&[0]);
        }
    }
    SecretString::from(STANDARD.encode(hasher.finalize().as_bytes()))
}
