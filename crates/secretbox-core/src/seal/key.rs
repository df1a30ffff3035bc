//! Per-user master key.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::{ZeroizeOnDrop, Zeroizing};

use crate::error::{Result, SecretBoxError};

/// Length of a master key in bytes.
pub const KEY_LENGTH: usize = 32;

/// Random secret held by a key store on behalf of one scope.
///
/// Key material is zeroized from memory on drop.
#[derive(Clone, PartialEq, Eq, ZeroizeOnDrop)]
pub struct MasterKey {
    key: [u8; KEY_LENGTH],
}

impl MasterKey {
    /// Generate a fresh key from the OS random source.
    pub fn generate() -> Result<Self> {
        let mut key = [0u8; KEY_LENGTH];
        getrandom::getrandom(&mut key)
            .map_err(|e| SecretBoxError::KeyStore(format!("Failed to generate key bytes: {}", e)))?;
        Ok(Self { key })
    }

    /// Rebuild a key from stored bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let key: [u8; KEY_LENGTH] = bytes.try_into().map_err(|_| {
            SecretBoxError::KeyStore(format!(
                "Stored key has length {}, expected {}",
                bytes.len(),
                KEY_LENGTH
            ))
        })?;
        Ok(Self { key })
    }

    /// Rebuild a key from its base64 text form.
    pub fn from_base64(encoded: &str) -> Result<Self> {
        let bytes = Zeroizing::new(
            STANDARD
                .decode(encoded.trim().as_bytes())
                .map_err(|e| SecretBoxError::KeyStore(format!("Stored key is not base64: {}", e)))?,
        );
        Self::from_slice(&bytes)
    }

    /// Base64 text form, for stores that only hold strings.
    pub fn to_base64(&self) -> Zeroizing<String> {
        Zeroizing::new(STANDARD.encode(self.key))
    }

    /// Avoid storing or logging this value.
    pub fn as_bytes(&self) -> &[u8; KEY_LENGTH] {
        &self.key
    }
}

impl std::fmt::Debug for MasterKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MasterKey")
            .field("key", &"[REDACTED]")
            .finish()
    }
}
