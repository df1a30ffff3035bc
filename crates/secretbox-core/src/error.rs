//! Error types for SecretBox core operations.
//!
//! Every failure is terminal for an invocation. Messages are written for the
//! end user; the CLI prints them verbatim behind an `Error:` prefix.

use thiserror::Error;

/// Result type alias for SecretBox operations.
pub type Result<T> = std::result::Result<T, SecretBoxError>;

/// Usage line printed for argument-count errors.
pub const USAGE: &str = "Usage: secretbox <encrypt|decrypt> <input-file> <output-file> [entropy-hex]";

/// Which hex rule an entropy argument broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HexError {
    #[error("Entropy cannot be empty")]
    Empty,

    #[error("Entropy must be a valid hex string (0-9, A-F)")]
    InvalidCharacters,

    #[error("Entropy hex string must have even length")]
    OddLength,
}

/// Core error type for SecretBox operations.
#[derive(Debug, Error)]
pub enum SecretBoxError {
    /// Wrong argument count; carries the usage line
    #[error("{0}")]
    Usage(String),

    /// Mode literal is neither `encrypt` nor `decrypt`
    #[error("Invalid mode '{0}'. Use 'encrypt' or 'decrypt'.")]
    InvalidMode(String),

    /// Input path does not exist
    #[error("Input file not found: {0}")]
    InputNotFound(String),

    /// Entropy argument is not usable hex
    #[error(transparent)]
    InvalidEntropy(#[from] HexError),

    /// Plaintext rejected before sealing
    #[error("Input file is not valid JSON")]
    InputNotJson,

    /// Base64 decode or unseal failure. The cause is deliberately not carried.
    #[error("Decryption failed. Invalid encrypted file or different user.")]
    UnsealFailed,

    /// Unsealing succeeded but produced something that is not JSON
    #[error("Decrypted content is not valid JSON")]
    DecryptedContentNotJson,

    /// Sealing primitive failed
    #[error("Encryption failed: {0}")]
    Seal(String),

    /// Another writer created the scope's key first
    #[error("Key already exists: {0}")]
    KeyExists(String),

    /// Credential store or keyfile failure
    #[error("Key store error: {0}")]
    KeyStore(String),

    /// File system failure
    #[error("I/O error: {0}")]
    Io(String),
}

impl SecretBoxError {
    /// Argument-count error carrying the usage line.
    pub fn usage() -> Self {
        SecretBoxError::Usage(USAGE.to_string())
    }

    /// Unrecognized mode literal.
    pub fn invalid_mode(mode: &str) -> Self {
        SecretBoxError::InvalidMode(mode.to_string())
    }
}

impl From<std::io::Error> for SecretBoxError {
    fn from(err: std::io::Error) -> Self {
        SecretBoxError::Io(err.to_string())
    }
}
