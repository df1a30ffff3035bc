//! # SecretBox Core
//!
//! Core library for SecretBox - seals JSON documents so that only the same
//! user account on the same machine can open them again.
//!
//! This crate provides the sealing pipeline and its building blocks
//! independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **invocation**: Mode and argument validation
//! - **entropy**: Hex parsing for auxiliary entropy
//! - **json**: JSON well-formedness check
//! - **envelope**: Wrapped base64 text format
//! - **seal**: `Sealer` capability, scopes and the age-backed implementation
//! - **store**: Master key storage (OS keychain, keyfile, memory)
//! - **pipeline**: Encrypt/decrypt over strings and files

pub mod entropy;
pub mod envelope;
pub mod error;
pub mod fs;
pub mod invocation;
pub mod json;
pub mod pipeline;
pub mod seal;
pub mod store;

pub use entropy::{parse_hex, Entropy};
pub use error::{HexError, Result, SecretBoxError, USAGE};
pub use invocation::{Invocation, Mode};
pub use json::is_valid_json;
pub use pipeline::{decrypt_file, encrypt_file, run, seal_document, unseal_envelope};
pub use seal::{AgeSealer, MasterKey, Scope, Sealer, DEFAULT_SERVICE};
pub use store::{KeyStore, KeychainStore, KeyfileStore, MemoryKeyStore};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
