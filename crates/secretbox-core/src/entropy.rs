//! Auxiliary entropy parsing.
//!
//! Entropy arrives on the command line as hex. Spaces, tabs and `0x`/`0X`
//! prefixes are tolerated anywhere so that values copied from hex dumps or
//! source code can be pasted as-is.

use zeroize::Zeroizing;

use crate::error::HexError;

/// Caller-supplied bytes that must match between seal and unseal.
///
/// Never empty. Contents are zeroized on drop.
#[derive(Clone, PartialEq, Eq)]
pub struct Entropy(Zeroizing<Vec<u8>>);

impl Entropy {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl std::fmt::Debug for Entropy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entropy")
            .field("len", &self.0.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Interpret the optional fourth argument.
///
/// Absent, empty and whitespace-only values all mean no entropy.
pub fn parse_entropy_arg(arg: Option<&str>) -> Result<Option<Entropy>, HexError> {
    match arg {
        Some(value) if !value.trim().is_empty() => parse_hex(value).map(Some),
        _ => Ok(None),
    }
}

/// Decode a hex string into entropy bytes.
///
/// # Errors
///
/// - [`HexError::Empty`] if nothing is left after stripping whitespace and prefixes
/// - [`HexError::InvalidCharacters`] for anything outside `[0-9A-Fa-f]`
/// - [`HexError::OddLength`] if the digits do not pair up into bytes
pub fn parse_hex(input: &str) -> Result<Entropy, HexError> {
    if input.trim().is_empty() {
        return Err(HexError::Empty);
    }

    let cleaned = Zeroizing::new(
        input
            .replace(' ', "")
            .replace('\t', "")
            .replace("0x", "")
            .replace("0X", ""),
    );

    if cleaned.is_empty() {
        return Err(HexError::Empty);
    }
    if !cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(HexError::InvalidCharacters);
    }
    if cleaned.len() % 2 != 0 {
        return Err(HexError::OddLength);
    }

    let bytes = hex::decode(cleaned.as_bytes()).map_err(|_| HexError::InvalidCharacters)?;
    Ok(Entropy(Zeroizing::new(bytes)))
}
