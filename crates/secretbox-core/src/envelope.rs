//! Envelope text format.
//!
//! A sealed blob is stored as standard padded base64, split into lines of
//! [`LINE_WIDTH`] characters joined by `\n`. The last line may be shorter and
//! there is no terminating newline.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Maximum number of base64 characters per envelope line.
pub const LINE_WIDTH: usize = 80;

/// Render a sealed blob as envelope text.
pub fn encode(blob: &[u8]) -> String {
    wrap(&STANDARD.encode(blob), LINE_WIDTH)
}

/// Recover the sealed blob from envelope text.
///
/// Line breaks in any convention (`\r\n`, `\n`, `\r`) are ignored. Any other
/// character outside the base64 alphabet is a decode error.
pub fn decode(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    STANDARD.decode(unwrap(text).as_bytes())
}

fn unwrap(text: &str) -> String {
    text.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

fn wrap(text: &str, width: usize) -> String {
    let mut wrapped = String::with_capacity(text.len() + text.len() / width);
    for (i, ch) in text.chars().enumerate() {
        if i > 0 && i % width == 0 {
            wrapped.push('\n');
        }
        wrapped.push(ch);
    }
    wrapped
}
