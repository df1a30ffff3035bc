//! Command-line invocation model.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::entropy::{parse_entropy_arg, Entropy};
use crate::error::{Result, SecretBoxError};

/// Direction of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encrypt,
    Decrypt,
}

impl FromStr for Mode {
    type Err = SecretBoxError;

    /// Case-insensitive; only `encrypt` and `decrypt` are accepted.
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "encrypt" => Ok(Mode::Encrypt),
            "decrypt" => Ok(Mode::Decrypt),
            _ => Err(SecretBoxError::invalid_mode(s)),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Encrypt => write!(f, "encrypt"),
            Mode::Decrypt => write!(f, "decrypt"),
        }
    }
}

/// Everything one run needs. Immutable once validated.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub mode: Mode,
    pub input: PathBuf,
    pub output: PathBuf,
    pub entropy: Option<Entropy>,
}

impl Invocation {
    /// Validate raw positional arguments: `mode input output [entropy-hex]`.
    ///
    /// Checks run in order (count, mode, input existence, entropy) and stop
    /// at the first failure, so nothing touches key material for a run that
    /// could never succeed.
    pub fn from_args<S: AsRef<str>>(args: &[S]) -> Result<Self> {
        if args.len() != 3 && args.len() != 4 {
            return Err(SecretBoxError::usage());
        }
        let entropy_hex = args.get(3).map(|arg| arg.as_ref());
        Self::new(
            args[0].as_ref(),
            args[1].as_ref(),
            args[2].as_ref(),
            entropy_hex,
        )
    }

    pub fn new(
        mode: &str,
        input: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
        entropy_hex: Option<&str>,
    ) -> Result<Self> {
        let mode: Mode = mode.parse()?;
        let input = input.into();
        if !input.is_file() {
            return Err(SecretBoxError::InputNotFound(input.display().to_string()));
        }
        let entropy = parse_entropy_arg(entropy_hex)?;

        Ok(Self {
            mode,
            input,
            output: output.into(),
            entropy,
        })
    }
}
