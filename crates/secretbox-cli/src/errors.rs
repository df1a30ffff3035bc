//! Error reporting at the process boundary.

use secretbox_core::SecretBoxError;

use crate::constants::exit_codes;

/// Render an error as the single line printed on stdout.
///
/// The argument-count usage line prints bare; everything else gets an
/// `Error:` prefix.
/// Multi-line messages (e.g. TOML parse errors) are folded onto one line.
pub fn error_line(err: &anyhow::Error) -> String {
    let message = match err.downcast_ref::<SecretBoxError>() {
        Some(SecretBoxError::Usage(usage)) => return fold(usage),
        Some(core) => core.to_string(),
        None => err.to_string(),
    };
    format!("Error: {}", fold(&message))
}

fn fold(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Print the error line to stdout and exit with the failure code.
pub fn exit_with(err: &anyhow::Error) -> ! {
    println!("{}", error_line(err));
    std::process::exit(exit_codes::FAILURE)
}
