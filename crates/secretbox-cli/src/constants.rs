//! Constants used throughout the CLI.

/// Exit codes for the CLI.
///
/// Every validation or runtime failure shares one code so scripts only need
/// to test for non-zero.
pub mod exit_codes {
    /// Any validation or runtime error.
    pub const FAILURE: i32 = 1;
}

/// Environment variable holding log filter directives.
pub const LOG_ENV: &str = "SECRETBOX_LOG";
