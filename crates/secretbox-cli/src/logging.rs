//! Tracing subscriber initialization.
//!
//! Logs go to stderr so that stdout carries only the one-line result.
//! `SECRETBOX_LOG` takes `EnvFilter` directives (e.g. `debug`,
//! `secretbox_core=trace`); the default shows warnings only.

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use crate::constants::LOG_ENV;

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true);

    // A subscriber may already be installed when embedded in tests.
    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}
