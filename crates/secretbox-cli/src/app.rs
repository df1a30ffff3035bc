//! Application wiring: settings resolution and backend selection.

use std::path::PathBuf;

use secretbox_core::{
    AgeSealer, Invocation, KeychainStore, KeyfileStore, Mode, Scope, Sealer,
};

use crate::cli::Cli;
use crate::config::{default_keyfile_dir, load_config, Backend};

/// Key store settings after applying flags, env and config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSettings {
    pub backend: Backend,
    pub service: String,
    pub keyfile_dir: PathBuf,
}

/// Resolve store settings. Precedence: flag/env, then config file, then defaults.
pub fn load_store_settings(cli: &Cli) -> anyhow::Result<StoreSettings> {
    let config = load_config(cli.config.as_deref())?;
    let keyfile_dir = match (&cli.keyfile_dir, config.store.keyfile_dir) {
        (Some(dir), _) => dir.clone(),
        (None, Some(dir)) => PathBuf::from(dir),
        (None, None) => default_keyfile_dir()?,
    };
    Ok(StoreSettings {
        backend: cli.backend.unwrap_or(config.store.backend),
        service: config.store.service,
        keyfile_dir,
    })
}

pub fn build_sealer(settings: &StoreSettings) -> Box<dyn Sealer> {
    match settings.backend {
        Backend::Keychain => Box::new(AgeSealer::new(KeychainStore::new())),
        Backend::Keyfile => Box::new(AgeSealer::new(KeyfileStore::new(&settings.keyfile_dir))),
    }
}

/// Validate arguments, pick a backend and run one encrypt or decrypt.
pub fn run(cli: &Cli) -> anyhow::Result<Invocation> {
    let invocation = Invocation::from_args(&cli.args)?;
    let settings = load_store_settings(cli)?;
    tracing::debug!(
        mode = %invocation.mode,
        backend = ?settings.backend,
        service = %settings.service,
        "resolved invocation"
    );

    let sealer = build_sealer(&settings);
    let scope = Scope::current_user(&settings.service);
    secretbox_core::run(&sealer, &scope, &invocation)?;
    Ok(invocation)
}

/// Confirmation line printed on success.
pub fn success_line(invocation: &Invocation) -> String {
    let verb = match invocation.mode {
        Mode::Encrypt => "Encrypted",
        Mode::Decrypt => "Decrypted",
    };
    format!("{}: {}", verb, invocation.output.display())
}
