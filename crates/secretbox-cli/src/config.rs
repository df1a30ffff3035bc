use std::path::{Path, PathBuf};

use serde::Deserialize;

use secretbox_core::DEFAULT_SERVICE;

#[derive(Debug, Default, Deserialize)]
pub struct SecretBoxConfig {
    #[serde(default)]
    pub store: StoreSection,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StoreSection {
    #[serde(default)]
    pub backend: Backend,
    #[serde(default = "default_service")]
    pub service: String,
    pub keyfile_dir: Option<String>,
}

impl Default for StoreSection {
    fn default() -> Self {
        Self {
            backend: Backend::default(),
            service: default_service(),
            keyfile_dir: None,
        }
    }
}

/// Where master keys are kept.
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Backend {
    /// OS credential store
    #[default]
    Keychain,
    /// Owner-only files under the user's data directory
    Keyfile,
}

fn default_service() -> String {
    DEFAULT_SERVICE.to_string()
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_keyfile_dir() -> anyhow::Result<PathBuf> {
    Ok(xdg_data_dir()?.join("keys"))
}

pub fn read_config(path: &Path) -> anyhow::Result<SecretBoxConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

/// Load the config file.
///
/// An explicitly named file must exist. The default location is optional
/// and falls back to built-in defaults.
pub fn load_config(explicit: Option<&Path>) -> anyhow::Result<SecretBoxConfig> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    let path = default_config_path()?;
    if path.exists() {
        tracing::debug!(path = %path.display(), "loading config");
        return read_config(&path);
    }
    Ok(SecretBoxConfig::default())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("secretbox"));
        }
    }
    Ok(home_dir()?.join(".config").join("secretbox"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("secretbox"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("secretbox"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}
