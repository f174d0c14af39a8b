// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::Result;

/// Environment variable that overrides `[identity].registration_id`.
pub const REGISTRATION_ID_ENV: &str = "QUEUENOTIFIER_REGISTRATION_ID";

/// Load a configuration file from a given path and return the raw `RawConfigFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation. Use [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load a configuration file from path, apply environment overrides and
/// validate it.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<ConfigFile> {
    let mut raw_config = load_from_path(&path)?;
    apply_env_overrides(&mut raw_config, std::env::var(REGISTRATION_ID_ENV).ok());
    let config = ConfigFile::try_from(raw_config)?;
    Ok(config)
}

/// A non-empty registration id from the environment wins over the file.
fn apply_env_overrides(raw: &mut RawConfigFile, registration_id: Option<String>) {
    if let Some(id) = registration_id.filter(|s| !s.trim().is_empty()) {
        raw.identity.registration_id = Some(id);
    }
}

/// Default config path: `QueueNotifier.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("QueueNotifier.toml")
}
