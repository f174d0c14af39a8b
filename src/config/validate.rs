// src/config/validate.rs

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{NotifierError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = crate::errors::NotifierError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.watcher, raw.service, raw.identity))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_watcher(cfg)?;
    validate_service(cfg)?;
    Ok(())
}

fn validate_watcher(cfg: &RawConfigFile) -> Result<()> {
    if cfg.watcher.folder.as_os_str().is_empty() {
        return Err(NotifierError::ConfigError(
            "[watcher].folder must not be empty".to_string(),
        ));
    }

    if cfg.watcher.notify_retries == 0 {
        return Err(NotifierError::ConfigError(
            "[watcher].notify_retries must be >= 1 (got 0)".to_string(),
        ));
    }

    Ok(())
}

fn validate_service(cfg: &RawConfigFile) -> Result<()> {
    let url = cfg.service.base_url.trim();
    if url.is_empty() {
        return Err(NotifierError::ConfigError(
            "[service].base_url must be set".to_string(),
        ));
    }
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        return Err(NotifierError::ConfigError(format!(
            "[service].base_url must start with http:// or https:// (got '{}')",
            url
        )));
    }
    Ok(())
}
