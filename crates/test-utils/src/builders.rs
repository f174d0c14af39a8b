#![allow(dead_code)]

use std::path::Path;

use queuenotifier::config::{
    ConfigFile, IdentitySection, RawConfigFile, ServiceSection, WatchSettings,
};

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile {
                watcher: WatchSettings::default(),
                service: ServiceSection {
                    base_url: "http://127.0.0.1:9".to_string(),
                },
                identity: IdentitySection::default(),
            },
        }
    }

    pub fn folder(mut self, folder: impl AsRef<Path>) -> Self {
        self.config.watcher.folder = folder.as_ref().to_path_buf();
        self
    }

    pub fn notify_retries(mut self, retries: u32) -> Self {
        self.config.watcher.notify_retries = retries;
        self
    }

    pub fn notify_enabled(mut self, enabled: bool) -> Self {
        self.config.watcher.notify_enabled = Some(enabled);
        self
    }

    pub fn base_url(mut self, url: &str) -> Self {
        self.config.service.base_url = url.to_string();
        self
    }

    pub fn registration_id(mut self, id: &str) -> Self {
        self.config.identity.registration_id = Some(id.to_string());
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}
