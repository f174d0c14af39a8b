// src/config/model.rs

use std::path::PathBuf;

use serde::Deserialize;

/// Default game folder, matching a stock retail install on Windows.
pub const DEFAULT_FOLDER: &str = r"C:\Program Files (x86)\World of Warcraft\_retail_";
pub const DEFAULT_NOTIFY_RETRIES: u32 = 1;

/// Configuration as read from a TOML file, before validation.
///
/// ```toml
/// [watcher]
/// folder = "D:\\Games\\World of Warcraft\\_retail_"
/// notify_retries = 2
/// notify_enabled = true
///
/// [service]
/// base_url = "https://queue.example.com/api"
///
/// [identity]
/// registration_id = "c2VjcmV0"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub watcher: WatchSettings,

    #[serde(default)]
    pub service: ServiceSection,

    #[serde(default)]
    pub identity: IdentitySection,
}

/// Validated configuration. Obtain one via `ConfigFile::try_from(raw)` or
/// [`load_and_validate`](crate::config::load_and_validate).
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigFile {
    pub watcher: WatchSettings,
    pub service: ServiceSection,
    pub identity: IdentitySection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(
        watcher: WatchSettings,
        service: ServiceSection,
        identity: IdentitySection,
    ) -> Self {
        Self {
            watcher,
            service,
            identity,
        }
    }
}

/// `[watcher]` section; also the input of
/// [`MarkerWatcher::start`](crate::watch::MarkerWatcher::start).
///
/// The camelCase aliases accept settings exported by the desktop client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WatchSettings {
    /// Game install folder. The watched directory is `<folder>/Screenshots`.
    #[serde(default = "default_folder")]
    pub folder: PathBuf,

    /// Forwarded verbatim to the remote service. Must be >= 1.
    #[serde(default = "default_notify_retries", alias = "notifyRetries")]
    pub notify_retries: u32,

    /// `None` keeps whatever the watcher was using before (initially `true`).
    #[serde(default, alias = "notifyEnabled")]
    pub notify_enabled: Option<bool>,
}

impl Default for WatchSettings {
    fn default() -> Self {
        Self {
            folder: default_folder(),
            notify_retries: DEFAULT_NOTIFY_RETRIES,
            notify_enabled: None,
        }
    }
}

impl WatchSettings {
    pub fn new(folder: impl Into<PathBuf>, notify_retries: u32) -> Self {
        Self {
            folder: folder.into(),
            notify_retries,
            notify_enabled: None,
        }
    }

    pub fn with_notify_enabled(mut self, enabled: bool) -> Self {
        self.notify_enabled = Some(enabled);
        self
    }
}

/// `[service]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ServiceSection {
    /// Base URL of the notification service; `/notify` and `/register` are
    /// appended to it.
    #[serde(default)]
    pub base_url: String,
}

/// `[identity]` section.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct IdentitySection {
    /// `encodedID` obtained from a previous `register` call.
    #[serde(default)]
    pub registration_id: Option<String>,

    /// Client UUID sent to `/register`. Generated when absent.
    #[serde(default)]
    pub uuid: Option<String>,
}

fn default_folder() -> PathBuf {
    PathBuf::from(DEFAULT_FOLDER)
}

fn default_notify_retries() -> u32 {
    DEFAULT_NOTIFY_RETRIES
}
