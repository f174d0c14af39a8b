// src/runtime.rs

//! Long-running `watch` mode.
//!
//! [`Runtime`] owns the [`MarkerWatcher`] and reacts to [`AppEvent`]s coming
//! from the config reloader and the Ctrl-C handler. All watcher mutations
//! (start, stop, enable toggle) happen on this one task.

use std::fmt;
use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::cli::WatchArgs;
use crate::config::{plan_reload, ConfigFile};
use crate::delivery::{HttpNotifyClient, SharedIdentity};
use crate::errors::{NotifierError, Result};
use crate::watch::MarkerWatcher;

/// Events flowing into the runtime.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The config file changed on disk and was successfully re-parsed.
    ConfigReloaded(ConfigFile),
    /// Graceful shutdown requested (e.g. Ctrl-C).
    ShutdownRequested,
}

/// Apply command-line overrides on top of a loaded config.
pub fn apply_watch_overrides(cfg: &mut ConfigFile, args: &WatchArgs) {
    if let Some(folder) = &args.folder {
        cfg.watcher.folder = folder.clone();
    }
    if let Some(retries) = args.notify_retries {
        cfg.watcher.notify_retries = retries;
    }
    if args.disable_notify {
        cfg.watcher.notify_enabled = Some(false);
    }
}

pub struct Runtime {
    watcher: MarkerWatcher,
    identity: SharedIdentity,
    config: ConfigFile,
    overrides: WatchArgs,
    event_rx: mpsc::Receiver<AppEvent>,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("watcher", &self.watcher)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(
        watcher: MarkerWatcher,
        identity: SharedIdentity,
        config: ConfigFile,
        overrides: WatchArgs,
        event_rx: mpsc::Receiver<AppEvent>,
    ) -> Self {
        Self {
            watcher,
            identity,
            config,
            overrides,
            event_rx,
        }
    }

    /// Main event loop.
    ///
    /// A failed initial start is fatal only when the config cannot change
    /// (`--no-reload`); otherwise the runtime waits for a fixed config.
    pub async fn run(mut self) -> Result<()> {
        if let Err(err) = self.watcher.start(&self.config.watcher) {
            if self.overrides.no_reload {
                return Err(err);
            }
            error!("Folder watcher failed to start: {err}; waiting for a config change");
        }

        while let Some(event) = self.event_rx.recv().await {
            debug!(?event, "runtime received event");
            match event {
                AppEvent::ConfigReloaded(mut new_config) => {
                    apply_watch_overrides(&mut new_config, &self.overrides);
                    self.apply_config(new_config);
                }
                AppEvent::ShutdownRequested => {
                    info!("shutdown requested");
                    break;
                }
            }
        }

        self.watcher.stop();
        info!("runtime exiting");
        Ok(())
    }

    fn apply_config(&mut self, new_config: ConfigFile) {
        let plan = plan_reload(&self.config, &new_config);
        if plan.is_noop() && self.watcher.is_running() {
            debug!("config reloaded without relevant changes");
            self.config = new_config;
            return;
        }

        if let Some(id) = plan.registration_id {
            info!(registered = id.is_some(), "registration id updated");
            self.identity.set(id);
        }

        if self.config.service.base_url != new_config.service.base_url {
            self.watcher
                .set_client(Arc::new(HttpNotifyClient::new(&new_config.service.base_url)));
        }

        if plan.restart || !self.watcher.is_running() {
            match self.watcher.start(&new_config.watcher) {
                Ok(()) => info!("watcher restarted with new configuration"),
                Err(NotifierError::DirectoryNotFound(dir)) => {
                    error!("Folder watcher failed to start: {:?} does not exist", dir)
                }
                Err(err) => error!("Folder watcher failed to start: {err}"),
            }
        } else if let Some(enabled) = plan.notify_enabled {
            self.watcher.set_notify_enabled(enabled);
        }

        self.config = new_config;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{IdentitySection, RawConfigFile, ServiceSection, WatchSettings};
    use std::path::PathBuf;

    fn base_config() -> ConfigFile {
        ConfigFile::try_from(RawConfigFile {
            watcher: WatchSettings::new("/games/wow", 1),
            service: ServiceSection {
                base_url: "http://localhost:3000".to_string(),
            },
            identity: IdentitySection::default(),
        })
        .unwrap()
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut cfg = base_config();
        let args = WatchArgs {
            folder: Some(PathBuf::from("/games/ptr")),
            notify_retries: Some(4),
            disable_notify: true,
            no_reload: false,
        };
        apply_watch_overrides(&mut cfg, &args);
        assert_eq!(cfg.watcher.folder, PathBuf::from("/games/ptr"));
        assert_eq!(cfg.watcher.notify_retries, 4);
        assert_eq!(cfg.watcher.notify_enabled, Some(false));
    }

    #[test]
    fn empty_overrides_change_nothing() {
        let mut cfg = base_config();
        apply_watch_overrides(&mut cfg, &WatchArgs::default());
        assert_eq!(cfg, base_config());
    }
}
