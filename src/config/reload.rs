// src/config/reload.rs

//! Live reload of the configuration file.
//!
//! The parent directory of the config file is watched (not the file itself)
//! so editor-style atomic saves, which write a new file and rename it over the
//! old one, are still noticed.

use std::path::{Path, PathBuf};

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::config::loader::load_and_validate;
use crate::config::model::ConfigFile;
use crate::errors::Result;
use crate::runtime::AppEvent;

/// Keeps the config directory watch alive. Dropping it stops reloading.
pub struct ConfigWatchHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for ConfigWatchHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConfigWatchHandle").finish()
    }
}

/// What has to change in the running watcher after a reload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadPlan {
    /// Folder, retry count or service URL changed: the session must be
    /// restarted.
    pub restart: bool,
    /// New value for the live enable flag, if it changed.
    pub notify_enabled: Option<bool>,
    /// New registration id, if it changed.
    pub registration_id: Option<Option<String>>,
}

impl ReloadPlan {
    pub fn is_noop(&self) -> bool {
        !self.restart && self.notify_enabled.is_none() && self.registration_id.is_none()
    }
}

/// Compare two configurations and describe the minimal update.
pub fn plan_reload(old: &ConfigFile, new: &ConfigFile) -> ReloadPlan {
    let restart = old.watcher.folder != new.watcher.folder
        || old.watcher.notify_retries != new.watcher.notify_retries
        || old.service.base_url != new.service.base_url;

    let notify_enabled = match new.watcher.notify_enabled {
        Some(enabled) if old.watcher.notify_enabled != Some(enabled) => Some(enabled),
        _ => None,
    };

    let registration_id = if old.identity.registration_id != new.identity.registration_id {
        Some(new.identity.registration_id.clone())
    } else {
        None
    };

    ReloadPlan {
        restart,
        notify_enabled,
        registration_id,
    }
}

/// Watch `path` and send [`AppEvent::ConfigReloaded`] whenever it is created
/// or modified and still parses. Broken edits are logged and ignored.
pub fn spawn_config_watcher(
    path: impl Into<PathBuf>,
    app_tx: mpsc::Sender<AppEvent>,
) -> Result<ConfigWatchHandle> {
    let path = path.into();
    let path = path.canonicalize().unwrap_or(path);
    let watch_dir = config_dir(&path);

    let (event_tx, mut event_rx) = mpsc::unbounded_channel::<Event>();

    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) => {
                let _ = event_tx.send(event);
            }
            Err(err) => warn!("config watch error: {err}"),
        },
        Config::default(),
    )?;

    watcher.watch(&watch_dir, RecursiveMode::NonRecursive)?;
    info!("watching config file {:?} for changes", path);

    tokio::spawn(async move {
        while let Some(event) = event_rx.recv().await {
            let affects_config = event
                .paths
                .iter()
                .any(|p| p.file_name() == path.file_name());
            let is_write = matches!(event.kind, EventKind::Create(_) | EventKind::Modify(_));
            if !affects_config || !is_write {
                continue;
            }

            match load_and_validate(&path) {
                Ok(cfg) => {
                    debug!("config file changed; reloaded");
                    if app_tx.send(AppEvent::ConfigReloaded(cfg)).await.is_err() {
                        break;
                    }
                }
                Err(err) => warn!("failed to reload config (keeping previous): {err}"),
            }
        }
        debug!("config watch loop finished");
    });

    Ok(ConfigWatchHandle { _inner: watcher })
}

fn config_dir(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}
