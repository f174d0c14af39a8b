// src/lib.rs

pub mod cli;
pub mod config;
pub mod delivery;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod runtime;
pub mod watch;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::cli::{CliArgs, Command, WatchArgs};
use crate::config::{load_and_validate, spawn_config_watcher, ConfigFile};
use crate::delivery::{
    HttpNotifyClient, LogOutcomeSink, NotifyClient, NotifyOutcome, NotifyRequest, SharedIdentity,
};
use crate::errors::NotifierError;
use crate::runtime::{apply_watch_overrides, AppEvent, Runtime};
use crate::watch::MarkerWatcher;

/// High-level entry point used by `main.rs`.
///
/// Loads the config and dispatches to the selected command.
pub async fn run(args: CliArgs) -> Result<()> {
    let config_path = args.config;
    let cfg = load_and_validate(&config_path)?;
    debug!(?cfg, "configuration loaded");

    match args.command.unwrap_or_default() {
        Command::Watch(watch_args) => run_watch(&config_path, cfg, watch_args).await,
        Command::Register { id } => run_register(&config_path, &cfg, id).await,
        Command::TestNotify => run_test_notify(&cfg).await,
    }
}

/// Watch mode. This wires together:
/// - the notification client and identity
/// - the marker watcher
/// - (optional) config reload
/// - Ctrl-C handling
async fn run_watch(config_path: &Path, mut cfg: ConfigFile, overrides: WatchArgs) -> Result<()> {
    apply_watch_overrides(&mut cfg, &overrides);

    let identity = SharedIdentity::new(cfg.identity.registration_id.clone());
    let client = Arc::new(HttpNotifyClient::new(&cfg.service.base_url));
    let watcher = MarkerWatcher::new(client, Arc::new(identity.clone()), Arc::new(LogOutcomeSink));

    let (app_tx, app_rx) = mpsc::channel::<AppEvent>(16);

    let _config_watch = if overrides.no_reload {
        None
    } else {
        Some(spawn_config_watcher(config_path, app_tx.clone())?)
    };

    // Ctrl-C → graceful shutdown.
    {
        let tx = app_tx.clone();
        tokio::spawn(async move {
            if let Err(e) = tokio::signal::ctrl_c().await {
                eprintln!("failed to listen for Ctrl+C: {e}");
                return;
            }
            let _ = tx.send(AppEvent::ShutdownRequested).await;
        });
    }

    let runtime = Runtime::new(watcher, identity, cfg, overrides, app_rx);
    runtime.run().await?;
    Ok(())
}

/// Register with the service and print the resulting `[identity]` section on
/// stdout.
async fn run_register(config_path: &Path, cfg: &ConfigFile, id: Option<String>) -> Result<()> {
    let id = id
        .or_else(|| cfg.identity.uuid.clone())
        .unwrap_or_else(|| Uuid::new_v4().to_string());
    info!("Initiating registration request with UUID: {}", id);

    let client = HttpNotifyClient::new(&cfg.service.base_url);
    let encoded_id = client.register(&id).await?;

    print!("{}", identity_section(&id, &encoded_id));
    eprintln!(
        "Registered. Copy the section above into {:?} (or set {}) to enable notifications.",
        config_path,
        config::REGISTRATION_ID_ENV
    );
    Ok(())
}

/// `[identity]` section pinning the registered uuid next to its encoded id,
/// so later `register` runs reuse the same uuid.
fn identity_section(uuid: &str, encoded_id: &str) -> String {
    format!("[identity]\nuuid = {uuid:?}\nregistration_id = {encoded_id:?}\n")
}

/// Send one notification without watching anything.
async fn run_test_notify(cfg: &ConfigFile) -> Result<()> {
    let encoded_id = cfg
        .identity
        .registration_id
        .clone()
        .filter(|s| !s.is_empty())
        .ok_or(NotifierError::NotRegistered)?;

    let request = NotifyRequest {
        encoded_id,
        notify_retries: cfg.watcher.notify_retries,
    };
    info!(?request, "Sending test notification");

    let client = HttpNotifyClient::new(&cfg.service.base_url);
    let outcome = match client.notify(request).await {
        Ok(result) => NotifyOutcome::Success { result },
        Err(NotifierError::DeliveryFailure(error)) => NotifyOutcome::Failure { error },
        Err(err) => NotifyOutcome::Failure {
            error: err.to_string(),
        },
    };

    println!("{}", outcome.to_json());
    match outcome {
        NotifyOutcome::Success { .. } => Ok(()),
        NotifyOutcome::Failure { error } => Err(NotifierError::DeliveryFailure(error).into()),
    }
}
