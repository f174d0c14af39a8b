// src/config/mod.rs

//! Configuration loading and validation for queuenotifier.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a config file from disk (`loader.rs`).
//! - Validate basic invariants (`validate.rs`).
//! - Reload the file while the watcher runs (`reload.rs`).

pub mod loader;
pub mod model;
pub mod reload;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, REGISTRATION_ID_ENV};
pub use model::{
    ConfigFile, IdentitySection, RawConfigFile, ServiceSection, WatchSettings, DEFAULT_FOLDER,
    DEFAULT_NOTIFY_RETRIES,
};
pub use reload::{plan_reload, spawn_config_watcher, ConfigWatchHandle, ReloadPlan};
