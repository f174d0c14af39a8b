// src/errors.rs

//! Crate-wide error type and result alias.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NotifierError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// `<folder>/Screenshots` is missing; the watch was not established.
    #[error("Screenshots directory not found: {0:?}")]
    DirectoryNotFound(PathBuf),

    /// No registration identifier is available; delivery for this file was
    /// aborted and the file was kept.
    #[error("No registered ID found")]
    NotRegistered,

    #[error("Notification delivery failed: {0}")]
    DeliveryFailure(String),

    #[error("Failed to delete {path:?}: {reason}")]
    DeleteFailure { path: PathBuf, reason: String },

    #[error("File watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, NotifierError>;
