// src/watch/mod.rs

//! Marker file watching.
//!
//! This module is responsible for:
//! - Recognising marker files (`patterns`).
//! - Suppressing duplicate notifications for the same file (`debounce`).
//! - Turning raw `notify` events into files to deliver (`event_handler`).
//! - Owning the single active watch session (`watcher`).
//!
//! It does **not** talk to the network; accepted files are handed to
//! [`crate::delivery`].

pub mod debounce;
pub mod event_handler;
pub mod patterns;
pub mod watcher;

pub use debounce::{Admission, DebounceTable, DEBOUNCE_WINDOW, EXPIRY_WINDOW};
pub use event_handler::{is_creation_like, EventProcessor};
pub use patterns::{is_marker_name, is_marker_path, MARKER_EXTENSION};
pub use watcher::{target_dir_for, MarkerWatcher, SCREENSHOTS_DIR};
