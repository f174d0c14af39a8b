// src/watch/event_handler.rs

//! Event processing logic for marker file notifications.
//!
//! [`EventProcessor`] is the synchronous part of a watch session: it turns raw
//! `notify` events into the list of marker files that should be delivered.
//! It performs no network IO and never deletes anything, so it can be tested
//! with a [`MockFileSystem`](crate::fs::mock::MockFileSystem) and synthetic
//! instants.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use notify::{Event, EventKind};
use tracing::{debug, info};

use crate::fs::FileSystem;
use crate::watch::debounce::{Admission, DebounceTable};
use crate::watch::patterns::is_marker_path;

/// Only creation-like notifications can announce a new marker file.
///
/// Renames into the folder arrive as `Modify(Name(_))` on most platforms, and
/// some backends only report `Any`.
pub fn is_creation_like(kind: &EventKind) -> bool {
    matches!(kind, EventKind::Create(_) | EventKind::Modify(_) | EventKind::Any)
}

#[derive(Debug)]
pub struct EventProcessor {
    target_dir: PathBuf,
    fs: Arc<dyn FileSystem>,
    debounce: DebounceTable,
}

impl EventProcessor {
    pub fn new(target_dir: impl Into<PathBuf>, fs: Arc<dyn FileSystem>) -> Self {
        Self {
            target_dir: target_dir.into(),
            fs,
            debounce: DebounceTable::new(),
        }
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    #[cfg(test)]
    fn debounce_table(&self) -> &DebounceTable {
        &self.debounce
    }

    /// Drop expired debounce entries. Called periodically by the session.
    pub fn sweep(&mut self, now: Instant) -> usize {
        self.debounce.sweep(now)
    }

    /// Process one `notify` event and return the marker files to deliver.
    pub fn on_event(&mut self, event: &Event, now: Instant) -> Vec<PathBuf> {
        if !is_creation_like(&event.kind) {
            return Vec::new();
        }
        event
            .paths
            .iter()
            .filter_map(|path| self.on_path(path, now))
            .collect()
    }

    /// Run the per-path steps: name filter, debounce, existence check.
    ///
    /// Returns the absolute path of the marker file if it should be delivered.
    pub fn on_path(&mut self, path: &Path, now: Instant) -> Option<PathBuf> {
        if !is_marker_path(path) {
            return None;
        }
        let full_path = self.target_dir.join(path.file_name()?);

        if self.debounce.admit(&full_path, now) == Admission::Debounced {
            return None;
        }

        if let Err(err) = self.fs.stat(&full_path) {
            debug!(
                path = ?full_path,
                error = %err,
                "marker file vanished before it could be handled"
            );
            return None;
        }

        info!("Detected new .tga file: {:?}", full_path);
        Some(full_path)
    }
}
