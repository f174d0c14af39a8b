// src/watch/debounce.rs

//! Per-path debounce table.
//!
//! A single file creation usually produces several OS notifications in quick
//! succession (create, then one or more modify events while the game client
//! writes the image). The table lets only the first of them through.
//!
//! Semantics:
//! - An event is discarded if the same path was *accepted* less than
//!   [`DEBOUNCE_WINDOW`] ago. Discarded events never touch the table.
//! - Every acceptance schedules exactly one removal of that path,
//!   [`EXPIRY_WINDOW`] later. Removals are unconditional and never renewed, so
//!   a path accepted at t=0 and again at t=1.5s is removed from the table at
//!   t=2s by the first removal.
//!
//! Removals are kept in an ordered queue and applied by [`DebounceTable::sweep`],
//! which the session calls on a timer and which `admit` runs before every
//! lookup. No per-entry timers are spawned.

use std::collections::{HashMap, VecDeque};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(1000);
pub const EXPIRY_WINDOW: Duration = Duration::from_millis(2000);
pub const DEFAULT_MAX_ENTRIES: usize = 4096;

/// Result of offering an event to the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// First sighting (or the previous one is old enough): process it.
    Accepted,
    /// Duplicate within the debounce window: drop it silently.
    Debounced,
}

#[derive(Debug)]
pub struct DebounceTable {
    seen: HashMap<PathBuf, Instant>,
    /// Scheduled removals, ordered by deadline.
    removals: VecDeque<(Instant, PathBuf)>,
    window: Duration,
    expiry: Duration,
    max_entries: usize,
}

impl Default for DebounceTable {
    fn default() -> Self {
        Self::new()
    }
}

impl DebounceTable {
    pub fn new() -> Self {
        Self::with_limits(DEBOUNCE_WINDOW, EXPIRY_WINDOW, DEFAULT_MAX_ENTRIES)
    }

    /// `max_entries` is clamped to at least 1.
    pub fn with_limits(window: Duration, expiry: Duration, max_entries: usize) -> Self {
        Self {
            seen: HashMap::new(),
            removals: VecDeque::new(),
            window,
            expiry,
            max_entries: max_entries.max(1),
        }
    }

    pub fn len(&self) -> usize {
        self.seen.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }

    pub fn contains(&self, path: &Path) -> bool {
        self.seen.contains_key(path)
    }

    /// Decide whether an event for `path` observed at `now` should be processed.
    pub fn admit(&mut self, path: &Path, now: Instant) -> Admission {
        self.sweep(now);

        if let Some(recorded) = self.seen.get(path) {
            if now.saturating_duration_since(*recorded) < self.window {
                debug!(?path, "debounced duplicate event");
                return Admission::Debounced;
            }
        }

        if !self.seen.contains_key(path) && self.seen.len() >= self.max_entries {
            self.evict_oldest();
        }

        self.seen.insert(path.to_path_buf(), now);
        self.removals.push_back((now + self.expiry, path.to_path_buf()));
        Admission::Accepted
    }

    /// Apply every removal whose deadline is at or before `now`.
    ///
    /// Returns the number of entries actually removed from the table.
    pub fn sweep(&mut self, now: Instant) -> usize {
        let mut removed = 0;
        while let Some((deadline, _)) = self.removals.front() {
            if *deadline > now {
                break;
            }
            if let Some((_, path)) = self.removals.pop_front() {
                if self.seen.remove(&path).is_some() {
                    removed += 1;
                }
            }
        }
        removed
    }

    fn evict_oldest(&mut self) {
        warn!(
            max_entries = self.max_entries,
            "debounce table full; evicting oldest entries early"
        );
        while self.seen.len() >= self.max_entries {
            match self.removals.pop_front() {
                Some((_, path)) => {
                    self.seen.remove(&path);
                }
                None => break,
            }
        }
    }
}
