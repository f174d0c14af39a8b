// src/watch/watcher.rs

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

use crate::config::WatchSettings;
use crate::delivery::{deliver, DeliveryContext, IdentityProvider, NotifyClient, OutcomeSink};
use crate::errors::{NotifierError, Result};
use crate::fs::{FileSystem, RealFileSystem};
use crate::watch::event_handler::EventProcessor;

/// Subdirectory of the game folder that receives the marker files.
pub const SCREENSHOTS_DIR: &str = "Screenshots";

/// How often expired debounce entries are swept out of the table.
pub const SWEEP_INTERVAL: Duration = Duration::from_millis(500);

/// The directory actually watched for a given game folder.
pub fn target_dir_for(folder: &Path) -> PathBuf {
    folder.join(SCREENSHOTS_DIR)
}

/// One active watch. Dropping it releases the OS watch handle and ends the
/// event loop; deliveries already spawned keep running.
struct WatchSession {
    target_dir: PathBuf,
    enabled: Arc<AtomicBool>,
    notify_retries: u32,
    _inner: RecommendedWatcher,
    shutdown: Option<oneshot::Sender<()>>,
}

impl WatchSession {
    fn close(mut self) {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
    }
}

/// Watches `<folder>/Screenshots` for marker files and delivers a
/// notification for each of them.
///
/// At most one session is active at a time. `start` replaces the current
/// session, `stop` ends it. Must be used from within a Tokio runtime.
pub struct MarkerWatcher {
    fs: Arc<dyn FileSystem>,
    client: Arc<dyn NotifyClient>,
    identity: Arc<dyn IdentityProvider>,
    sink: Arc<dyn OutcomeSink>,
    /// Last known enable flag; reused when `start` does not specify one.
    notify_enabled: Option<bool>,
    session: Option<WatchSession>,
}

impl std::fmt::Debug for MarkerWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarkerWatcher")
            .field("target_dir", &self.target_dir())
            .field("notify_enabled", &self.notify_enabled())
            .field("notify_retries", &self.notify_retries())
            .finish_non_exhaustive()
    }
}

impl MarkerWatcher {
    pub fn new(
        client: Arc<dyn NotifyClient>,
        identity: Arc<dyn IdentityProvider>,
        sink: Arc<dyn OutcomeSink>,
    ) -> Self {
        Self::with_fs(Arc::new(RealFileSystem), client, identity, sink)
    }

    pub fn with_fs(
        fs: Arc<dyn FileSystem>,
        client: Arc<dyn NotifyClient>,
        identity: Arc<dyn IdentityProvider>,
        sink: Arc<dyn OutcomeSink>,
    ) -> Self {
        Self {
            fs,
            client,
            identity,
            sink,
            notify_enabled: None,
            session: None,
        }
    }

    /// Replace the notification client. Takes effect on the next `start`.
    pub fn set_client(&mut self, client: Arc<dyn NotifyClient>) {
        self.client = client;
    }

    pub fn is_running(&self) -> bool {
        self.session.is_some()
    }

    pub fn target_dir(&self) -> Option<&Path> {
        self.session.as_ref().map(|s| s.target_dir.as_path())
    }

    pub fn notify_retries(&self) -> Option<u32> {
        self.session.as_ref().map(|s| s.notify_retries)
    }

    pub fn notify_enabled(&self) -> bool {
        match &self.session {
            Some(session) => session.enabled.load(Ordering::SeqCst),
            None => self.notify_enabled.unwrap_or(true),
        }
    }

    /// Start watching `<settings.folder>/Screenshots`.
    ///
    /// Any running session is stopped first, even if this call then fails.
    /// Fails with [`NotifierError::DirectoryNotFound`] if the directory does
    /// not exist; it is never created.
    pub fn start(&mut self, settings: &WatchSettings) -> Result<()> {
        self.stop();

        let enabled = settings
            .notify_enabled
            .or(self.notify_enabled)
            .unwrap_or(true);
        self.notify_enabled = Some(enabled);

        let target_dir = target_dir_for(&settings.folder);
        if !self.fs.is_dir(&target_dir) {
            error!("Screenshots folder does not exist at: {:?}", target_dir);
            return Err(NotifierError::DirectoryNotFound(target_dir));
        }

        // Channel from the blocking notify callback into the async world.
        let (event_tx, event_rx) = mpsc::unbounded_channel::<Event>();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) => {
                    if event_tx.send(event).is_err() {
                        debug!("watch session closed; dropping notify event");
                    }
                }
                Err(err) => warn!("file watch error: {err}"),
            },
            Config::default(),
        )?;

        watcher.watch(&target_dir, RecursiveMode::NonRecursive)?;

        let enabled_flag = Arc::new(AtomicBool::new(enabled));
        let ctx = DeliveryContext {
            fs: Arc::clone(&self.fs),
            client: Arc::clone(&self.client),
            identity: Arc::clone(&self.identity),
            sink: Arc::clone(&self.sink),
            enabled: Arc::clone(&enabled_flag),
            notify_retries: settings.notify_retries,
        };
        let processor = EventProcessor::new(target_dir.clone(), Arc::clone(&self.fs));
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(run_session(processor, ctx, event_rx, shutdown_rx));

        info!("Folder watcher started on: {:?}", target_dir);

        self.session = Some(WatchSession {
            target_dir,
            enabled: enabled_flag,
            notify_retries: settings.notify_retries,
            _inner: watcher,
            shutdown: Some(shutdown_tx),
        });

        Ok(())
    }

    /// Stop the active session. Calling it with no session is a no-op.
    pub fn stop(&mut self) {
        if let Some(session) = self.session.take() {
            session.close();
            info!("Folder watcher stopped.");
        }
    }

    /// Update the enable flag of the running session (and of future ones
    /// started without an explicit flag). Applies from the next event on.
    pub fn set_notify_enabled(&mut self, enabled: bool) {
        self.notify_enabled = Some(enabled);
        if let Some(session) = &self.session {
            session.enabled.store(enabled, Ordering::SeqCst);
        }
        info!("Notification enabled set to: {}", enabled);
    }
}

impl Drop for MarkerWatcher {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Event loop of one session.
///
/// Owns the debounce table. Each accepted marker file is delivered on its own
/// task so a slow remote call never holds up the next event.
async fn run_session(
    mut processor: EventProcessor,
    ctx: DeliveryContext,
    mut event_rx: mpsc::UnboundedReceiver<Event>,
    mut shutdown_rx: oneshot::Receiver<()>,
) {
    let mut sweep = tokio::time::interval(SWEEP_INTERVAL);
    sweep.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            // Fires on an explicit stop and when the session is dropped.
            _ = &mut shutdown_rx => break,
            maybe_event = event_rx.recv() => {
                let Some(event) = maybe_event else { break };
                debug!(?event, "received notify event");

                for path in processor.on_event(&event, Instant::now()) {
                    let ctx = ctx.clone();
                    tokio::spawn(async move {
                        let report = deliver(&ctx, &path).await;
                        debug!(?path, ?report, "delivery finished");
                    });
                }
            }
            _ = sweep.tick() => {
                let removed = processor.sweep(Instant::now());
                if removed > 0 {
                    debug!(removed, "expired debounce entries");
                }
            }
        }
    }

    debug!(dir = ?processor.target_dir(), "watcher event loop finished");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::{LogOutcomeSink, NotifyFuture, NotifyRequest, StaticIdentity};
    use crate::fs::mock::MockFileSystem;

    #[derive(Debug)]
    struct NeverCalled;

    impl NotifyClient for NeverCalled {
        fn notify(&self, _request: NotifyRequest) -> NotifyFuture<'_> {
            Box::pin(async {
                Err(NotifierError::DeliveryFailure("no notification expected".to_string()))
            })
        }
    }

    fn watcher_with(fs: MockFileSystem) -> MarkerWatcher {
        MarkerWatcher::with_fs(
            Arc::new(fs),
            Arc::new(NeverCalled),
            Arc::new(StaticIdentity::new(None)),
            Arc::new(LogOutcomeSink),
        )
    }

    #[test]
    fn target_dir_appends_screenshots() {
        assert_eq!(
            target_dir_for(Path::new("/games/wow")),
            PathBuf::from("/games/wow/Screenshots")
        );
    }

    #[tokio::test]
    async fn missing_screenshots_dir_fails_without_session() {
        let fs = MockFileSystem::new();
        fs.add_dir("/games/wow");
        let mut watcher = watcher_with(fs);

        let err = watcher.start(&WatchSettings::new("/games/wow", 1)).unwrap_err();
        match err {
            NotifierError::DirectoryNotFound(path) => {
                assert_eq!(path, PathBuf::from("/games/wow/Screenshots"))
            }
            other => panic!("expected DirectoryNotFound, got {other:?}"),
        }
        assert!(!watcher.is_running());
        assert!(watcher.target_dir().is_none());
    }

    #[tokio::test]
    async fn stop_without_session_is_noop() {
        let mut watcher = watcher_with(MockFileSystem::new());
        watcher.stop();
        watcher.stop();
        assert!(!watcher.is_running());
    }

    #[tokio::test]
    async fn enable_flag_is_remembered_between_starts() {
        let mut watcher = watcher_with(MockFileSystem::new());
        assert!(watcher.notify_enabled());

        watcher.set_notify_enabled(false);
        // Fails (no directory), but the flag resolution still happens.
        let _ = watcher.start(&WatchSettings::new("/nowhere", 1));
        assert!(!watcher.notify_enabled());

        let _ = watcher.start(&WatchSettings::new("/nowhere", 1).with_notify_enabled(true));
        assert!(watcher.notify_enabled());
    }
}
