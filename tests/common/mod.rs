#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use queuenotifier::delivery::{DeliveryContext, StaticIdentity};
use queuenotifier::fs::mock::MockFileSystem;
use queuenotifier::watch::SCREENSHOTS_DIR;
use tempfile::TempDir;

pub use queuenotifier_test_utils::fake_client::FakeNotifyClient;
pub use queuenotifier_test_utils::recording_sink::RecordingSink;
pub use queuenotifier_test_utils::{init_tracing, wait_until, with_timeout};

/// A game folder in a temp dir, with its `Screenshots` subdirectory created.
pub struct GameFolder {
    pub root: TempDir,
}

impl GameFolder {
    pub fn new() -> Self {
        let root = tempfile::tempdir().expect("create temp dir");
        std::fs::create_dir(root.path().join(SCREENSHOTS_DIR)).expect("create Screenshots");
        Self { root }
    }

    pub fn folder(&self) -> PathBuf {
        self.root.path().to_path_buf()
    }

    pub fn screenshots(&self) -> PathBuf {
        self.root.path().join(SCREENSHOTS_DIR)
    }

    pub fn write_marker(&self, name: &str) -> PathBuf {
        let path = self.screenshots().join(name);
        std::fs::write(&path, b"TRUEVISION-XFILE").expect("write marker");
        path
    }
}

/// Delivery context over a mock filesystem with the given collaborators.
pub fn mock_context(
    fs: &MockFileSystem,
    client: &FakeNotifyClient,
    sink: &RecordingSink,
    registration_id: Option<&str>,
    enabled: bool,
) -> DeliveryContext {
    DeliveryContext {
        fs: Arc::new(fs.clone()),
        client: Arc::new(client.clone()),
        identity: Arc::new(StaticIdentity::new(registration_id.map(str::to_string))),
        sink: Arc::new(sink.clone()),
        enabled: Arc::new(AtomicBool::new(enabled)),
        notify_retries: 2,
    }
}
