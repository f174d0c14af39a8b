// tests/runtime_reload.rs

mod common;

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use tokio::sync::mpsc;

use queuenotifier::cli::WatchArgs;
use queuenotifier::delivery::{SharedIdentity, StaticIdentity};
use queuenotifier::runtime::{AppEvent, Runtime};
use queuenotifier::watch::MarkerWatcher;
use queuenotifier_test_utils::builders::ConfigFileBuilder;

use crate::common::{init_tracing, wait_until, FakeNotifyClient, GameFolder, RecordingSink};

fn runtime_for(
    client: &FakeNotifyClient,
    identity: &SharedIdentity,
    builder: ConfigFileBuilder,
    overrides: WatchArgs,
) -> (Runtime, mpsc::Sender<AppEvent>) {
    let watcher = MarkerWatcher::new(
        Arc::new(client.clone()),
        Arc::new(identity.clone()),
        Arc::new(RecordingSink::new()),
    );
    let (tx, rx) = mpsc::channel(8);
    let runtime = Runtime::new(watcher, identity.clone(), builder.build(), overrides, rx);
    (runtime, tx)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn registration_from_reloaded_config_enables_delivery() {
    init_tracing();
    let game = GameFolder::new();
    let client = FakeNotifyClient::succeeding(json!({ "ok": true }));
    let identity = SharedIdentity::new(None);
    let (runtime, tx) = runtime_for(
        &client,
        &identity,
        ConfigFileBuilder::new().folder(game.folder()),
        WatchArgs::default(),
    );
    let handle = tokio::spawn(runtime.run());
    tokio::time::sleep(Duration::from_millis(150)).await;

    let before = game.write_marker("before.tga");
    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(before.exists());
    assert_eq!(client.call_count(), 0);

    tx.send(AppEvent::ConfigReloaded(
        ConfigFileBuilder::new()
            .folder(game.folder())
            .registration_id("enc-reloaded")
            .build(),
    ))
    .await
    .expect("runtime alive");
    assert!(wait_until(|| identity.get().ok().flatten().is_some()).await);

    let after = game.write_marker("after.tga");
    assert!(wait_until(|| !after.exists()).await);
    assert_eq!(client.requests()[0].encoded_id, "enc-reloaded");

    tx.send(AppEvent::ShutdownRequested).await.expect("runtime alive");
    handle.await.expect("join").expect("runtime result");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn folder_change_restarts_watcher() {
    init_tracing();
    let first = GameFolder::new();
    let second = GameFolder::new();
    let client = FakeNotifyClient::succeeding(json!({ "ok": true }));
    let identity = SharedIdentity::new(Some("enc".to_string()));
    let (runtime, tx) = runtime_for(
        &client,
        &identity,
        ConfigFileBuilder::new().folder(first.folder()),
        WatchArgs::default(),
    );
    let handle = tokio::spawn(runtime.run());

    tx.send(AppEvent::ConfigReloaded(
        ConfigFileBuilder::new().folder(second.folder()).build(),
    ))
    .await
    .expect("runtime alive");
    tokio::time::sleep(Duration::from_millis(300)).await;

    let old = first.write_marker("old.tga");
    let new = second.write_marker("new.tga");
    assert!(wait_until(|| !new.exists()).await);
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert!(old.exists());

    drop(tx);
    handle.await.expect("join").expect("runtime result");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn disabling_in_config_stops_network_calls() {
    init_tracing();
    let game = GameFolder::new();
    let client = FakeNotifyClient::succeeding(json!({ "ok": true }));
    let identity = SharedIdentity::new(Some("enc".to_string()));
    let (runtime, tx) = runtime_for(
        &client,
        &identity,
        ConfigFileBuilder::new().folder(game.folder()),
        WatchArgs::default(),
    );
    let handle = tokio::spawn(runtime.run());

    tx.send(AppEvent::ConfigReloaded(
        ConfigFileBuilder::new()
            .folder(game.folder())
            .notify_enabled(false)
            .build(),
    ))
    .await
    .expect("runtime alive");
    tokio::time::sleep(Duration::from_millis(300)).await;

    let marker = game.write_marker("quiet.tga");
    assert!(wait_until(|| !marker.exists()).await);
    assert_eq!(client.call_count(), 0);

    tx.send(AppEvent::ShutdownRequested).await.expect("runtime alive");
    handle.await.expect("join").expect("runtime result");
}

#[tokio::test]
async fn missing_folder_is_fatal_without_reload() {
    init_tracing();
    let root = tempfile::tempdir().expect("temp dir");
    let client = FakeNotifyClient::succeeding(json!({}));
    let watcher = MarkerWatcher::new(
        Arc::new(client.clone()),
        Arc::new(StaticIdentity::new(None)),
        Arc::new(RecordingSink::new()),
    );
    let (_tx, rx) = mpsc::channel(1);
    let overrides = WatchArgs {
        no_reload: true,
        ..WatchArgs::default()
    };
    let runtime = Runtime::new(
        watcher,
        SharedIdentity::new(None),
        ConfigFileBuilder::new().folder(root.path()).build(),
        overrides,
        rx,
    );

    assert!(runtime.run().await.is_err());
}
