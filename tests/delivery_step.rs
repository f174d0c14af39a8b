// tests/delivery_step.rs

mod common;

use std::path::PathBuf;

use serde_json::json;

use queuenotifier::delivery::{deliver, DeliveryReport, NotifyOutcome, NotifyRequest};
use queuenotifier::fs::mock::MockFileSystem;
use queuenotifier::fs::FileSystem;

use crate::common::{init_tracing, mock_context, FakeNotifyClient, RecordingSink};

fn marker() -> (MockFileSystem, PathBuf) {
    let fs = MockFileSystem::new();
    let path = PathBuf::from("/wow/Screenshots/shot.tga");
    fs.add_file(&path, "img");
    (fs, path)
}

#[tokio::test]
async fn disabled_notifications_delete_without_network_call() {
    init_tracing();
    let (fs, path) = marker();
    let client = FakeNotifyClient::succeeding(json!({ "ok": true }));
    let sink = RecordingSink::new();
    let ctx = mock_context(&fs, &client, &sink, Some("enc"), false);

    let report = deliver(&ctx, &path).await;

    assert_eq!(report, DeliveryReport::SkippedDisabled { deleted: true });
    assert!(!fs.exists(&path));
    assert_eq!(client.call_count(), 0);
    assert!(sink.outcomes().is_empty());
}

#[tokio::test]
async fn missing_registration_keeps_file_and_skips_network() {
    init_tracing();
    let (fs, path) = marker();
    let client = FakeNotifyClient::succeeding(json!({ "ok": true }));
    let sink = RecordingSink::new();
    let ctx = mock_context(&fs, &client, &sink, None, true);

    let report = deliver(&ctx, &path).await;

    assert_eq!(report, DeliveryReport::NotRegistered);
    assert!(!report.file_deleted());
    assert!(fs.exists(&path));
    assert_eq!(client.call_count(), 0);
    assert!(sink.outcomes().is_empty());
}

#[tokio::test]
async fn empty_registration_counts_as_missing() {
    let (fs, path) = marker();
    let client = FakeNotifyClient::succeeding(json!({}));
    let sink = RecordingSink::new();
    let ctx = mock_context(&fs, &client, &sink, Some(""), true);

    assert_eq!(deliver(&ctx, &path).await, DeliveryReport::NotRegistered);
    assert!(fs.exists(&path));
}

#[tokio::test]
async fn registration_is_forwarded_verbatim() {
    let (fs, path) = marker();
    let client = FakeNotifyClient::succeeding(json!({ "ok": true }));
    let sink = RecordingSink::new();
    let ctx = mock_context(&fs, &client, &sink, Some(" enc "), true);

    assert_eq!(
        deliver(&ctx, &path).await,
        DeliveryReport::Delivered { deleted: true }
    );
    assert_eq!(client.requests()[0].encoded_id, " enc ");
}

#[tokio::test]
async fn successful_delivery_reports_result_then_deletes() {
    init_tracing();
    let (fs, path) = marker();
    let client = FakeNotifyClient::succeeding(json!({ "ok": true }));
    let sink = RecordingSink::new();
    let ctx = mock_context(&fs, &client, &sink, Some("enc-123"), true);

    let report = deliver(&ctx, &path).await;

    assert_eq!(report, DeliveryReport::Delivered { deleted: true });
    assert_eq!(
        client.requests(),
        vec![NotifyRequest {
            encoded_id: "enc-123".to_string(),
            notify_retries: 2,
        }]
    );
    assert_eq!(
        sink.outcomes(),
        vec![NotifyOutcome::Success {
            result: json!({ "ok": true })
        }]
    );
    assert_eq!(
        sink.outcomes()[0].to_json(),
        json!({ "success": true, "result": { "ok": true } })
    );
    assert_eq!(fs.removed(), vec![path]);
}

#[tokio::test]
async fn failed_delivery_reports_error_and_still_deletes() {
    init_tracing();
    let (fs, path) = marker();
    let client = FakeNotifyClient::failing("fetch failed");
    let sink = RecordingSink::new();
    let ctx = mock_context(&fs, &client, &sink, Some("enc"), true);

    let report = deliver(&ctx, &path).await;

    assert_eq!(report, DeliveryReport::Failed { deleted: true });
    assert_eq!(
        sink.outcomes()[0].to_json(),
        json!({ "success": false, "error": "fetch failed" })
    );
    assert!(!fs.exists(&path));
}

#[tokio::test]
async fn delete_failure_is_reported_but_not_fatal() {
    init_tracing();
    let (fs, path) = marker();
    fs.lock_file(&path);
    let client = FakeNotifyClient::succeeding(json!({ "ok": true }));
    let sink = RecordingSink::new();
    let ctx = mock_context(&fs, &client, &sink, Some("enc"), true);

    let report = deliver(&ctx, &path).await;

    assert_eq!(report, DeliveryReport::Delivered { deleted: false });
    assert!(fs.exists(&path));
    assert_eq!(sink.outcomes().len(), 1);
}

#[tokio::test]
async fn enable_flag_is_read_at_delivery_time() {
    let (fs, path) = marker();
    let client = FakeNotifyClient::succeeding(json!({ "ok": true }));
    let sink = RecordingSink::new();
    let ctx = mock_context(&fs, &client, &sink, Some("enc"), true);

    ctx.enabled.store(false, std::sync::atomic::Ordering::SeqCst);
    let report = deliver(&ctx, &path).await;

    assert_eq!(report, DeliveryReport::SkippedDisabled { deleted: true });
    assert_eq!(client.call_count(), 0);
}
