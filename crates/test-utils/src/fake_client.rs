use std::sync::{Arc, Mutex};
use std::time::Duration;

use queuenotifier::delivery::{NotifyClient, NotifyFuture, NotifyRequest};
use queuenotifier::errors::NotifierError;
use serde_json::Value;

/// A fake notification client that:
/// - records every request it receives
/// - answers with a fixed JSON body, or fails with a fixed message
/// - optionally holds the answer back for a while, like a slow service.
#[derive(Debug, Clone)]
pub struct FakeNotifyClient {
    response: std::result::Result<Value, String>,
    delay: Option<Duration>,
    requests: Arc<Mutex<Vec<NotifyRequest>>>,
}

impl FakeNotifyClient {
    pub fn succeeding(response: Value) -> Self {
        Self {
            response: Ok(response),
            delay: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
            delay: None,
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answer only after `delay` has passed.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<NotifyRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl NotifyClient for FakeNotifyClient {
    fn notify(&self, request: NotifyRequest) -> NotifyFuture<'_> {
        self.requests.lock().unwrap().push(request);
        let response = self.response.clone();
        let delay = self.delay;

        Box::pin(async move {
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            response.map_err(NotifierError::DeliveryFailure)
        })
    }
}
