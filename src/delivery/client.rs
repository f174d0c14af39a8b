// src/delivery/client.rs

//! HTTP client for the remote notification service.
//!
//! Two endpoints are used:
//! - `POST <base>/notify` with `{"encodedID": ..., "notifyRetries": ...}`
//! - `POST <base>/register` with `{"id": ...}`, answering `{"encodedID": ...}`
//!
//! Any response with a JSON body counts as delivered, whatever its status.
//! Only transport and body parsing errors are failures.

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;

use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::errors::{NotifierError, Result};

/// Body of a `/notify` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotifyRequest {
    #[serde(rename = "encodedID")]
    pub encoded_id: String,
    #[serde(rename = "notifyRetries")]
    pub notify_retries: u32,
}

pub type NotifyFuture<'a> = Pin<Box<dyn Future<Output = Result<Value>> + Send + 'a>>;

/// Trait abstracting how notifications reach the remote service.
///
/// Production code uses [`HttpNotifyClient`]; tests provide a fake that
/// records requests and returns canned responses.
pub trait NotifyClient: Send + Sync + Debug {
    fn notify(&self, request: NotifyRequest) -> NotifyFuture<'_>;
}

#[derive(Debug, Clone)]
pub struct HttpNotifyClient {
    client: reqwest::Client,
    base_url: String,
}

impl HttpNotifyClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), base_url)
    }

    pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn endpoint(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }

    async fn post_json<B: Serialize + ?Sized>(&self, name: &str, body: &B) -> Result<Value> {
        let url = self.endpoint(name);
        debug!(%url, "POST");

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| NotifierError::DeliveryFailure(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            warn!(%url, %status, "remote service answered with a non-success status");
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| NotifierError::DeliveryFailure(e.to_string()))
    }

    /// Register `id` with the service and return the issued `encodedID`.
    pub async fn register(&self, id: &str) -> Result<String> {
        let result = self.post_json("register", &json!({ "id": id })).await?;
        debug!(?result, "registration response");

        result
            .get("encodedID")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_owned)
            .ok_or_else(|| {
                NotifierError::DeliveryFailure("No registration string returned".to_string())
            })
    }
}

impl NotifyClient for HttpNotifyClient {
    fn notify(&self, request: NotifyRequest) -> NotifyFuture<'_> {
        Box::pin(async move { self.post_json("notify", &request).await })
    }
}
