// src/delivery/outcome.rs

//! Delivery outcomes and the sinks that receive them.

use std::fmt::Debug;

use serde::{Serialize, Serializer};
use serde_json::Value;
use tokio::sync::mpsc;
use tracing::{info, warn};

/// Result of one notification attempt, as reported to the settings/UI side.
///
/// Serializes to `{"success": true, "result": ...}` or
/// `{"success": false, "error": "..."}`.
#[derive(Debug, Clone, PartialEq)]
pub enum NotifyOutcome {
    Success { result: Value },
    Failure { error: String },
}

impl NotifyOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, NotifyOutcome::Success { .. })
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

#[derive(Serialize)]
struct OutcomeWire<'a> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    result: Option<&'a Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
}

impl Serialize for NotifyOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let wire = match self {
            NotifyOutcome::Success { result } => OutcomeWire {
                success: true,
                result: Some(result),
                error: None,
            },
            NotifyOutcome::Failure { error } => OutcomeWire {
                success: false,
                result: None,
                error: Some(error),
            },
        };
        wire.serialize(serializer)
    }
}

/// Consumer of delivery outcomes.
pub trait OutcomeSink: Send + Sync + Debug {
    fn report(&self, outcome: NotifyOutcome);
}

/// Writes every outcome to the log. Used by the CLI.
#[derive(Debug, Clone, Default)]
pub struct LogOutcomeSink;

impl OutcomeSink for LogOutcomeSink {
    fn report(&self, outcome: NotifyOutcome) {
        info!(success = outcome.is_success(), "Notify result: {}", outcome.to_json());
    }
}

/// Forwards outcomes into a channel, for callers embedding the watcher.
#[derive(Debug, Clone)]
pub struct ChannelOutcomeSink {
    tx: mpsc::UnboundedSender<NotifyOutcome>,
}

impl ChannelOutcomeSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<NotifyOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl OutcomeSink for ChannelOutcomeSink {
    fn report(&self, outcome: NotifyOutcome) {
        if self.tx.send(outcome).is_err() {
            warn!("outcome receiver dropped; discarding notify result");
        }
    }
}
