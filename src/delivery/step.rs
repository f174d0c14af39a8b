// src/delivery/step.rs

//! The per-file notification step.
//!
//! Order of operations for one marker file:
//! 1. Disabled → skip the request, delete the file.
//! 2. No registration id → stop here, keep the file.
//! 3. POST `/notify`, report the outcome to the sink.
//! 4. Delete the file, whatever the outcome of step 3.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::{error, info};

use crate::delivery::client::{NotifyClient, NotifyRequest};
use crate::delivery::identity::IdentityProvider;
use crate::delivery::outcome::{NotifyOutcome, OutcomeSink};
use crate::errors::NotifierError;
use crate::fs::FileSystem;

/// Everything a delivery needs. Cheap to clone; one clone per spawned delivery.
#[derive(Debug, Clone)]
pub struct DeliveryContext {
    pub fs: Arc<dyn FileSystem>,
    pub client: Arc<dyn NotifyClient>,
    pub identity: Arc<dyn IdentityProvider>,
    pub sink: Arc<dyn OutcomeSink>,
    /// Live enable flag, shared with the watcher's setter.
    pub enabled: Arc<AtomicBool>,
    pub notify_retries: u32,
}

/// What happened to one marker file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryReport {
    Delivered { deleted: bool },
    Failed { deleted: bool },
    SkippedDisabled { deleted: bool },
    /// Delivery aborted before any request; the file was kept.
    NotRegistered,
}

impl DeliveryReport {
    pub fn file_deleted(&self) -> bool {
        match self {
            DeliveryReport::Delivered { deleted }
            | DeliveryReport::Failed { deleted }
            | DeliveryReport::SkippedDisabled { deleted } => *deleted,
            DeliveryReport::NotRegistered => false,
        }
    }
}

pub async fn deliver(ctx: &DeliveryContext, path: &Path) -> DeliveryReport {
    if !ctx.enabled.load(Ordering::SeqCst) {
        info!("Notifications are disabled. Skipping file: {:?}", path);
        let deleted = remove_marker(ctx.fs.as_ref(), path);
        return DeliveryReport::SkippedDisabled { deleted };
    }

    let encoded_id = match ctx.identity.current_registration().await {
        Ok(Some(id)) if !id.is_empty() => id,
        Ok(_) => {
            error!(
                "{}. Cannot notify for file: {:?}",
                NotifierError::NotRegistered,
                path
            );
            return DeliveryReport::NotRegistered;
        }
        Err(err) => {
            error!(error = %err, "registration lookup failed. Cannot notify for file: {:?}", path);
            return DeliveryReport::NotRegistered;
        }
    };

    let request = NotifyRequest {
        encoded_id,
        notify_retries: ctx.notify_retries,
    };

    let delivered = match ctx.client.notify(request).await {
        Ok(result) => {
            ctx.sink.report(NotifyOutcome::Success { result });
            info!("Notification sent successfully for file: {:?}", path);
            true
        }
        Err(err) => {
            let message = failure_message(&err);
            ctx.sink.report(NotifyOutcome::Failure {
                error: message.clone(),
            });
            error!(error = %message, "Failed to notify for file: {:?}", path);
            false
        }
    };

    let deleted = remove_marker(ctx.fs.as_ref(), path);
    if delivered {
        DeliveryReport::Delivered { deleted }
    } else {
        DeliveryReport::Failed { deleted }
    }
}

/// Message shown to the user for a failed delivery, without our own prefix.
fn failure_message(err: &NotifierError) -> String {
    match err {
        NotifierError::DeliveryFailure(msg) => msg.clone(),
        other => other.to_string(),
    }
}

fn remove_marker(fs: &dyn FileSystem, path: &Path) -> bool {
    match fs.remove_file(path) {
        Ok(()) => {
            info!("Deleted file: {:?}", path);
            true
        }
        Err(err) => {
            let err = NotifierError::DeleteFailure {
                path: PathBuf::from(path),
                reason: format!("{err:#}"),
            };
            error!("{err}");
            false
        }
    }
}
