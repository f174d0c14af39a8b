// src/delivery/identity.rs

//! Registration identity lookup.
//!
//! The watcher asks for the current registration id on every delivery instead
//! of caching it, so a re-registration takes effect on the next marker file.

use std::fmt::Debug;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use crate::errors::{NotifierError, Result};

pub type IdentityFuture<'a> = Pin<Box<dyn Future<Output = Result<Option<String>>> + Send + 'a>>;

/// Source of the opaque registration identifier (`encodedID`).
pub trait IdentityProvider: Send + Sync + Debug {
    /// `Ok(None)` (or an empty string) means "not registered yet".
    fn current_registration(&self) -> IdentityFuture<'_>;
}

/// Fixed identity, e.g. from the command line.
#[derive(Debug, Clone, Default)]
pub struct StaticIdentity(Option<String>);

impl StaticIdentity {
    pub fn new(id: Option<String>) -> Self {
        Self(id)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_registration(&self) -> IdentityFuture<'_> {
        let id = self.0.clone();
        Box::pin(async move { Ok(id) })
    }
}

/// Identity that can be replaced while the watcher runs (config reload).
#[derive(Debug, Clone, Default)]
pub struct SharedIdentity {
    inner: Arc<RwLock<Option<String>>>,
}

impl SharedIdentity {
    pub fn new(id: Option<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(id)),
        }
    }

    pub fn set(&self, id: Option<String>) {
        match self.inner.write() {
            Ok(mut guard) => *guard = id,
            Err(poisoned) => *poisoned.into_inner() = id,
        }
    }

    pub fn get(&self) -> Result<Option<String>> {
        self.inner
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| NotifierError::Other(anyhow::anyhow!("identity lock poisoned")))
    }
}

impl IdentityProvider for SharedIdentity {
    fn current_registration(&self) -> IdentityFuture<'_> {
        let id = self.get();
        Box::pin(async move { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shared_identity_reflects_updates() {
        let identity = SharedIdentity::new(None);
        assert_eq!(identity.current_registration().await.unwrap(), None);

        identity.set(Some("abc123".to_string()));
        assert_eq!(
            identity.current_registration().await.unwrap().as_deref(),
            Some("abc123")
        );
    }
}
