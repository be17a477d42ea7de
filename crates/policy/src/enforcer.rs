use std::sync::Arc;

use crate::store::{PolicyStore, PolicyStoreError};

/// The single authorization decision point.
///
/// Knows nothing about HTTP; a check is a relation lookup backed by the
/// policy store. Reloading before every check picks up out-of-process policy
/// edits without an invalidation channel.
#[derive(Clone)]
pub struct Enforcer {
    store: Arc<dyn PolicyStore>,
}

impl Enforcer {
    pub fn new(store: Arc<dyn PolicyStore>) -> Self {
        Self { store }
    }

    /// Decide whether `(role, resource, action)` is permitted.
    ///
    /// Fail-closed: a store error propagates and the caller must deny. An
    /// error never yields `true` and never terminates the process; a
    /// transient store outage is a denied request, not a crash.
    pub async fn check(
        &self,
        role: &str,
        resource: &str,
        action: &str,
    ) -> Result<bool, PolicyStoreError> {
        self.store.reload().await?;
        self.store.exists(role, resource, action).await
    }
}
