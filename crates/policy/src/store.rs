use async_trait::async_trait;
use thiserror::Error;

use crate::rule::PolicyRule;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PolicyStoreError {
    /// The backing store could not be read or written. During enforcement
    /// this is fatal to the request (deny), never to the process.
    #[error("policy store unavailable: {0}")]
    Unavailable(String),
}

/// Durable mapping of (role, resource, action) triples.
///
/// Polymorphic over any backing store that can answer existence checks,
/// accept insertions, and re-read the full rule set into whatever in-memory
/// cache it keeps. Implementations must be internally synchronized for
/// concurrent readers.
#[async_trait]
pub trait PolicyStore: Send + Sync {
    async fn exists(
        &self,
        role: &str,
        resource: &str,
        action: &str,
    ) -> Result<bool, PolicyStoreError>;

    async fn insert(&self, rule: &PolicyRule) -> Result<(), PolicyStoreError>;

    /// Re-read the full rule set from durable storage. Invoked before every
    /// enforcement decision, trading latency for always-fresh policy without
    /// a push-invalidation channel.
    async fn reload(&self) -> Result<(), PolicyStoreError>;
}
