use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::rule::PolicyRule;
use crate::store::{PolicyStore, PolicyStoreError};

/// In-memory policy store for development and tests.
///
/// There is no durable layer behind it, so `reload` is a no-op.
#[derive(Debug, Default)]
pub struct InMemoryPolicyStore {
    rules: RwLock<HashSet<PolicyRule>>,
}

impl InMemoryPolicyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.rules.read().expect("policy set lock poisoned").len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl PolicyStore for InMemoryPolicyStore {
    async fn exists(
        &self,
        role: &str,
        resource: &str,
        action: &str,
    ) -> Result<bool, PolicyStoreError> {
        let rule = PolicyRule::new(role, resource, action);
        Ok(self
            .rules
            .read()
            .expect("policy set lock poisoned")
            .contains(&rule))
    }

    async fn insert(&self, rule: &PolicyRule) -> Result<(), PolicyStoreError> {
        self.rules
            .write()
            .expect("policy set lock poisoned")
            .insert(rule.clone());
        Ok(())
    }

    async fn reload(&self) -> Result<(), PolicyStoreError> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn duplicate_insertion_is_a_no_op() {
        let store = InMemoryPolicyStore::new();
        let rule = PolicyRule::new("user", "/api/me", "read");

        store.insert(&rule).await.unwrap();
        store.insert(&rule).await.unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.exists("user", "/api/me", "read").await.unwrap());
    }

    #[tokio::test]
    async fn absent_triples_do_not_exist() {
        let store = InMemoryPolicyStore::new();
        store
            .insert(&PolicyRule::new("user", "/api/me", "read"))
            .await
            .unwrap();

        assert!(!store.exists("user", "/api/me", "update").await.unwrap());
        assert!(!store.exists("admin", "/api/me", "read").await.unwrap());
    }
}
