//! Idempotent seeding of the baseline rule set.

use crate::rule::PolicyRule;
use crate::store::{PolicyStore, PolicyStoreError};

/// Baseline rules installed on every startup.
///
/// Ordinary users manage their own profile; admins additionally administer
/// the user collection.
pub fn default_rules() -> Vec<PolicyRule> {
    [
        ("user", "/api/me", "read"),
        ("user", "/api/me", "update"),
        ("admin", "/api/me", "read"),
        ("admin", "/api/me", "create"),
        ("admin", "/api/me", "update"),
        ("admin", "/api/users", "create"),
        ("admin", "/api/users", "read"),
        ("admin", "/api/users", "update"),
        ("admin", "/api/users", "delete"),
    ]
    .into_iter()
    .map(|(role, resource, action)| PolicyRule::new(role, resource, action))
    .collect()
}

/// Install `rules` into `store`, inserting only the triples that are absent.
///
/// Safe to run on every process startup: seeding twice changes nothing, and
/// rules added after the initial seed are never removed or altered.
pub async fn seed(store: &dyn PolicyStore, rules: &[PolicyRule]) -> Result<(), PolicyStoreError> {
    for rule in rules {
        if store.exists(&rule.role, &rule.resource, &rule.action).await? {
            continue;
        }
        store.insert(rule).await?;
        tracing::debug!(%rule, "installed baseline policy rule");
    }
    Ok(())
}
