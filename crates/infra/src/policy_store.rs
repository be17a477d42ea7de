use std::collections::HashSet;
use std::sync::RwLock;

use async_trait::async_trait;
use sqlx::{PgPool, Row};

use hearth_policy::{PolicyRule, PolicyStore, PolicyStoreError};

/// Postgres-backed policy store.
///
/// `reload` repopulates an in-process cache from the `policy_rules` table;
/// `exists` answers from that cache. Because the enforcer reloads before
/// every check, rules edited by another process are visible on the next
/// request without an invalidation channel.
pub struct PgPolicyStore {
    pool: PgPool,
    cache: RwLock<HashSet<PolicyRule>>,
}

impl PgPolicyStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            cache: RwLock::new(HashSet::new()),
        }
    }
}

fn unavailable(e: sqlx::Error) -> PolicyStoreError {
    PolicyStoreError::Unavailable(e.to_string())
}

#[async_trait]
impl PolicyStore for PgPolicyStore {
    async fn exists(
        &self,
        role: &str,
        resource: &str,
        action: &str,
    ) -> Result<bool, PolicyStoreError> {
        let rule = PolicyRule::new(role, resource, action);
        Ok(self
            .cache
            .read()
            .expect("policy cache lock poisoned")
            .contains(&rule))
    }

    async fn insert(&self, rule: &PolicyRule) -> Result<(), PolicyStoreError> {
        sqlx::query(
            "INSERT INTO policy_rules (role, resource, action) VALUES ($1, $2, $3) \
             ON CONFLICT DO NOTHING",
        )
        .bind(&rule.role)
        .bind(&rule.resource)
        .bind(&rule.action)
        .execute(&self.pool)
        .await
        .map_err(unavailable)?;

        self.cache
            .write()
            .expect("policy cache lock poisoned")
            .insert(rule.clone());
        Ok(())
    }

    async fn reload(&self) -> Result<(), PolicyStoreError> {
        let rows = sqlx::query("SELECT role, resource, action FROM policy_rules")
            .fetch_all(&self.pool)
            .await
            .map_err(unavailable)?;

        let mut fresh = HashSet::with_capacity(rows.len());
        for row in rows {
            let role: String = row.try_get("role").map_err(unavailable)?;
            let resource: String = row.try_get("resource").map_err(unavailable)?;
            let action: String = row.try_get("action").map_err(unavailable)?;
            fresh.insert(PolicyRule::new(role, resource, action));
        }

        *self.cache.write().expect("policy cache lock poisoned") = fresh;
        Ok(())
    }
}
