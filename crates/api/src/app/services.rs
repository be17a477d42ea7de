use std::sync::Arc;

use anyhow::{Context, Result};
use sqlx::PgPool;

use hearth_auth::{hash_password, Hs256TokenCodec, UserDirectory};
use hearth_infra::{
    ensure_schema, InMemoryUserStore, NewUser, PgPolicyStore, PgUserStore, UserStore,
};
use hearth_policy::{default_rules, seed, Enforcer, InMemoryPolicyStore, PolicyStore};

use crate::authz::RequestAuthorizer;
use crate::config::{AppConfig, BootstrapAdmin};

/// Shared, immutable service state constructed once at startup and passed by
/// reference into the middleware and handlers, never via ambient globals.
pub struct AppServices {
    pub codec: Arc<Hs256TokenCodec>,
    pub users: Arc<dyn UserStore>,
    pub authorizer: Arc<RequestAuthorizer>,
}

/// Build services per configuration: Postgres-backed when `DATABASE_URL` is
/// present, in-memory otherwise. Seeds the baseline policy either way; a
/// seeding failure here is a fatal boot condition.
pub async fn build_services(config: &AppConfig) -> Result<AppServices> {
    let services = match &config.database_url {
        Some(url) => postgres_services(&config.jwt_secret, url).await?,
        None => {
            tracing::warn!("DATABASE_URL not set; using in-memory stores");
            in_memory_services(&config.jwt_secret).await?
        }
    };

    if let Some(admin) = &config.bootstrap_admin {
        ensure_bootstrap_admin(&services, admin).await?;
    }

    Ok(services)
}

/// In-memory wiring, also used directly by the black-box tests.
pub async fn in_memory_services(jwt_secret: &str) -> Result<AppServices> {
    let users = Arc::new(InMemoryUserStore::new());
    let policy = Arc::new(InMemoryPolicyStore::new());
    assemble(
        jwt_secret,
        users.clone(),
        users,
        policy,
    )
    .await
}

async fn postgres_services(jwt_secret: &str, url: &str) -> Result<AppServices> {
    let pool = PgPool::connect(url)
        .await
        .context("failed to connect to DATABASE_URL")?;
    ensure_schema(&pool)
        .await
        .context("failed to ensure database schema")?;

    let users = Arc::new(PgUserStore::new(pool.clone()));
    let policy = Arc::new(PgPolicyStore::new(pool));
    assemble(jwt_secret, users.clone(), users, policy).await
}

async fn assemble(
    jwt_secret: &str,
    users: Arc<dyn UserStore>,
    directory: Arc<dyn UserDirectory>,
    policy: Arc<dyn PolicyStore>,
) -> Result<AppServices> {
    seed(policy.as_ref(), &default_rules())
        .await
        .context("failed to seed baseline policy rules")?;

    let codec = Arc::new(Hs256TokenCodec::new(jwt_secret.as_bytes()));
    let authorizer = Arc::new(RequestAuthorizer::new(directory, Enforcer::new(policy)));

    Ok(AppServices {
        codec,
        users,
        authorizer,
    })
}

/// Create the configured admin account if its email is absent. Idempotent
/// across restarts, like policy seeding.
async fn ensure_bootstrap_admin(services: &AppServices, admin: &BootstrapAdmin) -> Result<()> {
    let existing = services
        .users
        .find_by_email(&admin.email)
        .await
        .context("failed to look up bootstrap admin")?;
    if existing.is_some() {
        return Ok(());
    }

    let password_hash =
        hash_password(&admin.password).context("failed to hash bootstrap admin password")?;
    services
        .users
        .create(NewUser {
            email: admin.email.clone(),
            role: "admin".to_string(),
            password_hash,
        })
        .await
        .context("failed to create bootstrap admin")?;

    tracing::info!(email = %admin.email, "created bootstrap admin account");
    Ok(())
}
