//! Schema bootstrap for the Postgres-backed stores.

use sqlx::PgPool;

/// Ensure the tables backing the user and policy stores exist.
///
/// Runs at process startup; a failure here is a fatal boot condition for the
/// caller, not something to retry per-request.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id            BIGSERIAL PRIMARY KEY,
            email         TEXT NOT NULL UNIQUE,
            role          TEXT NOT NULL,
            password_hash TEXT NOT NULL
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS policy_rules (
            role     TEXT NOT NULL,
            resource TEXT NOT NULL,
            action   TEXT NOT NULL,
            PRIMARY KEY (role, resource, action)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}
