use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use hearth_auth::{DirectoryError, UserDirectory, UserRecord};

use super::{NewUser, UserStore, UserStoreError, UserUpdate};

/// Postgres-backed user store over the `users` table.
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn record_from_row(row: &PgRow) -> Result<UserRecord, sqlx::Error> {
    Ok(UserRecord {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        role: row.try_get("role")?,
        password_hash: row.try_get("password_hash")?,
    })
}

fn store_error(e: sqlx::Error) -> UserStoreError {
    if e.as_database_error()
        .is_some_and(|db| db.is_unique_violation())
    {
        return UserStoreError::DuplicateEmail;
    }
    UserStoreError::Unavailable(e.to_string())
}

#[async_trait]
impl UserDirectory for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError> {
        let row = sqlx::query("SELECT id, email, role, password_hash FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))?;

        row.as_ref()
            .map(record_from_row)
            .transpose()
            .map_err(|e| DirectoryError::Unavailable(e.to_string()))
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, UserStoreError> {
        let row = sqlx::query("SELECT id, email, role, password_hash FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(store_error)?;

        row.as_ref()
            .map(record_from_row)
            .transpose()
            .map_err(store_error)
    }

    async fn list(&self) -> Result<Vec<UserRecord>, UserStoreError> {
        let rows = sqlx::query("SELECT id, email, role, password_hash FROM users ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(store_error)?;

        rows.iter()
            .map(record_from_row)
            .collect::<Result<_, _>>()
            .map_err(store_error)
    }

    async fn create(&self, user: NewUser) -> Result<UserRecord, UserStoreError> {
        let row = sqlx::query(
            "INSERT INTO users (email, role, password_hash) VALUES ($1, $2, $3) \
             RETURNING id, email, role, password_hash",
        )
        .bind(&user.email)
        .bind(&user.role)
        .bind(&user.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(store_error)?;

        record_from_row(&row).map_err(store_error)
    }

    async fn update(&self, id: i64, changes: UserUpdate) -> Result<UserRecord, UserStoreError> {
        let row = sqlx::query(
            "UPDATE users SET \
                 email = COALESCE($2, email), \
                 role = COALESCE($3, role), \
                 password_hash = COALESCE($4, password_hash) \
             WHERE id = $1 \
             RETURNING id, email, role, password_hash",
        )
        .bind(id)
        .bind(changes.email)
        .bind(changes.role)
        .bind(changes.password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)?;

        match row {
            Some(row) => record_from_row(&row).map_err(store_error),
            None => Err(UserStoreError::NotFound),
        }
    }

    async fn delete(&self, id: i64) -> Result<(), UserStoreError> {
        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(UserStoreError::NotFound);
        }
        Ok(())
    }
}
