//! User storage: the CRUD contract the API surface needs, on top of the
//! lookup seam authorization depends on.

use async_trait::async_trait;
use thiserror::Error;

use hearth_auth::{UserDirectory, UserRecord};

pub mod in_memory;
pub mod postgres;

pub use in_memory::InMemoryUserStore;
pub use postgres::PgUserStore;

#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("email already registered")]
    DuplicateEmail,

    #[error("user not found")]
    NotFound,

    #[error("user store unavailable: {0}")]
    Unavailable(String),
}

/// A user account to be created.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: String,
    pub role: String,
    pub password_hash: String,
}

/// Partial update; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub email: Option<String>,
    pub role: Option<String>,
    pub password_hash: Option<String>,
}

/// Full user storage contract.
///
/// Extends the read-side `UserDirectory` seam with the mutations the HTTP
/// surface performs. Implementations must be internally synchronized.
#[async_trait]
pub trait UserStore: UserDirectory {
    async fn find_by_id(&self, id: i64) -> Result<Option<UserRecord>, UserStoreError>;

    async fn list(&self) -> Result<Vec<UserRecord>, UserStoreError>;

    async fn create(&self, user: NewUser) -> Result<UserRecord, UserStoreError>;

    async fn update(&self, id: i64, changes: UserUpdate) -> Result<UserRecord, UserStoreError>;

    async fn delete(&self, id: i64) -> Result<(), UserStoreError>;
}
