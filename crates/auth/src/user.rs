use async_trait::async_trait;
use thiserror::Error;

/// A stored user account.
///
/// `password_hash` is a PHC string and is only meaningful to the login path;
/// authorization reads `role`, and only `role`, from this record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRecord {
    pub id: i64,
    pub email: String,
    pub role: String,
    pub password_hash: String,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("user store unavailable: {0}")]
    Unavailable(String),
}

/// User lookup seam for the request authorizer.
///
/// Enforcement resolves the subject against this directory on every request,
/// so the *current* role always wins over the role cached in a token.
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, DirectoryError>;
}
