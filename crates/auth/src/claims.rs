use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Fixed token lifetime. Tokens are never refreshed; clients log in again.
pub const TOKEN_TTL_HOURS: i64 = 12;

/// Identity token claims.
///
/// Claims are immutable once issued; validity is solely a function of the
/// signature and `exp`. `email` and `role` are carried for logging/display.
/// Authorization re-derives the role from the user directory so a token
/// issued before a role change cannot grant stale privileges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject identifier (string-encoded user id).
    #[serde(rename = "userID")]
    pub user_id: String,

    /// Enforcement subject key.
    pub email: String,

    /// Role at issuance time.
    pub role: String,

    /// Expiry, unix seconds (registered claim).
    pub exp: i64,
}

impl Claims {
    /// Build claims expiring `TOKEN_TTL_HOURS` after `now`.
    pub fn new(
        user_id: impl Into<String>,
        email: impl Into<String>,
        role: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            email: email.into(),
            role: role.into(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
        }
    }

    /// A token is expired once `exp <= now` (the boundary second is expired).
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.exp <= now.timestamp()
    }
}
