/// Authenticated identity for a request.
///
/// Populated by the authentication middleware from the user directory, so
/// `role` is the account's current role, not the role claim cached in the
/// token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentUser {
    id: i64,
    email: String,
    role: String,
}

impl CurrentUser {
    pub fn new(id: i64, email: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id,
            email: email.into(),
            role: role.into(),
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn role(&self) -> &str {
        &self.role
    }
}
