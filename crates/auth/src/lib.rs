//! `hearth-auth` — pure authentication/authorization boundary.
//!
//! This crate is intentionally decoupled from HTTP routing and storage: it
//! owns token claims and the HS256 codec, password hashing, the mapping from
//! a request line to an enforcement (resource, action) pair, and the
//! user-lookup seam the request authorizer depends on.

pub mod claims;
pub mod password;
pub mod request;
pub mod token;
pub mod user;

pub use claims::{Claims, TOKEN_TTL_HOURS};
pub use password::{hash_password, verify_password, PasswordError};
pub use request::{derive_resource_and_action, Action};
pub use token::{Hs256TokenCodec, TokenError, TokenVerifier};
pub use user::{DirectoryError, UserDirectory, UserRecord};
