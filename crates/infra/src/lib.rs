//! `hearth-infra` — storage adapters behind the auth and policy seams.
//!
//! Postgres (sqlx) implementations for production, in-memory implementations
//! for development and tests. The contracts they implement live in
//! `hearth-auth` (`UserDirectory`) and `hearth-policy` (`PolicyStore`).

pub mod policy_store;
pub mod schema;
pub mod users;

pub use policy_store::PgPolicyStore;
pub use schema::ensure_schema;
pub use users::{InMemoryUserStore, NewUser, PgUserStore, UserStore, UserStoreError, UserUpdate};
