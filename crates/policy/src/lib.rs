//! `hearth-policy` — role-based policy rules, storage contract, and the
//! fail-closed enforcement point.
//!
//! Decoupled from HTTP: a policy decision is a pure relation lookup over
//! (role, resource, action) triples, which keeps it independently testable.

pub mod bootstrap;
pub mod enforcer;
pub mod memory;
pub mod rule;
pub mod store;

pub use bootstrap::{default_rules, seed};
pub use enforcer::Enforcer;
pub use memory::InMemoryPolicyStore;
pub use rule::PolicyRule;
pub use store::{PolicyStore, PolicyStoreError};
