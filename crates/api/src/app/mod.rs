//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: store selection, policy seeding, and shared service state
//! - `routes/`: HTTP routes + handlers (one file per surface area)
//! - `dto.rs`: request/response DTOs
//! - `errors.rs`: consistent JSON error responses

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the
/// black-box tests).
///
/// Everything except the health probe and the login endpoint sits behind the
/// authentication middleware.
pub fn build_app(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        verifier: services.codec.clone(),
        authorizer: services.authorizer.clone(),
    };

    let protected = routes::router().layer(axum::middleware::from_fn_with_state(
        auth_state,
        middleware::auth_middleware,
    ));

    Router::new()
        .route("/health", get(routes::system::health))
        .route("/api/login", post(routes::session::login))
        .merge(protected)
        .layer(Extension(services))
}
