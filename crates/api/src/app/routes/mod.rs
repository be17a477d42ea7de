use axum::{
    routing::{get, put},
    Router,
};

pub mod me;
pub mod session;
pub mod system;
pub mod users;

/// Router for all protected endpoints. Item routes use a numeric id so they
/// enforce under their collection resource.
pub fn router() -> Router {
    Router::new()
        .route(
            "/api/me",
            get(me::profile)
                .put(me::update_profile)
                .post(me::create_with_session),
        )
        .route("/api/users", get(users::list_users).post(users::create_user))
        .route(
            "/api/users/:id",
            put(users::update_user).delete(users::delete_user),
        )
}
