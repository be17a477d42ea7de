//! User administration endpoints. Restricted to admins by the baseline
//! policy; the middleware has already made that decision.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    Json,
};

use hearth_auth::hash_password;
use hearth_infra::{NewUser, UserUpdate};

use crate::app::{dto, errors, services::AppServices};

/// GET /api/users - list all accounts.
pub async fn list_users(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.users.list().await {
        Ok(users) => {
            let items: Vec<dto::UserView> = users.into_iter().map(dto::UserView::from).collect();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::user_store_error_to_response(e),
    }
}

/// POST /api/users - create an account.
pub async fn create_user(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateUserRequest>,
) -> axum::response::Response {
    let password_hash = match hash_password(&body.password) {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, "failed to hash password");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "hash_error",
                "failed to process password",
            );
        }
    };

    match services
        .users
        .create(NewUser {
            email: body.email,
            role: body.role.unwrap_or_else(|| "user".to_string()),
            password_hash,
        })
        .await
    {
        Ok(user) => (StatusCode::CREATED, Json(dto::UserView::from(user))).into_response(),
        Err(e) => errors::user_store_error_to_response(e),
    }
}

/// PUT /api/users/:id - update any field of an account, role included.
pub async fn update_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
    Json(body): Json<dto::UpdateUserRequest>,
) -> axum::response::Response {
    let password_hash = match body.password.as_deref().map(hash_password).transpose() {
        Ok(hash) => hash,
        Err(e) => {
            tracing::error!(error = %e, "failed to hash password");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "hash_error",
                "failed to process password",
            );
        }
    };

    let changes = UserUpdate {
        email: body.email,
        role: body.role,
        password_hash,
    };

    match services.users.update(id, changes).await {
        Ok(user) => (StatusCode::OK, Json(dto::UserView::from(user))).into_response(),
        Err(e) => errors::user_store_error_to_response(e),
    }
}

/// DELETE /api/users/:id - remove an account. Any live tokens for it keep
/// failing authorization from the next request on.
pub async fn delete_user(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<i64>,
) -> axum::response::Response {
    match services.users.delete(id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::user_store_error_to_response(e),
    }
}
