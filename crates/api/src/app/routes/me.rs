//! Self-profile endpoints. All enforcement happens in the middleware; by the
//! time a handler runs, the request has already been allowed.

use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use hearth_auth::hash_password;
use hearth_infra::{NewUser, UserUpdate};

use crate::app::{dto, errors, services::AppServices};
use crate::context::CurrentUser;

/// GET /api/me - current profile.
pub async fn profile(Extension(user): Extension<CurrentUser>) -> axum::response::Response {
    (StatusCode::OK, Json(dto::UserView::from(&user))).into_response()
}

/// PUT /api/me - update own email and/or password. Role is not updatable
/// through the self-service route.
pub async fn update_profile(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(user): Extension<CurrentUser>,
    Json(body): Json<dto::UpdateProfileRequest>,
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
        role: None,
        password_hash,
    };

    match services.users.update(user.id(), changes).await {
        Ok(updated) => (StatusCode::OK, Json(dto::UserView::from(updated))).into_response(),
        Err(e) => errors::user_store_error_to_response(e),
    }
}

/// POST /api/me - create an account and return a session token for it.
pub async fn create_with_session(
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

    let created = match services
        .users
        .create(NewUser {
            email: body.email,
            role: body.role.unwrap_or_else(|| "user".to_string()),
            password_hash,
        })
        .await
    {
        Ok(user) => user,
        Err(e) => return errors::user_store_error_to_response(e),
    };

    match services.codec.issue(
        &created.id.to_string(),
        &created.email,
        &created.role,
        Utc::now(),
    ) {
        Ok(token) => (StatusCode::CREATED, Json(dto::TokenResponse { token })).into_response(),
        Err(e) => {
            tracing::error!(error = %e, "failed to sign identity token");
            errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "token_error",
                "failed to issue token",
            )
        }
    }
}
