use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;

use hearth_auth::verify_password;

use crate::app::{dto, errors, services::AppServices};

/// POST /api/login - exchange credentials for an identity token.
///
/// Unknown email and wrong password produce the same response; nothing here
/// leaks whether an account exists.
pub async fn login(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::LoginRequest>,
) -> axum::response::Response {
    let user = match services.users.find_by_email(&body.email).await {
        Ok(Some(user)) => user,
        Ok(None) => return invalid_credentials(),
        Err(e) => {
            tracing::error!(error = %e, "user lookup failed during login");
            return errors::json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "store_error",
                "user store unavailable",
            );
        }
    };

    if !verify_password(&body.password, &user.password_hash) {
        return invalid_credentials();
    }

    match services
        .codec
        .issue(&user.id.to_string(), &user.email, &user.role, Utc::now())
    {
        Ok(token) => (StatusCode::OK, Json(dto::TokenResponse { token })).into_response(),
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

fn invalid_credentials() -> axum::response::Response {
    errors::json_error(
        StatusCode::UNAUTHORIZED,
        "invalid_credentials",
        "invalid email or password",
    )
}
