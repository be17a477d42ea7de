use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use hearth_infra::UserStoreError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

pub fn user_store_error_to_response(err: UserStoreError) -> axum::response::Response {
    match err {
        UserStoreError::DuplicateEmail => {
            json_error(StatusCode::CONFLICT, "duplicate_email", err.to_string())
        }
        UserStoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "user not found"),
        UserStoreError::Unavailable(msg) => {
            tracing::error!(error = %msg, "user store unavailable");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}
