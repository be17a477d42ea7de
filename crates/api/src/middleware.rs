use std::sync::Arc;

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

use hearth_auth::{derive_resource_and_action, TokenVerifier};

use crate::authz::RequestAuthorizer;
use crate::context::CurrentUser;

/// Denial bodies are deliberately coarse: callers cannot distinguish an
/// expired token from a wrong role from a store outage by status or body.
const TOKEN_DENIED: &str = "Error parsing authentication token";
const POLICY_DENIED: &str = "Not authorized to perform that action";

#[derive(Clone)]
pub struct AuthState {
    pub verifier: Arc<dyn TokenVerifier>,
    pub authorizer: Arc<RequestAuthorizer>,
}

/// Authentication + authorization gate for every protected request.
///
/// Verify the token, derive (resource, action) from the request line,
/// authorize against the policy, then hand the request to the downstream
/// handler unmodified. Failures are terminal for the request; nothing on
/// this path is retried.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let claims = match state
        .verifier
        .verify(bearer_token(req.headers()), Utc::now())
    {
        Ok(claims) => claims,
        Err(e) => {
            tracing::info!(error = %e, "request denied at token verification");
            return (StatusCode::FORBIDDEN, TOKEN_DENIED).into_response();
        }
    };

    let (resource, action) = derive_resource_and_action(req.uri().path(), req.method().as_str());

    let Some(user) = state.authorizer.authorize(&claims.email, &resource, action).await else {
        return (StatusCode::FORBIDDEN, POLICY_DENIED).into_response();
    };

    req.extensions_mut()
        .insert(CurrentUser::new(user.id, user.email, user.role));

    next.run(req).await
}

/// Pull the credential out of the `Authorization` header.
///
/// The scheme prefix is stripped by splitting on the first space; any prefix
/// word is accepted. A header with no space is treated as a bare token.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers
        .get(axum::http::header::AUTHORIZATION)?
        .to_str()
        .ok()?;

    match value.split_once(' ') {
        Some((_scheme, token)) => Some(token.trim()),
        None => Some(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::AUTHORIZATION;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn strips_any_scheme_prefix() {
        assert_eq!(bearer_token(&headers_with("Bearer abc.def")), Some("abc.def"));
        assert_eq!(bearer_token(&headers_with("Token abc.def")), Some("abc.def"));
    }

    #[test]
    fn bare_token_is_accepted() {
        assert_eq!(bearer_token(&headers_with("abc.def")), Some("abc.def"));
    }

    #[test]
    fn absent_header_yields_none() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn prefix_with_empty_token_yields_empty() {
        // Verification treats the empty credential as missing.
        assert_eq!(bearer_token(&headers_with("Bearer ")), Some(""));
    }
}
