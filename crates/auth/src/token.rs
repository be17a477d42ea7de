use chrono::{DateTime, Utc};
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use thiserror::Error;

use crate::claims::Claims;

/// Token verification failure categories.
///
/// The middleware collapses all of these into one denial response; the
/// variants exist for logging and tests, not for callers to branch on.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("no authentication token supplied")]
    Missing,

    #[error("token structure or signature is invalid")]
    Malformed,

    #[error("token claims could not be decoded")]
    ClaimsUnreadable,

    #[error("token has expired")]
    Expired,
}

/// Verification seam so transports can hold a trait object instead of the
/// concrete codec.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, raw: Option<&str>, now: DateTime<Utc>) -> Result<Claims, TokenError>;
}

/// HS256 token codec over a single symmetric key.
///
/// The key is loaded from process configuration at startup; a missing key is
/// a startup failure, never a per-request error.
pub struct Hs256TokenCodec {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl Hs256TokenCodec {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expiry is checked explicitly against a caller-supplied clock so the
        // boundary (`exp <= now`) is exact and testable. The `exp` claim must
        // still be present for decoding to succeed.
        validation.validate_exp = false;
        validation.required_spec_claims = ["exp"].iter().map(|c| c.to_string()).collect();

        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Sign claims for the given subject, expiring `TOKEN_TTL_HOURS` from `now`.
    pub fn issue(
        &self,
        user_id: &str,
        email: &str,
        role: &str,
        now: DateTime<Utc>,
    ) -> jsonwebtoken::errors::Result<String> {
        let claims = Claims::new(user_id, email, role, now);
        jsonwebtoken::encode(&Header::default(), &claims, &self.encoding)
    }
}

impl TokenVerifier for Hs256TokenCodec {
    fn verify(&self, raw: Option<&str>, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let raw = match raw {
            Some(t) if !t.is_empty() => t,
            _ => return Err(TokenError::Missing),
        };

        let data =
            jsonwebtoken::decode::<Claims>(raw, &self.decoding, &self.validation).map_err(|e| {
                match e.kind() {
                    ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => {
                        TokenError::ClaimsUnreadable
                    }
                    ErrorKind::ExpiredSignature => TokenError::Expired,
                    _ => TokenError::Malformed,
                }
            })?;

        if data.claims.is_expired(now) {
            return Err(TokenError::Expired);
        }

        Ok(data.claims)
    }
}
