//! Stateless session tokens (HS256 JWT). Nothing is stored server-side,
//! so a token stays valid until it expires.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;
use uuid::Uuid;

use careerbot_types::api::Claims;

pub const TOKEN_LIFETIME_DAYS: i64 = 7;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,

    #[error("token expired")]
    Expired,

    #[error("could not sign token: {0}")]
    Signing(String),
}

pub fn issue_token(secret: &str, user_id: Uuid) -> Result<String, TokenError> {
    issue_token_at(secret, user_id, Utc::now())
}

pub fn issue_token_at(secret: &str, user_id: Uuid, now: DateTime<Utc>) -> Result<String, TokenError> {
    let claims = Claims {
        sub: user_id,
        iat: now.timestamp(),
        exp: (now + Duration::days(TOKEN_LIFETIME_DAYS)).timestamp(),
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

pub fn verify_token(secret: &str, token: &str) -> Result<Uuid, TokenError> {
    verify_token_at(secret, token, Utc::now())
}

/// Expiry is checked here rather than by jsonwebtoken so the boundary is
/// exact: valid while `now <= exp`, without leeway.
pub fn verify_token_at(secret: &str, token: &str, now: DateTime<Utc>) -> Result<Uuid, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = false;
    validation.leeway = 0;
    validation.set_required_spec_claims(&["exp", "sub"]);

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|_| TokenError::Invalid)?;

    if now.timestamp() > data.claims.exp {
        return Err(TokenError::Expired);
    }

    Ok(data.claims.sub)
}
