use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;
use tracing::{error, warn};

use careerbot_db::StoreError;
use careerbot_llm::LlmError;
use careerbot_types::api::ErrorResponse;

use crate::credentials::CredentialError;
use crate::tokens::TokenError;

/// Every failure a handler can report. Rendered as `{"error": message}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    InvalidInput(String),

    #[error("User already exists with this email")]
    DuplicateEmail,

    /// Same message for unknown email and wrong password.
    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Access token required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    Forbidden,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("Upstream model request failed")]
    Upstream,

    #[error("Internal server error")]
    Internal,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) | ApiError::DuplicateEmail => StatusCode::BAD_REQUEST,
            ApiError::InvalidCredentials | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Upstream | ApiError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorResponse {
            error: self.to_string(),
        });
        (self.status(), body).into_response()
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(reason) => {
                warn!("Store unavailable: {}", reason);
                ApiError::ServiceUnavailable(reason)
            }
            StoreError::DuplicateEmail => ApiError::DuplicateEmail,
            StoreError::InvalidInput(msg) => ApiError::InvalidInput(msg),
            other => {
                error!("Store error: {}", other);
                ApiError::Internal
            }
        }
    }
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Store(e) => e.into(),
            CredentialError::Hash(e) => {
                error!("Password hashing failed: {}", e);
                ApiError::Internal
            }
        }
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Signing(e) => {
                error!("Token signing failed: {}", e);
                ApiError::Internal
            }
            TokenError::Invalid | TokenError::Expired => ApiError::Forbidden,
        }
    }
}

impl From<LlmError> for ApiError {
    fn from(_: LlmError) -> Self {
        ApiError::Upstream
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_statuses() {
        let unavailable: ApiError = StoreError::Unavailable("down".into()).into();
        assert_eq!(unavailable.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(unavailable.to_string(), "down");

        let dup: ApiError = StoreError::DuplicateEmail.into();
        assert_eq!(dup.status(), StatusCode::BAD_REQUEST);

        let corrupt: ApiError = StoreError::Corrupt("bad ts".into()).into();
        assert_eq!(corrupt.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(corrupt.to_string(), "Internal server error");
    }

    #[test]
    fn token_errors_are_forbidden() {
        assert_eq!(ApiError::from(TokenError::Expired).status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::from(TokenError::Invalid).status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn not_found_message_names_the_entity() {
        assert_eq!(ApiError::NotFound("Conversation").to_string(), "Conversation not found");
    }
}
