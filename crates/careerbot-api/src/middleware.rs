use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{Authorization, HeaderMapExt, authorization::Bearer};
use tracing::debug;
use uuid::Uuid;

use crate::AppState;
use crate::error::ApiError;
use crate::tokens::verify_token;

/// Caller identity attached to requests that passed [`require_auth`].
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

/// Extract and verify the bearer token from the Authorization header.
/// No token is 401; a token that fails verification is 403.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let bearer = req
        .headers()
        .typed_get::<Authorization<Bearer>>()
        .ok_or(ApiError::Unauthorized)?;

    let user_id = verify_token(&state.jwt_secret, bearer.token()).map_err(|e| {
        debug!("Rejected bearer token: {}", e);
        ApiError::Forbidden
    })?;

    req.extensions_mut().insert(AuthUser { user_id });
    Ok(next.run(req).await)
}
