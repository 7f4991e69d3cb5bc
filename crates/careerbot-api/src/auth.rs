use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::info;

use careerbot_types::api::{AuthResponse, LoginRequest, MeResponse, SignupRequest};
use careerbot_types::models::User;

use crate::credentials::CredentialStore;
use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::tokens::issue_token;
use crate::{AppState, blocking};

pub async fn signup(
    State(state): State<AppState>,
    payload: Result<Json<SignupRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::InvalidInput("Email and password are required".into()));
    }

    let store = CredentialStore::new(state.db.clone());
    let email = req.email.clone();
    let user_id = blocking(move || store.create_user(&req.email, &req.password)).await?;

    let token = issue_token(&state.jwt_secret, user_id)?;
    info!("User {} signed up", user_id);

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            message: "User created successfully".into(),
            token,
            user: User { id: user_id, email },
        }),
    ))
}

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(ApiError::InvalidInput("Email and password are required".into()));
    }

    let store = CredentialStore::new(state.db.clone());
    let user = blocking(move || store.authenticate(&req.email, &req.password))
        .await?
        .ok_or(ApiError::InvalidCredentials)?;

    let token = issue_token(&state.jwt_secret, user.id)?;
    info!("User {} logged in", user.id);

    Ok(Json(AuthResponse {
        message: "Login successful".into(),
        token,
        user: User {
            id: user.id,
            email: user.email,
        },
    }))
}

pub async fn me(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let store = CredentialStore::new(state.db.clone());
    let user = blocking(move || store.find_by_id(auth.user_id))
        .await?
        .ok_or(ApiError::NotFound("User"))?;

    Ok(Json(MeResponse {
        user: User {
            id: user.id,
            email: user.email,
        },
    }))
}
