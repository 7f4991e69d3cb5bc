//! Conversation CRUD. Every handler runs behind `require_auth` and passes
//! the caller's id down to the store, which only matches rows owned by
//! that id. A conversation that exists but belongs to someone else is
//! reported exactly like one that does not exist.
//!
//! Clients create a conversation lazily: `POST /api/conversations` when
//! the first message is sent, then `PUT` for the user message and again
//! for the assistant reply.

use axum::{
    Extension, Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{debug, info};
use uuid::Uuid;

use careerbot_types::api::{AppendMessageRequest, DeleteResponse, RenameRequest};
use careerbot_types::models::Role;

use crate::error::ApiError;
use crate::middleware::AuthUser;
use crate::{AppState, blocking};

const NOT_FOUND: ApiError = ApiError::NotFound("Conversation");

/// Malformed ids can't match anything, so they are plain 404s.
fn conversation_id(raw: &str) -> Result<Uuid, ApiError> {
    raw.parse().map_err(|_| NOT_FOUND)
}

pub async fn list_conversations(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.db.clone();
    let summaries = blocking(move || db.list_conversations(auth.user_id)).await?;
    Ok(Json(summaries))
}

pub async fn create_conversation(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.db.clone();
    let conversation = blocking(move || db.create_conversation(auth.user_id)).await?;
    info!("User {} created conversation {}", auth.user_id, conversation.id);
    Ok((StatusCode::CREATED, Json(conversation)))
}

pub async fn get_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let id = conversation_id(&id)?;
    let db = state.db.clone();
    let conversation = blocking(move || db.get_conversation(id, auth.user_id))
        .await?
        .ok_or(NOT_FOUND)?;
    Ok(Json(conversation))
}

/// PUT /api/conversations/{id}: append one message.
pub async fn append_message(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<AppendMessageRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let (Some(role), Some(content)) = (req.role, req.content) else {
        return Err(ApiError::InvalidInput("Role and content are required".into()));
    };
    if role.is_empty() || content.is_empty() {
        return Err(ApiError::InvalidInput("Role and content are required".into()));
    }
    let role: Role = role
        .parse()
        .map_err(|_| ApiError::InvalidInput("Role must be 'user' or 'assistant'".into()))?;

    let id = conversation_id(&id)?;
    let db = state.db.clone();
    let conversation = blocking(move || db.append_message(id, auth.user_id, role, &content))
        .await?
        .ok_or(NOT_FOUND)?;

    debug!(
        "Appended {} message to conversation {} ({} total)",
        role,
        id,
        conversation.messages.len()
    );
    Ok(Json(conversation))
}

/// PATCH /api/conversations/{id}/name. An empty name is allowed and
/// clears the custom name.
pub async fn rename_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(auth): Extension<AuthUser>,
    payload: Result<Json<RenameRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = payload?;
    let name = req
        .name
        .ok_or_else(|| ApiError::InvalidInput("Name is required".into()))?;

    let id = conversation_id(&id)?;
    let db = state.db.clone();
    let conversation = blocking(move || db.rename_conversation(id, auth.user_id, &name))
        .await?
        .ok_or(NOT_FOUND)?;
    Ok(Json(conversation))
}

pub async fn delete_conversation(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(auth): Extension<AuthUser>,
) -> Result<impl IntoResponse, ApiError> {
    let id = conversation_id(&id)?;
    let db = state.db.clone();
    if !blocking(move || db.delete_conversation(id, auth.user_id)).await? {
        return Err(NOT_FOUND);
    }

    info!("User {} deleted conversation {}", auth.user_id, id);
    Ok(Json(DeleteResponse {
        message: "Conversation deleted".into(),
    }))
}
