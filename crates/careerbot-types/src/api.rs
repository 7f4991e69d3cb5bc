use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::User;

// -- Token claims --

/// Claims carried by a session token. `iat` and `exp` are unix seconds;
/// `exp` is always `iat` plus the fixed session lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

// -- Auth --

/// Missing fields deserialize as empty strings so the handler can answer
/// with a 400 instead of a deserialization rejection.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MeResponse {
    pub user: User,
}

// -- Conversations --

#[derive(Debug, Deserialize)]
pub struct AppendMessageRequest {
    pub role: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub name: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub message: String,
}

// -- Chat proxy --

/// One prior turn as sent by the client. Kept loose on purpose: entries
/// with an unknown role or empty content are dropped during context
/// assembly rather than failing the whole request.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HistoryEntry {
    #[serde(default)]
    pub role: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub messages: Vec<HistoryEntry>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AnswerResponse {
    pub text: String,
}

// -- Misc --

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub database: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
