pub mod auth;
pub mod chat;
pub mod conversations;
pub mod credentials;
pub mod error;
pub mod health;
pub mod middleware;
pub mod routes;
pub mod tokens;

use std::sync::Arc;

use tracing::error;

use careerbot_db::Database;
use careerbot_llm::ChatProxy;

use crate::error::ApiError;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub chat: ChatProxy,
    /// Put `/api/answer` behind the bearer-token gate.
    pub answer_requires_auth: bool,
}

/// Run blocking work (SQLite, password hashing) off the async runtime.
pub(crate) async fn blocking<F, T, E>(f: F) -> Result<T, ApiError>
where
    F: FnOnce() -> Result<T, E> + Send + 'static,
    T: Send + 'static,
    E: Into<ApiError> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| {
            error!("spawn_blocking join error: {}", e);
            ApiError::Internal
        })?
        .map_err(Into::into)
}
