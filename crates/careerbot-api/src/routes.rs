use axum::{
    Router, middleware,
    routing::{get, patch, post},
};

use crate::middleware::require_auth;
use crate::{AppState, auth, chat, conversations, health};

/// All `/api` routes. Transport layers (CORS, tracing) are added by the
/// binary.
pub fn router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/auth/signup", post(auth::signup))
        .route("/api/auth/login", post(auth::login))
        .route("/api/health", get(health::health));

    let protected_routes = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route(
            "/api/conversations",
            get(conversations::list_conversations).post(conversations::create_conversation),
        )
        .route(
            "/api/conversations/{id}",
            get(conversations::get_conversation)
                .put(conversations::append_message)
                .delete(conversations::delete_conversation),
        )
        .route(
            "/api/conversations/{id}/name",
            patch(conversations::rename_conversation),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let mut chat_routes = Router::new().route("/api/answer", post(chat::answer));
    if state.answer_requires_auth {
        chat_routes =
            chat_routes.route_layer(middleware::from_fn_with_state(state.clone(), require_auth));
    }

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .merge(chat_routes)
        .with_state(state)
}
