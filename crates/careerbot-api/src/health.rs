use axum::{Json, extract::State};

use careerbot_types::api::HealthResponse;

use crate::AppState;

/// Always 200 while the process is up; `database` reports the store state.
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        database: state.db.state().to_string(),
    })
}
