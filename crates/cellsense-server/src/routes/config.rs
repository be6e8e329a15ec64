//! Engine threshold routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Json, Router};
use cellsense_core::EngineConfigUpdate;
use tracing::{info, warn};

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/config", get(get_config).put(update_config))
}

async fn get_config(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let config = state.engine_config.read().clone();
    Json(config)
}

/// PUT /api/config — merge an update; rejected updates leave the config untouched.
async fn update_config(
    State(state): State<Arc<AppState>>,
    Json(update): Json<EngineConfigUpdate>,
) -> impl IntoResponse {
    let candidate = {
        let mut guard = state.engine_config.write();
        let mut candidate = guard.clone();
        candidate.apply_update(&update);

        if let Err(e) = candidate.validate() {
            warn!("Rejected engine config update: {}", e);
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": e.to_string() })),
            );
        }

        *guard = candidate.clone();
        candidate
    };
    info!("Engine config updated");

    match serde_json::to_value(&candidate) {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}
