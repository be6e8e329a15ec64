//! Health and server info routes.

use std::sync::Arc;

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(get_health))
}

/// GET /api/health — liveness plus a running count of analyzed cells.
async fn get_health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let uptime = (Utc::now() - state.started_at).num_seconds().max(0);

    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "startedAt": state.started_at.to_rfc3339(),
        "uptimeSecs": uptime,
        "analyzed": state.analyzed_count(),
        "port": state.config.port,
    }))
}
