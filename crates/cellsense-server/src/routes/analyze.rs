//! Cell analysis routes.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Json, Router};
use cellsense_extract::{
    classify, decompose_narrative, overall_trend, parse_time_series, series_changes,
    CellAnalysis, CellValue, InterpretLower, NarrativeStructure,
};
use serde::Deserialize;
use tracing::warn;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/classify", post(classify_cell))
        .route("/decompose", post(decompose))
        .route("/time-series", post(time_series))
        .route("/analyze", post(analyze))
        .route("/analyze-record", post(analyze_record))
}

#[derive(Debug, Deserialize)]
struct CellRequest {
    value: CellValue,
}

#[derive(Debug, Deserialize)]
struct TextRequest {
    text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TimeSeriesRequest {
    text: String,
    #[serde(default)]
    interpret_lower: InterpretLower,
}

async fn classify_cell(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CellRequest>,
) -> Json<serde_json::Value> {
    let kind = classify(&req.value, &state.engine_config.read());
    state.record_analyzed(1);
    Json(serde_json::json!({ "kind": kind }))
}

async fn decompose(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TextRequest>,
) -> Json<NarrativeStructure> {
    let structure = decompose_narrative(&req.text, &state.engine_config.read());
    state.record_analyzed(1);
    Json(structure)
}

/// POST /api/time-series — points plus period changes, graded good/bad.
async fn time_series(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TimeSeriesRequest>,
) -> Json<serde_json::Value> {
    let config = state.engine_config.read().clone();
    let points = parse_time_series(&req.text, &config);
    let changes: Vec<serde_json::Value> = series_changes(&points, &config)
        .into_iter()
        .map(|c| {
            serde_json::json!({
                "fromYear": c.from_year,
                "toYear": c.to_year,
                "change": c.change,
                "display": c.display,
                "isGood": c.change.is_good_change(req.interpret_lower),
            })
        })
        .collect();
    let trend = overall_trend(&points, &config);
    state.record_analyzed(1);

    Json(serde_json::json!({
        "points": points,
        "changes": changes,
        "trend": trend,
    }))
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CellRequest>,
) -> Json<CellAnalysis> {
    let analysis = state.analyzer().analyze(&req.value);
    state.record_analyzed(1);
    Json(analysis)
}

/// POST /api/analyze-record — analyze every field of one feed record.
async fn analyze_record(
    State(state): State<Arc<AppState>>,
    Json(body): Json<serde_json::Value>,
) -> impl IntoResponse {
    let Some(record) = body.as_object() else {
        warn!("analyze-record called with a non-object body");
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "Expected a JSON object of field -> value" })),
        );
    };

    let result = state.analyzer().analyze_record(record);
    state.record_analyzed(result.fields.len());

    match serde_json::to_value(&result) {
        Ok(body) => (StatusCode::OK, Json(body)),
        Err(e) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": e.to_string() })),
        ),
    }
}
