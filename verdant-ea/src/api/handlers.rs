//! API request handlers

use crate::api::AppState;
use axum::{extract::State, http::StatusCode, response::Json};
use serde::Deserialize;
use serde_json::{json, Value};
use verdant_common::{Error, Sample};

/// GET /health - service health check
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "verdant-ea",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Request body for POST /api/sample
#[derive(Debug, Deserialize)]
pub struct RecordSampleRequest {
    pub latitude: f64,
    pub longitude: f64,
    /// Capture time; defaults to the arrival time when omitted
    pub timestamp: Option<chrono::DateTime<chrono::Utc>>,
}

/// POST /api/sample - record a raw location sample
pub async fn record_sample(
    State(app): State<AppState>,
    Json(request): Json<RecordSampleRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    let mut sample = Sample::new(request.latitude, request.longitude);
    if let Some(timestamp) = request.timestamp {
        sample.timestamp = timestamp;
    }

    match app.state.store.record(sample).await {
        Ok(batch_len) => {
            app.state
                .broadcast_event(verdant_common::events::VerdantEvent::SampleRecorded {
                    batch_len,
                    timestamp: chrono::Utc::now(),
                });
            Ok(Json(json!({ "recorded": true, "batch_len": batch_len })))
        }
        Err(e @ Error::InvalidSample(_)) => Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": e.to_string() })),
        )),
        Err(e) => Err((
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "error": e.to_string() })),
        )),
    }
}

/// Request body for POST /api/noise
#[derive(Debug, Deserialize)]
pub struct NoiseLevelRequest {
    /// Current ambient level in dB
    pub level_db: f64,
}

/// POST /api/noise - push the current ambient noise level
pub async fn set_noise_level(
    State(app): State<AppState>,
    Json(request): Json<NoiseLevelRequest>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if !request.level_db.is_finite() {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "level_db must be finite" })),
        ));
    }

    app.state.noise.set(request.level_db).await;
    Ok(Json(json!({ "accepted": true })))
}

/// GET /api/heatmap - immutable snapshot of all scored points
pub async fn get_heatmap(State(app): State<AppState>) -> Json<Value> {
    let points = app.state.heatmap.snapshot().await;
    Json(json!({ "points": points }))
}

/// GET /api/score/latest - most recent scored point and its record
///
/// Absent record fields serialize as null for "N/A" rendering downstream.
pub async fn get_latest_score(
    State(app): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match app.state.heatmap.latest().await {
        Some(point) => {
            let record = app.state.latest_record().await;
            Ok(Json(json!({ "point": point, "record": record })))
        }
        None => Err((
            StatusCode::NOT_FOUND,
            Json(json!({ "error": "no cycle has published yet" })),
        )),
    }
}

/// GET /api/status - scheduler and store counters
pub async fn get_status(State(app): State<AppState>) -> Json<Value> {
    Json(json!({
        "scheduler": app.state.scheduler_state().await,
        "scheduler_running": app.scheduler.is_running().await,
        "batch_len": app.state.store.len().await,
        "total_samples": app.state.store.total_recorded().await,
        "heatmap_points": app.state.heatmap.len().await,
    }))
}

/// POST /api/cycle/run - trigger one cycle immediately (diagnostics)
pub async fn run_cycle_now(
    State(app): State<AppState>,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    match app.scheduler.run_cycle().await {
        Ok(Some(point)) => Ok(Json(json!({ "published": true, "point": point }))),
        Ok(None) => Ok(Json(json!({ "published": false, "skipped": true }))),
        Err(e) => Err((
            StatusCode::BAD_GATEWAY,
            Json(json!({ "published": false, "error": e.to_string() })),
        )),
    }
}
