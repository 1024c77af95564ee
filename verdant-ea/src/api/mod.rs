//! REST API for the environmental aggregator
//!
//! Serves the sensor collaborator (sample and noise ingestion), the
//! rendering collaborator (heatmap snapshots, latest score) and diagnostics.

pub mod handlers;
pub mod sse;

use crate::scheduler::CycleScheduler;
use crate::state::SharedState;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub state: Arc<SharedState>,
    pub scheduler: Arc<CycleScheduler>,
}

/// Create the API router
pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .nest(
            "/api",
            Router::new()
                // Sensor collaborator ingestion
                .route("/sample", post(handlers::record_sample))
                .route("/noise", post(handlers::set_noise_level))
                // Rendering collaborator reads
                .route("/heatmap", get(handlers::get_heatmap))
                .route("/score/latest", get(handlers::get_latest_score))
                // Diagnostics
                .route("/status", get(handlers::get_status))
                .route("/cycle/run", post(handlers::run_cycle_now))
                // SSE events
                .route("/events", get(sse::event_stream)),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}
