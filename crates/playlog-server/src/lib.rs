//! playlog-server library - remote endpoint for relayed playback events
//!
//! Routes:
//! - `POST /service`  remote call (`playback_event` / `playback_failed`), bearer auth
//! - `GET  /records`  stored records of one context, bearer auth
//! - `GET  /health`   liveness, no auth

use axum::Router;
use playlog_core::{ContextDirectory, EventLog, MemoryEventLog, PlaybackService, PlaylogConfig};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod api;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    pub service: PlaybackService,
}

impl AppState {
    pub fn new(service: PlaybackService) -> Self {
        Self { service }
    }

    /// State backed by the in-memory event log
    pub fn from_config(config: &PlaylogConfig) -> Self {
        let log: Arc<dyn EventLog> = Arc::new(MemoryEventLog::new());
        Self::new(PlaybackService::new(ContextDirectory::from_config(config), log))
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/service", post(api::service_call))
        .route("/records", get(api::list_records))
        .merge(api::health_routes())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
