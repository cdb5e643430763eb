//! Route table and middleware for the dashboard server.
//!
//! Routes:
//! - `GET /` - explorer dashboard page
//! - `GET /timeline` - animated timeline page
//! - `GET /ws/sessions/{id}` - year update stream for one session
//! - `GET /api/meta` - dashboard metadata
//! - `GET /api/summary` - summary cards for the active filters
//! - `GET /api/figures/yield-over-time` - yield figure (line or bar)
//! - `GET /api/figures/correlation` - rainfall and pesticide scatter pair
//! - `GET /api/figures/regional` - per-region bars for one year
//! - `GET /api/figures/analysis` - analysis panel bundle
//! - `GET /api/figures/choropleth` - one crop and year choropleth
//! - `GET /api/map/regions` - styled region collection for Leaflet
//! - `GET /api/map/embed` - embedded Leaflet document
//! - `GET /api/export` - filtered CSV download
//! - `POST /api/sessions` - create a timeline session
//! - `GET /api/sessions/{id}` - session snapshot
//! - `POST /api/sessions/{id}/commands` - apply one command to a session

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::{handlers, sessions, ws};

/// Build the full application router with CORS and request tracing.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/", get(handlers::dashboard_page))
        .route("/timeline", get(handlers::timeline_page))
        .route("/ws/sessions/{id}", get(ws::ws_session))
        .route("/api/meta", get(handlers::get_meta))
        .route("/api/summary", get(handlers::get_summary))
        .route(
            "/api/figures/yield-over-time",
            get(handlers::figure_yield_over_time),
        )
        .route("/api/figures/correlation", get(handlers::figure_correlation))
        .route("/api/figures/regional", get(handlers::figure_regional))
        .route("/api/figures/analysis", get(handlers::figure_analysis))
        .route("/api/figures/choropleth", get(handlers::figure_choropleth))
        .route("/api/map/regions", get(handlers::map_regions))
        .route("/api/map/embed", get(handlers::map_embed))
        .route("/api/export", get(handlers::export_csv))
        .route("/api/sessions", post(sessions::create_session))
        .route("/api/sessions/{id}", get(sessions::get_session))
        .route("/api/sessions/{id}/commands", post(sessions::post_command))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
