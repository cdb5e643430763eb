//! Dashboard API server for Yieldscope.
//!
//! This crate provides an Axum HTTP server that exposes:
//!
//! - **Dashboard pages** (`GET /` and `GET /timeline`) rendered once per
//!   load with the dataset metadata baked in
//! - **Figure endpoints** (`/api/figures/*`) returning plotly payloads
//!   for the filterable explorer charts and the analysis panel
//! - **Map endpoints** (`/api/map/*`) for the styled region collection
//!   and the embedded Leaflet document
//! - **Session endpoints** (`/api/sessions*`) driving the timeline
//!   animation through typed commands
//! - **`WebSocket` endpoint** (`/ws/sessions/{id}`) for real-time year
//!   update streaming via [`tokio::sync::broadcast`]
//!
//! # Architecture
//!
//! The dataset is loaded once at startup and never mutated, so every
//! figure endpoint is a pure read. Timeline sessions are the only
//! mutable state; all writes to them flow through the single command
//! endpoint, which re-broadcasts year changes to the session's
//! `WebSocket` subscribers.

pub mod error;
pub mod filters;
pub mod handlers;
pub mod pages;
pub mod router;
pub mod server;
pub mod sessions;
pub mod state;
pub mod ws;

// Re-export primary types for convenience.
pub use error::ApiError;
pub use router::build_router;
pub use server::{ServerConfig, ServerError, start_server};
pub use state::AppState;
