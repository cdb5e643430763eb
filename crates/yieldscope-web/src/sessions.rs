//! Timeline session endpoints.
//!
//! Sessions are created per timeline page load (or shared by ID), and
//! every UI event on the page arrives here as one command. Year changes
//! are re-broadcast to the session's `WebSocket` subscribers so all
//! renderer views stay in step.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde::Deserialize;
use serde_json::json;
use tracing::info;
use uuid::Uuid;
use yieldscope_core::{TimelineSession, playback};
use yieldscope_types::{CommandOutcome, DashCommand, SessionId, YearUpdate};

use crate::error::ApiError;
use crate::state::AppState;

/// Request body for `POST /api/sessions`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateSession {
    /// Initial crop; defaults to the first crop in sorted order.
    pub selected_crop: Option<String>,
}

// ---------------------------------------------------------------------------
// POST /api/sessions
// ---------------------------------------------------------------------------

/// Create a timeline session and return its initial snapshot.
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    Json(body): Json<CreateSession>,
) -> Result<impl IntoResponse, ApiError> {
    let session = TimelineSession::new(&state.dataset, body.selected_crop);
    let payload = session_payload(&session, state.tick_period_ms);
    info!(session = %session.id(), crop = session.selected_crop(), "session created");
    state.sessions.write().await.insert(session.id(), session);
    Ok((StatusCode::CREATED, Json(payload)))
}

// ---------------------------------------------------------------------------
// GET /api/sessions/{id}
// ---------------------------------------------------------------------------

/// Fetch a session snapshot.
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_session_id(&id)?;
    let sessions = state.sessions.read().await;
    let session = sessions
        .get(&id)
        .ok_or_else(|| ApiError::NotFound(format!("session {id} not found")))?;
    Ok(Json(session_payload(session, state.tick_period_ms)))
}

// ---------------------------------------------------------------------------
// POST /api/sessions/{id}/commands
// ---------------------------------------------------------------------------

/// Apply one command to a session.
///
/// Outcomes that change the displayed year are broadcast to the session's
/// `WebSocket` subscribers before the HTTP reply goes out.
pub async fn post_command(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(command): Json<DashCommand>,
) -> Result<impl IntoResponse, ApiError> {
    let id = parse_session_id(&id)?;
    let mut sessions = state.sessions.write().await;
    let session = sessions
        .get_mut(&id)
        .ok_or_else(|| ApiError::NotFound(format!("session {id} not found")))?;

    let outcome = session.apply(command, &state.dataset);
    match outcome {
        CommandOutcome::Advanced { year } | CommandOutcome::YearSet { year } => {
            state.broadcast(&YearUpdate {
                session_id: id,
                crop: session.selected_crop().to_owned(),
                year,
            });
        }
        CommandOutcome::NoData | CommandOutcome::Playback { .. } => {}
    }

    let snapshot = session.state();
    let label = playback::button_label(snapshot.clicks);
    Ok(Json(json!({
        "outcome": outcome,
        "state": snapshot,
        "paused": session.is_paused(),
        "button_label": label,
    })))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a session ID path segment.
pub(crate) fn parse_session_id(raw: &str) -> Result<SessionId, ApiError> {
    Uuid::parse_str(raw)
        .map(SessionId::from)
        .map_err(|_| ApiError::InvalidSessionId(format!("invalid session ID: {raw}")))
}

/// Wire shape shared by the create and get endpoints.
fn session_payload(session: &TimelineSession, tick_period_ms: u64) -> serde_json::Value {
    let snapshot = session.state();
    let label = playback::button_label(snapshot.clicks);
    json!({
        "id": session.id(),
        "state": snapshot,
        "paused": session.is_paused(),
        "button_label": label,
        "ticker_period_ms": tick_period_ms,
        "created_at": session.created_at(),
    })
}
