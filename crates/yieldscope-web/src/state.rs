//! Shared application state for the dashboard API server.
//!
//! [`AppState`] holds the loaded dataset and world geometry, the session
//! registry for the timeline dashboards, and the broadcast channel that
//! fans year changes out to every `WebSocket` subscriber. The dataset is
//! immutable after startup; only the session registry is written to at
//! request time.

use std::collections::BTreeMap;
use std::sync::Arc;

use tokio::sync::{RwLock, broadcast};
use yieldscope_core::TimelineSession;
use yieldscope_data::Dataset;
use yieldscope_figures::{MapRenderer, WorldGeometry};
use yieldscope_types::{SessionId, YearUpdate};

use crate::error::ApiError;
use crate::pages::PageEngine;

/// Capacity of the broadcast channel for year updates.
///
/// If a subscriber falls behind by more than this many messages it will
/// receive a [`broadcast::error::RecvError::Lagged`] and skip to the
/// newest message.
const BROADCAST_CAPACITY: usize = 256;

/// Shared state for the Axum application.
///
/// Wrapped in [`Arc`] and injected via Axum's `State` extractor.
/// The broadcast sender pushes [`YearUpdate`] messages to all connected
/// `WebSocket` clients; each client filters for its own session.
#[derive(Clone)]
pub struct AppState {
    /// The loaded observation table.
    pub dataset: Arc<Dataset>,
    /// World country geometry for the map endpoints.
    pub world: Arc<WorldGeometry>,
    /// Renderer for the embedded map document.
    pub map_renderer: Arc<MapRenderer>,
    /// Renderer for the dashboard pages.
    pub pages: Arc<PageEngine>,
    /// Timeline sessions keyed by session ID.
    pub sessions: Arc<RwLock<BTreeMap<SessionId, TimelineSession>>>,
    /// Broadcast sender for year update messages.
    pub tx: broadcast::Sender<YearUpdate>,
    /// Timeline tick period handed to clients, in milliseconds.
    pub tick_period_ms: u64,
}

impl AppState {
    /// Create the application state around a loaded dataset and world.
    pub fn new(
        dataset: Dataset,
        world: WorldGeometry,
        tick_period_ms: u64,
    ) -> Result<Self, ApiError> {
        let (tx, _) = broadcast::channel(BROADCAST_CAPACITY);
        Ok(Self {
            dataset: Arc::new(dataset),
            world: Arc::new(world),
            map_renderer: Arc::new(MapRenderer::new()?),
            pages: Arc::new(PageEngine::new()?),
            sessions: Arc::new(RwLock::new(BTreeMap::new())),
            tx,
            tick_period_ms,
        })
    }

    /// Subscribe to the year update channel.
    ///
    /// Returns a receiver that will yield a [`YearUpdate`] for every
    /// year change any session publishes.
    pub fn subscribe(&self) -> broadcast::Receiver<YearUpdate> {
        self.tx.subscribe()
    }

    /// Publish a year update to all connected clients.
    ///
    /// Returns the number of receivers that received the message.
    /// Returns 0 if no clients are connected (this is not an error).
    pub fn broadcast(&self, update: &YearUpdate) -> usize {
        // send returns Err only when there are zero receivers,
        // which is normal when no WebSocket clients are connected.
        self.tx.send(update.clone()).unwrap_or(0)
    }
}
