//! Core data structs for the Yieldscope dashboards.
//!
//! Covers the observation row, the per-session animation state, and the
//! payloads the dashboard pages consume over REST and the `WebSocket`.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::enums::Metric;
use crate::ids::SessionId;

// ---------------------------------------------------------------------------
// Observation
// ---------------------------------------------------------------------------

/// One row of the crop-yield table: a single (crop, region, year) cell.
///
/// The yield in tonnes per hectare is always present; rows without it are
/// skipped at load time. Covariates are optional because not every source
/// file carries them, and unparseable values coerce to `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct Observation {
    /// Crop name, e.g. `"Wheat"` or `"Rice, paddy"`.
    pub crop: String,
    /// Producing region (country name, matching the map geometry keys).
    pub region: String,
    /// Harvest year.
    pub year: i32,
    /// Yield in tonnes per hectare.
    pub yield_t_ha: f64,
    /// Yield in hectograms per hectare, when the source provides it.
    pub yield_hg_ha: Option<f64>,
    /// Annual rainfall in millimetres.
    pub rainfall_mm: Option<f64>,
    /// Average temperature in degrees Celsius.
    pub avg_temp_c: Option<f64>,
    /// Pesticide application in tonnes.
    pub pesticide_t: Option<f64>,
}

// ---------------------------------------------------------------------------
// AnimationState
// ---------------------------------------------------------------------------

/// Per-session animation state for the timeline dashboard.
///
/// Whether playback is paused is never stored here -- it is derived from
/// the parity of `clicks` (even = playing, odd = paused).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct AnimationState {
    /// The crop whose year sequence the timeline cycles through.
    pub selected_crop: String,
    /// The year currently displayed (and stored between ticks).
    pub current_year: i32,
    /// Total play/pause button presses. Monotonic, never reset.
    pub clicks: u64,
}

// ---------------------------------------------------------------------------
// YearUpdate
// ---------------------------------------------------------------------------

/// Pushed over the session `WebSocket` whenever the displayed year changes.
///
/// Every renderer view of a session redraws from this pair; renderers never
/// advance the year themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct YearUpdate {
    /// The session the update belongs to.
    pub session_id: SessionId,
    /// The selected crop at the time of the update.
    pub crop: String,
    /// The newly displayed year.
    pub year: i32,
}

// ---------------------------------------------------------------------------
// DashMeta
// ---------------------------------------------------------------------------

/// Static dashboard metadata served once per page load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct DashMeta {
    /// All crops present in the loaded dataset, sorted.
    pub crops: Vec<String>,
    /// All regions present in the loaded dataset, sorted.
    pub regions: Vec<String>,
    /// Metrics available for map and figure coloring.
    pub metrics: Vec<Metric>,
    /// Earliest year in the dataset.
    pub year_min: i32,
    /// Latest year in the dataset.
    pub year_max: i32,
    /// Fixed timeline tick period in milliseconds.
    pub tick_period_ms: u64,
}

// ---------------------------------------------------------------------------
// SummaryCards
// ---------------------------------------------------------------------------

/// The three headline cards above the explorer charts.
///
/// All fields are `None` when the active filters match no observations;
/// the page renders `N/A` in that case.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "bindings/")]
pub struct SummaryCards {
    /// Mean yield in t/ha under the active filters, rounded to 2 dp.
    pub average_yield: Option<f64>,
    /// Crop with the highest mean yield under the active filters.
    pub top_crop: Option<String>,
    /// Year of the single wettest observation under the active filters.
    pub wettest_year: Option<i32>,
}
