//! Enumeration types shared across the Yieldscope workspace.
//!
//! Metrics, chart kinds, and themes appear in query strings, figure
//! payloads, and the dashboard `TypeScript` bindings, so they live here
//! rather than in the crates that consume them.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::structs::Observation;

// ---------------------------------------------------------------------------
// Metric
// ---------------------------------------------------------------------------

/// A numeric column of the observation table that maps and figures can
/// aggregate and color by.
///
/// Serialized names match the source CSV column names exactly, so the same
/// strings work as query parameter values and as data-frame column keys in
/// the dashboard `JavaScript`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Metric {
    /// Crop yield in tonnes per hectare (always present).
    #[default]
    YieldTHa,
    /// Crop yield in hectograms per hectare (secondary unit).
    YieldHgHa,
    /// Annual rainfall in millimetres.
    RainfallMm,
    /// Average temperature in degrees Celsius.
    AvgTempC,
    /// Pesticide application in tonnes.
    PesticideT,
}

impl Metric {
    /// All metrics, in dropdown order.
    pub const ALL: [Self; 5] = [
        Self::YieldTHa,
        Self::YieldHgHa,
        Self::RainfallMm,
        Self::AvgTempC,
        Self::PesticideT,
    ];

    /// The CSV column name (also the serialized form).
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::YieldTHa => "yield_t_ha",
            Self::YieldHgHa => "yield_hg_ha",
            Self::RainfallMm => "rainfall_mm",
            Self::AvgTempC => "avg_temp_c",
            Self::PesticideT => "pesticide_t",
        }
    }

    /// Human-readable label with units, used in captions and legends.
    pub const fn label(self) -> &'static str {
        match self {
            Self::YieldTHa => "Yield (t/ha)",
            Self::YieldHgHa => "Yield (hg/ha)",
            Self::RainfallMm => "Rainfall (mm)",
            Self::AvgTempC => "Avg Temp (°C)",
            Self::PesticideT => "Pesticides (t)",
        }
    }

    /// Extract this metric's value from an observation.
    ///
    /// Returns `None` for optional columns the source row did not carry.
    pub const fn value_of(self, obs: &Observation) -> Option<f64> {
        match self {
            Self::YieldTHa => Some(obs.yield_t_ha),
            Self::YieldHgHa => obs.yield_hg_ha,
            Self::RainfallMm => obs.rainfall_mm,
            Self::AvgTempC => obs.avg_temp_c,
            Self::PesticideT => obs.pesticide_t,
        }
    }
}

// ---------------------------------------------------------------------------
// ChartKind
// ---------------------------------------------------------------------------

/// Trace style for the yield-over-time figure.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum ChartKind {
    /// One line per crop over the year range.
    #[default]
    Line,
    /// Grouped bars per crop over the year range.
    Bar,
}

// ---------------------------------------------------------------------------
// Theme
// ---------------------------------------------------------------------------

/// Color theme applied to figure layouts.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS,
)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "bindings/")]
pub enum Theme {
    /// Light figure template.
    #[default]
    Light,
    /// Dark figure template.
    Dark,
}
