//! The analysis bundle.
//!
//! Everything the analysis panel shows, computed in one pass over a set
//! of observation rows: once over the full dataset at startup for the
//! profile log, and again over each filter result the panel requests. A
//! regression that cannot be fitted (a file without covariates, for
//! instance) leaves that section empty rather than failing the bundle.

use serde::{Deserialize, Serialize};
use tracing::debug;
use yieldscope_data::Dataset;
use yieldscope_types::Observation;

use crate::aggregate::{
    GroupMean, YearlyYield, mean_yield_by_crop, mean_yield_by_region, yearly_mean_yield,
};
use crate::correlation::{CorrelationMatrix, correlation_matrix};
use crate::outliers::outlier_count;
use crate::regression::{RegressionSummary, fit};

/// Aggregates over one set of observation rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    /// One-sided high-yield outlier count.
    pub outlier_count: u64,
    /// Pairwise correlation matrix over the numeric columns.
    pub correlation: CorrelationMatrix,
    /// Mean yield per crop, descending.
    pub mean_yield_by_crop: Vec<GroupMean>,
    /// Mean yield per region, descending.
    pub mean_yield_by_region: Vec<GroupMean>,
    /// Yearly mean yield with percent change, ascending by year.
    pub yearly: Vec<YearlyYield>,
    /// Fitted yield regression, when the data supports one.
    pub regression: Option<RegressionSummary>,
}

impl Analysis {
    /// Computes every aggregate over the full dataset.
    #[must_use]
    pub fn compute(dataset: &Dataset) -> Self {
        let rows: Vec<&Observation> = dataset.observations().iter().collect();
        Self::from_rows(&rows)
    }

    /// Computes every aggregate over an already-filtered set of rows.
    #[must_use]
    pub fn from_rows(rows: &[&Observation]) -> Self {
        let regression = fit(rows)
            .inspect_err(|err| debug!(error = %err, "yield regression unavailable"))
            .ok();

        Self {
            outlier_count: outlier_count(rows),
            correlation: correlation_matrix(rows),
            mean_yield_by_crop: mean_yield_by_crop(rows),
            mean_yield_by_region: mean_yield_by_region(rows),
            yearly: yearly_mean_yield(rows),
            regression,
        }
    }
}
