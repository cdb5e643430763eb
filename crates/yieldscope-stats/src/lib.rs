//! Statistical aggregates over the crop observation dataset.
//!
//! The explorer dashboard's analysis panel and summary cards are backed by
//! this crate: group means, the yearly trend with percent change, a
//! pairwise correlation matrix, one-sided outlier counts, and an ordinary
//! least-squares fit of yield against rainfall, temperature, and pesticide
//! use. [`Analysis::compute`] bundles the whole-dataset results once at
//! startup; the per-request functions run over filtered views.
//!
//! # Modules
//!
//! - [`aggregate`] -- Group means, the yearly series, and summary cards.
//! - [`analysis`] -- The precomputed whole-dataset bundle.
//! - [`correlation`] -- Pairwise Pearson correlation matrix.
//! - [`error`] -- Error types for regression fitting.
//! - [`outliers`] -- One-sided high-yield outlier counting.
//! - [`regression`] -- OLS yield regression via SVD least squares.

pub mod aggregate;
pub mod analysis;
pub mod correlation;
pub mod error;
pub mod outliers;
pub mod regression;

mod support;

// Re-export primary types at crate root.
pub use aggregate::{
    GroupMean, YearlyYield, mean_yield_by_crop, mean_yield_by_region, summary_cards,
    yearly_mean_yield,
};
pub use analysis::Analysis;
pub use correlation::{CorrelationMatrix, correlation_matrix};
pub use error::StatsError;
pub use outliers::outlier_count;
pub use regression::RegressionSummary;
