//! Error types for the `yieldscope-stats` crate.

/// Errors that can occur while fitting the yield regression.
#[derive(Debug, thiserror::Error)]
pub enum StatsError {
    /// Too few complete rows to estimate the coefficients.
    #[error("regression needs at least {needed} complete rows, got {got}")]
    InsufficientData {
        /// Minimum complete rows required.
        needed: usize,
        /// Complete rows found.
        got: usize,
    },

    /// The least-squares solve failed.
    #[error("regression solve failed: {0}")]
    Singular(String),

    /// The regression target has zero variance, so R² is undefined.
    #[error("yield variance is zero across complete rows")]
    ZeroVariance,
}
