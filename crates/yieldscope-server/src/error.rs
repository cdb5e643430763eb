//! Error types for the dashboard server binary.
//!
//! [`LaunchError`] is the top-level error type that wraps all possible
//! failure modes during server startup and serving.

/// Top-level error for the dashboard server binary.
///
/// Each variant wraps a specific subsystem error, providing a single
/// error type that `main` can propagate with `?`.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: yieldscope_core::ConfigError,
    },

    /// Dataset loading or cleaning failed.
    #[error("data error: {source}")]
    Data {
        /// The underlying data error.
        #[from]
        source: yieldscope_data::DataError,
    },

    /// Application state construction failed.
    #[error("state error: {source}")]
    State {
        /// The underlying API error.
        #[from]
        source: yieldscope_web::ApiError,
    },

    /// HTTP server failed to bind or serve.
    #[error("server error: {source}")]
    Server {
        /// The underlying server error.
        #[from]
        source: yieldscope_web::ServerError,
    },
}
