//! Error types for figure and map construction.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while loading geometry or building map documents.
#[derive(Debug, Error)]
pub enum FigureError {
    /// The world geometry file could not be read from disk.
    #[error("failed to read world geometry {path}: {source}")]
    GeometryRead {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The world geometry file is not valid `GeoJSON`.
    #[error("invalid world geometry: {0}")]
    GeometryParse(#[from] geojson::Error),

    /// The world geometry parsed but is not a `FeatureCollection`.
    #[error("world geometry must be a GeoJSON FeatureCollection")]
    NotFeatureCollection,

    /// The world geometry holds no countries to draw.
    #[error("world geometry has no usable features")]
    NoWorldFeatures,

    /// The embedded map template failed to load or render.
    #[error("map template error: {0}")]
    Template(String),
}
