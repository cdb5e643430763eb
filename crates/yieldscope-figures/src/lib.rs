//! Figure payloads and map documents for the Yieldscope dashboard.
//!
//! Everything the dashboard draws is built here from filtered
//! observation rows: plotly figure documents for the charts and the
//! analysis panel, a styled `GeoJSON` collection for the interactive
//! regional map, and a self-contained Leaflet HTML page for the
//! embedded map iframe.
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`charts`] | Plotly figures for the chart endpoints |
//! | [`colors`] | Crop color table and map ramps |
//! | [`embed`] | Self-contained embedded map document |
//! | [`error`] | Figure and geometry error types |
//! | [`leaflet`] | Styled region collection for the interactive map |
//! | [`panel`] | Analysis panel figures and regression note |
//! | [`world`] | World geometry loading and centroids |

pub mod charts;
pub mod colors;
pub mod embed;
pub mod error;
pub mod leaflet;
pub mod panel;
pub mod world;

// Re-export primary types at crate root.
pub use embed::MapRenderer;
pub use error::FigureError;
pub use world::WorldGeometry;
