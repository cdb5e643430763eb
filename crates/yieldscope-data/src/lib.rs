//! CSV ingest, cleaning, and the immutable crop observation dataset.
//!
//! This crate turns a flat crop-yield file into the [`Dataset`] context the
//! dashboards read: cleaned rows, sorted crop/region lists, the year range,
//! per-crop year sequences, filtered views, and the CSV export encoding.
//! The table is loaded once at startup and never mutated afterwards.
//!
//! # Modules
//!
//! - [`dataset`] -- The immutable observation table with derived indexes,
//!   per-crop year sequences, and CSV export.
//! - [`error`] -- Error types for loading and exporting.
//! - [`filter`] -- Composable region/crop/year-range filters shared by
//!   charts, summary cards, and export.
//! - [`ingest`] -- CSV loading with header-alias resolution and per-row
//!   cleaning rules.

pub mod dataset;
pub mod error;
pub mod filter;
pub mod ingest;

// Re-export primary types at crate root.
pub use dataset::{Dataset, DatasetProfile};
pub use error::DataError;
pub use filter::FilterSpec;
pub use ingest::{IngestReport, RowSkip, load_csv, read_csv};
