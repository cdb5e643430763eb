//! Error types for the `yieldscope-data` crate.
//!
//! All fallible operations in this crate return [`DataError`] through the
//! standard [`Result`] type alias.

use std::path::PathBuf;

/// Errors that can occur while loading or exporting the crop dataset.
#[derive(Debug, thiserror::Error)]
pub enum DataError {
    /// The dataset file could not be opened.
    #[error("failed to open dataset {path}: {source}")]
    Open {
        /// Path that failed to open.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader failed while decoding records.
    #[error("malformed CSV input: {0}")]
    Csv(#[from] csv::Error),

    /// A required logical column is missing from the header row.
    #[error("missing required column `{column}` (accepted headers: {aliases})")]
    MissingColumn {
        /// Logical column name.
        column: &'static str,
        /// Accepted header spellings, comma separated.
        aliases: String,
    },

    /// The file parsed but no rows survived cleaning.
    #[error("no usable observations after cleaning ({skipped} rows skipped)")]
    EmptyDataset {
        /// Rows dropped during cleaning.
        skipped: u64,
    },

    /// The CSV export buffer could not be finalized.
    #[error("failed to encode CSV export: {0}")]
    Export(String),
}
