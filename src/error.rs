//! Error type shared by the aggregation engine and the export layer.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, DashboardError>;

/// Errors that can occur while aggregating or exporting incident data.
///
/// Malformed filter text and malformed time-series observations are not
/// errors: they degrade to "no constraint" and "skipped" respectively.
#[derive(Debug, Error)]
pub enum DashboardError {
    /// A record points at a municipality id missing from the reference list.
    #[error("record {record_id} references unknown municipality {municipality_id}")]
    UnknownMunicipality {
        /// The dangling municipality id.
        municipality_id: u32,
        /// Composite id of the offending record.
        record_id: String,
    },

    /// The requested table sort key is not a column of the municipality table.
    #[error("unknown sort key: {0}")]
    UnknownSortKey(String),

    /// Sort direction text other than `asc` / `desc`.
    #[error("unknown sort direction: {0}")]
    UnknownSortDirection(String),

    /// CSV serialization failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// JSON serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Writing an artifact failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The CSV writer produced bytes that are not UTF-8.
    #[error("export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}
