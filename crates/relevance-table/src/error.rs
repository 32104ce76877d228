//! Table I/O error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors reading the input table or writing the output table.
#[derive(Debug, Error)]
pub enum TableError {
    /// The file could not be opened or created.
    #[error("failed to open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The CSV data could not be parsed.
    #[error("failed to read {origin}: {source}")]
    Read { origin: String, source: csv::Error },

    /// A required header is absent.
    #[error("{origin} has no '{column}' column (found: {found})")]
    MissingColumn {
        origin: String,
        column: &'static str,
        found: String,
    },

    /// A `score` cell is not one of the five labels.
    #[error("{origin} row {row}: {reason}")]
    InvalidScore {
        origin: String,
        /// One-based data row, not counting the header.
        row: usize,
        reason: String,
    },

    /// The output could not be written.
    #[error("failed to write {origin}: {source}")]
    Write { origin: String, source: csv::Error },
}
