//! Fatal, environment-level pipeline errors.
//!
//! These are the failures that abort a run immediately: missing input files,
//! unreadable CSV, a missing or unparsable eligibility configuration, and
//! output I/O failures.  They are deliberately separate from
//! [`crate::validator::ValidationError`], which is collected in bulk and
//! reported as a batch before the run is failed.

use std::path::PathBuf;

use thiserror::Error;

/// A fatal error raised while running the mapping pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A required input table file does not exist.
    #[error("Required input table '{table}' not found: {}", .path.display())]
    MissingInputTable {
        /// Name of the missing table.
        table: String,
        /// Path that was probed for the table.
        path: PathBuf,
    },

    /// The eligibility configuration file does not exist.
    #[error("Eligibility configuration file not found: {}", .0.display())]
    MissingConfig(PathBuf),

    /// The eligibility configuration is not the expected JSON shape.
    #[error("Invalid eligibility configuration {}: {reason}", .path.display())]
    InvalidConfig {
        /// Path of the offending configuration file.
        path: PathBuf,
        /// Why the document was rejected.
        reason: String,
    },

    /// A CSV file could not be parsed.
    #[error("Invalid CSV in {}: {source}", .path.display())]
    Csv {
        /// Path of the offending CSV file.
        path: PathBuf,
        /// Underlying CSV parser error.
        source: csv::Error,
    },

    /// An I/O operation on an input or output file failed.
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// Path involved in the failed operation.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Attach a path to a raw I/O error.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PipelineError::Io {
            path: path.into(),
            source,
        }
    }
}
