//! Error types for the meshcast CLI.

use meshcast_admission::Violation;
use meshcast_topology::TopologyError;
use thiserror::Error;

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that end a CLI run.
#[derive(Debug, Error)]
pub enum Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed problem file
    #[error("invalid problem file: {0}")]
    Json(#[from] serde_json::Error),

    /// Problem describes an invalid network
    #[error("invalid topology: {0}")]
    Topology(#[from] TopologyError),

    /// Admission aborted
    #[error("admission failed: {0}")]
    Admission(#[from] meshcast_admission::Error),

    /// The produced solution broke an invariant
    #[error("solution failed verification: {}", summarize(.0))]
    Verification(Vec<Violation>),

    /// Bad environment variable or argument
    #[error("invalid configuration: {0}")]
    Config(String),
}

fn summarize(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
