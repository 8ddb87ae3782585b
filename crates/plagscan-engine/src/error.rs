//! Error types for engine operations

use plagscan_domain::{SubjectId, ThresholdError};
use thiserror::Error;

/// Errors that can occur during an analysis run
#[derive(Error, Debug)]
pub enum EngineError {
    /// Cutoffs violate `high > mid > low`
    #[error(transparent)]
    InvalidThresholdConfig(#[from] ThresholdError),

    /// Any other configuration problem
    #[error("Configuration error: {0}")]
    Config(String),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A document could not be loaded and the run is configured to abort
    #[error("Document unreadable: {subject}: {reason}")]
    DocumentUnreadable {
        /// Subject of the unreadable document
        subject: SubjectId,
        /// Reason reported by the loader
        reason: String,
    },

    /// A pair could not be compared because one side is unreadable
    #[error("Comparison failed for {subject_a} / {subject_b}: {reason}")]
    ComparisonFailed {
        /// First subject
        subject_a: SubjectId,
        /// Second subject
        subject_b: SubjectId,
        /// Why the comparison failed
        reason: String,
    },

    /// An alignment was passed with documents it was not computed from
    #[error("Alignment does not belong to {subject_a} / {subject_b}")]
    AlignmentMismatch {
        /// First document's subject
        subject_a: SubjectId,
        /// Second document's subject
        subject_b: SubjectId,
    },

    /// The subject is not part of the analysis
    #[error("Unknown subject: {0}")]
    UnknownSubject(String),

    /// No alignment exists for the pair (self-pair or failed comparison)
    #[error("No alignment for {0} / {1}")]
    NoAlignment(SubjectId, SubjectId),

    /// The document source failed as a whole
    #[error("Document source error: {0}")]
    Source(String),

    /// The run was cancelled between pair computations
    #[error("Analysis cancelled")]
    Cancelled,

    /// Background worker failure (tokio runtime issues)
    #[error("Worker error: {0}")]
    Worker(String),
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, EngineError>;
