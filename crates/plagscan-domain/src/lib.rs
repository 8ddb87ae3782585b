//! plagscan Domain Layer
//!
//! This crate contains the domain model for plagscan. It has ZERO external
//! dependencies and defines the value objects and trait interfaces that the
//! store, engine and CLI crates depend upon.
//!
//! ## Key Concepts
//!
//! - **Subject**: one student (or domain) whose files were bundled into one document
//! - **Document**: the normalized text of a subject's submission
//! - **Similarity matrix**: N×N scores in [0, 100], symmetric, diagonal fixed at 100
//! - **Risk tier**: coarse low/mid/high classification of a score against cutoffs
//! - **Suspect pair**: two subjects whose score meets the suspect threshold
//!
//! ## Architecture
//!
//! - No external crate dependencies
//! - Pure logic only, no I/O
//! - Loading lives in `plagscan-store`, alignment in `plagscan-engine`

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod matrix;
pub mod suspect;
pub mod tier;
pub mod traits;

// Re-exports for convenience
pub use document::{Corpus, Document, LoadFailure, SubjectId};
pub use matrix::{Cell, CellStatus, MatrixStats, SimilarityMatrix};
pub use suspect::SuspectPair;
pub use tier::{classify, Cutoffs, RiskTier, ThresholdClassifier, ThresholdError};
pub use traits::DocumentSource;
