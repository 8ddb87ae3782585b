//! plagscan Engine
//!
//! Pairwise similarity analysis over a corpus of submissions.
//!
//! # Overview
//!
//! The engine is responsible for:
//! - **Alignment**: Ratcliff/Obershelp matching of every document pair
//! - **Matrix construction**: A symmetric N×N score matrix with per-cell status
//! - **Suspect reporting**: Pairs at or above the suspect threshold, strongest first
//! - **Fragment extraction**: Side-by-side bodies and shared regions of a pair
//!
//! # Scoring
//!
//! A pair's score is `2·M / (|A| + |B|) · 100`, where `M` is the number of
//! characters in matching blocks. The matcher always runs on the two texts in
//! a canonical order, so `score(A, B)` and `score(B, A)` are bit-identical.
//!
//! | Tier | Condition (defaults) |
//! |------|----------------------|
//! | **High** | score ≥ 80 |
//! | **Mid** | 60 ≤ score < 80 |
//! | **Unclassified** | 30 < score < 60 |
//! | **Low** | score ≤ 30 |
//!
//! # Usage
//!
//! ## One-shot Analysis
//!
//! ```no_run
//! use plagscan_engine::{Analyzer, EngineConfig};
//! use plagscan_store::DocumentStore;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let store = DocumentStore::new(["alice.py", "bob.py", "carol.py"]);
//! let analyzer = Analyzer::new(EngineConfig::default())?;
//!
//! let report = analyzer.analyze(&store)?;
//! for suspect in &report.suspects {
//!     println!("{} / {}: {:.2}%", suspect.subject_a, suspect.subject_b, suspect.score);
//! }
//! println!("{}", report.summary.summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Background Worker
//!
//! ```no_run
//! use plagscan_engine::AnalysisWorker;
//! use plagscan_store::DocumentStore;
//! use tokio;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let corpus = DocumentStore::new(["alice.py", "bob.py"]).load();
//!     let worker = AnalysisWorker::default_config();
//!
//!     let handle = worker.spawn(corpus);
//!     // handle.cancel() stops the build before the next pair
//!     let report = handle.wait().await?;
//!     println!("{}", report.summary.summary());
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration Presets
//!
//! ```
//! use plagscan_engine::EngineConfig;
//!
//! // Default: 80 / 60 / 30 cutoffs, suspects at 80
//! let config = EngineConfig::default();
//!
//! // Strict: flag more pairs
//! let config = EngineConfig::strict();
//!
//! // Lenient: flag near-copies only
//! let config = EngineConfig::lenient();
//! ```
//!
//! # Configuration
//!
//! The engine can be configured via TOML:
//!
//! ```toml
//! [engine]
//! suspect_threshold = 80.0
//! header_marker = "#####"
//! on_unreadable = "skip"   # skip | include | abort
//! autojunk = false
//!
//! [engine.cutoffs]
//! high = 80.0
//! mid = 60.0
//! low = 30.0
//! ```

#![warn(missing_docs)]

mod aligner;
mod analysis;
mod config;
mod error;
mod fragment;
mod matrix_builder;
mod report;
mod worker;

pub use aligner::{Alignment, MatchingBlock, OpTag, Opcode, PairwiseAligner};
pub use analysis::Analyzer;
pub use config::{CutoffsConfig, EngineConfig, UnreadablePolicy};
pub use error::{EngineError, Result};
pub use fragment::{extract_fragments, matching_regions, Fragments, MatchRegion};
pub use matrix_builder::{CancelFlag, DocumentSlot, MatrixBuild, PairFailure, SimilarityMatrixBuilder};
pub use report::{find_suspects, AnalysisReport, AnalysisSummary, CorpusStatus};
pub use worker::{AnalysisHandle, AnalysisWorker};
