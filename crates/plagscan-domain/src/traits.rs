//! Trait definitions for external interactions
//!
//! Infrastructure implementations live in other crates.

use crate::Corpus;

/// Trait for supplying the documents of one analysis run
///
/// Implemented by the infrastructure layer (plagscan-store). Individual
/// documents that cannot be read are reported inside the returned corpus;
/// only a failure of the source as a whole is an error.
pub trait DocumentSource {
    /// Error type for source-level failures
    type Error;

    /// Load every document this source knows about
    fn load_corpus(&self) -> Result<Corpus, Self::Error>;
}
