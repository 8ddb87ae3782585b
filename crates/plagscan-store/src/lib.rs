//! plagscan Storage Layer
//!
//! Loads subject documents and implements the `DocumentSource` trait.
//!
//! # Loading rules
//!
//! - Bytes are decoded as UTF-8, with a Latin-1 fallback that never fails
//! - CRLF and lone CR line endings become LF
//! - The subject is the file name without its last extension
//! - A document that cannot be read is recorded as a failure; the batch continues
//!
//! # Examples
//!
//! ```no_run
//! use plagscan_store::DocumentStore;
//!
//! let store = DocumentStore::new(["bundles/alice.txt", "bundles/bob.txt"]);
//! let corpus = store.load();
//! println!("{} loaded, {} failed", corpus.len(), corpus.failures.len());
//! ```

#![warn(missing_docs)]

pub mod decode;

use decode::{decode, TextEncoding};
use plagscan_domain::{Corpus, Document, DocumentSource, LoadFailure, SubjectId};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading documents
#[derive(Error, Debug)]
pub enum StoreError {
    /// The file could not be opened or read
    #[error("Document unreadable: {path}: {source}")]
    DocumentUnreadable {
        /// Offending path
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// The path has no file name to derive a subject from
    #[error("Invalid document path: {0}")]
    InvalidPath(PathBuf),
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Loads documents from an ordered list of file paths
///
/// Directory traversal is the caller's job; the store only reads the files it is given.
#[derive(Debug, Clone, Default)]
pub struct DocumentStore {
    paths: Vec<PathBuf>,
    header_marker: Option<String>,
}

impl DocumentStore {
    /// Create a store over the given paths
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        Self {
            paths: paths.into_iter().map(Into::into).collect(),
            header_marker: None,
        }
    }

    /// Record body offsets for this header marker on every loaded document
    pub fn with_header_marker(mut self, marker: Option<String>) -> Self {
        self.header_marker = marker.filter(|m| !m.is_empty());
        self
    }

    /// Paths this store reads, in the order given
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Load every path, collecting per-document failures
    pub fn load(&self) -> Corpus {
        let mut corpus = Corpus::new();

        for path in &self.paths {
            match load_one(path, self.header_marker.as_deref()) {
                Ok(document) => {
                    if corpus.documents.contains_key(document.subject()) {
                        tracing::warn!(
                            "Skipping {}: subject '{}' already loaded",
                            path.display(),
                            document.subject()
                        );
                        corpus.record_failure(LoadFailure {
                            subject: document.subject().clone(),
                            path: Some(path.clone()),
                            reason: "duplicate subject".to_string(),
                        });
                    } else {
                        corpus.insert(document);
                    }
                }
                Err(e) => {
                    tracing::warn!("{}", e);
                    let subject = SubjectId::from_path(path)
                        .unwrap_or_else(|| SubjectId::new(path.display().to_string()));
                    corpus.record_failure(LoadFailure {
                        subject,
                        path: Some(path.clone()),
                        reason: failure_reason(&e),
                    });
                }
            }
        }

        tracing::info!(
            "Loaded {} document(s), {} failure(s)",
            corpus.len(),
            corpus.failures.len()
        );
        corpus
    }
}

impl DocumentSource for DocumentStore {
    type Error = StoreError;

    fn load_corpus(&self) -> Result<Corpus> {
        Ok(self.load())
    }
}

/// Load a single document from a file
pub fn load_one(path: &Path, header_marker: Option<&str>) -> Result<Document> {
    let subject = SubjectId::from_path(path).ok_or_else(|| StoreError::InvalidPath(path.to_path_buf()))?;

    let bytes = std::fs::read(path).map_err(|source| StoreError::DocumentUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    let document = from_bytes(subject, &bytes, header_marker);
    tracing::debug!(
        "Loaded {} ({} chars) from {}",
        document.subject(),
        document.char_len(),
        path.display()
    );
    Ok(document)
}

/// Build a document from raw bytes already in memory
pub fn from_bytes(subject: impl Into<SubjectId>, bytes: &[u8], header_marker: Option<&str>) -> Document {
    let subject = subject.into();
    let (text, encoding) = decode(bytes);
    if encoding == TextEncoding::Latin1 {
        tracing::warn!("{} is not valid UTF-8, decoded as Latin-1", subject);
    }

    let document = Document::new(subject, &text);
    match header_marker {
        Some(marker) => document.with_marker(marker),
        None => document,
    }
}

fn failure_reason(error: &StoreError) -> String {
    match error {
        StoreError::DocumentUnreadable { source, .. } => source.to_string(),
        StoreError::InvalidPath(_) => "path has no file name".to_string(),
    }
}

/// Documents supplied as (subject, raw bytes) pairs
///
/// Used when the collection stage hands over bundles without touching disk.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    entries: Vec<(SubjectId, Vec<u8>)>,
    header_marker: Option<String>,
}

impl MemorySource {
    /// Create an empty source
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subject's raw bytes
    pub fn with_document(mut self, subject: impl Into<SubjectId>, bytes: impl Into<Vec<u8>>) -> Self {
        self.entries.push((subject.into(), bytes.into()));
        self
    }

    /// Record body offsets for this header marker
    pub fn with_header_marker(mut self, marker: Option<String>) -> Self {
        self.header_marker = marker.filter(|m| !m.is_empty());
        self
    }

    /// Decode every entry into a corpus
    pub fn load(&self) -> Corpus {
        let mut corpus = Corpus::new();
        for (subject, bytes) in &self.entries {
            corpus.insert(from_bytes(subject.clone(), bytes, self.header_marker.as_deref()));
        }
        corpus
    }
}

impl DocumentSource for MemorySource {
    type Error = StoreError;

    fn load_corpus(&self) -> Result<Corpus> {
        Ok(self.load())
    }
}
