//! Document module - the normalized text of one subject

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

/// Identifier of a subject (a student or a domain)
///
/// Subjects are ordered lexicographically; that order defines the row/column
/// order of every similarity matrix.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SubjectId(String);

impl SubjectId {
    /// Create a subject identifier from a name
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Derive the subject from a document path (file name without its last extension)
    ///
    /// Returns `None` when the path has no file name (e.g. `/` or `..`).
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_stem()
            .map(|stem| Self(stem.to_string_lossy().into_owned()))
    }

    /// Get the subject name
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SubjectId {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for SubjectId {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Rewrite CRLF and lone CR line endings to LF
pub fn normalize_line_endings(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\r' {
            if chars.peek() == Some(&'\n') {
                chars.next();
            }
            out.push('\n');
        } else {
            out.push(c);
        }
    }
    out
}

/// Byte offset where the body starts, given a header marker
///
/// The body begins at the line following the first occurrence of `marker`.
/// If the marker sits on the last line, the body is empty (offset = text length).
/// Returns `None` when the marker is empty or absent.
pub fn body_offset(text: &str, marker: &str) -> Option<usize> {
    if marker.is_empty() {
        return None;
    }
    let found = text.find(marker)?;
    let after_marker = found + marker.len();
    match text[after_marker..].find('\n') {
        Some(newline) => Some(after_marker + newline + 1),
        None => Some(text.len()),
    }
}

/// The normalized text content of one subject
///
/// Created at load time and immutable for the duration of an analysis run.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    subject: SubjectId,
    content: String,
    marker_offset: Option<usize>,
}

impl Document {
    /// Create a document, normalizing line endings to LF
    pub fn new(subject: impl Into<SubjectId>, content: &str) -> Self {
        Self {
            subject: subject.into(),
            content: normalize_line_endings(content),
            marker_offset: None,
        }
    }

    /// Record where the body begins according to `marker`
    ///
    /// Leaves the offset unset when the marker does not occur.
    pub fn with_marker(mut self, marker: &str) -> Self {
        self.marker_offset = body_offset(&self.content, marker);
        self
    }

    /// Subject this document belongs to
    pub fn subject(&self) -> &SubjectId {
        &self.subject
    }

    /// Full normalized content
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Byte offset of the body, if a header marker was found at load time
    pub fn marker_offset(&self) -> Option<usize> {
        self.marker_offset
    }

    /// Content after the header marker, or the whole content when there is none
    pub fn body(&self) -> &str {
        &self.content[self.marker_offset.unwrap_or(0)..]
    }

    /// Length in characters (not bytes)
    pub fn char_len(&self) -> usize {
        self.content.chars().count()
    }

    /// Whether the document has no content
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// A document that could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadFailure {
    /// Subject the document would have belonged to
    pub subject: SubjectId,

    /// Source location, when the document came from a file
    pub path: Option<PathBuf>,

    /// Human-readable reason
    pub reason: String,
}

/// Outcome of loading a set of documents
///
/// Per-document failures do not abort the batch; they are collected here so
/// the caller can decide whether to skip the subjects or abort.
#[derive(Debug, Clone, Default)]
pub struct Corpus {
    /// Loaded documents, keyed (and therefore ordered) by subject
    pub documents: BTreeMap<SubjectId, Document>,

    /// Documents that could not be loaded
    pub failures: Vec<LoadFailure>,
}

impl Corpus {
    /// Create an empty corpus
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a loaded document
    ///
    /// A second document for an existing subject is rejected and recorded as a failure.
    pub fn insert(&mut self, document: Document) {
        if self.documents.contains_key(document.subject()) {
            self.failures.push(LoadFailure {
                subject: document.subject().clone(),
                path: None,
                reason: "duplicate subject".to_string(),
            });
            return;
        }
        self.documents.insert(document.subject().clone(), document);
    }

    /// Record a document that could not be loaded
    pub fn record_failure(&mut self, failure: LoadFailure) {
        self.failures.push(failure);
    }

    /// Number of loaded documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Whether no document was loaded
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }
}
