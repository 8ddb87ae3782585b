//! Fragment extraction for side-by-side review of a pair
//!
//! Both functions are pure: they read the alignment computed during the
//! matrix build and never run the matcher again.

use crate::aligner::Alignment;
use crate::{EngineError, Result};
use plagscan_domain::document::body_offset;
use plagscan_domain::Document;
use std::ops::RangeInclusive;

/// Body lines of two documents, padded to equal length
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Fragments {
    /// Lines of the first document's body
    pub lines_a: Vec<String>,
    /// Lines of the second document's body
    pub lines_b: Vec<String>,
}

impl Fragments {
    /// Number of rows (both sides have the same length)
    pub fn len(&self) -> usize {
        self.lines_a.len()
    }

    /// Whether both bodies are empty
    pub fn is_empty(&self) -> bool {
        self.lines_a.is_empty()
    }

    /// Iterate rows as `(line_a, line_b)`
    pub fn rows(&self) -> impl Iterator<Item = (&str, &str)> {
        self.lines_a
            .iter()
            .zip(self.lines_b.iter())
            .map(|(a, b)| (a.as_str(), b.as_str()))
    }
}

/// A stretch of text shared by both bodies
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchRegion {
    /// The shared text
    pub text: String,
    /// 1-based lines spanned in the first body
    pub lines_a: RangeInclusive<usize>,
    /// 1-based lines spanned in the second body
    pub lines_b: RangeInclusive<usize>,
}

impl MatchRegion {
    /// Length of the shared text in characters
    pub fn size(&self) -> usize {
        self.text.chars().count()
    }
}

/// Body lines of both documents, padded with empty strings to equal length
///
/// With a `header_marker` that occurs in a document, its body starts on the
/// line after the first occurrence; otherwise at the start of the document.
/// Without a marker, the offset recorded on the document at load time applies.
pub fn extract_fragments(
    doc_a: &Document,
    doc_b: &Document,
    alignment: &Alignment,
    header_marker: Option<&str>,
) -> Result<Fragments> {
    check_alignment(doc_a, doc_b, alignment)?;

    let mut lines_a = body_lines(doc_a, header_marker);
    let mut lines_b = body_lines(doc_b, header_marker);

    let rows = lines_a.len().max(lines_b.len());
    lines_a.resize(rows, String::new());
    lines_b.resize(rows, String::new());

    Ok(Fragments { lines_a, lines_b })
}

/// Matching blocks that lie inside both bodies, at least `min_len` characters long
///
/// Blocks straddling a body start are clipped to the body.
pub fn matching_regions(
    doc_a: &Document,
    doc_b: &Document,
    alignment: &Alignment,
    header_marker: Option<&str>,
    min_len: usize,
) -> Result<Vec<MatchRegion>> {
    let oriented = check_alignment(doc_a, doc_b, alignment)?;

    let chars_a: Vec<char> = doc_a.content().chars().collect();
    let chars_b: Vec<char> = doc_b.content().chars().collect();
    let start_a = body_start_chars(doc_a, header_marker);
    let start_b = body_start_chars(doc_b, header_marker);
    let lines_of_a = line_index(&chars_a, start_a);
    let lines_of_b = line_index(&chars_b, start_b);

    let mut regions = Vec::new();
    for block in oriented.matching_blocks() {
        let skip = start_a.saturating_sub(block.a).max(start_b.saturating_sub(block.b));
        if skip >= block.size {
            continue;
        }
        let (a, b, size) = (block.a + skip, block.b + skip, block.size - skip);
        if size < min_len.max(1) {
            continue;
        }

        regions.push(MatchRegion {
            text: chars_a[a..a + size].iter().collect(),
            lines_a: lines_of_a[a]..=lines_of_a[a + size - 1],
            lines_b: lines_of_b[b]..=lines_of_b[b + size - 1],
        });
    }
    Ok(regions)
}

/// Confirm the alignment was computed from these documents and orient it as (a, b)
fn check_alignment(doc_a: &Document, doc_b: &Document, alignment: &Alignment) -> Result<Alignment> {
    let oriented = if alignment.is_between(doc_a.subject(), doc_b.subject()) {
        alignment.clone()
    } else if alignment.is_between(doc_b.subject(), doc_a.subject()) {
        alignment.reversed()
    } else {
        return Err(mismatch(doc_a, doc_b));
    };

    if oriented.len_a() != doc_a.char_len() || oriented.len_b() != doc_b.char_len() {
        return Err(mismatch(doc_a, doc_b));
    }
    Ok(oriented)
}

fn mismatch(doc_a: &Document, doc_b: &Document) -> EngineError {
    EngineError::AlignmentMismatch {
        subject_a: doc_a.subject().clone(),
        subject_b: doc_b.subject().clone(),
    }
}

fn body<'d>(doc: &'d Document, header_marker: Option<&str>) -> &'d str {
    match header_marker {
        Some(marker) => &doc.content()[body_offset(doc.content(), marker).unwrap_or(0)..],
        None => doc.body(),
    }
}

fn body_lines(doc: &Document, header_marker: Option<&str>) -> Vec<String> {
    body(doc, header_marker).lines().map(str::to_string).collect()
}

fn body_start_chars(doc: &Document, header_marker: Option<&str>) -> usize {
    let body_len = body(doc, header_marker).len();
    let header_bytes = doc.content().len() - body_len;
    doc.content()[..header_bytes].chars().count()
}

/// 1-based body line of every character position (0 for header characters)
fn line_index(chars: &[char], body_start: usize) -> Vec<usize> {
    let mut lines = vec![0; chars.len()];
    let mut line = 1;
    for (pos, &c) in chars.iter().enumerate().skip(body_start) {
        lines[pos] = line;
        if c == '\n' {
            line += 1;
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aligner::PairwiseAligner;

    const MARKER: &str = "#####";

    fn pair(a: &str, b: &str) -> (Document, Document, Alignment) {
        let doc_a = Document::new("a", a);
        let doc_b = Document::new("b", b);
        let (alignment, _) = PairwiseAligner::default().align(&doc_a, &doc_b);
        (doc_a, doc_b, alignment)
    }

    #[test]
    fn test_bodies_after_marker_padded() {
        let (doc_a, doc_b, alignment) = pair(
            "Write a loop\n#####\nx\ny\n",
            "Write a loop\n#####\nx\n",
        );
        let fragments = extract_fragments(&doc_a, &doc_b, &alignment, Some(MARKER)).unwrap();

        assert_eq!(fragments.lines_a, vec!["x", "y"]);
        assert_eq!(fragments.lines_b, vec!["x", ""]);
        assert_eq!(fragments.len(), 2);
    }

    #[test]
    fn test_missing_marker_starts_at_beginning() {
        let (doc_a, doc_b, alignment) = pair("intro\n#####\nbody\n", "no marker\nhere\n");
        let fragments = extract_fragments(&doc_a, &doc_b, &alignment, Some(MARKER)).unwrap();

        assert_eq!(fragments.lines_a, vec!["body", ""]);
        assert_eq!(fragments.lines_b, vec!["no marker", "here"]);
    }

    #[test]
    fn test_no_marker_keeps_whole_document() {
        let (doc_a, doc_b, alignment) = pair("l1\nl2\nl3", "l1");
        let fragments = extract_fragments(&doc_a, &doc_b, &alignment, None).unwrap();
        assert_eq!(fragments.lines_a, vec!["l1", "l2", "l3"]);
        assert_eq!(fragments.lines_b, vec!["l1", "", ""]);
    }

    #[test]
    fn test_load_time_marker_used_without_parameter() {
        let doc_a = Document::new("a", "prompt\n#####\nbody a\n").with_marker(MARKER);
        let doc_b = Document::new("b", "prompt\n#####\nbody b\n").with_marker(MARKER);
        let (alignment, _) = PairwiseAligner::default().align(&doc_a, &doc_b);

        let fragments = extract_fragments(&doc_a, &doc_b, &alignment, None).unwrap();
        assert_eq!(fragments.lines_a, vec!["body a"]);
        assert_eq!(fragments.lines_b, vec!["body b"]);
    }

    #[test]
    fn test_reversed_alignment_accepted() {
        let (doc_a, doc_b, alignment) = pair("x\n", "x\ny\n");
        let fragments = extract_fragments(&doc_b, &doc_a, &alignment, None).unwrap();
        assert_eq!(fragments.lines_a, vec!["x", "y"]);
        assert_eq!(fragments.lines_b, vec!["x", ""]);
    }

    #[test]
    fn test_foreign_alignment_rejected() {
        let (doc_a, _, alignment) = pair("x", "y");
        let other = Document::new("c", "y");
        let result = extract_fragments(&doc_a, &other, &alignment, None);
        assert!(matches!(result, Err(EngineError::AlignmentMismatch { .. })));
    }

    #[test]
    fn test_stale_alignment_rejected() {
        let (_, doc_b, alignment) = pair("x", "y");
        let edited = Document::new("a", "xx");
        let result = extract_fragments(&edited, &doc_b, &alignment, None);
        assert!(matches!(result, Err(EngineError::AlignmentMismatch { .. })));
    }

    #[test]
    fn test_matching_regions_skip_header() {
        let (doc_a, doc_b, alignment) = pair(
            "Shared prompt text\n#####\nint total = 0;\nunique_a();\n",
            "Shared prompt text\n#####\nfoo();\nint total = 0;\n",
        );
        let regions = matching_regions(&doc_a, &doc_b, &alignment, Some(MARKER), 10).unwrap();

        assert!(!regions.is_empty());
        assert!(regions.iter().all(|r| !r.text.contains("prompt")));

        let shared = regions
            .iter()
            .find(|r| r.text.contains("int total = 0;"))
            .expect("shared statement should be a region");
        assert_eq!(shared.lines_a, 1..=1);
        assert_eq!(*shared.lines_b.start(), 2);
    }

    #[test]
    fn test_matching_regions_min_len() {
        let (doc_a, doc_b, alignment) = pair("abcdef", "abcxef");
        assert_eq!(matching_regions(&doc_a, &doc_b, &alignment, None, 1).unwrap().len(), 2);
        assert_eq!(matching_regions(&doc_a, &doc_b, &alignment, None, 3).unwrap().len(), 1);
    }
}
