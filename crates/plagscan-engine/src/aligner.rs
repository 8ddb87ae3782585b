//! Pairwise alignment - Ratcliff/Obershelp matching over character streams
//!
//! The matcher finds the longest matching block between two sequences, then
//! recurses into the unmatched gaps on both sides. The similarity ratio is
//! `2 * M / (len_a + len_b)` where `M` is the total size of all blocks.

use crate::EngineError;
use plagscan_domain::{Document, SubjectId};
use std::collections::{HashMap, HashSet};
use std::ops::Range;

/// Sequences at least this long are subject to the popularity heuristic
const AUTOJUNK_MIN_LEN: usize = 200;

/// A run of equal characters: `a[a..a + size] == b[b..b + size]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchingBlock {
    /// Start in the first sequence (character index)
    pub a: usize,
    /// Start in the second sequence (character index)
    pub b: usize,
    /// Number of matching characters
    pub size: usize,
}

/// Kind of an edit operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpTag {
    /// Ranges are identical
    Equal,
    /// Range of a is replaced by range of b
    Replace,
    /// Range of a is deleted
    Delete,
    /// Range of b is inserted
    Insert,
}

/// One edit operation turning a into b
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opcode {
    /// Operation kind
    pub tag: OpTag,
    /// Affected range in a
    pub a: Range<usize>,
    /// Affected range in b
    pub b: Range<usize>,
}

/// Result of comparing two documents
///
/// Keeps the matching blocks so that fragments can be located later without
/// running the matcher again.
#[derive(Debug, Clone, PartialEq)]
pub struct Alignment {
    subject_a: SubjectId,
    subject_b: SubjectId,
    len_a: usize,
    len_b: usize,
    blocks: Vec<MatchingBlock>,
}

impl Alignment {
    /// First subject
    pub fn subject_a(&self) -> &SubjectId {
        &self.subject_a
    }

    /// Second subject
    pub fn subject_b(&self) -> &SubjectId {
        &self.subject_b
    }

    /// Character length of the first document
    pub fn len_a(&self) -> usize {
        self.len_a
    }

    /// Character length of the second document
    pub fn len_b(&self) -> usize {
        self.len_b
    }

    /// Matching blocks, ordered by position (non-overlapping, non-adjacent)
    pub fn matching_blocks(&self) -> &[MatchingBlock] {
        &self.blocks
    }

    /// Total number of matched characters
    pub fn matched_chars(&self) -> usize {
        self.blocks.iter().map(|block| block.size).sum()
    }

    /// Similarity in percent
    ///
    /// Two empty documents are identical (100); one empty document shares nothing (0).
    pub fn ratio(&self) -> f64 {
        let total = self.len_a + self.len_b;
        if total == 0 {
            return 100.0;
        }
        2.0 * self.matched_chars() as f64 / total as f64 * 100.0
    }

    /// Whether this alignment compares exactly these two subjects, in this order
    pub fn is_between(&self, a: &SubjectId, b: &SubjectId) -> bool {
        &self.subject_a == a && &self.subject_b == b
    }

    /// The same alignment seen from the other side
    pub fn reversed(&self) -> Self {
        Self {
            subject_a: self.subject_b.clone(),
            subject_b: self.subject_a.clone(),
            len_a: self.len_b,
            len_b: self.len_a,
            blocks: flip(&self.blocks),
        }
    }

    /// Edit operations turning the first document into the second
    pub fn opcodes(&self) -> Vec<Opcode> {
        let mut opcodes = Vec::new();
        let (mut i, mut j) = (0, 0);
        let sentinel = MatchingBlock {
            a: self.len_a,
            b: self.len_b,
            size: 0,
        };

        for block in self.blocks.iter().chain(std::iter::once(&sentinel)) {
            let tag = match (i < block.a, j < block.b) {
                (true, true) => Some(OpTag::Replace),
                (true, false) => Some(OpTag::Delete),
                (false, true) => Some(OpTag::Insert),
                (false, false) => None,
            };
            if let Some(tag) = tag {
                opcodes.push(Opcode {
                    tag,
                    a: i..block.a,
                    b: j..block.b,
                });
            }
            i = block.a + block.size;
            j = block.b + block.size;
            if block.size > 0 {
                opcodes.push(Opcode {
                    tag: OpTag::Equal,
                    a: block.a..i,
                    b: block.b..j,
                });
            }
        }
        opcodes
    }
}

fn flip(blocks: &[MatchingBlock]) -> Vec<MatchingBlock> {
    blocks
        .iter()
        .map(|block| MatchingBlock {
            a: block.b,
            b: block.a,
            size: block.size,
        })
        .collect()
}

/// Computes similarity between two documents
#[derive(Debug, Clone, Copy, Default)]
pub struct PairwiseAligner {
    autojunk: bool,
}

impl PairwiseAligner {
    /// Create an aligner
    ///
    /// With `autojunk`, characters that make up more than 1% of a long
    /// (200+ characters) sequence are not used to seed matches.
    pub fn new(autojunk: bool) -> Self {
        Self { autojunk }
    }

    /// Align two documents and return the alignment with its score
    ///
    /// The score does not depend on argument order: the matcher always runs on
    /// a canonical ordering of the two texts and the blocks are flipped back.
    pub fn align(&self, doc_a: &Document, doc_b: &Document) -> (Alignment, f64) {
        let a: Vec<char> = doc_a.content().chars().collect();
        let b: Vec<char> = doc_b.content().chars().collect();

        let swapped = (b.len(), &b) < (a.len(), &a);
        let blocks = if swapped {
            flip(&SequenceMatcher::new(&b, &a, self.autojunk).matching_blocks())
        } else {
            SequenceMatcher::new(&a, &b, self.autojunk).matching_blocks()
        };

        let alignment = Alignment {
            subject_a: doc_a.subject().clone(),
            subject_b: doc_b.subject().clone(),
            len_a: a.len(),
            len_b: b.len(),
            blocks,
        };
        let score = alignment.ratio();
        (alignment, score)
    }

    /// Align two possibly-missing documents
    ///
    /// A missing side yields `ComparisonFailed` rather than a score of 0, so a
    /// failure is never mistaken for a dissimilar pair.
    pub fn try_align(
        &self,
        subject_a: &SubjectId,
        doc_a: Option<&Document>,
        subject_b: &SubjectId,
        doc_b: Option<&Document>,
    ) -> Result<(Alignment, f64), EngineError> {
        match (doc_a, doc_b) {
            (Some(a), Some(b)) => Ok(self.align(a, b)),
            (a, _) => {
                let missing = if a.is_none() { subject_a } else { subject_b };
                Err(EngineError::ComparisonFailed {
                    subject_a: subject_a.clone(),
                    subject_b: subject_b.clone(),
                    reason: format!("document '{}' is unreadable", missing),
                })
            }
        }
    }
}

/// Ratcliff/Obershelp matcher over two character slices
struct SequenceMatcher<'s> {
    a: &'s [char],
    b: &'s [char],
    b2j: HashMap<char, Vec<usize>>,
}

impl<'s> SequenceMatcher<'s> {
    fn new(a: &'s [char], b: &'s [char], autojunk: bool) -> Self {
        let mut b2j: HashMap<char, Vec<usize>> = HashMap::new();
        for (j, &c) in b.iter().enumerate() {
            b2j.entry(c).or_default().push(j);
        }

        if autojunk && b.len() >= AUTOJUNK_MIN_LEN {
            let limit = b.len() / 100 + 1;
            let popular: HashSet<char> = b2j
                .iter()
                .filter(|(_, positions)| positions.len() > limit)
                .map(|(&c, _)| c)
                .collect();
            for c in popular {
                b2j.remove(&c);
            }
        }

        Self { a, b, b2j }
    }

    /// Longest block in `a[alo..ahi]` x `b[blo..bhi]`
    ///
    /// Ties go to the block starting earliest in a, then earliest in b.
    fn find_longest_match(&self, alo: usize, ahi: usize, blo: usize, bhi: usize) -> MatchingBlock {
        let (mut best_i, mut best_j, mut best_size) = (alo, blo, 0);

        // Run lengths ending at b[j] for the previous and current row of a,
        // stored at j - blo + 1 so that index 0 is always an empty run
        let width = bhi.saturating_sub(blo) + 1;
        let mut prev = vec![0usize; width];
        let mut curr = vec![0usize; width];
        let mut prev_touched: Vec<usize> = Vec::new();
        let mut curr_touched: Vec<usize> = Vec::new();

        for i in alo..ahi {
            if let Some(positions) = self.b2j.get(&self.a[i]) {
                let start = positions.partition_point(|&j| j < blo);
                for &j in positions[start..].iter().take_while(|&&j| j < bhi) {
                    let slot = j - blo + 1;
                    let k = prev[slot - 1] + 1;
                    curr[slot] = k;
                    curr_touched.push(slot);
                    if k > best_size {
                        best_i = i + 1 - k;
                        best_j = j + 1 - k;
                        best_size = k;
                    }
                }
            }
            for &slot in &prev_touched {
                prev[slot] = 0;
            }
            prev_touched.clear();
            std::mem::swap(&mut prev, &mut curr);
            std::mem::swap(&mut prev_touched, &mut curr_touched);
        }

        // Popular characters never seed a match; grow the block over them
        while best_i > alo && best_j > blo && self.a[best_i - 1] == self.b[best_j - 1] {
            best_i -= 1;
            best_j -= 1;
            best_size += 1;
        }
        while best_i + best_size < ahi
            && best_j + best_size < bhi
            && self.a[best_i + best_size] == self.b[best_j + best_size]
        {
            best_size += 1;
        }

        MatchingBlock {
            a: best_i,
            b: best_j,
            size: best_size,
        }
    }

    fn matching_blocks(&self) -> Vec<MatchingBlock> {
        let mut queue = vec![(0, self.a.len(), 0, self.b.len())];
        let mut blocks = Vec::new();

        while let Some((alo, ahi, blo, bhi)) = queue.pop() {
            let found = self.find_longest_match(alo, ahi, blo, bhi);
            if found.size == 0 {
                continue;
            }
            if alo < found.a && blo < found.b {
                queue.push((alo, found.a, blo, found.b));
            }
            if found.a + found.size < ahi && found.b + found.size < bhi {
                queue.push((found.a + found.size, ahi, found.b + found.size, bhi));
            }
            blocks.push(found);
        }
        blocks.sort_by_key(|block| (block.a, block.b));

        // Collapse adjacent blocks
        let mut collapsed: Vec<MatchingBlock> = Vec::with_capacity(blocks.len());
        for block in blocks {
            match collapsed.last_mut() {
                Some(last) if last.a + last.size == block.a && last.b + last.size == block.b => {
                    last.size += block.size;
                }
                _ => collapsed.push(block),
            }
        }
        collapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(name: &str, text: &str) -> Document {
        Document::new(name, text)
    }

    fn score(a: &str, b: &str) -> f64 {
        PairwiseAligner::default().align(&doc("a", a), &doc("b", b)).1
    }

    #[test]
    fn test_identical_is_100() {
        assert_eq!(score("fn main() {}", "fn main() {}"), 100.0);
    }

    #[test]
    fn test_known_ratio() {
        // "bcd" is shared: 2 * 3 / 8
        assert!((score("abcd", "bcde") - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_recursion_into_gaps() {
        // "ab" is found first, then "cd" in the gap to its right
        let (alignment, _) = PairwiseAligner::default().align(&doc("a", "abxcd"), &doc("b", "abycd"));
        assert_eq!(alignment.matched_chars(), 4);
        assert_eq!(alignment.matching_blocks().len(), 2);
        assert!((alignment.ratio() - 80.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_documents() {
        assert_eq!(score("", ""), 100.0);
        assert_eq!(score("abc", ""), 0.0);
        assert_eq!(score("", "abc"), 0.0);
    }

    #[test]
    fn test_disjoint() {
        assert_eq!(score("aaaa", "bbbb"), 0.0);
    }

    #[test]
    fn test_symmetric_on_tie_breaking_input() {
        // Tie-breaking makes a naive matcher order-dependent on inputs like these
        let a = "abcabd";
        let b = "abdabc";
        assert_eq!(score(a, b).to_bits(), score(b, a).to_bits());
    }

    #[test]
    fn test_character_level_not_line_level() {
        // One changed character on a line still matches the rest of that line
        let s = score("let total = 10;\n", "let total = 11;\n");
        assert!(s > 90.0);
    }

    #[test]
    fn test_reversed_alignment() {
        let (alignment, _) = PairwiseAligner::default().align(&doc("a", "xxabc"), &doc("b", "abc"));
        let reversed = alignment.reversed();
        assert_eq!(reversed.subject_a().as_str(), "b");
        assert_eq!(reversed.len_a(), 3);
        assert_eq!(reversed.matching_blocks()[0], MatchingBlock { a: 0, b: 2, size: 3 });
        assert_eq!(reversed.ratio(), alignment.ratio());
    }

    #[test]
    fn test_opcodes() {
        let (alignment, _) = PairwiseAligner::default().align(&doc("a", "qabxcd"), &doc("b", "abycdf"));
        let tags: Vec<OpTag> = alignment.opcodes().iter().map(|op| op.tag).collect();
        assert_eq!(
            tags,
            vec![OpTag::Delete, OpTag::Equal, OpTag::Replace, OpTag::Equal, OpTag::Insert]
        );
        let ops = alignment.opcodes();
        assert_eq!(ops[0].a, 0..1);
        assert_eq!(ops[4].b, 5..6);
    }

    #[test]
    fn test_try_align_missing_side() {
        let aligner = PairwiseAligner::default();
        let a = doc("a", "text");
        let result = aligner.try_align(&SubjectId::from("a"), Some(&a), &SubjectId::from("b"), None);
        match result {
            Err(EngineError::ComparisonFailed { reason, .. }) => assert!(reason.contains("'b'")),
            other => panic!("Expected ComparisonFailed, got {:?}", other),
        }
    }

    #[test]
    fn test_autojunk_still_matches_identical_text() {
        let text = "a".repeat(300);
        let shifted = format!("b{}", text);

        // Identical text still matches through block extension
        let aligner = PairwiseAligner::new(true);
        let (_, score) = aligner.align(&doc("a", &text), &doc("b", &text));
        assert_eq!(score, 100.0);

        // 'a' is popular and never seeds a match; the prefix blocks extension
        let (_, score) = aligner.align(&doc("a", &text), &doc("b", &shifted));
        assert_eq!(score, 0.0);

        let (_, score) = PairwiseAligner::new(false).align(&doc("a", &text), &doc("b", &shifted));
        assert!(score > 99.0);
    }

    fn source_file(seed: usize, functions: usize) -> String {
        let mut text = String::new();
        for f in 0..functions {
            let n = (f * 7 + seed) % 13;
            text.push_str(&format!(
                "def handler_{f}(request, ctx):\n    value = request.get('field_{n}')\n    if value is None:\n        return ctx.default_{n}\n    return value * {n} + {f}\n\n"
            ));
        }
        text
    }

    #[test]
    fn test_long_code_documents_align_quickly() {
        // Two ~8 KB files full of repeated keywords, without autojunk
        let a = source_file(1, 60);
        let b = source_file(5, 60);
        assert!(a.len() > 6_000);

        let start = std::time::Instant::now();
        let (alignment, score) = PairwiseAligner::default().align(&doc("a", &a), &doc("b", &b));
        let elapsed = start.elapsed();

        assert!(score > 50.0 && score < 100.0);
        let ac: Vec<char> = a.chars().collect();
        let bc: Vec<char> = b.chars().collect();
        for block in alignment.matching_blocks() {
            assert_eq!(&ac[block.a..block.a + block.size], &bc[block.b..block.b + block.size]);
        }
        assert!(elapsed.as_secs() < 20, "alignment took {:?}", elapsed);
    }
}
