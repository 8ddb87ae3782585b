//! Similarity matrix module

use crate::SubjectId;

/// Score of a subject compared with itself
pub const SELF_SIMILARITY: f64 = 100.0;

/// How a matrix cell got its score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CellStatus {
    /// Self-comparison, fixed at 100
    Diagonal,

    /// Score produced by the aligner
    Measured,

    /// One side was unreadable; the score is 0 but carries no information
    Failed,
}

/// One cell of the similarity matrix
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    /// Similarity in percent, within [0, 100]
    pub score: f64,
    /// Provenance of the score
    pub status: CellStatus,
}

impl Cell {
    /// A measured score, clamped to [0, 100]
    pub fn measured(score: f64) -> Self {
        let score = if score.is_nan() { 0.0 } else { score.clamp(0.0, 100.0) };
        Self {
            score,
            status: CellStatus::Measured,
        }
    }

    /// A failed comparison (score 0)
    pub fn failed() -> Self {
        Self {
            score: 0.0,
            status: CellStatus::Failed,
        }
    }

    fn diagonal() -> Self {
        Self {
            score: SELF_SIMILARITY,
            status: CellStatus::Diagonal,
        }
    }

    /// Whether the score came from the aligner
    pub fn is_measured(&self) -> bool {
        self.status == CellStatus::Measured
    }
}

/// Aggregate statistics over the measured pairs of a matrix
///
/// Failed cells are counted but never folded into the score statistics.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MatrixStats {
    /// Number of upper-triangle pairs with a measured score
    pub measured_pairs: usize,
    /// Number of upper-triangle pairs whose comparison failed
    pub failed_pairs: usize,
    /// Mean measured score (None without measured pairs)
    pub mean: Option<f64>,
    /// Highest measured score (None without measured pairs)
    pub max: Option<f64>,
}

/// N×N similarity matrix indexed by an ordered subject list
///
/// Symmetric by construction: cells are only written in pairs. The diagonal is
/// fixed at 100 and cannot be overwritten.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    subjects: Vec<SubjectId>,
    cells: Vec<Cell>,
}

impl SimilarityMatrix {
    /// Create a matrix over `subjects` (sorted and deduplicated)
    ///
    /// Off-diagonal cells start as failed until a score is recorded.
    pub fn new(mut subjects: Vec<SubjectId>) -> Self {
        subjects.sort();
        subjects.dedup();
        let n = subjects.len();
        let mut cells = vec![Cell::failed(); n * n];
        for i in 0..n {
            cells[i * n + i] = Cell::diagonal();
        }
        Self { subjects, cells }
    }

    /// Matrix with no subjects
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Number of subjects (rows)
    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    /// Whether the matrix has no subjects
    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Subjects in row/column order
    pub fn subjects(&self) -> &[SubjectId] {
        &self.subjects
    }

    /// Row/column index of a subject
    pub fn index_of(&self, subject: &str) -> Option<usize> {
        self.subjects
            .binary_search_by(|s| s.as_str().cmp(subject))
            .ok()
    }

    /// Cell at (i, j)
    pub fn get(&self, i: usize, j: usize) -> Option<&Cell> {
        let n = self.len();
        if i < n && j < n {
            self.cells.get(i * n + j)
        } else {
            None
        }
    }

    /// Score at (i, j)
    pub fn score(&self, i: usize, j: usize) -> Option<f64> {
        self.get(i, j).map(|cell| cell.score)
    }

    /// Score between two subjects by name
    pub fn score_between(&self, a: &str, b: &str) -> Option<f64> {
        self.score(self.index_of(a)?, self.index_of(b)?)
    }

    /// Record a cell at (i, j) and its mirror (j, i)
    ///
    /// Returns `false` (and changes nothing) for diagonal or out-of-range indices.
    pub fn set_pair(&mut self, i: usize, j: usize, cell: Cell) -> bool {
        let n = self.len();
        if i == j || i >= n || j >= n || cell.status == CellStatus::Diagonal {
            return false;
        }
        self.cells[i * n + j] = cell;
        self.cells[j * n + i] = cell;
        true
    }

    /// One row of cells
    pub fn row(&self, i: usize) -> Option<&[Cell]> {
        let n = self.len();
        if i < n {
            Some(&self.cells[i * n..(i + 1) * n])
        } else {
            None
        }
    }

    /// Iterate the strict upper triangle as `(i, j, cell)` with `i < j`
    pub fn upper_triangle(&self) -> impl Iterator<Item = (usize, usize, &Cell)> + '_ {
        let n = self.len();
        (0..n).flat_map(move |i| ((i + 1)..n).map(move |j| (i, j, &self.cells[i * n + j])))
    }

    /// Statistics over measured pairs
    pub fn stats(&self) -> MatrixStats {
        let mut stats = MatrixStats::default();
        let mut sum = 0.0;

        for (_, _, cell) in self.upper_triangle() {
            match cell.status {
                CellStatus::Measured => {
                    stats.measured_pairs += 1;
                    sum += cell.score;
                    stats.max = Some(stats.max.map_or(cell.score, |m: f64| m.max(cell.score)));
                }
                CellStatus::Failed => stats.failed_pairs += 1,
                CellStatus::Diagonal => {}
            }
        }

        if stats.measured_pairs > 0 {
            stats.mean = Some(sum / stats.measured_pairs as f64);
        }
        stats
    }
}
