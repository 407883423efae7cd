use rayon::prelude::*;
use crate::core::scoring::{blend_total, compatibility_score};
use crate::core::profile::semantic_profile_alignment;
use crate::error::{MatchError, Result, Side};
use crate::models::{Candidate, MatchingWeights, Subject};

/// Dense N x M score matrix, one row per subject, one column per candidate
///
/// Built once and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CompatibilityMatrix {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl CompatibilityMatrix {
    /// Build a matrix from row vectors; every row must have the same length
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let row_count = rows.len();
        if row_count == 0 {
            return Err(MatchError::EmptyInput { side: Side::Subject });
        }
        let cols = rows[0].len();
        if cols == 0 {
            return Err(MatchError::EmptyInput { side: Side::Candidate });
        }

        let mut values = Vec::with_capacity(row_count * cols);
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != cols {
                return Err(MatchError::InvalidRecord {
                    side: Side::Subject,
                    index,
                    reason: format!("matrix row has {} columns, expected {}", row.len(), cols),
                });
            }
            values.extend(row);
        }

        Ok(Self { rows: row_count, cols, values })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_square(&self) -> bool {
        self.rows == self.cols
    }

    /// Score at `(row, col)`, `None` when out of bounds
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row < self.rows && col < self.cols {
            Some(self.values[row * self.cols + col])
        } else {
            None
        }
    }

    /// One subject's scores against every candidate, `None` when out of bounds
    pub fn row(&self, row: usize) -> Option<&[f64]> {
        (row < self.rows).then(|| self.row_values(row))
    }

    /// Row slice for indices already known to be in bounds
    #[inline]
    pub(crate) fn row_values(&self, row: usize) -> &[f64] {
        &self.values[row * self.cols..(row + 1) * self.cols]
    }

    /// Leading `size x size` block, for callers that must feed a square matrix
    /// to the optimal solver
    pub fn truncate_square(&self) -> Self {
        let size = self.rows.min(self.cols);
        let values = (0..size)
            .flat_map(|row| self.row_values(row)[..size].iter().copied())
            .collect();
        Self { rows: size, cols: size, values }
    }

    /// Smallest and largest entries
    pub fn bounds(&self) -> (f64, f64) {
        self.values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(*v), hi.max(*v)))
    }
}

/// The two matrices of one build: plain compatibility and the total-score
/// variant that blends in semantic profile alignment
#[derive(Debug, Clone)]
pub struct MatrixSet {
    pub compatibility: CompatibilityMatrix,
    pub total: CompatibilityMatrix,
}

/// Applies the score functions to every (subject, candidate) pair
///
/// Rows are independent, so they are computed in parallel. Output is
/// deterministic for a fixed weight configuration.
#[derive(Debug, Clone)]
pub struct MatrixBuilder {
    weights: MatchingWeights,
}

impl MatrixBuilder {
    pub fn new(weights: MatchingWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &MatchingWeights {
        &self.weights
    }

    /// Build the compatibility matrix
    pub fn build(&self, subjects: &[Subject], candidates: &[Candidate]) -> Result<CompatibilityMatrix> {
        ensure_not_empty(subjects, candidates)?;

        let rows: Vec<Vec<f64>> = subjects
            .par_iter()
            .map(|subject| {
                candidates
                    .iter()
                    .map(|candidate| compatibility_score(subject, candidate, &self.weights))
                    .collect()
            })
            .collect();
        let values = rows.into_iter().flatten().collect();

        Ok(CompatibilityMatrix {
            rows: subjects.len(),
            cols: candidates.len(),
            values,
        })
    }

    /// Build the compatibility matrix and the weighted total-score variant
    pub fn build_all(&self, subjects: &[Subject], candidates: &[Candidate]) -> Result<MatrixSet> {
        ensure_not_empty(subjects, candidates)?;

        let rows: Vec<Vec<(f64, f64)>> = subjects
            .par_iter()
            .map(|subject| {
                candidates
                    .iter()
                    .map(|candidate| {
                        let compatibility = compatibility_score(subject, candidate, &self.weights);
                        let (semantic, _) = semantic_profile_alignment(
                            subject.profile.as_ref(),
                            candidate.profile.as_ref(),
                            &self.weights.semantic_weights,
                        );
                        (compatibility, blend_total(compatibility, semantic, self.weights.profile_weight))
                    })
                    .collect()
            })
            .collect();

        let (compatibility, total): (Vec<f64>, Vec<f64>) = rows.into_iter().flatten().unzip();
        let (rows, cols) = (subjects.len(), candidates.len());

        tracing::debug!("Built {}x{} compatibility and total matrices", rows, cols);

        Ok(MatrixSet {
            compatibility: CompatibilityMatrix { rows, cols, values: compatibility },
            total: CompatibilityMatrix { rows, cols, values: total },
        })
    }
}

impl Default for MatrixBuilder {
    fn default() -> Self {
        Self::new(MatchingWeights::default())
    }
}

fn ensure_not_empty(subjects: &[Subject], candidates: &[Candidate]) -> Result<()> {
    if subjects.is_empty() {
        return Err(MatchError::EmptyInput { side: Side::Subject });
    }
    if candidates.is_empty() {
        return Err(MatchError::EmptyInput { side: Side::Candidate });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subjects(ages: &[u32]) -> Vec<Subject> {
        ages.iter()
            .enumerate()
            .map(|(i, age)| Subject {
                id: format!("s{}", i),
                age: Some(*age),
                ..Default::default()
            })
            .collect()
    }

    fn candidates(ages: &[u32]) -> Vec<Candidate> {
        ages.iter()
            .enumerate()
            .map(|(i, age)| Candidate {
                id: format!("c{}", i),
                age: Some(*age),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_matrix_shape_and_order() {
        let builder = MatrixBuilder::default();
        let matrix = builder.build(&subjects(&[30, 50]), &candidates(&[30, 31, 70])).unwrap();

        assert_eq!(matrix.rows(), 2);
        assert_eq!(matrix.cols(), 3);
        assert_eq!(matrix.get(0, 0), Some(1.0));
        assert!(matrix.get(0, 1).unwrap() > matrix.get(0, 2).unwrap());
        assert_eq!(matrix.get(2, 0), None);
        assert_eq!(matrix.row(1).map(<[f64]>::len), Some(3));
        assert_eq!(matrix.row(2), None);
    }

    #[test]
    fn test_empty_input_rejected() {
        let builder = MatrixBuilder::default();
        let err = builder.build(&[], &candidates(&[30])).unwrap_err();
        assert!(matches!(err, MatchError::EmptyInput { side: Side::Subject }));

        let err = builder.build_all(&subjects(&[30]), &[]).unwrap_err();
        assert!(matches!(err, MatchError::EmptyInput { side: Side::Candidate }));
    }

    #[test]
    fn test_build_is_deterministic() {
        let builder = MatrixBuilder::default();
        let s = subjects(&[22, 35, 47, 61]);
        let c = candidates(&[60, 23, 36, 48]);
        assert_eq!(builder.build(&s, &c).unwrap(), builder.build(&s, &c).unwrap());
    }

    #[test]
    fn test_build_all_matches_build() {
        let builder = MatrixBuilder::default();
        let s = subjects(&[22, 35]);
        let c = candidates(&[23, 80]);
        let set = builder.build_all(&s, &c).unwrap();
        assert_eq!(set.compatibility, builder.build(&s, &c).unwrap());

        // Without profiles the semantic score is neutral
        let expected = 0.5 * set.compatibility.get(0, 0).unwrap() + 0.5 * 0.5;
        assert!((set.total.get(0, 0).unwrap() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_truncate_square() {
        let matrix = CompatibilityMatrix::from_rows(vec![
            vec![0.1, 0.2, 0.3],
            vec![0.4, 0.5, 0.6],
        ])
        .unwrap();
        let square = matrix.truncate_square();
        assert!(square.is_square());
        assert_eq!(square.row(1), Some(&[0.4, 0.5][..]));
        assert_eq!(square.row(2), None);
    }

    #[test]
    fn test_from_rows_rejects_ragged() {
        let err = CompatibilityMatrix::from_rows(vec![vec![0.1, 0.2], vec![0.3]]).unwrap_err();
        assert!(matches!(err, MatchError::InvalidRecord { index: 1, .. }));
    }

    #[test]
    fn test_scores_within_unit_interval() {
        let builder = MatrixBuilder::default();
        let set = builder
            .build_all(&subjects(&[18, 40, 90]), &candidates(&[1, 45, 100]))
            .unwrap();
        for matrix in [&set.compatibility, &set.total] {
            let (lo, hi) = matrix.bounds();
            assert!(lo >= 0.0 && hi <= 1.0);
        }
    }
}
