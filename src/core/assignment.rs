use std::collections::HashSet;
use pathfinding::kuhn_munkres::kuhn_munkres_min;
use pathfinding::matrix::Matrix;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use crate::core::matrix::CompatibilityMatrix;
use crate::error::{MatchError, Result};
use crate::models::Assignment;

/// Fixed-point scale used to hand scores to the integer assignment solver
const COST_SCALE: f64 = 1_000_000_000.0;

/// Seed used by the random baseline when the caller supplies none
pub const DEFAULT_RANDOM_SEED: u64 = 42;

/// Pairing policy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssignmentPolicy {
    /// Minimum-cost bipartite assignment over the negated scores
    #[default]
    Optimal,
    /// Best available candidate per subject, in subject order
    Greedy,
    /// Seeded shuffle, baseline for comparison only
    Random,
}

impl std::fmt::Display for AssignmentPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssignmentPolicy::Optimal => write!(f, "optimal"),
            AssignmentPolicy::Greedy => write!(f, "greedy"),
            AssignmentPolicy::Random => write!(f, "random"),
        }
    }
}

/// Solves a one-to-one pairing over a compatibility matrix
#[derive(Debug, Clone, Copy)]
pub struct AssignmentSolver {
    policy: AssignmentPolicy,
    seed: u64,
}

impl AssignmentSolver {
    pub fn new(policy: AssignmentPolicy) -> Self {
        Self {
            policy,
            seed: DEFAULT_RANDOM_SEED,
        }
    }

    /// Seed for the random policy; ignored by the other policies
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn policy(&self) -> AssignmentPolicy {
        self.policy
    }

    pub fn solve(&self, matrix: &CompatibilityMatrix) -> Result<Vec<Assignment>> {
        let assignments = match self.policy {
            AssignmentPolicy::Optimal => solve_optimal(matrix)?,
            AssignmentPolicy::Greedy => solve_greedy(matrix),
            AssignmentPolicy::Random => solve_random(matrix, self.seed),
        };

        tracing::debug!(
            "{} assignment paired {} of {}x{}",
            self.policy,
            assignments.len(),
            matrix.rows(),
            matrix.cols()
        );

        Ok(assignments)
    }
}

/// Optimal assignment maximizing the total score
///
/// Negates the scores and solves the minimum-cost assignment (Kuhn-Munkres).
/// The matrix must be square; the solver never resizes its input. Reported
/// scores are read back from the matrix at full precision.
pub fn solve_optimal(matrix: &CompatibilityMatrix) -> Result<Vec<Assignment>> {
    if !matrix.is_square() {
        return Err(MatchError::NonSquareMatrix {
            rows: matrix.rows(),
            cols: matrix.cols(),
        });
    }

    let size = matrix.rows();
    let costs: Vec<i64> = (0..size)
        .flat_map(|row| matrix.row_values(row).iter())
        .map(|score| -(score * COST_SCALE).round() as i64)
        .collect();

    let weights = Matrix::from_vec(size, size, costs).map_err(|_| MatchError::NonSquareMatrix {
        rows: matrix.rows(),
        cols: matrix.cols(),
    })?;
    let (_, columns) = kuhn_munkres_min(&weights);

    Ok(columns
        .into_iter()
        .enumerate()
        .map(|(row, col)| Assignment {
            subject_index: row,
            candidate_index: col,
            score: matrix.row_values(row)[col],
        })
        .collect())
}

/// Greedy assignment
///
/// Subjects are visited in input order and each takes the highest-scoring
/// unused candidate; ties go to the lowest candidate index. Choices are never
/// revisited. Subjects left over once candidates run out stay unpaired.
pub fn solve_greedy(matrix: &CompatibilityMatrix) -> Vec<Assignment> {
    let mut used = vec![false; matrix.cols()];
    let mut assignments = Vec::with_capacity(matrix.rows().min(matrix.cols()));

    for row in 0..matrix.rows() {
        let best = matrix
            .row_values(row)
            .iter()
            .enumerate()
            .filter(|(col, _)| !used[*col])
            .fold(None, |best: Option<(usize, f64)>, (col, score)| match best {
                Some((_, best_score)) if *score <= best_score => best,
                _ => Some((col, *score)),
            });

        let Some((col, score)) = best else {
            break;
        };
        used[col] = true;
        assignments.push(Assignment {
            subject_index: row,
            candidate_index: col,
            score,
        });
    }

    assignments
}

/// Random baseline: shuffle candidate indices with a seeded RNG and pair them
/// positionally with subjects, truncated to the smaller side
pub fn solve_random(matrix: &CompatibilityMatrix, seed: u64) -> Vec<Assignment> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut columns: Vec<usize> = (0..matrix.cols()).collect();
    columns.shuffle(&mut rng);

    columns
        .into_iter()
        .take(matrix.rows())
        .enumerate()
        .map(|(row, col)| Assignment {
            subject_index: row,
            candidate_index: col,
            score: matrix.row_values(row)[col],
        })
        .collect()
}

/// Sum of scores of an assignment
pub fn assignment_total(assignments: &[Assignment]) -> f64 {
    assignments.iter().map(|a| a.score).sum()
}

/// Whether no subject and no candidate index is used twice
pub fn is_one_to_one(assignments: &[Assignment]) -> bool {
    let mut subjects = HashSet::new();
    let mut candidates = HashSet::new();
    assignments
        .iter()
        .all(|a| subjects.insert(a.subject_index) && candidates.insert(a.candidate_index))
}
