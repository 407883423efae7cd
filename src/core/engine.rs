use validator::Validate;
use crate::core::assembler::MatchAssembler;
use crate::core::assignment::{AssignmentPolicy, AssignmentSolver, DEFAULT_RANDOM_SEED};
use crate::core::calibration::AnomalyDetector;
use crate::core::matrix::MatrixBuilder;
use crate::core::statistics::StatisticsReporter;
use crate::error::{MatchError, Result, Side};
use crate::models::{Candidate, Match, MatchStatistics, MatchingWeights, ScoreBasis, Subject};

/// Per-run options chosen by the caller
#[derive(Debug, Clone, Copy)]
pub struct RunOptions {
    pub policy: AssignmentPolicy,
    pub seed: u64,
    pub basis: ScoreBasis,
    pub include_breakdown: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            policy: AssignmentPolicy::Optimal,
            seed: DEFAULT_RANDOM_SEED,
            basis: ScoreBasis::Compatibility,
            include_breakdown: false,
        }
    }
}

/// Result of one matching run
#[derive(Debug, Clone)]
pub struct MatchRun {
    pub policy: AssignmentPolicy,
    pub matches: Vec<Match>,
    pub statistics: MatchStatistics,
    pub threshold: f64,
}

/// Matching orchestrator
///
/// # Pipeline Stages
/// 1. Input validation
/// 2. Compatibility matrix construction
/// 3. Assignment under the chosen policy
/// 4. Match assembly and anomaly classification
/// 5. Statistics
#[derive(Debug, Clone)]
pub struct MatchEngine {
    weights: MatchingWeights,
    detector: AnomalyDetector,
}

impl MatchEngine {
    pub fn new(weights: MatchingWeights, detector: AnomalyDetector) -> Result<Self> {
        validate_weights(&weights)?;
        Ok(Self { weights, detector })
    }

    pub fn with_defaults() -> Self {
        Self {
            weights: MatchingWeights::default(),
            detector: AnomalyDetector::default(),
        }
    }

    pub fn weights(&self) -> &MatchingWeights {
        &self.weights
    }

    pub fn detector(&self) -> &AnomalyDetector {
        &self.detector
    }

    /// Same engine with different weights for a single run
    pub fn with_weights(&self, weights: MatchingWeights) -> Result<Self> {
        Self::new(weights, self.detector)
    }

    /// Pair subjects with candidates
    ///
    /// The optimal policy needs equal-size sides, so both lists are truncated
    /// to the smaller length before the matrix is built.
    pub fn run(&self, subjects: &[Subject], candidates: &[Candidate], options: RunOptions) -> Result<MatchRun> {
        validate_records(subjects, candidates)?;

        let (subjects, candidates) = if options.policy == AssignmentPolicy::Optimal {
            let size = subjects.len().min(candidates.len());
            if subjects.len() != candidates.len() {
                tracing::warn!(
                    "Truncating {} subjects and {} candidates to {} for optimal assignment",
                    subjects.len(),
                    candidates.len(),
                    size
                );
            }
            (&subjects[..size], &candidates[..size])
        } else {
            (subjects, candidates)
        };

        let builder = MatrixBuilder::new(self.weights);
        let matrix = match options.basis {
            ScoreBasis::Compatibility => builder.build(subjects, candidates)?,
            ScoreBasis::Total => builder.build_all(subjects, candidates)?.total,
        };

        let assignments = AssignmentSolver::new(options.policy)
            .with_seed(options.seed)
            .solve(&matrix)?;

        let mut assembler = MatchAssembler::new(&self.detector);
        if options.include_breakdown {
            assembler = assembler.with_breakdown(self.weights);
        }
        let matches = assembler.assemble(subjects, candidates, &assignments)?;

        let statistics = StatisticsReporter::new(&self.detector, self.weights.age_tolerance).summarize(&matches);

        tracing::info!(
            "{} run paired {} subjects with {} candidates: {} matches, mean score {:.3}, {} anomalies",
            options.policy,
            subjects.len(),
            candidates.len(),
            statistics.count,
            statistics.mean_score,
            statistics.anomalies
        );

        Ok(MatchRun {
            policy: options.policy,
            matches,
            statistics,
            threshold: self.detector.threshold(),
        })
    }
}

impl Default for MatchEngine {
    fn default() -> Self {
        Self::with_defaults()
    }
}

/// Reject weight configurations outside their ranges or not summing to 1.0
pub fn validate_weights(weights: &MatchingWeights) -> Result<()> {
    weights
        .validate()
        .map_err(|errors| MatchError::InvalidWeights(errors.to_string()))
}

/// Reject empty lists and records missing required fields
pub fn validate_records(subjects: &[Subject], candidates: &[Candidate]) -> Result<()> {
    if subjects.is_empty() {
        return Err(MatchError::EmptyInput { side: Side::Subject });
    }
    if candidates.is_empty() {
        return Err(MatchError::EmptyInput { side: Side::Candidate });
    }

    for (index, subject) in subjects.iter().enumerate() {
        subject.validate().map_err(|errors| MatchError::InvalidRecord {
            side: Side::Subject,
            index,
            reason: errors.to_string(),
        })?;
    }
    for (index, candidate) in candidates.iter().enumerate() {
        candidate.validate().map_err(|errors| MatchError::InvalidRecord {
            side: Side::Candidate,
            index,
            reason: errors.to_string(),
        })?;
    }

    Ok(())
}
