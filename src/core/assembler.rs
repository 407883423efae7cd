use crate::core::calibration::AnomalyDetector;
use crate::core::scoring::score_breakdown;
use crate::error::{MatchError, Result, Side};
use crate::models::{Assignment, Candidate, Match, MatchingWeights, Subject};

/// Joins solved index triples back to their full records
#[derive(Debug, Clone)]
pub struct MatchAssembler<'a> {
    detector: &'a AnomalyDetector,
    breakdown_weights: Option<MatchingWeights>,
}

impl<'a> MatchAssembler<'a> {
    pub fn new(detector: &'a AnomalyDetector) -> Self {
        Self {
            detector,
            breakdown_weights: None,
        }
    }

    /// Attach a `ScoreBreakdown` computed with these weights to every match
    pub fn with_breakdown(mut self, weights: MatchingWeights) -> Self {
        self.breakdown_weights = Some(weights);
        self
    }

    /// Assemble matches in assignment order
    ///
    /// An out-of-range index is an upstream contract violation and fails the
    /// whole assembly.
    pub fn assemble(
        &self,
        subjects: &[Subject],
        candidates: &[Candidate],
        assignments: &[Assignment],
    ) -> Result<Vec<Match>> {
        assignments
            .iter()
            .map(|assignment| self.assemble_one(subjects, candidates, assignment))
            .collect()
    }

    fn assemble_one(
        &self,
        subjects: &[Subject],
        candidates: &[Candidate],
        assignment: &Assignment,
    ) -> Result<Match> {
        let subject = subjects
            .get(assignment.subject_index)
            .ok_or(MatchError::IndexOutOfRange {
                side: Side::Subject,
                index: assignment.subject_index,
                len: subjects.len(),
            })?;
        let candidate = candidates
            .get(assignment.candidate_index)
            .ok_or(MatchError::IndexOutOfRange {
                side: Side::Candidate,
                index: assignment.candidate_index,
                len: candidates.len(),
            })?;

        let breakdown = self
            .breakdown_weights
            .as_ref()
            .map(|weights| score_breakdown(subject, candidate, weights));

        Ok(Match {
            subject_index: assignment.subject_index,
            candidate_index: assignment.candidate_index,
            subject: subject.clone(),
            candidate: candidate.clone(),
            score: assignment.score,
            age_difference: age_difference(subject, candidate),
            band: self.detector.band(assignment.score),
            anomalous: self.detector.is_anomalous(assignment.score),
            breakdown,
        })
    }
}

/// Absolute age difference, `None` when either age is unset
#[inline]
pub fn age_difference(subject: &Subject, candidate: &Candidate) -> Option<u32> {
    match (subject.known_age(), candidate.known_age()) {
        (Some(a), Some(b)) => Some(a.abs_diff(b)),
        _ => None,
    }
}
