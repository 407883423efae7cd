use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::core::assignment::AssignmentPolicy;
use crate::models::domain::{Candidate, MatchingWeights, ScoreBasis, Subject};

/// Request to pair subjects with candidates
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct AssignRequest {
    #[validate(length(min = 1), nested)]
    pub subjects: Vec<Subject>,
    #[validate(length(min = 1), nested)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub policy: AssignmentPolicy,
    /// Seed for the random baseline policy
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub basis: ScoreBasis,
    /// Overrides the configured weights for this run
    #[serde(default)]
    #[validate(nested)]
    pub weights: Option<MatchingWeights>,
    #[serde(alias = "include_breakdown", rename = "includeBreakdown", default)]
    pub include_breakdown: bool,
}

/// Labeled score samples for threshold calibration
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CalibrateRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "best_scores", rename = "bestScores")]
    pub best_scores: Vec<f64>,
    #[validate(length(min = 1))]
    #[serde(alias = "worst_scores", rename = "worstScores")]
    pub worst_scores: Vec<f64>,
}

/// Request to classify a single score
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ClassifyRequest {
    #[validate(range(min = 0.0, max = 1.0))]
    pub score: f64,
}
