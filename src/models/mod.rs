// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Assignment, BandHistogram, BehavioralBranch, CalibrationReport, Candidate, CandidateProfile,
    ClinicalHealthBranch, DemographicBranch, AgeDifferenceBreakdown, Match, MatchStatistics,
    MatchingWeights, PsychosocialBranch, ScoreBasis, ScoreBreakdown, SemanticBreakdown,
    SemanticWeights, SeverityBand, SocioeconomicBranch, Subject, SubjectHealthBranch,
    SubjectProfile, ThresholdEstimators, WEIGHT_SUM_EPSILON,
};
pub use requests::{AssignRequest, CalibrateRequest, ClassifyRequest};
pub use responses::{AssignResponse, ClassifyResponse, ErrorResponse, HealthResponse};
