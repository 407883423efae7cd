use serde::{Deserialize, Serialize, Serializer};
use validator::{Validate, ValidationError};

/// Serialize a score rounded to 3 decimal places (reporting precision only)
pub fn round3<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64((value * 1000.0).round() / 1000.0)
}

fn round3_vec<S: Serializer>(values: &[f64], serializer: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeSeq;
    let mut seq = serializer.serialize_seq(Some(values.len()))?;
    for value in values {
        seq.serialize_element(&((value * 1000.0).round() / 1000.0))?;
    }
    seq.end()
}

/// Demographic branch, shared by both sides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DemographicBranch {
    #[serde(rename = "ageGroup")]
    pub age_group: Option<String>,
    pub gender: Option<String>,
    pub urbanicity: Option<String>,
}

/// Socioeconomic branch (1-5 levels). Candidate values are estimates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SocioeconomicBranch {
    #[serde(rename = "educationLevel")]
    pub education_level: Option<u8>,
    #[serde(rename = "incomeLevel")]
    pub income_level: Option<u8>,
    #[serde(rename = "healthcareAccess")]
    pub healthcare_access: Option<u8>,
}

/// Self-reported health branch of a subject
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectHealthBranch {
    #[serde(rename = "healthStatus")]
    pub health_status: Option<u8>,
    #[serde(rename = "chronicBurden")]
    pub chronic_burden: Option<u8>,
    #[serde(rename = "riskLevel")]
    pub risk_level: Option<String>,
}

/// Clinically-derived health branch of a candidate
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClinicalHealthBranch {
    #[serde(rename = "healthStatus")]
    pub health_status: Option<u8>,
    #[serde(rename = "comorbidityIndex")]
    pub comorbidity_index: Option<f64>,
    #[serde(rename = "riskLevel")]
    pub risk_level: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BehavioralBranch {
    #[serde(rename = "activityLevel")]
    pub activity_level: Option<u8>,
    #[serde(rename = "healthEngagement")]
    pub health_engagement: Option<u8>,
    pub adherence: Option<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PsychosocialBranch {
    #[serde(rename = "stressLevel")]
    pub stress_level: Option<u8>,
    #[serde(rename = "socialSupport")]
    pub social_support: Option<u8>,
    #[serde(rename = "healthLiteracy")]
    pub health_literacy: Option<u8>,
}

/// Semantic profile tree of a subject. Any branch may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubjectProfile {
    pub demographics: Option<DemographicBranch>,
    pub socioeconomic: Option<SocioeconomicBranch>,
    #[serde(rename = "healthProfile")]
    pub health_profile: Option<SubjectHealthBranch>,
    pub behavioral: Option<BehavioralBranch>,
    pub psychosocial: Option<PsychosocialBranch>,
}

/// Semantic profile tree of a candidate, mirroring the subject's branch names
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub demographics: Option<DemographicBranch>,
    pub socioeconomic: Option<SocioeconomicBranch>,
    #[serde(rename = "healthProfile")]
    pub health_profile: Option<ClinicalHealthBranch>,
    pub behavioral: Option<BehavioralBranch>,
    pub psychosocial: Option<PsychosocialBranch>,
}

/// Subject (persona) record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Subject {
    #[validate(length(min = 1))]
    pub id: String,
    pub age: Option<u32>,
    pub education: Option<String>,
    pub income: Option<String>,
    #[serde(rename = "maritalStatus")]
    pub marital_status: Option<String>,
    pub profile: Option<SubjectProfile>,
}

impl Subject {
    /// Age if set; a zero age counts as unset
    pub fn known_age(&self) -> Option<u32> {
        self.age.filter(|age| *age > 0)
    }
}

/// Candidate (health record)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Candidate {
    #[validate(length(min = 1))]
    pub id: String,
    pub age: Option<u32>,
    #[serde(default)]
    pub conditions: Vec<String>,
    #[serde(default)]
    pub medications: Vec<String>,
    #[serde(rename = "encounterCount", default)]
    pub encounter_count: u32,
    pub profile: Option<CandidateProfile>,
}

impl Candidate {
    /// Age if set; a zero age counts as unset
    pub fn known_age(&self) -> Option<u32> {
        self.age.filter(|age| *age > 0)
    }

    /// Estimated education level (1-5) from the socioeconomic branch
    pub fn education_level(&self) -> Option<u8> {
        self.socioeconomic().and_then(|branch| branch.education_level)
    }

    /// Estimated income level (1-5) from the socioeconomic branch
    pub fn income_level(&self) -> Option<u8> {
        self.socioeconomic().and_then(|branch| branch.income_level)
    }

    fn socioeconomic(&self) -> Option<&SocioeconomicBranch> {
        self.profile.as_ref().and_then(|p| p.socioeconomic.as_ref())
    }
}

/// Branch weights of the semantic profile score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_semantic_sum"))]
pub struct SemanticWeights {
    #[validate(range(min = 0.0, max = 1.0))]
    pub demographics: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub socioeconomic: f64,
    #[serde(alias = "healthProfile")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub health_profile: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub behavioral: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub psychosocial: f64,
}

impl SemanticWeights {
    pub fn sum(&self) -> f64 {
        self.demographics + self.socioeconomic + self.health_profile + self.behavioral + self.psychosocial
    }
}

impl Default for SemanticWeights {
    fn default() -> Self {
        // Health profile dominates
        Self {
            demographics: 0.15,
            socioeconomic: 0.15,
            health_profile: 0.35,
            behavioral: 0.15,
            psychosocial: 0.20,
        }
    }
}

/// Largest accepted distance of a weight sum from 1.0
pub const WEIGHT_SUM_EPSILON: f64 = 1e-9;

fn validate_semantic_sum(weights: &SemanticWeights) -> Result<(), ValidationError> {
    if (weights.sum() - 1.0).abs() > WEIGHT_SUM_EPSILON {
        return Err(ValidationError::new("semantic_weights_must_sum_to_one"));
    }
    Ok(())
}

/// Weight configuration of the compatibility score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "validate_matching_sum"))]
pub struct MatchingWeights {
    #[serde(alias = "ageTolerance")]
    #[validate(range(min = 1, max = 50))]
    pub age_tolerance: u32,
    #[serde(alias = "ageWeight")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub age_weight: f64,
    #[serde(alias = "socioeconomicWeight")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub socioeconomic_weight: f64,
    #[serde(alias = "profileWeight")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub profile_weight: f64,
    #[serde(alias = "semanticWeights")]
    #[validate(nested)]
    pub semantic_weights: SemanticWeights,
}

impl Default for MatchingWeights {
    fn default() -> Self {
        Self {
            age_tolerance: 2,
            age_weight: 0.6,
            socioeconomic_weight: 0.4,
            profile_weight: 0.5,
            semantic_weights: SemanticWeights::default(),
        }
    }
}

fn validate_matching_sum(weights: &MatchingWeights) -> Result<(), ValidationError> {
    if (weights.age_weight + weights.socioeconomic_weight - 1.0).abs() > WEIGHT_SUM_EPSILON {
        return Err(ValidationError::new("age_and_socioeconomic_weights_must_sum_to_one"));
    }
    Ok(())
}

/// Which matrix the solver runs on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreBasis {
    /// Age and socioeconomic compatibility only
    #[default]
    Compatibility,
    /// Compatibility blended with the semantic profile score
    Total,
}

/// Quality band of a match score
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityBand {
    Critical,
    Warning,
    Acceptable,
    HighQuality,
}

/// Solved pairing of a subject index with a candidate index
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Assignment {
    #[serde(rename = "subjectIndex")]
    pub subject_index: usize,
    #[serde(rename = "candidateIndex")]
    pub candidate_index: usize,
    #[serde(serialize_with = "round3")]
    pub score: f64,
}

/// Per-branch semantic scores with the weights applied
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SemanticBreakdown {
    #[serde(serialize_with = "round3")]
    pub demographics: f64,
    #[serde(serialize_with = "round3")]
    pub socioeconomic: f64,
    #[serde(rename = "healthProfile", serialize_with = "round3")]
    pub health_profile: f64,
    #[serde(serialize_with = "round3")]
    pub behavioral: f64,
    #[serde(serialize_with = "round3")]
    pub psychosocial: f64,
    #[serde(serialize_with = "round3")]
    pub score: f64,
    pub weights: SemanticWeights,
}

/// Explainability record for one pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    #[serde(rename = "ageScore", serialize_with = "round3")]
    pub age_score: f64,
    #[serde(rename = "socioeconomicScore", serialize_with = "round3")]
    pub socioeconomic_score: f64,
    #[serde(serialize_with = "round3")]
    pub compatibility: f64,
    pub semantic: SemanticBreakdown,
    #[serde(serialize_with = "round3")]
    pub total: f64,
    pub weights: MatchingWeights,
}

/// Assembled match: the solved pair joined back to its records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    #[serde(rename = "subjectIndex")]
    pub subject_index: usize,
    #[serde(rename = "candidateIndex")]
    pub candidate_index: usize,
    pub subject: Subject,
    pub candidate: Candidate,
    #[serde(serialize_with = "round3")]
    pub score: f64,
    #[serde(rename = "ageDifference")]
    pub age_difference: Option<u32>,
    pub band: SeverityBand,
    pub anomalous: bool,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub breakdown: Option<ScoreBreakdown>,
}

/// Estimator outputs that produced a calibrated threshold
///
/// Stored at full precision: the artifact is reloaded for classification.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdEstimators {
    pub percentile: f64,
    #[serde(rename = "meanMinusStddev")]
    pub mean_minus_stddev: f64,
    #[serde(rename = "iqrFence")]
    pub iqr_fence: f64,
    #[serde(rename = "madFence")]
    pub mad_fence: f64,
}

impl ThresholdEstimators {
    pub fn max(&self) -> f64 {
        self.percentile
            .max(self.mean_minus_stddev)
            .max(self.iqr_fence)
            .max(self.mad_fence)
    }
}

/// Calibration artifact consumed by the anomaly detector
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalibrationReport {
    pub version: u32,
    #[serde(rename = "generatedAt")]
    pub generated_at: chrono::DateTime<chrono::Utc>,
    pub threshold: f64,
    pub estimators: ThresholdEstimators,
    /// Combination rule, e.g. "max(estimators) capped at 0.700"
    pub rule: String,
    pub ceiling: f64,
    pub capped: bool,
    #[serde(rename = "bestSampleSize")]
    pub best_sample_size: usize,
    #[serde(rename = "worstSampleSize")]
    pub worst_sample_size: usize,
    #[serde(rename = "falsePositiveRate")]
    pub false_positive_rate: f64,
    #[serde(rename = "truePositiveRate")]
    pub true_positive_rate: f64,
}

/// Match counts per severity band
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandHistogram {
    pub critical: usize,
    pub warning: usize,
    pub acceptable: usize,
    #[serde(rename = "highQuality")]
    pub high_quality: usize,
}

/// Match counts by absolute age difference
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgeDifferenceBreakdown {
    pub exact: usize,
    #[serde(rename = "withinTolerance")]
    pub within_tolerance: usize,
    #[serde(rename = "within5")]
    pub within_5: usize,
    #[serde(rename = "within10")]
    pub within_10: usize,
    #[serde(rename = "beyond10")]
    pub beyond_10: usize,
    pub unknown: usize,
}

/// Aggregate summary of a match run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchStatistics {
    pub count: usize,
    #[serde(rename = "minScore", serialize_with = "round3")]
    pub min_score: f64,
    #[serde(rename = "maxScore", serialize_with = "round3")]
    pub max_score: f64,
    #[serde(rename = "meanScore", serialize_with = "round3")]
    pub mean_score: f64,
    #[serde(rename = "medianScore", serialize_with = "round3")]
    pub median_score: f64,
    #[serde(rename = "totalScore", serialize_with = "round3")]
    pub total_score: f64,
    pub anomalies: usize,
    pub bands: BandHistogram,
    #[serde(rename = "ageDifference")]
    pub age_difference: AgeDifferenceBreakdown,
    #[serde(rename = "scoreSample", serialize_with = "round3_vec")]
    pub scores: Vec<f64>,
}
