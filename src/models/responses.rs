use serde::{Deserialize, Serialize};
use crate::core::assignment::AssignmentPolicy;
use crate::models::domain::{Match, MatchStatistics, SeverityBand};

/// Response for the assign endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignResponse {
    #[serde(rename = "runId")]
    pub run_id: String,
    pub policy: AssignmentPolicy,
    pub matches: Vec<Match>,
    pub statistics: MatchStatistics,
    pub threshold: f64,
}

/// Response for the classify endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifyResponse {
    /// Echoed at full precision so it agrees with `anomalous`
    pub score: f64,
    pub threshold: f64,
    pub anomalous: bool,
    pub band: SeverityBand,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
