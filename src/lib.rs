//! Persona Match - compatibility scoring, optimal assignment and threshold calibration
//!
//! This library pairs synthetic subject profiles with candidate health records.
//! It scores every pair, solves a one-to-one assignment over the resulting
//! matrix, and flags matches that fall below a calibrated quality threshold.

pub mod config;
pub mod core;
pub mod error;
pub mod models;
pub mod routes;

// Re-export commonly used types
pub use crate::core::{
    numeric_proximity, AnomalyDetector, AssignmentPolicy, Calibrator, CompatibilityMatrix,
    MatchEngine, MatrixBuilder, RunOptions,
};
pub use crate::error::{MatchError, Result};
pub use crate::models::{
    CalibrationReport, Candidate, Match, MatchStatistics, MatchingWeights, Subject,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        // Verify that the library exports work correctly
        assert_eq!(numeric_proximity(30.0, 30.0, 2.0), 1.0);
        assert_eq!(AssignmentPolicy::default(), AssignmentPolicy::Optimal);
    }
}
