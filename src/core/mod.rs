// Core algorithm exports
pub mod assembler;
pub mod assignment;
pub mod calibration;
pub mod engine;
pub mod matrix;
pub mod ordinal;
pub mod profile;
pub mod scoring;
pub mod statistics;

pub use assembler::{age_difference, MatchAssembler};
pub use assignment::{assignment_total, is_one_to_one, solve_greedy, solve_optimal, solve_random, AssignmentPolicy, AssignmentSolver};
pub use calibration::{AnomalyDetector, CalibrationConfig, Calibrator};
pub use engine::{MatchEngine, MatchRun, RunOptions};
pub use matrix::{CompatibilityMatrix, MatrixBuilder, MatrixSet};
pub use ordinal::{ordinal_alignment, positional_alignment, OrdinalScale};
pub use profile::semantic_profile_alignment;
pub use scoring::{compatibility_score, numeric_proximity, score_breakdown, total_score};
pub use statistics::StatisticsReporter;
