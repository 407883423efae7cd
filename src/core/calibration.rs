//! Threshold calibration and anomaly detection
//!
//! Calibration runs offline against two labeled score samples: scores of
//! known-good ("best") matches and scores of known-bad ("worst") matches.
//! Four lower-bound estimators are computed from the best sample and the
//! final threshold is their maximum, capped at a fixed ceiling. The detector
//! then treats any score strictly below the threshold as anomalous.

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::core::statistics::{mean, median, percentile, population_std_dev, sorted_copy};
use crate::error::{MatchError, Result};
use crate::models::{CalibrationReport, SeverityBand, ThresholdEstimators};

/// Upper bound of the critical band
pub const CRITICAL_BOUND: f64 = 0.5;

/// Lower bound of the high-quality band
pub const HIGH_QUALITY_BOUND: f64 = 0.8;

/// Cap applied to the combined estimators
pub const DEFAULT_CEILING: f64 = 0.70;

/// Scales MAD to a standard-deviation estimate for normal data
const MAD_CONSISTENCY: f64 = 1.4826;

/// Format version of the calibration artifact
pub const ARTIFACT_VERSION: u32 = 1;

/// Estimator parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    /// Percentile of the best sample, 0-100
    pub percentile: f64,
    pub stddev_multiplier: f64,
    pub iqr_multiplier: f64,
    pub mad_multiplier: f64,
    pub ceiling: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            percentile: 5.0,
            stddev_multiplier: 2.0,
            iqr_multiplier: 1.5,
            mad_multiplier: 3.0,
            ceiling: DEFAULT_CEILING,
        }
    }
}

/// Derives a threshold from labeled score samples
#[derive(Debug, Clone, Default)]
pub struct Calibrator {
    config: CalibrationConfig,
}

impl Calibrator {
    pub fn new(config: CalibrationConfig) -> Self {
        Self { config }
    }

    /// The four estimators over the best-match sample
    pub fn estimators(&self, best: &[f64]) -> Result<ThresholdEstimators> {
        check_sample(best, "best-match")?;
        let sorted = sorted_copy(best);

        let q1 = percentile(&sorted, 25.0);
        let q3 = percentile(&sorted, 75.0);

        let center = median(&sorted);
        let deviations: Vec<f64> = sorted.iter().map(|v| (v - center).abs()).collect();
        let mad = median(&sorted_copy(&deviations));

        Ok(ThresholdEstimators {
            percentile: percentile(&sorted, self.config.percentile),
            mean_minus_stddev: mean(&sorted) - self.config.stddev_multiplier * population_std_dev(&sorted),
            iqr_fence: q1 - self.config.iqr_multiplier * (q3 - q1),
            mad_fence: center - self.config.mad_multiplier * MAD_CONSISTENCY * mad,
        })
    }

    /// Calibrate a threshold and validate it against both samples
    pub fn calibrate(&self, best: &[f64], worst: &[f64]) -> Result<CalibrationReport> {
        check_sample(worst, "worst-match")?;
        let estimators = self.estimators(best)?;

        let combined = estimators.max();
        let threshold = combined.min(self.config.ceiling);
        let detector = AnomalyDetector::new(threshold);

        let false_positives = best.iter().filter(|s| detector.is_anomalous(**s)).count();
        let true_positives = worst.iter().filter(|s| detector.is_anomalous(**s)).count();

        tracing::info!(
            "Calibrated threshold {:.3} (estimators max {:.3}, ceiling {:.3}) from {} best / {} worst scores",
            threshold,
            combined,
            self.config.ceiling,
            best.len(),
            worst.len()
        );

        Ok(CalibrationReport {
            version: ARTIFACT_VERSION,
            generated_at: chrono::Utc::now(),
            threshold,
            estimators,
            rule: format!("max(estimators) capped at {:.3}", self.config.ceiling),
            ceiling: self.config.ceiling,
            capped: combined > self.config.ceiling,
            best_sample_size: best.len(),
            worst_sample_size: worst.len(),
            false_positive_rate: false_positives as f64 / best.len() as f64,
            true_positive_rate: true_positives as f64 / worst.len() as f64,
        })
    }
}

fn check_sample(sample: &[f64], label: &'static str) -> Result<()> {
    if sample.is_empty() {
        return Err(MatchError::EmptySample { label });
    }
    if let Some(index) = sample.iter().position(|v| !v.is_finite()) {
        return Err(MatchError::NonFiniteSample { label, index });
    }
    Ok(())
}

impl CalibrationReport {
    /// Read a calibration artifact from a JSON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let bytes = std::fs::read(path)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Write the artifact as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}

/// Classifies scores against a calibrated threshold
///
/// The boundary is half-open: a score equal to the threshold is not anomalous.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnomalyDetector {
    threshold: f64,
}

impl AnomalyDetector {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn from_report(report: &CalibrationReport) -> Self {
        Self::new(report.threshold)
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    #[inline]
    pub fn is_anomalous(&self, score: f64) -> bool {
        score < self.threshold
    }

    /// Severity band: `< 0.5` critical, `[0.5, threshold)` warning,
    /// `[threshold, 0.8)` acceptable, `>= 0.8` high quality
    pub fn band(&self, score: f64) -> SeverityBand {
        if score < CRITICAL_BOUND {
            SeverityBand::Critical
        } else if score < self.threshold {
            SeverityBand::Warning
        } else if score < HIGH_QUALITY_BOUND {
            SeverityBand::Acceptable
        } else {
            SeverityBand::HighQuality
        }
    }
}

impl Default for AnomalyDetector {
    fn default() -> Self {
        Self::new(DEFAULT_CEILING)
    }
}
