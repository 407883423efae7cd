use crate::core::calibration::AnomalyDetector;
use crate::models::{AgeDifferenceBreakdown, BandHistogram, Match, MatchStatistics, SeverityBand};

/// Sorted copy of a sample; NaN compares as equal
pub fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted
}

/// Percentile of a sorted sample using linear interpolation
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    if sorted.len() == 1 {
        return sorted[0];
    }

    let rank = (p.clamp(0.0, 100.0) / 100.0) * (sorted.len() - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = rank.ceil() as usize;
    let frac = rank - lower as f64;

    if upper >= sorted.len() {
        sorted[sorted.len() - 1]
    } else {
        sorted[lower] * (1.0 - frac) + sorted[upper] * frac
    }
}

/// Median of a sorted sample
pub fn median(sorted: &[f64]) -> f64 {
    percentile(sorted, 50.0)
}

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    if variance.is_finite() && variance >= 0.0 {
        variance.sqrt()
    } else {
        0.0
    }
}

/// Aggregates a list of matches into a summary
///
/// Pure: no state is kept between calls.
#[derive(Debug, Clone, Copy)]
pub struct StatisticsReporter<'a> {
    detector: &'a AnomalyDetector,
    age_tolerance: u32,
}

impl<'a> StatisticsReporter<'a> {
    pub fn new(detector: &'a AnomalyDetector, age_tolerance: u32) -> Self {
        Self {
            detector,
            age_tolerance,
        }
    }

    pub fn summarize(&self, matches: &[Match]) -> MatchStatistics {
        let scores: Vec<f64> = matches.iter().map(|m| m.score).collect();
        let sorted = sorted_copy(&scores);

        let mut bands = BandHistogram::default();
        let mut age_difference = AgeDifferenceBreakdown::default();
        let mut anomalies = 0;

        for m in matches {
            match self.detector.band(m.score) {
                SeverityBand::Critical => bands.critical += 1,
                SeverityBand::Warning => bands.warning += 1,
                SeverityBand::Acceptable => bands.acceptable += 1,
                SeverityBand::HighQuality => bands.high_quality += 1,
            }

            if self.detector.is_anomalous(m.score) {
                anomalies += 1;
            }

            // Buckets are cumulative: an exact match is also within tolerance
            match m.age_difference {
                None => age_difference.unknown += 1,
                Some(diff) => {
                    if diff == 0 {
                        age_difference.exact += 1;
                    }
                    if diff <= self.age_tolerance {
                        age_difference.within_tolerance += 1;
                    }
                    if diff <= 5 {
                        age_difference.within_5 += 1;
                    }
                    if diff <= 10 {
                        age_difference.within_10 += 1;
                    } else {
                        age_difference.beyond_10 += 1;
                    }
                }
            }
        }

        MatchStatistics {
            count: matches.len(),
            min_score: sorted.first().copied().unwrap_or(0.0),
            max_score: sorted.last().copied().unwrap_or(0.0),
            mean_score: mean(&scores),
            median_score: median(&sorted),
            total_score: scores.iter().sum(),
            anomalies,
            bands,
            age_difference,
            scores,
        }
    }
}
