use crate::core::ordinal::{positional_alignment, EDUCATION, INCOME};
use crate::core::profile::semantic_profile_alignment;
use crate::models::{Candidate, MatchingWeights, ScoreBreakdown, Subject};

/// Neutral contribution for a dimension that cannot be compared
pub const NEUTRAL_SCORE: f64 = 0.5;

/// Numeric proximity score (0-1) with a piecewise decay curve
///
/// With `d = |a - b|` and `t = tolerance`:
/// - `d <= t`: 1.0 down to 0.9
/// - `t < d <= 2t`: 0.9 down to 0.7
/// - `2t < d <= 3t`: 0.7 down to 0.5
/// - `d > 3t`: `0.5 * e^(-(d - 3t) / t)`
///
/// The curve is continuous, symmetric in `a` and `b`, and never negative.
#[inline]
pub fn numeric_proximity(a: f64, b: f64, tolerance: f64) -> f64 {
    let distance = (a - b).abs();
    if distance == 0.0 {
        return 1.0;
    }

    if tolerance <= 0.0 {
        return NEUTRAL_SCORE * (-distance).exp();
    }

    let steps = distance / tolerance;
    let score = if steps <= 1.0 {
        1.0 - 0.1 * steps
    } else if steps <= 2.0 {
        0.9 - 0.2 * (steps - 1.0)
    } else if steps <= 3.0 {
        0.7 - 0.2 * (steps - 2.0)
    } else {
        0.5 * (-(steps - 3.0)).exp()
    };

    debug_assert!((0.0..=1.0).contains(&score), "numeric proximity out of range: {score}");
    score
}

/// Age score (0-1); neutral when either age is unset or zero
#[inline]
pub fn age_score(subject: &Subject, candidate: &Candidate, tolerance: u32) -> f64 {
    match (subject.known_age(), candidate.known_age()) {
        (Some(a), Some(b)) => numeric_proximity(a as f64, b as f64, tolerance as f64),
        _ => NEUTRAL_SCORE,
    }
}

/// Compare two optional 1-5 levels; neutral when either side is missing
#[inline]
pub fn level_alignment(a: Option<u8>, b: Option<u8>, scale_size: u8) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) => positional_alignment(a.min(scale_size), b.min(scale_size), scale_size),
        _ => NEUTRAL_SCORE,
    }
}

/// Socioeconomic blend (0-1): mean of education and income alignment
///
/// The subject carries categorical labels, the candidate carries estimated
/// levels from its socioeconomic branch. A missing level takes the scale's
/// neutral position, the same way an unknown label does.
pub fn socioeconomic_alignment(subject: &Subject, candidate: &Candidate) -> f64 {
    let education = positional_alignment(
        EDUCATION.position(subject.education.as_deref()),
        candidate.education_level().unwrap_or(EDUCATION.neutral).min(EDUCATION.size),
        EDUCATION.size,
    );
    let income = positional_alignment(
        INCOME.position(subject.income.as_deref()),
        candidate.income_level().unwrap_or(INCOME.neutral).min(INCOME.size),
        INCOME.size,
    );

    (education + income) / 2.0
}

/// Clamp a weighted aggregate into [0, 1]
///
/// Validated weights sum to 1.0 within `WEIGHT_SUM_EPSILON`, so any overshoot
/// is rounding noise. Anything larger is a scoring bug.
#[inline]
pub(crate) fn unit_interval(score: f64, what: &str) -> f64 {
    debug_assert!((-1e-6..=1.0 + 1e-6).contains(&score), "{what} out of range: {score}");
    score.clamp(0.0, 1.0)
}

#[inline]
fn weighted_compatibility(age: f64, socioeconomic: f64, weights: &MatchingWeights) -> f64 {
    unit_interval(
        weights.age_weight * age + weights.socioeconomic_weight * socioeconomic,
        "compatibility",
    )
}

/// Compatibility score (0-1) for one pair
///
/// score = age_weight * age_score + socioeconomic_weight * socioeconomic_alignment
#[inline]
pub fn compatibility_score(subject: &Subject, candidate: &Candidate, weights: &MatchingWeights) -> f64 {
    weighted_compatibility(
        age_score(subject, candidate, weights.age_tolerance),
        socioeconomic_alignment(subject, candidate),
        weights,
    )
}

/// Blend a compatibility score with the semantic profile score
#[inline]
pub fn blend_total(compatibility: f64, semantic: f64, profile_weight: f64) -> f64 {
    unit_interval(
        (1.0 - profile_weight) * compatibility + profile_weight * semantic,
        "total score",
    )
}

/// Total score (0-1): compatibility blended with semantic profile alignment
pub fn total_score(subject: &Subject, candidate: &Candidate, weights: &MatchingWeights) -> f64 {
    let compatibility = compatibility_score(subject, candidate, weights);
    let (semantic, _) = semantic_profile_alignment(
        subject.profile.as_ref(),
        candidate.profile.as_ref(),
        &weights.semantic_weights,
    );
    blend_total(compatibility, semantic, weights.profile_weight)
}

/// Full per-dimension breakdown for one pair
pub fn score_breakdown(subject: &Subject, candidate: &Candidate, weights: &MatchingWeights) -> ScoreBreakdown {
    let age = age_score(subject, candidate, weights.age_tolerance);
    let socioeconomic = socioeconomic_alignment(subject, candidate);
    let compatibility = weighted_compatibility(age, socioeconomic, weights);
    let (semantic_score, semantic) = semantic_profile_alignment(
        subject.profile.as_ref(),
        candidate.profile.as_ref(),
        &weights.semantic_weights,
    );

    ScoreBreakdown {
        age_score: age,
        socioeconomic_score: socioeconomic,
        compatibility,
        semantic,
        total: blend_total(compatibility, semantic_score, weights.profile_weight),
        weights: *weights,
    }
}
