//! Semantic profile alignment
//!
//! Compares the five branches of a subject's profile tree with the mirrored
//! branches of a candidate's clinically-derived profile. Every comparison
//! tolerates missing data: a missing branch, field or tag contributes the
//! neutral 0.5 instead of failing.

use crate::core::ordinal::{ordinal_alignment, positional_alignment, AGE_GROUP, RISK_LEVEL, URBANICITY};
use crate::core::scoring::{level_alignment, unit_interval, NEUTRAL_SCORE};
use crate::models::{
    BehavioralBranch, CandidateProfile, ClinicalHealthBranch, DemographicBranch, PsychosocialBranch,
    SemanticBreakdown, SemanticWeights, SocioeconomicBranch, SubjectHealthBranch, SubjectProfile,
};

/// Scale of the 1-5 integer profile attributes
const LEVEL_SCALE: u8 = 5;

/// Weighted mean of `(score, weight)` parts
#[inline]
fn blend(parts: &[(f64, f64)]) -> f64 {
    let total_weight: f64 = parts.iter().map(|(_, weight)| weight).sum();
    if total_weight <= 0.0 {
        return NEUTRAL_SCORE;
    }
    parts.iter().map(|(score, weight)| score * weight).sum::<f64>() / total_weight
}

/// Equality bonus for short categorical tags
#[inline]
fn tag_equality(a: Option<&str>, b: Option<&str>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if a.trim().eq_ignore_ascii_case(b.trim()) => 1.0,
        (Some(_), Some(_)) => 0.0,
        _ => NEUTRAL_SCORE,
    }
}

/// Map a comorbidity index onto the 1-5 burden scale: `1 + min(index, 4)`
fn comorbidity_burden(index: Option<f64>) -> Option<u8> {
    index
        .filter(|value| value.is_finite())
        .map(|value| (1.0 + value.clamp(0.0, 4.0)).round() as u8)
}

fn demographics_score(subject: Option<&DemographicBranch>, candidate: Option<&DemographicBranch>) -> f64 {
    let (Some(s), Some(c)) = (subject, candidate) else {
        return NEUTRAL_SCORE;
    };

    // Missing tags on both sides would read as a perfect ordinal match
    let age_group = if s.age_group.is_some() && c.age_group.is_some() {
        ordinal_alignment(&AGE_GROUP, s.age_group.as_deref(), c.age_group.as_deref())
    } else {
        NEUTRAL_SCORE
    };
    let urbanicity = if s.urbanicity.is_some() && c.urbanicity.is_some() {
        ordinal_alignment(&URBANICITY, s.urbanicity.as_deref(), c.urbanicity.as_deref())
    } else {
        NEUTRAL_SCORE
    };

    blend(&[
        (age_group, 0.5),
        (tag_equality(s.gender.as_deref(), c.gender.as_deref()), 0.3),
        (urbanicity, 0.2),
    ])
}

fn socioeconomic_score(subject: Option<&SocioeconomicBranch>, candidate: Option<&SocioeconomicBranch>) -> f64 {
    let (Some(s), Some(c)) = (subject, candidate) else {
        return NEUTRAL_SCORE;
    };

    blend(&[
        (level_alignment(s.education_level, c.education_level, LEVEL_SCALE), 0.35),
        (level_alignment(s.income_level, c.income_level, LEVEL_SCALE), 0.35),
        (level_alignment(s.healthcare_access, c.healthcare_access, LEVEL_SCALE), 0.30),
    ])
}

fn health_profile_score(subject: Option<&SubjectHealthBranch>, candidate: Option<&ClinicalHealthBranch>) -> f64 {
    let (Some(s), Some(c)) = (subject, candidate) else {
        return NEUTRAL_SCORE;
    };

    let risk = match (s.risk_level.as_deref(), c.risk_level.as_deref()) {
        (Some(a), Some(b)) => positional_alignment(
            RISK_LEVEL.position(Some(a)),
            RISK_LEVEL.position(Some(b)),
            RISK_LEVEL.size,
        ),
        _ => NEUTRAL_SCORE,
    };

    blend(&[
        (level_alignment(s.health_status, c.health_status, LEVEL_SCALE), 0.40),
        (
            level_alignment(s.chronic_burden, comorbidity_burden(c.comorbidity_index), LEVEL_SCALE),
            0.35,
        ),
        (risk, 0.25),
    ])
}

fn behavioral_score(subject: Option<&BehavioralBranch>, candidate: Option<&BehavioralBranch>) -> f64 {
    let (Some(s), Some(c)) = (subject, candidate) else {
        return NEUTRAL_SCORE;
    };

    blend(&[
        (level_alignment(s.activity_level, c.activity_level, LEVEL_SCALE), 0.30),
        (level_alignment(s.health_engagement, c.health_engagement, LEVEL_SCALE), 0.40),
        (level_alignment(s.adherence, c.adherence, LEVEL_SCALE), 0.30),
    ])
}

fn psychosocial_score(subject: Option<&PsychosocialBranch>, candidate: Option<&PsychosocialBranch>) -> f64 {
    let (Some(s), Some(c)) = (subject, candidate) else {
        return NEUTRAL_SCORE;
    };

    blend(&[
        (level_alignment(s.stress_level, c.stress_level, LEVEL_SCALE), 0.35),
        (level_alignment(s.social_support, c.social_support, LEVEL_SCALE), 0.35),
        (level_alignment(s.health_literacy, c.health_literacy, LEVEL_SCALE), 0.30),
    ])
}

/// Semantic profile alignment (0-1) with a per-branch breakdown
///
/// A missing profile on either side yields neutral branch scores, so the
/// aggregate is 0.5 for weights summing to 1.0.
pub fn semantic_profile_alignment(
    subject: Option<&SubjectProfile>,
    candidate: Option<&CandidateProfile>,
    weights: &SemanticWeights,
) -> (f64, SemanticBreakdown) {
    let demographics = demographics_score(
        subject.and_then(|p| p.demographics.as_ref()),
        candidate.and_then(|p| p.demographics.as_ref()),
    );
    let socioeconomic = socioeconomic_score(
        subject.and_then(|p| p.socioeconomic.as_ref()),
        candidate.and_then(|p| p.socioeconomic.as_ref()),
    );
    let health_profile = health_profile_score(
        subject.and_then(|p| p.health_profile.as_ref()),
        candidate.and_then(|p| p.health_profile.as_ref()),
    );
    let behavioral = behavioral_score(
        subject.and_then(|p| p.behavioral.as_ref()),
        candidate.and_then(|p| p.behavioral.as_ref()),
    );
    let psychosocial = psychosocial_score(
        subject.and_then(|p| p.psychosocial.as_ref()),
        candidate.and_then(|p| p.psychosocial.as_ref()),
    );

    let score = unit_interval(
        demographics * weights.demographics
            + socioeconomic * weights.socioeconomic
            + health_profile * weights.health_profile
            + behavioral * weights.behavioral
            + psychosocial * weights.psychosocial,
        "semantic score",
    );

    let breakdown = SemanticBreakdown {
        demographics,
        socioeconomic,
        health_profile,
        behavioral,
        psychosocial,
        score,
        weights: *weights,
    };

    (score, breakdown)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_subject() -> SubjectProfile {
        SubjectProfile {
            demographics: Some(DemographicBranch {
                age_group: Some("30-44".to_string()),
                gender: Some("female".to_string()),
                urbanicity: Some("urban".to_string()),
            }),
            socioeconomic: Some(SocioeconomicBranch {
                education_level: Some(4),
                income_level: Some(3),
                healthcare_access: Some(4),
            }),
            health_profile: Some(SubjectHealthBranch {
                health_status: Some(3),
                chronic_burden: Some(2),
                risk_level: Some("moderate".to_string()),
            }),
            behavioral: Some(BehavioralBranch {
                activity_level: Some(3),
                health_engagement: Some(4),
                adherence: Some(4),
            }),
            psychosocial: Some(PsychosocialBranch {
                stress_level: Some(3),
                social_support: Some(4),
                health_literacy: Some(4),
            }),
        }
    }

    fn mirrored_candidate() -> CandidateProfile {
        let subject = full_subject();
        CandidateProfile {
            demographics: subject.demographics,
            socioeconomic: subject.socioeconomic,
            health_profile: Some(ClinicalHealthBranch {
                health_status: Some(3),
                comorbidity_index: Some(1.0),
                risk_level: Some("Moderate".to_string()),
            }),
            behavioral: subject.behavioral,
            psychosocial: subject.psychosocial,
        }
    }

    #[test]
    fn test_identical_profiles_score_one() {
        let (score, breakdown) = semantic_profile_alignment(
            Some(&full_subject()),
            Some(&mirrored_candidate()),
            &SemanticWeights::default(),
        );
        assert!((score - 1.0).abs() < 1e-9);
        assert!((breakdown.health_profile - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_missing_profiles_are_neutral() {
        let (score, breakdown) = semantic_profile_alignment(None, None, &SemanticWeights::default());
        assert!((score - NEUTRAL_SCORE).abs() < 1e-9);
        assert_eq!(breakdown.demographics, NEUTRAL_SCORE);
        assert_eq!(breakdown.psychosocial, NEUTRAL_SCORE);
    }

    #[test]
    fn test_missing_branch_only_neutralizes_that_branch() {
        let mut candidate = mirrored_candidate();
        candidate.behavioral = None;
        let (_, breakdown) = semantic_profile_alignment(
            Some(&full_subject()),
            Some(&candidate),
            &SemanticWeights::default(),
        );
        assert_eq!(breakdown.behavioral, NEUTRAL_SCORE);
        assert!((breakdown.socioeconomic - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_health_profile_dominates() {
        let mut candidate = mirrored_candidate();
        candidate.health_profile = Some(ClinicalHealthBranch {
            health_status: Some(1),
            comorbidity_index: Some(6.5),
            risk_level: Some("very high".to_string()),
        });
        let (health_mismatch, _) = semantic_profile_alignment(
            Some(&full_subject()),
            Some(&candidate),
            &SemanticWeights::default(),
        );

        let mut candidate = mirrored_candidate();
        candidate.demographics = Some(DemographicBranch {
            age_group: Some("65+".to_string()),
            gender: Some("male".to_string()),
            urbanicity: Some("rural".to_string()),
        });
        let (demographic_mismatch, _) = semantic_profile_alignment(
            Some(&full_subject()),
            Some(&candidate),
            &SemanticWeights::default(),
        );

        assert!(health_mismatch < demographic_mismatch);
    }

    #[test]
    fn test_comorbidity_burden_mapping() {
        assert_eq!(comorbidity_burden(Some(0.0)), Some(1));
        assert_eq!(comorbidity_burden(Some(2.2)), Some(3));
        assert_eq!(comorbidity_burden(Some(12.0)), Some(5));
        assert_eq!(comorbidity_burden(Some(f64::NAN)), None);
        assert_eq!(comorbidity_burden(None), None);
    }

    #[test]
    fn test_tag_equality() {
        assert_eq!(tag_equality(Some("Female"), Some("female")), 1.0);
        assert_eq!(tag_equality(Some("female"), Some("male")), 0.0);
        assert_eq!(tag_equality(None, Some("male")), NEUTRAL_SCORE);
    }
}
