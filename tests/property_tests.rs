// Property tests for scoring and assignment invariants

use persona_match::core::assignment::{assignment_total, is_one_to_one, solve_greedy, solve_optimal, solve_random};
use persona_match::core::ordinal::positional_alignment;
use persona_match::core::scoring::{numeric_proximity, score_breakdown, total_score};
use persona_match::core::CompatibilityMatrix;
use persona_match::models::{
    BehavioralBranch, Candidate, CandidateProfile, ClinicalHealthBranch, DemographicBranch, MatchingWeights,
    PsychosocialBranch, SocioeconomicBranch, Subject, SubjectHealthBranch, SubjectProfile,
};
use proptest::option::of;
use proptest::prelude::*;

/// Known labels mixed with arbitrary text
fn label(known: &'static [&'static str]) -> impl Strategy<Value = Option<String>> {
    of(prop_oneof![
        prop::sample::select(known).prop_map(str::to_string),
        "[A-Za-z' -]{0,16}",
    ])
}

/// In-scale levels plus out-of-scale values
fn level() -> impl Strategy<Value = Option<u8>> {
    of(prop_oneof![1u8..=5, Just(0u8), Just(9u8), Just(255u8)])
}

fn comorbidity() -> impl Strategy<Value = Option<f64>> {
    of(prop_oneof![
        -10.0f64..10.0,
        Just(-1.0),
        Just(f64::NAN),
        Just(f64::INFINITY),
        Just(f64::NEG_INFINITY),
    ])
}

const EDUCATION_LABELS: &[&str] = &["high school", "Bachelor's", "PhD", "some college", "none"];
const INCOME_LABELS: &[&str] = &["low", "lower-middle", "middle", "Upper-Middle", "high"];
const RISK_LABELS: &[&str] = &["low", "moderate", "high", "very high"];
const AGE_GROUPS: &[&str] = &["18-29", "30-44", "45-64", "65+"];
const URBANICITY_LABELS: &[&str] = &["urban", "suburban", "rural"];

fn demographics() -> impl Strategy<Value = Option<DemographicBranch>> {
    of((label(AGE_GROUPS), label(&["female", "male"]), label(URBANICITY_LABELS)).prop_map(
        |(age_group, gender, urbanicity)| DemographicBranch { age_group, gender, urbanicity },
    ))
}

fn socioeconomic() -> impl Strategy<Value = Option<SocioeconomicBranch>> {
    of((level(), level(), level()).prop_map(|(education_level, income_level, healthcare_access)| {
        SocioeconomicBranch { education_level, income_level, healthcare_access }
    }))
}

fn behavioral() -> impl Strategy<Value = Option<BehavioralBranch>> {
    of((level(), level(), level()).prop_map(|(activity_level, health_engagement, adherence)| {
        BehavioralBranch { activity_level, health_engagement, adherence }
    }))
}

fn psychosocial() -> impl Strategy<Value = Option<PsychosocialBranch>> {
    of((level(), level(), level()).prop_map(|(stress_level, social_support, health_literacy)| {
        PsychosocialBranch { stress_level, social_support, health_literacy }
    }))
}

fn arb_subject() -> impl Strategy<Value = Subject> {
    let health = of((level(), level(), label(RISK_LABELS)).prop_map(
        |(health_status, chronic_burden, risk_level)| SubjectHealthBranch {
            health_status,
            chronic_burden,
            risk_level,
        },
    ));
    let profile = of((demographics(), socioeconomic(), health, behavioral(), psychosocial()).prop_map(
        |(demographics, socioeconomic, health_profile, behavioral, psychosocial)| SubjectProfile {
            demographics,
            socioeconomic,
            health_profile,
            behavioral,
            psychosocial,
        },
    ));

    (of(0u32..130), label(EDUCATION_LABELS), label(INCOME_LABELS), profile).prop_map(
        |(age, education, income, profile)| Subject {
            id: "persona".to_string(),
            age,
            education,
            income,
            marital_status: None,
            profile,
        },
    )
}

fn arb_candidate() -> impl Strategy<Value = Candidate> {
    let health = of((level(), comorbidity(), label(RISK_LABELS)).prop_map(
        |(health_status, comorbidity_index, risk_level)| ClinicalHealthBranch {
            health_status,
            comorbidity_index,
            risk_level,
        },
    ));
    let profile = of((demographics(), socioeconomic(), health, behavioral(), psychosocial()).prop_map(
        |(demographics, socioeconomic, health_profile, behavioral, psychosocial)| CandidateProfile {
            demographics,
            socioeconomic,
            health_profile,
            behavioral,
            psychosocial,
        },
    ));

    (of(0u32..130), profile).prop_map(|(age, profile)| Candidate {
        id: "record".to_string(),
        age,
        profile,
        ..Default::default()
    })
}

fn square_matrix() -> impl Strategy<Value = CompatibilityMatrix> {
    (1usize..8).prop_flat_map(|n| {
        prop::collection::vec(0.0f64..=1.0, n * n).prop_map(move |values| {
            let rows: Vec<Vec<f64>> = values.chunks(n).map(|chunk| chunk.to_vec()).collect();
            CompatibilityMatrix::from_rows(rows).unwrap()
        })
    })
}

proptest! {
    #[test]
    fn proximity_is_symmetric(a in 0.0f64..120.0, b in 0.0f64..120.0, t in 0.5f64..20.0) {
        prop_assert_eq!(numeric_proximity(a, b, t), numeric_proximity(b, a, t));
    }

    #[test]
    fn proximity_stays_in_unit_range(a in 0.0f64..120.0, b in 0.0f64..120.0, t in 0.0f64..20.0) {
        let score = numeric_proximity(a, b, t);
        prop_assert!((0.0..=1.0).contains(&score));
    }

    #[test]
    fn proximity_of_equal_values_is_one(a in 0.0f64..120.0, t in 0.5f64..20.0) {
        prop_assert_eq!(numeric_proximity(a, a, t), 1.0);
    }

    #[test]
    fn proximity_decreases_with_distance(a in 0.0f64..60.0, d1 in 0.0f64..30.0, extra in 0.01f64..30.0, t in 0.5f64..10.0) {
        let near = numeric_proximity(a, a + d1, t);
        let far = numeric_proximity(a, a + d1 + extra, t);
        prop_assert!(near >= far);
    }

    #[test]
    fn positional_alignment_is_monotone(a in 1u8..=5, b in 1u8..=5) {
        let score = positional_alignment(a, b, 5);
        prop_assert!((0.0..=1.0).contains(&score));
        if a < 5 && b <= a {
            prop_assert!(positional_alignment(a + 1, b, 5) <= score);
        }
    }

    #[test]
    fn optimal_dominates_baselines(matrix in square_matrix(), seed in any::<u64>()) {
        let optimal = solve_optimal(&matrix).unwrap();
        let greedy = solve_greedy(&matrix);
        let random = solve_random(&matrix, seed);

        prop_assert!(is_one_to_one(&optimal));
        prop_assert!(is_one_to_one(&greedy));
        prop_assert!(is_one_to_one(&random));
        prop_assert_eq!(optimal.len(), matrix.rows());

        let best = assignment_total(&optimal);
        prop_assert!(best >= assignment_total(&greedy) - 1e-6);
        prop_assert!(best >= assignment_total(&random) - 1e-6);
    }

    #[test]
    fn every_sub_score_stays_in_unit_range(subject in arb_subject(), candidate in arb_candidate()) {
        let weights = MatchingWeights::default();
        let breakdown = score_breakdown(&subject, &candidate, &weights);
        let semantic = breakdown.semantic;

        for (name, value) in [
            ("age", breakdown.age_score),
            ("socioeconomic", breakdown.socioeconomic_score),
            ("compatibility", breakdown.compatibility),
            ("total", breakdown.total),
            ("semantic", semantic.score),
            ("demographics", semantic.demographics),
            ("semantic socioeconomic", semantic.socioeconomic),
            ("health profile", semantic.health_profile),
            ("behavioral", semantic.behavioral),
            ("psychosocial", semantic.psychosocial),
            ("total_score", total_score(&subject, &candidate, &weights)),
        ] {
            prop_assert!((0.0..=1.0).contains(&value), "{} = {}", name, value);
        }
    }

    #[test]
    fn random_policy_is_reproducible(matrix in square_matrix(), seed in any::<u64>()) {
        prop_assert_eq!(solve_random(&matrix, seed), solve_random(&matrix, seed));
    }
}
