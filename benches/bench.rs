// Criterion benchmarks for Persona Match

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use persona_match::core::assignment::{solve_greedy, solve_optimal};
use persona_match::core::{numeric_proximity, MatchEngine, MatrixBuilder, RunOptions};
use persona_match::models::{
    Candidate, CandidateProfile, ClinicalHealthBranch, SocioeconomicBranch, Subject, SubjectHealthBranch,
    SubjectProfile,
};

const EDUCATION: [&str; 5] = ["high school", "some college", "bachelor", "master", "phd"];
const INCOME: [&str; 5] = ["low", "lower-middle", "middle", "upper-middle", "high"];
const RISK: [&str; 4] = ["low", "moderate", "high", "very high"];

fn create_subject(id: usize) -> Subject {
    Subject {
        id: format!("persona-{}", id),
        age: Some(18 + (id * 7 % 70) as u32),
        education: Some(EDUCATION[id % 5].to_string()),
        income: Some(INCOME[id * 3 % 5].to_string()),
        marital_status: None,
        profile: Some(SubjectProfile {
            health_profile: Some(SubjectHealthBranch {
                health_status: Some(1 + (id % 5) as u8),
                chronic_burden: Some(1 + (id * 2 % 5) as u8),
                risk_level: Some(RISK[id % 4].to_string()),
            }),
            ..Default::default()
        }),
    }
}

fn create_candidate(id: usize) -> Candidate {
    Candidate {
        id: format!("record-{}", id),
        age: Some(18 + (id * 11 % 70) as u32),
        conditions: vec!["I10".to_string()],
        medications: vec![],
        encounter_count: (id % 20) as u32,
        profile: Some(CandidateProfile {
            socioeconomic: Some(SocioeconomicBranch {
                education_level: Some(1 + (id % 5) as u8),
                income_level: Some(1 + (id * 2 % 5) as u8),
                healthcare_access: None,
            }),
            health_profile: Some(ClinicalHealthBranch {
                health_status: Some(1 + (id * 3 % 5) as u8),
                comorbidity_index: Some((id % 6) as f64 * 0.75),
                risk_level: Some(RISK[id * 3 % 4].to_string()),
            }),
            ..Default::default()
        }),
    }
}

fn cohort(size: usize) -> (Vec<Subject>, Vec<Candidate>) {
    ((0..size).map(create_subject).collect(), (0..size).map(create_candidate).collect())
}

fn bench_numeric_proximity(c: &mut Criterion) {
    c.bench_function("numeric_proximity", |b| {
        b.iter(|| numeric_proximity(black_box(34.0), black_box(41.0), black_box(2.0)));
    });
}

fn bench_matrix_build(c: &mut Criterion) {
    let builder = MatrixBuilder::default();
    let mut group = c.benchmark_group("matrix_build");

    for size in [10, 50, 100, 200].iter() {
        let (subjects, candidates) = cohort(*size);
        group.bench_with_input(BenchmarkId::new("compatibility", size), size, |b, _| {
            b.iter(|| builder.build(black_box(&subjects), black_box(&candidates)));
        });
        group.bench_with_input(BenchmarkId::new("all_scores", size), size, |b, _| {
            b.iter(|| builder.build_all(black_box(&subjects), black_box(&candidates)));
        });
    }

    group.finish();
}

fn bench_solvers(c: &mut Criterion) {
    let builder = MatrixBuilder::default();
    let mut group = c.benchmark_group("assignment");

    for size in [10, 50, 100, 200].iter() {
        let (subjects, candidates) = cohort(*size);
        let Ok(matrix) = builder.build(&subjects, &candidates) else {
            continue;
        };

        group.bench_with_input(BenchmarkId::new("optimal", size), size, |b, _| {
            b.iter(|| solve_optimal(black_box(&matrix)));
        });
        group.bench_with_input(BenchmarkId::new("greedy", size), size, |b, _| {
            b.iter(|| solve_greedy(black_box(&matrix)));
        });
    }

    group.finish();
}

fn bench_engine_run(c: &mut Criterion) {
    let engine = MatchEngine::with_defaults();
    let (subjects, candidates) = cohort(100);

    c.bench_function("engine_run_100x100", |b| {
        b.iter(|| engine.run(black_box(&subjects), black_box(&candidates), RunOptions::default()));
    });
}

criterion_group!(benches, bench_numeric_proximity, bench_matrix_build, bench_solvers, bench_engine_run);

criterion_main!(benches);
