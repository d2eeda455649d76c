//! Benchmarks for rank-based recommendation
//!
//! Run with: cargo bench --package heuristic
//!
//! Uses a synthetic table sized like a full counselling year: 100
//! institutes, 40 branches, two quotas and two gender pools per category.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use data_loader::{CutoffIndex, CutoffRecord};
use heuristic::{CollegePredictor, DEFAULT_TOP_N};
use std::sync::Arc;

fn synthetic_index() -> Arc<CutoffIndex> {
    let mut records = Vec::new();
    for institute in 0..100u32 {
        for branch in 0..40u32 {
            for (quota, gender) in [
                ("AI", "Gender-Neutral"),
                ("OS", "Gender-Neutral"),
                ("AI", "Female-only (including Supernumerary)"),
                ("OS", "Female-only (including Supernumerary)"),
            ] {
                for round in 1..=6u8 {
                    let opening = institute * 500 + branch * 37 + 1;
                    records.push(CutoffRecord {
                        year: 2023,
                        round,
                        institute_type: "NIT".to_string(),
                        institute_name: format!("Institute {institute}"),
                        branch: format!("Branch {branch}"),
                        quota: quota.to_string(),
                        category: "OPEN".to_string(),
                        gender: gender.to_string(),
                        is_pwd: false,
                        opening_rank: opening,
                        closing_rank: opening + 1500 + u32::from(round) * 100,
                    });
                }
            }
        }
    }
    Arc::new(CutoffIndex::from_records(records))
}

fn bench_recommendations(c: &mut Criterion) {
    let predictor = CollegePredictor::new(synthetic_index());

    c.bench_function("get_recommendations_by_rank", |b| {
        b.iter(|| {
            let recs = predictor
                .get_recommendations_by_rank(black_box(12_000), black_box("OPEN"), DEFAULT_TOP_N)
                .unwrap();
            black_box(recs)
        })
    });
}

fn bench_index_build(c: &mut Criterion) {
    c.bench_function("build_cutoff_index", |b| {
        b.iter(|| black_box(synthetic_index()))
    });
}

criterion_group!(benches, bench_recommendations, bench_index_build);
criterion_main!(benches);
