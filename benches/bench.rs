// Criterion benchmarks for Scheme Match

use criterion::{black_box, criterion_group, criterion_main, Criterion, BenchmarkId};
use chrono::NaiveDate;
use scheme_match::core::{classify_target_group, AlertGenerator, Matcher};
use scheme_match::models::{CasteCategory, SchemeRecord, UserProfile};

const CATEGORIES: &[&str] = &["Agriculture", "Health", "Education", "Housing", "Employment"];
const TARGET_GROUPS: &[&str] = &[
    "All citizens",
    "SC/ST families below poverty line",
    "Other Backward Classes",
    "Small and marginal farmers",
    "Scheduled Tribes only",
];

fn create_scheme(id: usize) -> SchemeRecord {
    SchemeRecord {
        id: format!("S{:05}", id),
        name: format!("Scheme {}", id),
        level: if id % 3 == 0 { "State" } else { "Central" }.to_string(),
        state: if id % 3 == 0 { "Kerala" } else { "All" }.to_string(),
        category: CATEGORIES[id % CATEGORIES.len()].to_string(),
        min_income: Some(0),
        max_income: Some(100_000 + (id as u64 % 10) * 50_000),
        min_age: Some((id % 4) as u32 * 10),
        max_age: Some(60 + (id % 5) as u32 * 10),
        target_group: TARGET_GROUPS[id % TARGET_GROUPS.len()].to_string(),
        benefits: "Financial assistance".to_string(),
        is_active: id % 7 != 0,
        last_updated: format!("2024-06-{:02}", 1 + id % 28),
    }
}

fn create_profile() -> UserProfile {
    UserProfile {
        state: "Kerala".to_string(),
        income: 150_000,
        age: Some(32),
        category: "Agriculture".to_string(),
        caste_category: CasteCategory::Obc,
    }
}

fn bench_classifier(c: &mut Criterion) {
    c.bench_function("classify_target_group", |b| {
        b.iter(|| classify_target_group(black_box("SC/ST and OBC households in rural areas")));
    });
}

fn bench_recommend(c: &mut Criterion) {
    let matcher = Matcher::new(Default::default(), 0);
    let profile = create_profile();

    let mut group = c.benchmark_group("recommend");

    for scheme_count in [10, 100, 1000, 5000].iter() {
        let catalog: Vec<SchemeRecord> = (0..*scheme_count).map(create_scheme).collect();

        group.bench_with_input(
            BenchmarkId::new("recommend", scheme_count),
            scheme_count,
            |b, _| {
                b.iter(|| {
                    matcher.recommend(
                        black_box(&catalog),
                        black_box(&profile),
                        None,
                        Some(20),
                    )
                });
            },
        );
    }

    group.finish();
}

fn bench_alerts(c: &mut Criterion) {
    let alerts = AlertGenerator::default();
    let profile = create_profile();
    let catalog: Vec<SchemeRecord> = (0..1000).map(create_scheme).collect();
    let today = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

    c.bench_function("generate_alerts_1000_schemes", |b| {
        b.iter(|| alerts.generate_alerts(black_box(&catalog), black_box(&profile), today));
    });
}

criterion_group!(
    benches,
    bench_classifier,
    bench_recommend,
    bench_alerts
);

criterion_main!(benches);
