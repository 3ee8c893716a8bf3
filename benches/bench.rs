// Criterion benchmarks for brandscore

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use brandscore::core::{
    check_constraints, extract_domains, DiversityScorer, Evaluator, PremiumScorer,
    PronounceabilityScorer,
};
use brandscore::models::Sample;

const PROMPT: &str = "Generate 10 brandable domain names for a coffee subscription. \
    Length 4-10. Use TLDs: .com, .io, .co. Must include 'brew'.";

const STEMS: &[&str] = &[
    "brew", "bean", "roast", "mug", "drip", "crema", "latte", "mocha", "press", "grind",
];
const ENDINGS: &[&str] = &["ly", "io", "hub", "lab", "ify", "er", "box", "zen", "wave", "kit"];
const TLDS: &[&str] = &["com", "io", "co", "ai", "xyz"];

fn create_response(seed: usize, count: usize) -> String {
    (0..count)
        .map(|i| {
            let k = seed + i;
            format!(
                "{}. {}{}.{} — a name for the brand\n",
                i + 1,
                STEMS[k % STEMS.len()],
                ENDINGS[(k * 7) % ENDINGS.len()],
                TLDS[(k * 3) % TLDS.len()]
            )
        })
        .collect()
}

fn bench_extraction(c: &mut Criterion) {
    let response = create_response(0, 10);

    c.bench_function("extract_domains_10", |b| {
        b.iter(|| extract_domains(black_box(&response)));
    });
}

fn bench_rubrics(c: &mut Criterion) {
    let response = create_response(3, 10);
    let diversity = DiversityScorer::default();
    let pronounceability = PronounceabilityScorer::default();
    let premium = PremiumScorer::default();

    let mut group = c.benchmark_group("rubrics");

    group.bench_function("constraints", |b| {
        b.iter(|| check_constraints(black_box(PROMPT), black_box(&response)));
    });
    group.bench_function("diversity", |b| {
        b.iter(|| diversity.check_diversity(black_box(&response)));
    });
    group.bench_function("pronounceability", |b| {
        b.iter(|| pronounceability.check_response(black_box(&response)));
    });
    group.bench_function("premium", |b| {
        b.iter(|| premium.check_response(black_box(&response)));
    });

    group.finish();
}

fn bench_evaluation(c: &mut Criterion) {
    let evaluator = Evaluator::default();

    let mut group = c.benchmark_group("evaluation");

    for sample_count in [10, 100, 1000].iter() {
        let samples: Vec<Sample> = (0..*sample_count)
            .map(|i| Sample::new(PROMPT, create_response(i, 10)))
            .collect();

        group.bench_with_input(
            BenchmarkId::new("evaluate", sample_count),
            sample_count,
            |b, _| {
                b.iter(|| evaluator.evaluate(black_box("bench"), black_box(&samples)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_extraction, bench_rubrics, bench_evaluation);

criterion_main!(benches);
