// Performance benchmarks for extraction, similarity and ranking
use brewmatch_core::{FeatureExtractor, LexiconSet, RawProfile};
use brewmatch_similarity::{
    compute_similarity, rank_all_with, FeatureRow, FeatureSchema, FeatureTable, FeedbackEvent,
    MatchConfig, MatchSession, PreferenceMatrix, ProfileFeatureBuilder,
};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::prelude::*;

const BIO_SNIPPETS: &[&str] = &[
    "I love hiking and yoga.",
    "Huge music fan, I go to every concert.",
    "I really enjoy cooking for friends.",
    "Not a big fan of sports, but I read a lot.",
    "9/10 humor, and I am very kind.",
    "Travel is my passion!",
    "I paint on weekends and visit the museum.",
];

const WISH_SNIPPETS: &[&str] = &[
    "Someone funny and kind.",
    "Shared interests matter to me.",
    "Faith is important.",
    "Looking for someone honest and loyal.",
    "Someone adventurous.",
];

fn random_profiles(count: usize, snippets: &[&str], rng: &mut impl Rng) -> Vec<RawProfile> {
    (0..count)
        .map(|i| {
            let text: Vec<&str> = (0..3)
                .map(|_| snippets[rng.random_range(0..snippets.len())])
                .collect();
            RawProfile::new(i.to_string(), text.join(" "))
        })
        .collect()
}

fn random_table(count: usize, rng: &mut impl Rng) -> FeatureTable {
    let schema = FeatureSchema::from_lexicons(&LexiconSet::builtin());
    let rows = (0..count).map(|i| FeatureRow {
        uid: i.to_string(),
        interests: (0..schema.interests().len()).map(|_| rng.random_range(0..=10)).collect(),
        traits: (0..schema.traits().len()).map(|_| rng.random_range(0..=10)).collect(),
        preferences: vec![None; schema.preferences().len()],
    });
    FeatureTable::from_rows(schema.clone(), rows)
}

fn benchmark_extraction(c: &mut Criterion) {
    let lexicons = LexiconSet::builtin();
    let extractor = FeatureExtractor::with_defaults(&lexicons);
    let bio = "I love hiking and yoga. Huge music fan, I go to every concert. 9/10 humor.";

    c.bench_function("extract_record", |b| {
        b.iter(|| extractor.extract_record("u", black_box(Some(bio)), black_box(Some("Someone funny and kind."))))
    });
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    let lexicons = LexiconSet::builtin();
    let mut rng = StdRng::seed_from_u64(7);

    for size in [100, 1000].iter() {
        let bios = random_profiles(*size, BIO_SNIPPETS, &mut rng);
        let wishes = random_profiles(*size, WISH_SNIPPETS, &mut rng);

        for parallel in [false, true] {
            let name = if parallel { "parallel" } else { "sequential" };
            group.bench_with_input(BenchmarkId::new(name, size), size, |b, _| {
                let builder = ProfileFeatureBuilder::new(&lexicons).parallel(parallel);
                b.iter(|| builder.build(black_box(&bios), black_box(&wishes)).unwrap());
            });
        }
    }

    group.finish();
}

fn benchmark_similarity(c: &mut Criterion) {
    let mut group = c.benchmark_group("similarity");
    let mut rng = StdRng::seed_from_u64(42);

    for size in [100, 500, 1000].iter() {
        let table = random_table(*size, &mut rng);
        group.bench_with_input(BenchmarkId::new("cosine_matrix", size), size, |b, _| {
            b.iter(|| compute_similarity(black_box(&table)));
        });
        group.bench_with_input(BenchmarkId::new("preference_matrix", size), size, |b, _| {
            b.iter(|| PreferenceMatrix::compute(black_box(&table)));
        });
    }

    group.finish();
}

fn benchmark_rank(c: &mut Criterion) {
    let mut group = c.benchmark_group("rank_all");
    let mut rng = StdRng::seed_from_u64(1);

    for size in [100, 1000].iter() {
        let table = random_table(*size, &mut rng);
        let matrix = compute_similarity(&table);
        let preferences = PreferenceMatrix::compute(&table);
        group.bench_with_input(BenchmarkId::new("top5", size), size, |b, _| {
            b.iter(|| rank_all_with(black_box(&matrix), &table, &preferences, 5).unwrap());
        });
    }

    group.finish();
}

fn benchmark_feedback(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(3);
    let table = random_table(1000, &mut rng);
    let events: Vec<FeedbackEvent> = (0..1000)
        .map(|_| {
            let a = rng.random_range(0..1000).to_string();
            let b = rng.random_range(0..1000).to_string();
            if rng.random_bool(0.5) {
                FeedbackEvent::accept(a, b)
            } else {
                FeedbackEvent::reject(a, b)
            }
        })
        .collect();
    let mut session = MatchSession::new(table, MatchConfig::default()).unwrap();

    c.bench_function("feedback_batch_1000", |b| {
        b.iter(|| session.apply_feedback(black_box(&events)).unwrap());
    });
}

criterion_group!(
    benches,
    benchmark_extraction,
    benchmark_build,
    benchmark_similarity,
    benchmark_rank,
    benchmark_feedback
);
criterion_main!(benches);
