//! Benchmarks for rapid_ldavis

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use rapid_ldavis::pipeline::reorder::reorder_topics;
use rapid_ldavis::pipeline::term_stats::{lambda_grid, relevance_sweep, RelevanceTables, TermStatistics};
use rapid_ldavis::projection::{pairwise_jensen_shannon, pcoa::pcoa};
use rapid_ldavis::*;

/// Synthetic model inputs: (topic_term, doc_topic, doc_lengths, vocab, term_frequency).
struct Model {
    topic_term: Vec<Vec<f64>>,
    doc_topic: Vec<Vec<f64>>,
    doc_lengths: Vec<f64>,
    vocab: Vec<String>,
    term_frequency: Vec<f64>,
}

fn random_rows(rng: &mut ChaCha8Rng, rows: usize, cols: usize) -> Vec<Vec<f64>> {
    (0..rows)
        .map(|_| {
            let row: Vec<f64> = (0..cols).map(|_| rng.gen_range(0.001..1.0)).collect();
            let sum: f64 = row.iter().sum();
            row.into_iter().map(|v| v / sum).collect()
        })
        .collect()
}

fn synthetic_model(n_topics: usize, n_terms: usize, n_docs: usize) -> Model {
    let mut rng = ChaCha8Rng::seed_from_u64(42);
    Model {
        topic_term: random_rows(&mut rng, n_topics, n_terms),
        doc_topic: random_rows(&mut rng, n_docs, n_topics),
        doc_lengths: (0..n_docs).map(|_| rng.gen_range(20..400) as f64).collect(),
        vocab: (0..n_terms).map(|i| format!("term{i}")).collect(),
        term_frequency: (0..n_terms).map(|_| rng.gen_range(1..500) as f64).collect(),
    }
}

fn benchmark_divergence(c: &mut Criterion) {
    let model = synthetic_model(20, 2_000, 10);

    c.bench_function("pairwise_jensen_shannon", |b| {
        b.iter(|| pairwise_jensen_shannon(black_box(&model.topic_term)))
    });

    let distances = pairwise_jensen_shannon(&model.topic_term);
    c.bench_function("pcoa", |b| b.iter(|| pcoa(black_box(&distances))));
}

fn benchmark_relevance_sweep(c: &mut Criterion) {
    let model = synthetic_model(20, 5_000, 200);
    let ordering = reorder_topics(&model.topic_term, &model.doc_topic, &model.doc_lengths, true);
    let stats = TermStatistics::compute(&ordering).unwrap();
    let tables = RelevanceTables::new(&ordering, &stats);
    let lambdas = lambda_grid(0.01).unwrap();

    // Compare worker counts
    let mut group = c.benchmark_group("relevance_sweep");
    for workers in [1usize, 2, 4, 8].iter() {
        group.bench_with_input(
            BenchmarkId::from_parameter(workers),
            workers,
            |b, &workers| {
                b.iter(|| relevance_sweep(black_box(&tables), 30, black_box(&lambdas), workers))
            },
        );
    }
    group.finish();
}

fn benchmark_ordinations(c: &mut Criterion) {
    let model = synthetic_model(15, 1_000, 50);

    let mut group = c.benchmark_group("ordination");
    for name in ["pcoa", "mmds", "tsne"].iter() {
        let method: OrdinationMethod = name.parse().unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(name), &method, |b, method| {
            b.iter(|| method.project(black_box(&model.topic_term)))
        });
    }
    group.finish();
}

fn benchmark_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");
    group.sample_size(20);

    for n_terms in [1_000usize, 5_000, 20_000].iter() {
        let model = synthetic_model(20, *n_terms, 500);
        let config = PrepareConfig::default();
        group.throughput(Throughput::Elements(*n_terms as u64));

        group.bench_with_input(BenchmarkId::new("prepare", n_terms), &model, |b, model| {
            b.iter(|| {
                prepare(
                    model.topic_term.clone(),
                    model.doc_topic.clone(),
                    model.doc_lengths.clone(),
                    model.vocab.clone(),
                    model.term_frequency.clone(),
                    &config,
                )
            })
        });
    }

    group.finish();
}

fn benchmark_serialization(c: &mut Criterion) {
    let model = synthetic_model(20, 5_000, 200);
    let data = prepare(
        model.topic_term,
        model.doc_topic,
        model.doc_lengths,
        model.vocab,
        model.term_frequency,
        &PrepareConfig::default(),
    )
    .unwrap();

    c.bench_function("to_json", |b| b.iter(|| black_box(&data).to_json()));
    c.bench_function("sorted_terms", |b| {
        b.iter(|| black_box(&data).sorted_terms(black_box(3), black_box(0.6)))
    });
}

criterion_group!(
    benches,
    benchmark_divergence,
    benchmark_relevance_sweep,
    benchmark_ordinations,
    benchmark_full_pipeline,
    benchmark_serialization,
);
criterion_main!(benches);
