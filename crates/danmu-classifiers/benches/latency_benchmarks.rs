//! Latency benchmarks for the local analysis path
//!
//! The lexicon, aggregation, weighting and term extraction all run on every
//! analysis regardless of provider settings, so they need to stay cheap for
//! streams of tens of thousands of comments.
//!
//! Run with: cargo bench -p danmu-classifiers

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::sync::Arc;
use tokio::runtime::Runtime;

use danmu_classifiers::{
    expand_weights, AnalysisPipeline, Classifier, LexiconClassifier, StaticSettings,
    WordFrequencyExtractor,
};
use danmu_core::{CommentSource, FrequencyTable, Result};

const SAMPLES: &[&str] = &[
    "好棒",
    "前方高能",
    "无聊死了",
    "666666",
    "这个视频太好看了，爱了爱了",
    "一般般吧",
    "up主加油！",
    "哈哈哈哈哈哈",
    "low",
    "awsl",
];

fn stream(size: usize) -> Vec<String> {
    (0..size)
        .map(|i| {
            let base = SAMPLES[i % SAMPLES.len()];
            if i % 7 == 0 {
                format!("{base} {}", i % 97)
            } else {
                base.to_string()
            }
        })
        .collect()
}

/// Benchmark keyword lexicon over unique comment lists
fn benchmark_lexicon(c: &mut Criterion) {
    let classifier = LexiconClassifier::new().unwrap();

    let mut group = c.benchmark_group("Lexicon_Classifier");
    group.sample_size(100);

    for size in [100, 1_000, 10_000] {
        let unique = FrequencyTable::aggregate(stream(size)).unique();
        group.bench_with_input(BenchmarkId::new("classify_all", size), &unique, |b, unique| {
            b.iter(|| classifier.classify_all(black_box(unique)))
        });
    }

    group.finish();
}

/// Benchmark aggregation and weight expansion
fn benchmark_aggregation(c: &mut Criterion) {
    let classifier = LexiconClassifier::new().unwrap();

    let mut group = c.benchmark_group("Aggregation");
    group.sample_size(100);

    for size in [1_000, 10_000, 50_000] {
        let comments = stream(size);
        group.bench_with_input(BenchmarkId::new("aggregate", size), &comments, |b, comments| {
            b.iter(|| FrequencyTable::aggregate(black_box(comments)))
        });

        let table = FrequencyTable::aggregate(&comments);
        let classification = classifier.classify_all(&table.unique());
        group.bench_with_input(BenchmarkId::new("expand_weights", size), &table, |b, table| {
            b.iter(|| expand_weights(black_box(&classification), table))
        });
    }

    group.finish();
}

/// Benchmark local term extraction
fn benchmark_terms(c: &mut Criterion) {
    let extractor = WordFrequencyExtractor::new();

    let mut group = c.benchmark_group("Word_Frequency");
    group.sample_size(100);

    for size in [1_000, 10_000] {
        let table = FrequencyTable::aggregate(stream(size));
        let unique = table.unique();
        group.bench_with_input(BenchmarkId::new("extract", size), &unique, |b, unique| {
            b.iter(|| extractor.extract(black_box(unique), &table, None))
        });
    }

    group.finish();
}

struct StreamSource(Vec<String>);

#[async_trait::async_trait]
impl CommentSource for StreamSource {
    async fn fetch_comments(&self, _video_id: &str) -> Result<Vec<String>> {
        Ok(self.0.clone())
    }

    fn name(&self) -> &str {
        "bench"
    }
}

/// End-to-end local pipeline, including session bookkeeping
fn benchmark_pipeline(c: &mut Criterion) {
    let rt = Runtime::new().unwrap();
    let pipeline = AnalysisPipeline::new(
        Arc::new(StreamSource(stream(10_000))),
        Arc::new(StaticSettings::default()),
    )
    .unwrap();
    let lexicon = LexiconClassifier::new().unwrap();
    let unique = FrequencyTable::aggregate(stream(10_000)).unique();

    let mut group = c.benchmark_group("Pipeline_Overhead");
    group.sample_size(50);

    group.bench_function("lexicon_trait_call", |b| {
        b.iter(|| rt.block_on(async { lexicon.classify(black_box(&unique)).await.unwrap() }))
    });

    group.bench_function("analyze_video_local_10k", |b| {
        b.iter(|| {
            rt.block_on(async { pipeline.analyze_video(black_box("BV1bench")).await.unwrap() })
        })
    });

    group.finish();
}

criterion_group!(
    benches,
    benchmark_lexicon,
    benchmark_aggregation,
    benchmark_terms,
    benchmark_pipeline
);
criterion_main!(benches);
