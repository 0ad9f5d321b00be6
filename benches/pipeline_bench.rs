// In tideline-core/benches/pipeline_bench.rs

use criterion::{criterion_group, criterion_main, Criterion};
use rand::Rng;

use std::sync::Arc;

use arrow::array::{Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;

use tideline::fetch::MemoryFetcher;
use tideline::steps::{DeriveColumnStep, DropNullsStep, ThresholdFilterStep};
use tideline::{ArtifactCompression, Pipeline, TidelineConfig};

// --- Mock Data Generation ---

/// Generates an (id, value) table with roughly 5% nulls in `value`.
fn generate_source_table(rows: usize) -> RecordBatch {
    let mut rng = rand::rng();
    let ids: Vec<i64> = (0..rows as i64).collect();
    let values: Vec<Option<f64>> = (0..rows)
        .map(|_| {
            if rng.random::<f64>() < 0.05 {
                None
            } else {
                Some(rng.random::<f64>() * 100.0)
            }
        })
        .collect();

    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("value", DataType::Float64, true),
    ]));
    RecordBatch::try_new(
        schema,
        vec![
            Arc::new(Int64Array::from(ids)),
            Arc::new(Float64Array::from(values)),
        ],
    )
    .unwrap()
}

// --- Benchmark Suite ---

const BENCH_ROWS: usize = 100_000;
const BENCH_BATCH_SIZE: usize = 10_000;

fn run_once(data: &RecordBatch, compression: ArtifactCompression) {
    let dir = tempfile::tempdir().unwrap();
    let config = TidelineConfig {
        batch_size: BENCH_BATCH_SIZE,
        checkpoint_dir: dir.path().to_path_buf(),
        artifact_compression: compression,
    };
    let mut pipeline = Pipeline::new(
        vec![
            Box::new(DropNullsStep::new("drop_nulls")),
            Box::new(DeriveColumnStep::new("add_feature1", "value", 3, "feature1")),
            Box::new(ThresholdFilterStep::new("filter_data", "feature1", 30.0)),
        ],
        Box::new(MemoryFetcher::new(data.clone())),
        config,
    )
    .unwrap();

    pipeline.run(false).unwrap();
    let results = pipeline.collect_results().unwrap();
    assert!(results.num_rows() > 0);
}

fn bench_pipeline_run(c: &mut Criterion) {
    tideline::observability::init_logging(false);
    let data = generate_source_table(BENCH_ROWS);

    let mut group = c.benchmark_group("pipeline_run");
    group.sample_size(10); // Each iteration runs a full checkpointed pipeline.

    group.bench_function("run_100k_rows_zstd", |b| {
        b.iter(|| run_once(&data, ArtifactCompression::Zstd))
    });
    group.bench_function("run_100k_rows_uncompressed", |b| {
        b.iter(|| run_once(&data, ArtifactCompression::None))
    });

    group.finish();
}

criterion_group!(benches, bench_pipeline_run);
criterion_main!(benches);
