//! Criterion benchmarks for the growth engine and monthly bucketing.

use chrono::{Duration, TimeZone, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use loghive::domain::models::SamplePoint;
use loghive::services::aggregator::bucket_by_month;
use loghive::services::growth::positive_growth;

/// A sawtooth series: steady growth with a rotation drop every 24 samples.
fn sawtooth(len: usize) -> Vec<f64> {
    (0..len)
        .map(|i| 500.0 + (i % 24) as f64 * 12.5 + (i / 24) as f64 * 3.0)
        .collect()
}

fn bench_positive_growth(c: &mut Criterion) {
    let mut group = c.benchmark_group("positive_growth");
    for len in [61usize, 1_000, 100_000] {
        let values = sawtooth(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &values, |b, values| {
            b.iter(|| positive_growth(black_box(values)));
        });
    }
    group.finish();
}

fn bench_bucket_by_month(c: &mut Criterion) {
    // One year of hourly samples.
    let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
    let points: Vec<SamplePoint> = sawtooth(24 * 365)
        .into_iter()
        .enumerate()
        .map(|(i, size_mb)| SamplePoint {
            size_mb,
            recorded_at: start + Duration::hours(i as i64),
        })
        .collect();

    c.bench_function("bucket_by_month/hourly_year", |b| {
        b.iter(|| bucket_by_month(black_box(&points)));
    });
}

criterion_group!(benches, bench_positive_growth, bench_bucket_by_month);
criterion_main!(benches);
