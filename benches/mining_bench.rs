use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use shapelet_rs::algorithms::tarone::min_attainable_p_values;
use shapelet_rs::{mine, ContingencyTable, Dataset, DistanceFunctor, MinerConfig, Minkowski};

/// Synthetic two-class dataset: class 1 carries a bump the other class lacks.
fn synthetic_dataset(n_series: usize, len: usize) -> Dataset {
    let series: Vec<Vec<f64>> = (0..n_series)
        .map(|i| {
            (0..len)
                .map(|t| {
                    let base = (t as f64 * 0.3 + i as f64).sin();
                    if i % 2 == 0 && (len / 3..len / 3 + 5).contains(&t) {
                        base + 2.0
                    } else {
                        base
                    }
                })
                .collect()
        })
        .collect();
    let labels: Vec<u8> = (0..n_series).map(|i| (i % 2 == 0) as u8).collect();
    Dataset::new(series, labels).unwrap()
}

fn bench_contingency_p_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("contingency");
    for n in [20_usize, 100, 400] {
        let n1 = n / 2;
        let mut table = ContingencyTable::new(n, n1, 0.5, false);
        for i in 0..n {
            table.insert(if i % 3 == 0 { 0.0 } else { 1.0 }, i < n1);
        }
        group.bench_with_input(BenchmarkId::new("p", n), &n, |b, _| {
            b.iter(|| black_box(&table).p())
        });
        group.bench_with_input(BenchmarkId::new("min_attainable_p", n), &n, |b, _| {
            b.iter(|| black_box(&table).min_attainable_p())
        });
        group.bench_with_input(BenchmarkId::new("min_optimistic_p", n), &n, |b, _| {
            b.iter(|| black_box(&table).min_optimistic_p())
        });
    }
    group.finish();
}

fn bench_achievable_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("tarone_achievable_values");
    for n in [50_usize, 200, 1000] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| min_attainable_p_values(black_box(n), n / 2, false))
        });
    }
    group.finish();
}

fn bench_window_scan(c: &mut Criterion) {
    let mut group = c.benchmark_group("min_window_distance");
    let metric = Minkowski::euclidean();
    for n in [1_000_usize, 10_000] {
        let series: Vec<f64> = (0..n).map(|i| (i as f64 * 0.1).sin()).collect();
        let query: Vec<f64> = series[40..72].to_vec();
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, _| {
            b.iter(|| metric.min_window_distance(black_box(&query), black_box(&series)))
        });
    }
    group.finish();
}

fn bench_mine(c: &mut Criterion) {
    let mut group = c.benchmark_group("mine");
    group.sample_size(10);
    for (n_series, len) in [(10_usize, 60_usize), (20, 120)] {
        let dataset = synthetic_dataset(n_series, len);
        let mut config = MinerConfig::new(8, 12, 4);
        config.alpha = 0.05;
        let metric = Minkowski::euclidean();
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{n_series}x{len}")),
            &n_series,
            |b, _| b.iter(|| mine(black_box(&dataset), &metric, &config).unwrap()),
        );
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_contingency_p_values,
    bench_achievable_values,
    bench_window_scan,
    bench_mine
);
criterion_main!(benches);
