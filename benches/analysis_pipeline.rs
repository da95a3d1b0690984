/// Analysis Pipeline Benchmarks
///
/// Measures the full pipeline and its heaviest steps (density curve, probability
/// plot) on passenger datasets of increasing size.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use passenger_eda::analysis::{
    run_analysis, AnalysisConfig, Bandwidth, GaussianKde, ProbabilityPlot,
};
use passenger_eda::dataset::Dataset;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt::Write as _;

/// Seeded random ages in 1..80
fn ages(n: usize) -> Vec<f32> {
    let mut rng = StdRng::seed_from_u64(42);
    (0..n).map(|_| rng.gen_range(1.0..80.0)).collect()
}

fn dataset(n: usize) -> Dataset {
    let classes = ["First", "Second", "Third"];
    let mut rng = StdRng::seed_from_u64(7);
    let mut csv = String::from("survived,age,fare,class\n");
    for (i, age) in ages(n).into_iter().enumerate() {
        // Every fifth passenger has no recorded age
        let age = if i % 5 == 4 { String::new() } else { age.to_string() };
        let fare: f32 = rng.gen_range(5.0..520.0);
        let _ = writeln!(
            csv,
            "{},{},{:.2},{}",
            rng.gen_range(0u8..2),
            age,
            fare,
            classes[i % 3]
        );
    }
    Dataset::from_csv_reader("bench", csv.as_bytes()).unwrap()
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("run_analysis");
    let config = AnalysisConfig::default();

    for size in [891usize, 10_000, 100_000] {
        let ds = dataset(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &ds, |b, ds| {
            b.iter(|| run_analysis(black_box(ds), black_box(&config)).unwrap());
        });
    }

    group.finish();
}

fn bench_density_curve(c: &mut Criterion) {
    let mut group = c.benchmark_group("kde_curve");

    for size in [714usize, 10_000] {
        let values = ages(size);
        let kde = GaussianKde::fit(&values, Bandwidth::Scott).unwrap();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &kde, |b, kde| {
            b.iter(|| kde.curve(black_box(100), 3.0).unwrap());
        });
    }

    group.finish();
}

fn bench_probability_plot(c: &mut Criterion) {
    let values = ages(10_000);
    c.bench_function("probability_plot_10k", |b| {
        b.iter(|| ProbabilityPlot::against_normal(black_box(&values)).unwrap());
    });
}

criterion_group!(
    benches,
    bench_pipeline,
    bench_density_curve,
    bench_probability_plot
);
criterion_main!(benches);
