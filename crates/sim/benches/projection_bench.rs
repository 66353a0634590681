use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use pva_sim::analysis::{ExtinctionCriterion, quasi_extinction_probability, risk_curve};
use pva_sim::simulation::{SimulationBuilder, SimulationConfig};
use pva_sim::storage::Recorder;
use tempfile::NamedTempFile;

fn stochastic_config(replicates: usize, years: usize) -> SimulationConfig {
    SimulationBuilder::new()
        .replicates(replicates)
        .years(years)
        .initial_population(500.0)
        .environmental_stochasticity(true)
        .demographic_stochasticity(true)
        .parametric_uncertainty(true)
        .seed(42)
        .build_config()
        .unwrap()
}

fn bench_projection_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("projection_run");
    let years = 50;

    for replicates in [100, 1000] {
        group.throughput(Throughput::Elements((replicates * years) as u64));
        group.bench_with_input(
            BenchmarkId::new("parallel", replicates),
            &replicates,
            |b, &reps| {
                let projection = SimulationBuilder::from_config(stochastic_config(reps, years))
                    .build()
                    .unwrap();
                b.iter(|| black_box(projection.run().unwrap()))
            },
        );
        group.bench_with_input(
            BenchmarkId::new("sequential", replicates),
            &replicates,
            |b, &reps| {
                let projection = SimulationBuilder::from_config(stochastic_config(reps, years))
                    .build()
                    .unwrap();
                b.iter(|| black_box(projection.run_sequential().unwrap()))
            },
        );
    }

    group.finish();
}

fn bench_extinction(c: &mut Criterion) {
    let mut group = c.benchmark_group("quasi_extinction");
    let result = pva_sim::run_projection(&stochastic_config(1000, 50)).unwrap();
    let thresholds: Vec<f64> = (0..=100).map(|t| t as f64 * 10.0).collect();

    group.bench_function("single_threshold", |b| {
        b.iter(|| black_box(quasi_extinction_probability(&result, black_box(100.0)).unwrap()))
    });

    group.bench_function("risk_curve", |b| {
        b.iter(|| {
            black_box(risk_curve(&result, &thresholds, ExtinctionCriterion::RunningMinimum).unwrap())
        })
    });

    group.finish();
}

fn bench_recorder_write(c: &mut Criterion) {
    let mut group = c.benchmark_group("recorder_write");
    let config = stochastic_config(100, 50);
    let result = pva_sim::run_projection(&config).unwrap();

    group.throughput(Throughput::Elements((100 * 50) as u64));

    group.bench_function("record_result", |b| {
        b.iter_batched(
            || {
                let file = NamedTempFile::new().unwrap();
                let path = file.path().to_owned();
                // Keep file alive
                let recorder = Recorder::new(&path, &config).unwrap();
                (file, recorder)
            },
            |(_file, mut recorder)| {
                recorder.record_result(black_box(&result)).unwrap();
            },
            criterion::BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_projection_run,
    bench_extinction,
    bench_recorder_write
);
criterion_main!(benches);
