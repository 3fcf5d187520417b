use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use gearcut::envelope::GapEnvelope;
use gearcut::rack::RackProfile;
use gearcut::roll::{SerialSweepOps, SweepOps};
use gearcut::{GearSpec, generate_with};

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    for teeth in [8usize, 20, 60] {
        let spec = GearSpec::new(2.0, teeth);
        group.bench_with_input(BenchmarkId::from_parameter(teeth), &spec, |b, spec| {
            b.iter(|| generate_with(black_box(spec), &SerialSweepOps::new()))
        });
    }
    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let geometry = GearSpec::new(2.0, 20).resolve().expect("valid spec");
    let rack = RackProfile::generate(&geometry);

    c.bench_function("sweep z=20", |b| {
        b.iter(|| SerialSweepOps::new().sweep(black_box(&geometry), &rack))
    });
    c.bench_function("envelope z=20", |b| {
        b.iter_batched(
            || SerialSweepOps::new().sweep(&geometry, &rack),
            |family| GapEnvelope::extract(&geometry, family),
            criterion::BatchSize::LargeInput,
        )
    });

    #[cfg(feature = "parallel")]
    c.bench_function("parallel sweep z=20", |b| {
        let ops = gearcut::roll::ParallelSweepOps::new();
        b.iter(|| ops.sweep(black_box(&geometry), &rack))
    });
}

criterion_group!(benches, bench_generate, bench_stages);
criterion_main!(benches);
