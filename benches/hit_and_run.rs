use criterion::{black_box, criterion_group, criterion_main, Criterion};
use versionspace::{Config, Label, LabeledPoint, LinearVersionSpace};

/// Points labeled by the hidden classifier `x₀ + x₁ − x₂ > 0`.
fn labeled_points(n: usize, dim: usize) -> Vec<LabeledPoint> {
    (0..n)
        .map(|i| {
            let features: Vec<f64> = (0..dim)
                .map(|j| (((i * 31 + j * 17) % 23) as f64 / 11.5) - 1.0)
                .collect();
            let margin = features[0] + features[1] - features[2];
            LabeledPoint::from_slice(&features, Label::from_margin(margin))
        })
        .filter(|p| (p.features[0] + p.features[1] - p.features[2]).abs() > 1e-6)
        .collect()
}

fn bench_linear_version_space(c: &mut Criterion) {
    let mut group = c.benchmark_group("linear_version_space");
    group.sample_size(20);
    let labels = labeled_points(40, 5);

    group.bench_function("random_directions", |b| {
        b.iter(|| {
            let mut space = LinearVersionSpace::new(Config::quick()).unwrap();
            black_box(space.sample(&labels, 16).unwrap().num_hypotheses())
        });
    });

    group.bench_function("rounded_directions", |b| {
        b.iter(|| {
            let config = Config::quick().rounding(200);
            let mut space = LinearVersionSpace::new(config).unwrap();
            black_box(space.sample(&labels, 16).unwrap().num_hypotheses())
        });
    });

    group.bench_function("cached_iteration", |b| {
        let mut space = LinearVersionSpace::new(Config::quick().sample_cache(true)).unwrap();
        space.sample(&labels, 16).unwrap();
        b.iter(|| black_box(space.sample(&labels, 16).unwrap().num_hypotheses()));
    });

    group.finish();
}

criterion_group!(benches, bench_linear_version_space);
criterion_main!(benches);
