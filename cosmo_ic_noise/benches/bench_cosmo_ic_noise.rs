use cosmo_ic_noise::cube::LevelRng;
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_fill_field(c: &mut Criterion) {
    c.bench_function("level_rng_fill_field_128", |b| {
        b.iter(|| {
            let mut level = LevelRng::new(128, 32, 1234, true).unwrap();
            level.fill_field()
        })
    });
}

criterion_group!(benches, bench_fill_field);
criterion_main!(benches);
