use cosmo_ic_transfer::kernel::FftLogConfig;
use cosmo_ic_transfer::{EisensteinHu, RealKernel};
use criterion::{criterion_group, criterion_main, Criterion};

fn bench_fftlog_build(c: &mut Criterion) {
    let tf = EisensteinHu::new(0.3, 0.05, 0.7, 2.726, true).unwrap();
    let cfg = FftLogConfig {
        n_s: 0.96,
        growth_sqrt_pnorm: 1.0,
        k_nyquist: 1e3,
    };
    c.bench_function("fftlog_kernel_build", |b| {
        b.iter(|| RealKernel::build(&tf, &cfg).unwrap())
    });
}

fn bench_eisenstein_hu_eval(c: &mut Criterion) {
    let tf = EisensteinHu::new(0.3, 0.05, 0.7, 2.726, true).unwrap();
    c.bench_function("eisenstein_hu_eval", |b| {
        b.iter(|| tf.t(0.2).unwrap())
    });
}

criterion_group!(benches, bench_fftlog_build, bench_eisenstein_hu_eval);
criterion_main!(benches);
