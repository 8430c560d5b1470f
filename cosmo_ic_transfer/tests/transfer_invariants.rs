use cosmo_ic_transfer::kernel::FftLogConfig;
use cosmo_ic_transfer::{
    Bbks, CambColumn, CambTable, EisensteinHu, EisensteinHuNeutrino, EisensteinHuWdm, RealKernel,
    Tabulated, TransferFunction, TransferFunctionKind,
};

fn sample_ks() -> Vec<f64> {
    let mut ks = Vec::new();
    let mut k = 1e-3;
    while k < 50.0 {
        ks.push(k);
        k *= 1.6;
    }
    ks
}

#[test]
fn every_variant_is_positive_and_finite_across_its_range() {
    let variants = vec![
        TransferFunctionKind::Bbks(Bbks::new(0.3, 0.05, 0.7, true).unwrap()),
        TransferFunctionKind::EisensteinHu(
            EisensteinHu::new(0.3, 0.05, 0.7, 2.726, true).unwrap(),
        ),
        TransferFunctionKind::EisensteinHu(
            EisensteinHu::new(0.3, 0.05, 0.7, 2.726, false).unwrap(),
        ),
        TransferFunctionKind::EisensteinHuWdm(
            EisensteinHuWdm::new(0.3, 0.05, 0.7, 2.726, 2.0, 1.5).unwrap(),
        ),
        TransferFunctionKind::EisensteinHuNeutrino(
            EisensteinHuNeutrino::new(0.3, 0.05, 0.7, 0.01, 1.0, 0.7, 0.0).unwrap(),
        ),
        TransferFunctionKind::Tabulated(
            Tabulated::from_columns(vec![1e-4, 1e-2, 1.0, 1e2, 1e4], vec![1.0, 0.9, 0.4, 0.01, 1e-5])
                .unwrap(),
        ),
    ];

    for tf in &variants {
        for &k in &sample_ks() {
            if k < tf.k_min() || k > tf.k_max() {
                continue;
            }
            let t = tf.t(k).unwrap();
            assert!(t.is_finite(), "T({k}) not finite");
            assert!(t > 0.0, "T({k}) = {t} not positive");
        }
    }
}

#[test]
fn camb_table_round_trips_through_kind_dispatch() {
    let text = "\
0.001 1.0 0.9 0.1 0.1 0.0 1.0
0.01  0.9 0.8 0.1 0.1 0.0 0.9
0.1   0.5 0.4 0.1 0.1 0.0 0.48
1.0   0.05 0.04 0.01 0.01 0.0 0.048
";
    let table = CambTable::parse(text, CambColumn::Total).unwrap();
    let kind = TransferFunctionKind::Camb(table);
    let t = kind.t(0.05).unwrap();
    assert!(t.is_finite() && t > 0.0);
}

#[test]
fn fftlog_kernel_matches_direct_integral_at_origin_and_crosses_zero() {
    let tf = EisensteinHu::new(0.3, 0.05, 0.7, 2.726, true).unwrap();
    let cfg = FftLogConfig {
        n_s: 0.96,
        growth_sqrt_pnorm: 1.0,
        k_nyquist: 1e3,
    };
    let kernel = RealKernel::build(&tf, &cfg).unwrap();

    assert!((kernel.eval(1e-20) - kernel.t_r0()).abs() < 1e-6 * kernel.t_r0().abs());

    let mut last_sign = 0.0_f64;
    let mut sign_changes = 0;
    let mut r = 10.0_f64;
    while r <= 200.0 {
        let v = kernel.eval(r * r);
        let s = v.signum();
        if last_sign != 0.0 && s != last_sign {
            sign_changes += 1;
        }
        last_sign = s;
        r *= 1.05;
    }
    assert!(sign_changes >= 1, "kernel never crosses zero between 10 and 200 Mpc/h");
}
