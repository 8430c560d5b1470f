//! End-to-end wiring tests across the three core subsystems, exercised
//! through the umbrella crate the way an external driver would use them:
//! build a cosmology and transfer function, derive the FFTLog kernel,
//! generate a multi-scale white noise hierarchy, and feed a potential
//! through the stencil operators.

use cosmo_ic::prelude::*;

#[test]
fn real_kernel_builds_from_a_full_cosmology() {
    let cosmo = Cosmology::new(0.3, 0.05, 0.7, 0.7, 0.8, 0.96, 1.0 / 50.0).unwrap();
    let tf = Bbks::new(cosmo.omega_m, cosmo.omega_b, cosmo.h0, true).unwrap();
    let kernel = cosmo.real_kernel(&tf, 1e3).unwrap();
    assert!(kernel.t_r0().is_finite());
    assert!(kernel.r_min() > 0.0 && kernel.r_max() > kernel.r_min());
}

#[test]
fn multi_scale_noise_feeds_a_grid_hierarchy() {
    let ms = MultiScaleWhiteNoise::generate(
        3,
        4,
        4,
        &[LevelSeed::Numeric(11), LevelSeed::Numeric(23)],
        true,
        1.0,
    )
    .unwrap();

    let mut hierarchy = GridHierarchy::new(3, 4).unwrap();
    for level in [3usize, 4usize] {
        let field = ms.field(level).unwrap();
        let (nx, ny, nz) = field.shape();
        assert_eq!(hierarchy.size(level), nx);
        for i in 0..nx as i64 {
            for j in 0..ny as i64 {
                for k in 0..nz as i64 {
                    hierarchy
                        .level_mut(level)
                        .set(i, j, k, field.get(i as usize, j as usize, k as usize));
                }
            }
        }
        hierarchy.level_mut(level).fill_ghosts_periodic();
    }

    // The 2LPT source runs fine on a populated two-level hierarchy and
    // ends up zero-mean at the coarsest level after restriction, as
    // spec.md's end-to-end invariant requires.
    let source = StencilOps::two_lpt_source(&hierarchy, 2).unwrap();
    let lmin = source.levelmin();
    let r = source.size(lmin) as i64;
    let mut sum = 0.0;
    for i in 0..r {
        for j in 0..r {
            for k in 0..r {
                sum += source.level(lmin).get(i, j, k);
            }
        }
    }
    let mean = sum / (r * r * r) as f64;
    assert!(mean.abs() < 1e-10, "mean={mean}");
}

#[test]
fn transfer_error_and_grid_error_both_reach_ic_error() {
    let bad_tf = Bbks::new(-1.0, 0.045, 0.7, false);
    assert!(matches!(
        bad_tf,
        Err(cosmo_ic_transfer::TransferError::InvalidCosmology(_))
    ));

    let bad_grid = GridHierarchy::new(5, 2);
    let err: IcError = bad_grid.unwrap_err().into();
    assert!(matches!(err, IcError::NumericalFailure(_)));
}
