use cosmo_ic_grid::{two_lpt_source_fft, GridError, GridHierarchy, StencilOps};

fn quadratic_hierarchy(level: usize) -> GridHierarchy {
    let mut hierarchy = GridHierarchy::new(level, level).unwrap();
    let r = 1i64 << level;
    let n = r as f64;
    let grid = hierarchy.level_mut(level);
    for i in 0..r {
        for j in 0..r {
            for k in 0..r {
                let x = i as f64 / n;
                let y = j as f64 / n;
                let z = k as f64 / n;
                grid.set(i, j, k, 0.5 * (x * x + y * y + z * z));
            }
        }
    }
    grid.fill_ghosts_periodic();
    hierarchy
}

/// Scenario from spec sec.8: phi = (x^2+y^2+z^2)/2 on a periodic 32^3
/// grid (physical spacing h=1/32) gives diagonal Hessian entries of 1,
/// off-diagonal entries of 0, and a 2nd-order 2LPT source of -3
/// everywhere.
#[test]
fn quadratic_potential_source_is_exactly_minus_three() {
    let hierarchy = quadratic_hierarchy(5);
    let source = StencilOps::two_lpt_source(&hierarchy, 2).unwrap();
    let level = source.levelmin();
    let r = source.size(level) as i64;
    for i in 0..r {
        for j in 0..r {
            for k in 0..r {
                let v = source.level(level).get(i, j, k);
                assert!((v - (-3.0)).abs() < 1e-10, "got {v} at ({i},{j},{k})");
            }
        }
    }
}

#[test]
fn two_lpt_source_has_zero_mean_after_restriction() {
    let mut hierarchy = GridHierarchy::new(3, 4).unwrap();
    let r_fine = 1i64 << 4;
    {
        let fine = hierarchy.level_mut(4);
        for i in 0..r_fine {
            for j in 0..r_fine {
                for k in 0..r_fine {
                    let v = ((i * 7 + j * 13 + k * 19) % 11) as f64 - 5.0;
                    fine.set(i, j, k, v);
                }
            }
        }
        fine.fill_ghosts_periodic();
    }
    {
        let coarse = hierarchy.level_mut(3);
        let r_coarse = 1i64 << 3;
        for i in 0..r_coarse {
            for j in 0..r_coarse {
                for k in 0..r_coarse {
                    coarse.set(i, j, k, ((i + j + k) % 5) as f64);
                }
            }
        }
        coarse.fill_ghosts_periodic();
    }

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
fn fft_2lpt_source_rejects_multi_level_hierarchy() {
    let hierarchy = GridHierarchy::new(3, 4).unwrap();
    let err = two_lpt_source_fft(&hierarchy).unwrap_err();
    assert_eq!(err, GridError::UnigridRequired { levelmin: 3, levelmax: 4 });
}

#[test]
fn unsupported_stencil_order_is_rejected_for_every_operator() {
    let hierarchy = quadratic_hierarchy(4);
    assert!(matches!(
        StencilOps::lla_density(&hierarchy, 3),
        Err(GridError::UnsupportedOrder(3))
    ));
    assert!(matches!(
        StencilOps::two_lpt_source(&hierarchy, 5),
        Err(GridError::UnsupportedOrder(5))
    ));
}

#[test]
fn lla_density_order6_sign_is_additive_not_subtractive() {
    // Documented open-question behavior: the 6th-order LLA density adds
    // the quadratic term instead of subtracting it, unlike orders 2 and
    // 4. This asserts that surprising behavior is preserved rather than
    // "fixed" to match the lower orders.
    let hierarchy = quadratic_hierarchy(4);
    let order2 = StencilOps::lla_density(&hierarchy, 2).unwrap();
    let order6 = StencilOps::lla_density(&hierarchy, 6).unwrap();
    let level = order2.levelmin();
    let v2 = order2.level(level).get(8, 8, 8);
    let v6 = order6.level(level).get(8, 8, 8);
    // Hessian is the identity at every order here: trace=3, quad=6.
    // order 2/4 subtract (3-6=-3); order 6 adds instead (3+6=9).
    assert!((v2 - (-3.0)).abs() < 1e-9, "order2 got {v2}");
    assert!((v6 - 9.0).abs() < 1e-6, "order6 got {v6}");
}
