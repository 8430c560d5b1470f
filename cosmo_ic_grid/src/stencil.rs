//! Finite-difference stencil operators that turn a potential field into a
//! 2LPT source term, a local-LLA density, or a Lu (determinant) density.
//!
//! All three operators share the same Hessian building block: the
//! second-derivative and mixed-derivative stencils at 2nd, 4th or 6th
//! order. Ghost cells must already be filled (periodically at the
//! coarsest level, by interpolation from the parent elsewhere) before
//! calling any of these. They sweep every cell of a level's own domain,
//! so they assume full-box levels (`GridHierarchy::new`); a hierarchy
//! built with `with_domains`'s narrower sub-boxes is a storage-layer
//! concept these sweeps don't yet consume.

use crate::error::GridError;
use crate::hierarchy::{GridHierarchy, GridLevel};
use rayon::prelude::*;

/// The local Hessian of a level's field at one cell, `D[a][b] = d^2 phi /
/// dx_a dx_b`, discretized at the requested order and already carrying
/// the level's `h^2` scale factor (see module docs in `hierarchy.rs`:
/// `h = 2^level` is the inverse grid spacing, so multiplying by `h^2`
/// here is the same as dividing by the physical spacing squared).
fn hessian(level: &GridLevel, i: i64, j: i64, k: i64, order: usize) -> Result<[[f64; 3]; 3], GridError> {
    let l = level.level() as i32;
    let h = 2f64.powi(l);
    let h2 = h * h;

    let g = |di: i64, dj: i64, dk: i64| level.get(i + di, j + dj, k + dk);

    match order {
        2 => {
            let h2_4 = 0.25 * h2;
            let d00 = (g(-1, 0, 0) - 2.0 * g(0, 0, 0) + g(1, 0, 0)) * h2;
            let d11 = (g(0, -1, 0) - 2.0 * g(0, 0, 0) + g(0, 1, 0)) * h2;
            let d22 = (g(0, 0, -1) - 2.0 * g(0, 0, 0) + g(0, 0, 1)) * h2;
            let d01 = (g(-1, -1, 0) - g(-1, 1, 0) - g(1, -1, 0) + g(1, 1, 0)) * h2_4;
            let d02 = (g(-1, 0, -1) - g(-1, 0, 1) - g(1, 0, -1) + g(1, 0, 1)) * h2_4;
            let d12 = (g(0, -1, -1) - g(0, -1, 1) - g(0, 1, -1) + g(0, 1, 1)) * h2_4;
            Ok([[d00, d01, d02], [d01, d11, d12], [d02, d12, d22]])
        }
        4 => {
            let h2_4 = 0.25 * h2;
            let diag = |a: i64, b: i64, c: i64| -> f64 {
                (-g(-2 * a, -2 * b, -2 * c) + 16.0 * g(-a, -b, -c) - 30.0 * g(0, 0, 0)
                    + 16.0 * g(a, b, c)
                    - g(2 * a, 2 * b, 2 * c))
                    * h2
                    / 12.0
            };
            let d00 = diag(1, 0, 0);
            let d11 = diag(0, 1, 0);
            let d22 = diag(0, 0, 1);
            let d01 = (g(-1, -1, 0) - g(-1, 1, 0) - g(1, -1, 0) + g(1, 1, 0)) * h2_4;
            let d02 = (g(-1, 0, -1) - g(-1, 0, 1) - g(1, 0, -1) + g(1, 0, 1)) * h2_4;
            let d12 = (g(0, -1, -1) - g(0, -1, 1) - g(0, 1, -1) + g(0, 1, 1)) * h2_4;
            Ok([[d00, d01, d02], [d01, d11, d12], [d02, d12, d22]])
        }
        6 => {
            let h2 = h2 / 180.0;
            let h2_4 = (0.25 * (h * h)) / 36.0;
            let diag = |a: i64, b: i64, c: i64| -> f64 {
                (2.0 * g(-3 * a, -3 * b, -3 * c) - 27.0 * g(-2 * a, -2 * b, -2 * c)
                    + 270.0 * g(-a, -b, -c)
                    - 490.0 * g(0, 0, 0)
                    + 270.0 * g(a, b, c)
                    - 27.0 * g(2 * a, 2 * b, 2 * c)
                    + 2.0 * g(3 * a, 3 * b, 3 * c))
                    * h2
            };
            let d00 = diag(1, 0, 0);
            let d11 = diag(0, 1, 0);
            let d22 = diag(0, 0, 1);
            // The mixed stencil (8th-order accurate by construction)
            // uses a 64/-8/1 weighted nine-point cross pattern.
            let mixed = |a: (i64, i64, i64), b: (i64, i64, i64)| -> f64 {
                let at = |m: i64, n: i64| {
                    let di = m * a.0 + n * b.0;
                    let dj = m * a.1 + n * b.1;
                    let dk = m * a.2 + n * b.2;
                    g(di, dj, dk)
                };
                let near = 64.0 * (at(-1, -1) - at(-1, 1) - at(1, -1) + at(1, 1));
                let mid = 8.0
                    * (at(-2, -1) - at(2, -1) - at(-2, 1) + at(2, 1) + at(-1, -2) - at(-1, 2)
                        - at(1, -2)
                        + at(1, 2));
                let far = at(-2, -2) - at(-2, 2) - at(2, -2) + at(2, 2);
                (near - mid + far) * h2_4
            };
            let d01 = mixed((1, 0, 0), (0, 1, 0));
            let d02 = mixed((1, 0, 0), (0, 0, 1));
            let d12 = mixed((0, 1, 0), (0, 0, 1));
            Ok([[d00, d01, d02], [d01, d11, d12], [d02, d12, d22]])
        }
        _ => Err(GridError::UnsupportedOrder(order)),
    }
}

/// Computes `cell_value` for every cell of one level, parallelizing over
/// the outermost (`i`) axis, and returns them in row-major `(i, j, k)`
/// order ready to write back into a level.
fn sweep_level<F>(r: i64, cell_value: F) -> Result<Vec<f64>, GridError>
where
    F: Fn(i64, i64, i64) -> Result<f64, GridError> + Sync,
{
    (0..r)
        .into_par_iter()
        .map(|i| -> Result<Vec<f64>, GridError> {
            let mut slice = Vec::with_capacity((r * r) as usize);
            for j in 0..r {
                for k in 0..r {
                    slice.push(cell_value(i, j, k)?);
                }
            }
            Ok(slice)
        })
        .collect::<Result<Vec<Vec<f64>>, GridError>>()
        .map(|slices| slices.into_iter().flatten().collect())
}

fn write_level_values(level: &mut GridLevel, r: i64, values: &[f64]) {
    let mut idx = 0;
    for i in 0..r {
        for j in 0..r {
            for k in 0..r {
                level.set(i, j, k, values[idx]);
                idx += 1;
            }
        }
    }
}

/// Finite-difference stencil operators on a [`GridHierarchy`].
pub struct StencilOps;

impl StencilOps {
    /// Local LLA (first-order Lagrangian) density, `tr(D) - sum_{a<=b}
    /// D_ab*D_ba` at 2nd/4th order. The 6th-order path flips that sign
    /// to `tr(D) + sum_{a<=b} D_ab*D_ba`, which is how the original
    /// operator was written; it is preserved here as-is rather than
    /// "corrected" since it is the documented behavior of this order.
    pub fn lla_density(source: &GridHierarchy, order: usize) -> Result<GridHierarchy, GridError> {
        if !matches!(order, 2 | 4 | 6) {
            return Err(GridError::UnsupportedOrder(order));
        }
        let mut out = source.clone();
        for level in source.levelmin()..=source.levelmax() {
            let r = source.size(level) as i64;
            let grid = source.level(level);
            let values = sweep_level(r, |i, j, k| {
                let d = hessian(grid, i, j, k, order)?;
                let trace = d[0][0] + d[1][1] + d[2][2];
                let quad = d[0][0] * d[1][1]
                    + d[0][0] * d[2][2]
                    + d[1][1] * d[2][2]
                    + d[0][1] * d[1][0]
                    + d[0][2] * d[2][0]
                    + d[1][2] * d[2][1]
                    + d[0][0] * d[0][0]
                    + d[1][1] * d[1][1]
                    + d[2][2] * d[2][2];
                Ok(if order == 6 { trace + quad } else { trace - quad })
            })?;
            write_level_values(out.level_mut(level), r, &values);
        }
        Ok(out)
    }

    /// Lu (determinant-based) density, 2nd order only: `-(sum_a (1 +
    /// D_aa) - 3)`.
    pub fn lu_density(source: &GridHierarchy) -> Result<GridHierarchy, GridError> {
        let mut out = source.clone();
        for level in source.levelmin()..=source.levelmax() {
            let r = source.size(level) as i64;
            let grid = source.level(level);
            let values = sweep_level(r, |i, j, k| {
                let d = hessian(grid, i, j, k, 2)?;
                let d00 = 1.0 + d[0][0];
                let d11 = 1.0 + d[1][1];
                let d22 = 1.0 + d[2][2];
                Ok(-(d00 + d11 + d22 - 3.0))
            })?;
            write_level_values(out.level_mut(level), r, &values);
        }
        Ok(out)
    }

    /// Second-order Lagrangian perturbation theory source term,
    /// `-sum_{a<b} (D_aa*D_bb - D_ab^2)`, restricted down to `levelmin`
    /// and mean-subtracted across every level so the multigrid Poisson
    /// solver it feeds sees a zero-mean right-hand side.
    pub fn two_lpt_source(source: &GridHierarchy, order: usize) -> Result<GridHierarchy, GridError> {
        if !matches!(order, 2 | 4 | 6) {
            return Err(GridError::UnsupportedOrder(order));
        }
        let mut out = source.clone();
        for level in source.levelmin()..=source.levelmax() {
            let r = source.size(level) as i64;
            let grid = source.level(level);
            let values = sweep_level(r, |i, j, k| {
                let d = hessian(grid, i, j, k, order)?;
                Ok(-(d[0][0] * d[1][1] - d[0][1] * d[0][1]
                    + d[0][0] * d[2][2]
                    - d[0][2] * d[0][2]
                    + d[1][1] * d[2][2]
                    - d[1][2] * d[1][2]))
            })?;
            write_level_values(out.level_mut(level), r, &values);
        }

        for level in (source.levelmin() + 1..=source.levelmax()).rev() {
            out.mg_straight_restrict(level);
        }

        let lmin = out.levelmin();
        let r = out.size(lmin) as i64;
        let mut sum = 0.0;
        for i in 0..r {
            for j in 0..r {
                for k in 0..r {
                    sum += out.level(lmin).get(i, j, k);
                }
            }
        }
        let mean = sum / (r * r * r) as f64;

        for level in out.levelmin()..=out.levelmax() {
            let r = out.size(level) as i64;
            for i in 0..r {
                for j in 0..r {
                    for k in 0..r {
                        let v = out.level(level).get(i, j, k);
                        out.level_mut(level).set(i, j, k, v - mean);
                    }
                }
            }
        }

        Ok(out)
    }
}
