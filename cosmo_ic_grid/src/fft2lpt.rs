//! The FFT-based unigrid 2LPT source: computes the same
//! `-sum_{a<b}(D_aa*D_bb - D_ab^2)` combination as [`crate::stencil`],
//! but gets each second-derivative field `D_ab` directly in Fourier
//! space (`D_ab = -k_a*k_b*FFT(phi)`) rather than by finite differencing.
//! Only valid for a single-level (unigrid) hierarchy.

use crate::error::GridError;
use crate::hierarchy::GridHierarchy;
use num_complex::Complex64;
use rustfft::FftPlanner;
use std::f64::consts::PI;

fn fft_axis(data: &mut [Complex64], n: usize, axis: usize, inverse: bool) {
    let mut planner = FftPlanner::new();
    let fft = if inverse {
        planner.plan_fft_inverse(n)
    } else {
        planner.plan_fft_forward(n)
    };
    let mut buf = vec![Complex64::new(0.0, 0.0); n];
    match axis {
        0 => {
            for j in 0..n {
                for k in 0..n {
                    for i in 0..n {
                        buf[i] = data[(i * n + j) * n + k];
                    }
                    fft.process(&mut buf);
                    for i in 0..n {
                        data[(i * n + j) * n + k] = buf[i];
                    }
                }
            }
        }
        1 => {
            for i in 0..n {
                for k in 0..n {
                    for j in 0..n {
                        buf[j] = data[(i * n + j) * n + k];
                    }
                    fft.process(&mut buf);
                    for j in 0..n {
                        data[(i * n + j) * n + k] = buf[j];
                    }
                }
            }
        }
        _ => {
            for i in 0..n {
                for j in 0..n {
                    let base = (i * n + j) * n;
                    buf.copy_from_slice(&data[base..base + n]);
                    fft.process(&mut buf);
                    data[base..base + n].copy_from_slice(&buf);
                }
            }
        }
    }
}

fn fft3d(data: &mut [Complex64], n: usize, inverse: bool) {
    fft_axis(data, n, 0, inverse);
    fft_axis(data, n, 1, inverse);
    fft_axis(data, n, 2, inverse);
}

fn signed_freq(idx: usize, n: usize) -> f64 {
    let folded = if idx <= n / 2 { idx as i64 } else { idx as i64 - n as i64 };
    folded as f64
}

/// `D_ab` in Fourier space for one pair of axes: `-k_a*k_b*FFT(phi)*norm`,
/// with the DC mode zeroed afterward.
fn second_derivative_field(phi_fft: &[Complex64], n: usize, ka: usize, kb: usize) -> Vec<Complex64> {
    let kfac = 2.0 * PI;
    let norm = 1.0 / (n * n * n) as f64;
    let axis_freq = |idx: usize| signed_freq(idx, n) * kfac;

    let mut out = vec![Complex64::new(0.0, 0.0); n * n * n];
    for i in 0..n {
        for j in 0..n {
            for k in 0..n {
                let idx = (i * n + j) * n + k;
                let kvec = [axis_freq(i), axis_freq(j), axis_freq(k)];
                out[idx] = phi_fft[idx] * (-kvec[ka] * kvec[kb] * norm);
            }
        }
    }
    out[0] = Complex64::new(0.0, 0.0);
    fft3d(&mut out, n, true);
    out
}

/// Computes the 2LPT source for a unigrid hierarchy via the Fourier
/// route rather than finite differences.
pub fn two_lpt_source_fft(hierarchy: &GridHierarchy) -> Result<GridHierarchy, GridError> {
    if !hierarchy.is_unigrid() {
        return Err(GridError::UnigridRequired {
            levelmin: hierarchy.levelmin(),
            levelmax: hierarchy.levelmax(),
        });
    }
    let level = hierarchy.levelmax();
    let n = hierarchy.size(level);

    let mut phi = vec![Complex64::new(0.0, 0.0); n * n * n];
    for i in 0..n as i64 {
        for j in 0..n as i64 {
            for k in 0..n as i64 {
                let idx = (i as usize * n + j as usize) * n + k as usize;
                phi[idx] = Complex64::new(hierarchy.level(level).get(i, j, k), 0.0);
            }
        }
    }
    fft3d(&mut phi, n, false);

    let d11 = second_derivative_field(&phi, n, 0, 0);
    let d12 = second_derivative_field(&phi, n, 0, 1);
    let d13 = second_derivative_field(&phi, n, 0, 2);
    let d22 = second_derivative_field(&phi, n, 1, 1);
    let d23 = second_derivative_field(&phi, n, 1, 2);
    let d33 = second_derivative_field(&phi, n, 2, 2);

    let mut out = hierarchy.clone();
    for i in 0..n as i64 {
        for j in 0..n as i64 {
            for k in 0..n as i64 {
                let idx = (i as usize * n + j as usize) * n + k as usize;
                let value = -((d11[idx].re * d22[idx].re - d12[idx].re * d12[idx].re)
                    + (d11[idx].re * d33[idx].re - d13[idx].re * d13[idx].re)
                    + (d22[idx].re * d33[idx].re - d23[idx].re * d23[idx].re));
                out.level_mut(level).set(i, j, k, value);
            }
        }
    }
    Ok(out)
}
