//! Multi-level white noise: per-level fields kept consistent across
//! refinement (coarse = block-average of fine) via a Fourier-space
//! correction, plus the on-disk cache format for each level.

use crate::cube::LevelRng;
use crate::error::NoiseError;
use num_complex::Complex64;
use rustfft::FftPlanner;
use std::io::{Read, Write};
use std::path::Path;

/// A single level's noise field: `nx * ny * nz` values, row-major in
/// (i, j, k).
#[derive(Debug, Clone, PartialEq)]
pub struct WhiteNoiseField {
    nx: usize,
    ny: usize,
    nz: usize,
    data: Vec<f64>,
}

impl WhiteNoiseField {
    pub fn zeros(nx: usize, ny: usize, nz: usize) -> Self {
        WhiteNoiseField {
            nx,
            ny,
            nz,
            data: vec![0.0; nx * ny * nz],
        }
    }

    pub fn from_vec(nx: usize, ny: usize, nz: usize, data: Vec<f64>) -> Result<Self, NoiseError> {
        if data.len() != nx * ny * nz {
            return Err(NoiseError::WhiteNoiseShapeMismatch {
                expected: (nx, ny, nz),
                found: (data.len(), 1, 1),
            });
        }
        Ok(WhiteNoiseField { nx, ny, nz, data })
    }

    pub fn shape(&self) -> (usize, usize, usize) {
        (self.nx, self.ny, self.nz)
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize, k: usize) -> f64 {
        self.data[(i * self.ny + j) * self.nz + k]
    }

    #[inline]
    pub fn set(&mut self, i: usize, j: usize, k: usize, v: f64) {
        self.data[(i * self.ny + j) * self.nz + k] = v;
    }

    pub fn mean(&self) -> f64 {
        self.data.iter().sum::<f64>() / self.data.len() as f64
    }

    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Writes the on-disk white noise cache format: `int32 nx, ny, nz`
    /// followed by `nx*ny*nz` 32-bit floats in row-major order.
    pub fn write_cache(&self, path: impl AsRef<Path>) -> Result<(), NoiseError> {
        let mut file = std::fs::File::create(path)?;
        file.write_all(&(self.nx as i32).to_le_bytes())?;
        file.write_all(&(self.ny as i32).to_le_bytes())?;
        file.write_all(&(self.nz as i32).to_le_bytes())?;
        for &v in &self.data {
            file.write_all(&(v as f32).to_le_bytes())?;
        }
        Ok(())
    }

    /// Reads back a cache file, failing with `WhiteNoiseShapeMismatch` if
    /// its header does not match the expected shape.
    pub fn read_cache(
        path: impl AsRef<Path>,
        expected: (usize, usize, usize),
    ) -> Result<Self, NoiseError> {
        let mut file = std::fs::File::open(path)?;
        let mut header = [0u8; 12];
        file.read_exact(&mut header)?;
        let nx = i32::from_le_bytes(header[0..4].try_into().unwrap()) as usize;
        let ny = i32::from_le_bytes(header[4..8].try_into().unwrap()) as usize;
        let nz = i32::from_le_bytes(header[8..12].try_into().unwrap()) as usize;
        if (nx, ny, nz) != expected {
            return Err(NoiseError::WhiteNoiseShapeMismatch {
                expected,
                found: (nx, ny, nz),
            });
        }
        let mut data = vec![0.0f64; nx * ny * nz];
        let mut buf = vec![0u8; nx * ny * nz * 4];
        file.read_exact(&mut buf)?;
        for (i, chunk) in buf.chunks_exact(4).enumerate() {
            data[i] = f32::from_le_bytes(chunk.try_into().unwrap()) as f64;
        }
        Ok(WhiteNoiseField { nx, ny, nz, data })
    }
}

/// Generates a full-resolution field for one level from its own
/// deterministic cube-based RNG stream.
pub fn generate_level(
    resolution: usize,
    cube_size: usize,
    baseseed: i64,
    zeromean: bool,
) -> Result<WhiteNoiseField, NoiseError> {
    let mut level = LevelRng::new(resolution, cube_size, baseseed, zeromean)?;
    let data = level.fill_field();
    WhiteNoiseField::from_vec(resolution, resolution, resolution, data)
}

/// Block-averages a fine field by a factor of two per axis: the coarse
/// value at cell C is the mean of the eight fine cells covering it.
pub fn downsample_average(fine: &WhiteNoiseField) -> Result<WhiteNoiseField, NoiseError> {
    let (nxf, nyf, nzf) = fine.shape();
    if nxf % 2 != 0 || nyf % 2 != 0 || nzf % 2 != 0 {
        return Err(NoiseError::WhiteNoiseShapeMismatch {
            expected: (nxf / 2 * 2, nyf / 2 * 2, nzf / 2 * 2),
            found: (nxf, nyf, nzf),
        });
    }
    let (nxc, nyc, nzc) = (nxf / 2, nyf / 2, nzf / 2);
    let mut coarse = WhiteNoiseField::zeros(nxc, nyc, nzc);
    for ic in 0..nxc {
        for jc in 0..nyc {
            for kc in 0..nzc {
                let mut sum = 0.0;
                for di in 0..2 {
                    for dj in 0..2 {
                        for dk in 0..2 {
                            sum += fine.get(2 * ic + di, 2 * jc + dj, 2 * kc + dk);
                        }
                    }
                }
                coarse.set(ic, jc, kc, sum / 8.0);
            }
        }
    }
    Ok(coarse)
}

fn to_complex(field: &WhiteNoiseField) -> Vec<Complex64> {
    field.data.iter().map(|&v| Complex64::new(v, 0.0)).collect()
}

fn fft_axis(data: &mut [Complex64], nx: usize, ny: usize, nz: usize, axis: usize, inverse: bool) {
    let mut planner = FftPlanner::new();
    let len = match axis {
        0 => nx,
        1 => ny,
        _ => nz,
    };
    let fft = if inverse {
        planner.plan_fft_inverse(len)
    } else {
        planner.plan_fft_forward(len)
    };
    let mut buf = vec![Complex64::new(0.0, 0.0); len];
    match axis {
        0 => {
            for j in 0..ny {
                for k in 0..nz {
                    for i in 0..nx {
                        buf[i] = data[(i * ny + j) * nz + k];
                    }
                    fft.process(&mut buf);
                    for i in 0..nx {
                        data[(i * ny + j) * nz + k] = buf[i];
                    }
                }
            }
        }
        1 => {
            for i in 0..nx {
                for k in 0..nz {
                    for j in 0..ny {
                        buf[j] = data[(i * ny + j) * nz + k];
                    }
                    fft.process(&mut buf);
                    for j in 0..ny {
                        data[(i * ny + j) * nz + k] = buf[j];
                    }
                }
            }
        }
        _ => {
            for i in 0..nx {
                for j in 0..ny {
                    let base = (i * ny + j) * nz;
                    buf.copy_from_slice(&data[base..base + nz]);
                    fft.process(&mut buf);
                    data[base..base + nz].copy_from_slice(&buf);
                }
            }
        }
    }
}

fn fft3d(data: &mut [Complex64], nx: usize, ny: usize, nz: usize, inverse: bool) {
    fft_axis(data, nx, ny, nz, 0, inverse);
    fft_axis(data, nx, ny, nz, 1, inverse);
    fft_axis(data, nx, ny, nz, 2, inverse);
}

fn signed_freq(idx: usize, n: usize) -> i64 {
    if idx <= n / 2 {
        idx as i64
    } else {
        idx as i64 - n as i64
    }
}

/// Corrects the coarse level's Fourier-space small-scale bias: modes
/// below the cutoff are replaced by the matching low-k corner of the
/// fine field's spectrum (its own block-average), modes at or beyond
/// the cutoff are zeroed. Both fields must be cubic with the fine side
/// exactly double the coarse side, per the factor-of-two refinement
/// assumed elsewhere in this crate.
pub fn correct_avg(
    coarse: &WhiteNoiseField,
    fine: &WhiteNoiseField,
    k_cut: f64,
) -> Result<WhiteNoiseField, NoiseError> {
    let (nxc, nyc, nzc) = coarse.shape();
    let (nxf, nyf, nzf) = fine.shape();
    if nxc != nyc || nyc != nzc {
        return Err(NoiseError::WhiteNoiseShapeMismatch {
            expected: (nxc, nxc, nxc),
            found: (nxc, nyc, nzc),
        });
    }
    if nxf != 2 * nxc || nyf != 2 * nyc || nzf != 2 * nzc {
        return Err(NoiseError::WhiteNoiseShapeMismatch {
            expected: (2 * nxc, 2 * nyc, 2 * nzc),
            found: (nxf, nyf, nzf),
        });
    }

    let mut coarse_fft = to_complex(coarse);
    fft3d(&mut coarse_fft, nxc, nyc, nzc, false);

    let mut fine_fft = to_complex(fine);
    fft3d(&mut fine_fft, nxf, nyf, nzf, false);

    let cutoff = ((nxc as f64 / 2.0) * k_cut).round() as i64;
    let n_fine_total = (nxf * nyf * nzf) as f64;
    let n_coarse_total = (nxc * nyc * nzc) as f64;
    // rustfft is unnormalized, so matching the fine spectrum onto the
    // coarse grid's normalization is just the ratio of transform sizes;
    // the factor-of-eight block average is already implicit in that
    // ratio since the fine side is double the coarse side per axis.
    let scale = n_coarse_total / n_fine_total;

    for i in 0..nxc {
        for j in 0..nyc {
            for k in 0..nzc {
                let idx = (i * nyc + j) * nzc + k;
                let (fi, fj, fk) = (signed_freq(i, nxc), signed_freq(j, nyc), signed_freq(k, nzc));
                let kmax = fi.abs().max(fj.abs()).max(fk.abs());
                if kmax >= cutoff {
                    coarse_fft[idx] = Complex64::new(0.0, 0.0);
                    continue;
                }
                let fine_i = if fi >= 0 { fi as usize } else { (nxf as i64 + fi) as usize };
                let fine_j = if fj >= 0 { fj as usize } else { (nyf as i64 + fj) as usize };
                let fine_k = if fk >= 0 { fk as usize } else { (nzf as i64 + fk) as usize };
                let fine_idx = (fine_i * nyf + fine_j) * nzf + fine_k;
                coarse_fft[idx] = fine_fft[fine_idx] * scale;
            }
        }
    }

    fft3d(&mut coarse_fft, nxc, nyc, nzc, true);
    let norm = n_coarse_total;
    let data: Vec<f64> = coarse_fft.iter().map(|c| c.re / norm).collect();
    WhiteNoiseField::from_vec(nxc, nyc, nzc, data)
}

/// Up-projects a seeded coarse level into an unseeded finer level one
/// octave up: the coarse field's spectrum is placed in the low-k corner
/// of a double-resolution field and everything at or beyond `k_cut` is
/// left at zero, the mirror image of [`correct_avg`]'s fine-to-coarse
/// replacement. This is how a level with no seed of its own inherits
/// consistency from the nearest seeded coarser level instead of needing
/// an explicit seed.
pub fn up_project(coarse: &WhiteNoiseField, k_cut: f64) -> Result<WhiteNoiseField, NoiseError> {
    let (nxc, nyc, nzc) = coarse.shape();
    if nxc != nyc || nyc != nzc {
        return Err(NoiseError::WhiteNoiseShapeMismatch {
            expected: (nxc, nxc, nxc),
            found: (nxc, nyc, nzc),
        });
    }
    let (nxf, nyf, nzf) = (2 * nxc, 2 * nyc, 2 * nzc);

    let mut coarse_fft = to_complex(coarse);
    fft3d(&mut coarse_fft, nxc, nyc, nzc, false);

    let mut fine_fft = vec![Complex64::new(0.0, 0.0); nxf * nyf * nzf];
    let n_fine_total = (nxf * nyf * nzf) as f64;
    let n_coarse_total = (nxc * nyc * nzc) as f64;
    let scale = n_fine_total / n_coarse_total;
    let cutoff = ((nxc as f64 / 2.0) * k_cut).round() as i64;

    for i in 0..nxc {
        for j in 0..nyc {
            for k in 0..nzc {
                let idx = (i * nyc + j) * nzc + k;
                let (fi, fj, fk) = (signed_freq(i, nxc), signed_freq(j, nyc), signed_freq(k, nzc));
                let kmax = fi.abs().max(fj.abs()).max(fk.abs());
                if kmax >= cutoff {
                    continue;
                }
                let fine_i = if fi >= 0 { fi as usize } else { (nxf as i64 + fi) as usize };
                let fine_j = if fj >= 0 { fj as usize } else { (nyf as i64 + fj) as usize };
                let fine_k = if fk >= 0 { fk as usize } else { (nzf as i64 + fk) as usize };
                let fine_idx = (fine_i * nyf + fine_j) * nzf + fine_k;
                fine_fft[fine_idx] = coarse_fft[idx] * scale;
            }
        }
    }

    fft3d(&mut fine_fft, nxf, nyf, nzf, true);
    let norm = n_fine_total;
    let data: Vec<f64> = fine_fft.iter().map(|c| c.re / norm).collect();
    WhiteNoiseField::from_vec(nxf, nyf, nzf, data)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn downsample_average_matches_block_mean() {
        let fine = WhiteNoiseField::from_vec(
            2,
            2,
            2,
            vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0],
        )
        .unwrap();
        let coarse = downsample_average(&fine).unwrap();
        assert_eq!(coarse.shape(), (1, 1, 1));
        assert!((coarse.get(0, 0, 0) - 4.5).abs() < 1e-12);
    }

    #[test]
    fn cache_round_trips() {
        let field = generate_level(16, 8, 7, true).unwrap();
        let path = std::env::temp_dir().join("cosmo_ic_noise_test_cache.bin");
        field.write_cache(&path).unwrap();
        let loaded = WhiteNoiseField::read_cache(&path, field.shape()).unwrap();
        assert_eq!(field, loaded);
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn cache_read_rejects_shape_mismatch() {
        let field = generate_level(8, 4, 3, false).unwrap();
        let path = std::env::temp_dir().join("cosmo_ic_noise_test_cache_mismatch.bin");
        field.write_cache(&path).unwrap();
        let err = WhiteNoiseField::read_cache(&path, (4, 4, 4)).unwrap_err();
        assert!(matches!(err, NoiseError::WhiteNoiseShapeMismatch { .. }));
        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn correct_avg_preserves_coarse_mean() {
        let fine = generate_level(16, 4, 99, true).unwrap();
        let coarse = downsample_average(&fine).unwrap();
        let corrected = correct_avg(&coarse, &fine, 1.0).unwrap();
        // The DC mode (the field mean) is untouched by the cutoff/replace
        // step's frequency bookkeeping beyond the block-average relation.
        assert!((corrected.mean() - coarse.mean()).abs() < 1e-6);
    }

    #[test]
    fn up_project_doubles_resolution_and_preserves_mean() {
        let coarse = generate_level(8, 4, 5, true).unwrap();
        let fine = up_project(&coarse, 1.0).unwrap();
        assert_eq!(fine.shape(), (16, 16, 16));
        assert!((fine.mean() - coarse.mean()).abs() < 1e-6);
    }

    #[test]
    fn up_project_rejects_non_cubic_input() {
        let field = WhiteNoiseField::zeros(4, 2, 4);
        let err = up_project(&field, 1.0).unwrap_err();
        assert!(matches!(err, NoiseError::WhiteNoiseShapeMismatch { .. }));
    }
}
