//! FFTLog: the log-spaced Hankel transform (order mu = 1/2) that turns a
//! transfer function T(k) into the interpolable real-space kernel
//! T_r(r) a density field convolution needs.

use crate::complex_gamma::gamma;
use crate::error::TransferError;
use crate::quadrature::qag;
use crate::spline::CubicSpline;
use crate::TransferFunction;
use num_complex::Complex64;
use rustfft::FftPlanner;
use std::f64::consts::PI;

const FFTLOG_N: usize = 1 << 14;
const Q_MIN: f64 = 1e-6;
const Q_MAX: f64 = 1e6;
// The inner, authoritative biasing exponent (see the open question on the
// duplicated q=0.8/q=0.2 assignment in the upstream generator).
const BIAS_Q: f64 = 0.2;
const MU: f64 = 0.5;

/// Inputs to the FFTLog kernel build beyond the transfer function itself.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FftLogConfig {
    pub n_s: f64,
    /// D+(a) * sqrt(P_norm), the amplitude folded into the input array.
    pub growth_sqrt_pnorm: f64,
    pub k_nyquist: f64,
}

/// The real-space kernel T_r(r), evaluated via two cubic-spline
/// interpolants over x = 2 log10(r) plus a direct-integration value at
/// r = 0.
#[derive(Debug, Clone, PartialEq)]
pub struct RealKernel {
    log_abs: CubicSpline,
    sign: CubicSpline,
    t_r0: f64,
    r_min: f64,
    r_max: f64,
}

impl RealKernel {
    pub fn build(
        tf: &impl TransferFunction,
        cfg: &FftLogConfig,
    ) -> Result<Self, TransferError> {
        let dlnk = (Q_MAX / Q_MIN).ln() / (FFTLOG_N as f64 - 1.0);
        let k0 = (Q_MIN * Q_MAX).sqrt();

        let mut input: Vec<Complex64> = Vec::with_capacity(FFTLOG_N);
        for i in 0..FFTLOG_N {
            let ki = k0 * ((i as f64 - FFTLOG_N as f64 / 2.0 + 1.0) * dlnk).exp();
            let tk = tf.t(ki)?;
            let val = cfg.growth_sqrt_pnorm * tk * ki.powf(cfg.n_s / 2.0) * ki.powf(1.5 - BIAS_Q);
            input.push(Complex64::new(val, 0.0));
        }

        // Step 3: Hamilton anti-ringing adjustment of k0*r0.
        let mut k0r0 = 1.0_f64;
        let l = FFTLOG_N as f64 * dlnk;
        let y = PI / (2.0 * dlnk);
        let gamma1_arg = gamma(Complex64::new((MU + 1.0 + BIAS_Q) / 2.0, y)).arg();
        let gamma2_arg = gamma(Complex64::new((MU + 1.0 - BIAS_Q) / 2.0, y)).arg();
        let arg = (2.0 / k0r0).ln() / dlnk + (gamma1_arg + gamma2_arg) / PI;
        k0r0 *= ((arg - arg.round()) * dlnk).exp();

        // Step 4: forward DFT.
        let mut planner = FftPlanner::new();
        planner.plan_fft_forward(FFTLOG_N).process(&mut input);

        // Step 5: multiply each frequency bin by U * phase.
        for (idx, value) in input.iter_mut().enumerate() {
            let m = if idx <= FFTLOG_N / 2 {
                idx as i64
            } else {
                idx as i64 - FFTLOG_N as i64
            };
            let xm = Complex64::new(BIAS_Q, 2.0 * PI * m as f64 / l);
            let num = gamma((Complex64::new(MU + 1.0, 0.0) + xm) / 2.0);
            let den = gamma((Complex64::new(MU + 1.0, 0.0) - xm) / 2.0);
            let u = if den.norm() < 1e-19 {
                Complex64::new(1.0, 0.0)
            } else {
                Complex64::new(2.0, 0.0).powc(xm) * num / den
            };
            let phase = Complex64::new(
                0.0,
                (2.0 * PI * m as f64 / l) * k0r0.ln(),
            )
            .exp()
                / FFTLOG_N as f64;
            *value *= u * phase;
            if !value.re.is_finite() || !value.im.is_finite() {
                return Err(TransferError::NumericalFailure(
                    "FFTLog frequency-domain product produced a non-finite value".into(),
                ));
            }
        }

        // Step 6: inverse DFT, reverse index order, apply the r^-(1.5+q) tail.
        let mut planner = FftPlanner::new();
        planner.plan_fft_inverse(FFTLOG_N).process(&mut input);
        input.reverse();

        let r0 = k0r0 / k0;
        let amplitude = 4.0 * PI * (PI / 2.0).sqrt();
        let mut r = Vec::with_capacity(FFTLOG_N);
        let mut t_r = Vec::with_capacity(FFTLOG_N);
        for (i, value) in input.iter().enumerate() {
            let ri = r0 * ((i as f64 - FFTLOG_N as f64 / 2.0 + 1.0) * dlnk).exp();
            let tr = amplitude * value.re * ri.powf(-(1.5 + BIAS_Q));
            if !tr.is_finite() {
                return Err(TransferError::NumericalFailure(
                    "FFTLog produced a non-finite T_r(r) sample".into(),
                ));
            }
            r.push(ri);
            t_r.push(tr);
        }

        // Step 7: direct integration for r = 0.
        let k_max_integral = (1.5f64).sqrt() * cfg.k_nyquist;
        let integrand = |k: f64| {
            if k <= 0.0 {
                return 0.0;
            }
            let tk = tf.t(k).unwrap_or(0.0);
            4.0 * PI * cfg.growth_sqrt_pnorm * tk * k.powf(cfg.n_s / 2.0) * k * k
        };
        let integral = qag(integrand, 0.0, k_max_integral, 1e-8, 20000)?;
        let t_r0 = integral.value;

        // Step 8: two cubic splines over x = 2 log10(r) = log10(r^2).
        let x: Vec<f64> = r.iter().map(|ri| 2.0 * ri.log10()).collect();
        let log_abs_vals: Vec<f64> = t_r.iter().map(|v| v.abs().max(1e-300).log10()).collect();
        let sign_vals: Vec<f64> = t_r.iter().map(|v| v.signum()).collect();

        Ok(RealKernel {
            log_abs: CubicSpline::new(x.clone(), log_abs_vals),
            sign: CubicSpline::new(x, sign_vals),
            t_r0,
            r_min: r[0],
            r_max: r[FFTLOG_N - 1],
        })
    }

    /// Evaluate T_r at r^2 (not r); matches the source convention where
    /// the convolution kernel is always consumed as a squared distance.
    pub fn eval(&self, r_squared: f64) -> f64 {
        if r_squared < 1e-16 {
            return self.t_r0;
        }
        let x = r_squared.log10();
        let mag = 10f64.powf(self.log_abs.eval(x));
        let sign = self.sign.eval(x).signum();
        mag * sign
    }

    pub fn t_r0(&self) -> f64 {
        self.t_r0
    }

    pub fn r_min(&self) -> f64 {
        self.r_min
    }

    pub fn r_max(&self) -> f64 {
        self.r_max
    }
}
