//! Lanczos approximation to the complex log-gamma function, used only
//! by the FFTLog anti-ringing correction and frequency-domain kernel
//! (both need Gamma at arguments with positive real part around 0.5-1).

use num_complex::Complex64;
use std::f64::consts::PI;

const G: f64 = 7.0;
const COEFFS: [f64; 9] = [
    0.999_999_999_999_809_93,
    676.520_368_121_885_1,
    -1259.139_216_722_402_8,
    771.323_428_777_653_13,
    -176.615_029_162_140_59,
    12.507_343_278_686_905,
    -0.138_571_095_265_720_12,
    9.984_369_578_019_572e-6,
    1.505_632_735_149_311_6e-7,
];

/// ln Gamma(z) for Re(z) > 0.5, via the Lanczos approximation.
pub fn ln_gamma(z: Complex64) -> Complex64 {
    let z = z - Complex64::new(1.0, 0.0);
    let mut x = Complex64::new(COEFFS[0], 0.0);
    for (i, c) in COEFFS.iter().enumerate().skip(1) {
        x += c / (z + Complex64::new(i as f64, 0.0));
    }
    let t = z + Complex64::new(G + 0.5, 0.0);
    Complex64::new(0.5 * (2.0 * PI).ln(), 0.0) + (z + Complex64::new(0.5, 0.0)) * t.ln() - t
        + x.ln()
}

pub fn gamma(z: Complex64) -> Complex64 {
    ln_gamma(z).exp()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_real_factorials() {
        // Gamma(5) = 4! = 24
        let g = gamma(Complex64::new(5.0, 0.0));
        assert!((g.re - 24.0).abs() < 1e-6, "{g:?}");
        assert!(g.im.abs() < 1e-6);
    }

    #[test]
    fn matches_half_integer() {
        // Gamma(0.5) = sqrt(pi)
        let g = gamma(Complex64::new(0.5, 0.0));
        assert!((g.re - PI.sqrt()).abs() < 1e-6, "{g:?}");
    }
}
