use crate::error::TransferError;
use crate::TransferFunction;

/// Bardeen, Bond, Kaiser & Szalay (1986) transfer function, with the
/// optional Sugiyama (1995) baryon-suppression correction to the shape
/// parameter Gamma.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bbks {
    gamma: f64,
}

impl Bbks {
    pub fn new(omega_m: f64, omega_b: f64, h: f64, sugiyama: bool) -> Result<Self, TransferError> {
        if omega_m <= 0.0 || h <= 0.0 {
            return Err(TransferError::InvalidCosmology(
                "BBKS requires Omega_m > 0 and h > 0".into(),
            ));
        }
        let f_baryon = omega_b / omega_m;
        if f_baryon < 0.0 {
            return Err(TransferError::InvalidCosmology(
                "BBKS requires f_baryon = Omega_b / Omega_m >= 0".into(),
            ));
        }
        let mut gamma = omega_m * h;
        if sugiyama {
            gamma *= (-omega_b * (1.0 + (2.0 * h).sqrt() / omega_m)).exp();
        }
        Ok(Bbks { gamma })
    }

    pub fn t(&self, k: f64) -> Result<f64, TransferError> {
        if k <= 0.0 {
            return Err(TransferError::InvalidCosmology(
                "BBKS transfer function is only defined for k > 0".into(),
            ));
        }
        let q = k / self.gamma;
        let poly = 1.0 + 3.89 * q + 259.21 * q * q + 162.771336 * q.powi(3)
            + 2027.16958081 * q.powi(4);
        let t = (1.0 + 2.34 * q).ln() / (2.34 * q) * poly.powf(-0.25);
        Ok(t)
    }

    pub fn k_min(&self) -> f64 {
        1e-6
    }

    pub fn k_max(&self) -> f64 {
        1e6
    }
}

impl TransferFunction for Bbks {
    fn t(&self, k: f64) -> Result<f64, TransferError> {
        Bbks::t(self, k)
    }

    fn k_min(&self) -> f64 {
        Bbks::k_min(self)
    }

    fn k_max(&self) -> f64 {
        Bbks::k_max(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_values() {
        let tf = Bbks::new(0.276, 0.045, 0.703, true).unwrap();
        let t1 = tf.t(0.1).unwrap();
        let t2 = tf.t(1.0).unwrap();
        assert!((t1 - 0.4377).abs() < 0.001, "T(0.1)={t1}");
        assert!((t2 - 0.0461).abs() < 0.001, "T(1.0)={t2}");
    }

    #[test]
    fn rejects_non_positive_omega_m() {
        assert!(Bbks::new(0.0, 0.045, 0.7, false).is_err());
    }

    #[test]
    fn positive_and_finite_across_range() {
        let tf = Bbks::new(0.3, 0.05, 0.7, false).unwrap();
        let mut k = 1e-3;
        while k < 10.0 {
            let t = tf.t(k).unwrap();
            assert!(t.is_finite() && t > 0.0, "T({k})={t}");
            k *= 1.7;
        }
    }
}
