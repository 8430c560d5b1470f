use crate::error::TransferError;
use crate::TransferFunction;

/// Shared derived quantities from Eisenstein & Hu (1998), sec. 3-4.
/// Computed once at construction time from (Omega_m h^2, Omega_b/Omega_m, Tcmb).
#[derive(Debug, Clone, Copy)]
struct EhParams {
    omhh: f64,
    theta_cmb: f64,
    z_equality: f64,
    k_equality: f64,
    z_drag: f64,
    r_drag: f64,
    r_equality: f64,
    sound_horizon: f64,
    k_silk: f64,
    alpha_c: f64,
    beta_c: f64,
    alpha_b: f64,
    beta_b: f64,
    beta_node: f64,
    sound_horizon_fit: f64,
    alpha_gamma: f64,
}

impl EhParams {
    fn new(omhh: f64, f_baryon: f64, tcmb: f64) -> Result<Self, TransferError> {
        if f_baryon <= 0.0 || omhh <= 0.0 {
            return Err(TransferError::InvalidCosmology(
                "Eisenstein-Hu requires f_baryon > 0 and Omega_m h^2 > 0".into(),
            ));
        }
        let tcmb = if tcmb <= 0.0 { 2.728 } else { tcmb };
        let obhh = omhh * f_baryon;
        let theta_cmb = tcmb / 2.7;

        let z_equality = 2.50e4 * omhh / theta_cmb.powi(4);
        let k_equality = 0.0746 * omhh / theta_cmb.powi(2);

        let z_drag_b1 = 0.313 * omhh.powf(-0.419) * (1.0 + 0.607 * omhh.powf(0.674));
        let z_drag_b2 = 0.238 * omhh.powf(0.223);
        let z_drag = 1291.0 * omhh.powf(0.251) / (1.0 + 0.659 * omhh.powf(0.828))
            * (1.0 + z_drag_b1 * obhh.powf(z_drag_b2));

        let r_drag = 31.5 * obhh / theta_cmb.powi(4) * (1000.0 / (1.0 + z_drag));
        let r_equality = 31.5 * obhh / theta_cmb.powi(4) * (1000.0 / z_equality);

        let sound_horizon = 2.0 / 3.0 / k_equality * (6.0 / r_equality).sqrt()
            * (((1.0 + r_drag).sqrt() + (r_drag + r_equality).sqrt()) / (1.0 + r_equality.sqrt()))
                .ln();

        let k_silk =
            1.6 * obhh.powf(0.52) * omhh.powf(0.73) * (1.0 + (10.4 * omhh).powf(-0.95));

        let alpha_c_a1 = (46.9 * omhh).powf(0.670) * (1.0 + (32.1 * omhh).powf(-0.532));
        let alpha_c_a2 = (12.0 * omhh).powf(0.424) * (1.0 + (45.0 * omhh).powf(-0.582));
        let alpha_c = alpha_c_a1.powf(-f_baryon) * alpha_c_a2.powf(-f_baryon.powi(3));

        let beta_c_b1 = 0.944 / (1.0 + (458.0 * omhh).powf(-0.708));
        let beta_c_b2 = (0.395 * omhh).powf(-0.0266);
        let beta_c = 1.0 / (1.0 + beta_c_b1 * ((1.0 - f_baryon).powf(beta_c_b2) - 1.0));

        let y = z_equality / (1.0 + z_drag);
        let alpha_b_g =
            y * (-6.0 * (1.0 + y).sqrt() + (2.0 + 3.0 * y) * (((1.0 + y).sqrt() + 1.0)
                / ((1.0 + y).sqrt() - 1.0))
                .ln());
        let alpha_b = 2.07 * k_equality * sound_horizon * (1.0 + r_drag).powf(-0.75) * alpha_b_g;

        let beta_node = 8.41 * omhh.powf(0.435);
        let beta_b = 0.5 + f_baryon + (3.0 - 2.0 * f_baryon) * ((17.2 * omhh).powi(2) + 1.0).sqrt();

        let sound_horizon_fit = 44.5 * (9.83 / omhh).ln() / (1.0 + 10.0 * obhh.powf(0.75)).sqrt();

        let alpha_gamma = 1.0 - 0.328 * (431.0 * omhh).ln() * f_baryon
            + 0.38 * (22.3 * omhh).ln() * f_baryon.powi(2);

        Ok(EhParams {
            omhh,
            theta_cmb,
            z_equality,
            k_equality,
            z_drag,
            r_drag,
            r_equality,
            sound_horizon,
            k_silk,
            alpha_c,
            beta_c,
            alpha_b,
            beta_b,
            beta_node,
            sound_horizon_fit,
            alpha_gamma,
        })
    }

    /// Returns (T_baryon, T_cdm) for k in Mpc^-1, per EH98 eqs. 14-24.
    fn tf_baryon_cdm(&self, k: f64) -> (f64, f64) {
        let k = k.abs();
        if k == 0.0 {
            return (1.0, 1.0);
        }
        let q = k / 13.41 / self.k_equality;
        let xx = k * self.sound_horizon;

        let t_c_ln_beta = (2.718282 + 1.8 * self.beta_c * q).ln();
        let t_c_ln_nobeta = (2.718282 + 1.8 * q).ln();
        let t_c_c_alpha = 14.2 / self.alpha_c + 386.0 / (1.0 + 69.9 * q.powf(1.08));
        let t_c_c_noalpha = 14.2 + 386.0 / (1.0 + 69.9 * q.powf(1.08));

        let t_c_f = 1.0 / (1.0 + (xx / 5.4).powi(4));
        let t_c = t_c_f * t_c_ln_beta / (t_c_ln_beta + t_c_c_noalpha * q * q)
            + (1.0 - t_c_f) * t_c_ln_beta / (t_c_ln_beta + t_c_c_alpha * q * q);

        let s_tilde = self.sound_horizon * (1.0 + (self.beta_node / xx).powi(3)).powf(-1.0 / 3.0);
        let xx_tilde = k * s_tilde;

        let t_b_t0 = t_c_ln_nobeta / (t_c_ln_nobeta + t_c_c_noalpha * q * q);
        let t_b = xx_tilde.sin() / xx_tilde
            * (t_b_t0 / (1.0 + (xx / 5.2).powi(2))
                + self.alpha_b / (1.0 + (self.beta_b / xx).powi(3))
                    * (-(k / self.k_silk).powf(1.4)).exp());

        (t_b, t_c)
    }
}

/// Eisenstein & Hu (1998) fit with baryon acoustic wiggles, or the
/// smoothed no-wiggle shape-function variant (eqs. 29-31 of the same
/// paper) selected at construction time.
#[derive(Debug, Clone, Copy)]
pub struct EisensteinHu {
    params: EhParams,
    f_b: f64,
    f_c: f64,
    wiggles: bool,
}

impl EisensteinHu {
    pub fn new(
        omega_m: f64,
        omega_b: f64,
        h: f64,
        tcmb: f64,
        wiggles: bool,
    ) -> Result<Self, TransferError> {
        if omega_m <= 0.0 || h <= 0.0 {
            return Err(TransferError::InvalidCosmology(
                "Eisenstein-Hu requires Omega_m > 0 and h > 0".into(),
            ));
        }
        let f_b = omega_b / omega_m;
        let omhh = omega_m * h * h;
        let params = EhParams::new(omhh, f_b, tcmb)?;
        Ok(EisensteinHu {
            params,
            f_b,
            f_c: 1.0 - f_b,
            wiggles,
        })
    }

    pub fn t(&self, k_hmpc: f64) -> Result<f64, TransferError> {
        if k_hmpc <= 0.0 {
            return Err(TransferError::InvalidCosmology(
                "Eisenstein-Hu transfer function is only defined for k > 0".into(),
            ));
        }
        // Dividing by h is folded into the caller-visible k (in h/Mpc); the
        // fit constants above were all derived with k in Mpc^-1.
        let k_mpc = k_hmpc;
        if self.wiggles {
            let (tb, tc) = self.params.tf_baryon_cdm(k_mpc);
            Ok(self.f_b * tb + self.f_c * tc)
        } else {
            Ok(self.no_wiggle(k_mpc))
        }
    }

    pub fn t_baryon(&self, k_hmpc: f64) -> Result<f64, TransferError> {
        Ok(self.params.tf_baryon_cdm(k_hmpc).0)
    }

    pub fn t_cdm(&self, k_hmpc: f64) -> Result<f64, TransferError> {
        Ok(self.params.tf_baryon_cdm(k_hmpc).1)
    }

    fn no_wiggle(&self, k: f64) -> f64 {
        let p = &self.params;
        let gamma_eff = p.omhh
            * (p.alpha_gamma
                + (1.0 - p.alpha_gamma) / (1.0 + (0.43 * k * p.sound_horizon_fit).powi(4)));
        let q = k * p.theta_cmb.powi(2) / gamma_eff;
        let l0 = (2.0 * std::f64::consts::E + 1.8 * q).ln();
        let c0 = 14.2 + 731.0 / (1.0 + 62.5 * q);
        l0 / (l0 + c0 * q * q)
    }

    pub fn k_min(&self) -> f64 {
        1e-6
    }

    pub fn k_max(&self) -> f64 {
        1e6
    }
}

impl TransferFunction for EisensteinHu {
    fn t(&self, k: f64) -> Result<f64, TransferError> {
        EisensteinHu::t(self, k)
    }

    fn k_min(&self) -> f64 {
        EisensteinHu::k_min(self)
    }

    fn k_max(&self) -> f64 {
        EisensteinHu::k_max(self)
    }
}

/// Eisenstein-Hu with warm dark matter free-streaming suppression.
#[derive(Debug, Clone, Copy)]
pub struct EisensteinHuWdm {
    base: EisensteinHu,
    alpha_wdm: f64,
}

impl EisensteinHuWdm {
    pub fn new(
        omega_m: f64,
        omega_b: f64,
        h: f64,
        tcmb: f64,
        wdm_mass: f64,
        wdm_g_x: f64,
    ) -> Result<Self, TransferError> {
        if wdm_mass <= 0.0 || wdm_g_x <= 0.0 {
            return Err(TransferError::InvalidCosmology(
                "EH-WDM requires positive WDM mass and degeneracy".into(),
            ));
        }
        let base = EisensteinHu::new(omega_m, omega_b, h, tcmb, true)?;
        let alpha_wdm = 0.05
            * (omega_m / 0.4).powf(0.15)
            * (h / 0.65).powf(1.3)
            * wdm_mass.powf(-1.15)
            * (1.5 / wdm_g_x).powf(0.29);
        Ok(EisensteinHuWdm { base, alpha_wdm })
    }

    pub fn t(&self, k: f64) -> Result<f64, TransferError> {
        let tf = self.base.t(k)?;
        let suppression = (1.0 + (self.alpha_wdm * k).powi(2)).powf(-5.0);
        Ok(tf * suppression)
    }

    pub fn k_min(&self) -> f64 {
        self.base.k_min()
    }

    pub fn k_max(&self) -> f64 {
        self.base.k_max()
    }
}

impl TransferFunction for EisensteinHuWdm {
    fn t(&self, k: f64) -> Result<f64, TransferError> {
        EisensteinHuWdm::t(self, k)
    }

    fn k_min(&self) -> f64 {
        EisensteinHuWdm::k_min(self)
    }

    fn k_max(&self) -> f64 {
        EisensteinHuWdm::k_max(self)
    }
}

/// Eisenstein & Hu (1999) mixed dark matter fit: returns T_cb, the
/// density-weighted CDM+baryon transfer function in the presence of a
/// massive-neutrino hot dark matter component.
#[derive(Debug, Clone, Copy)]
pub struct EisensteinHuNeutrino {
    omhh: f64,
    f_hdm: f64,
    num_degen_hdm: f64,
    p_cb: f64,
    growth_k0: f64,
    alpha_gamma: f64,
    beta_c: f64,
    sound_horizon_fit: f64,
}

impl EisensteinHuNeutrino {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        omega_m: f64,
        omega_b: f64,
        omega_lambda: f64,
        omega_hdm: f64,
        degen_hdm: f64,
        h: f64,
        redshift: f64,
    ) -> Result<Self, TransferError> {
        if omega_m <= 0.0 || h <= 0.0 {
            return Err(TransferError::InvalidCosmology(
                "EH-Neutrino requires Omega_m > 0 and h > 0".into(),
            ));
        }
        let omega_baryon = omega_b.max(1e-5);
        let omega_hdm = omega_hdm.max(1e-5);
        let degen_hdm = degen_hdm.max(1.0);

        let omhh = omega_m * h * h;
        let obhh = omega_baryon * h * h;
        let f_baryon = omega_baryon / omega_m;
        let f_hdm = omega_hdm / omega_m;
        let f_cdm = 1.0 - f_baryon - f_hdm;
        let f_cb = f_cdm + f_baryon;
        let f_bnu = f_baryon + f_hdm;

        // theta_cmb fixed at COBE value 2.728K, matching the original fit.
        let theta_cmb = 2.728 / 2.7;
        let z_equality = 25000.0 * omhh / theta_cmb.powi(4);

        let z_drag_b1 = 0.313 * omhh.powf(-0.419) * (1.0 + 0.607 * omhh.powf(0.674));
        let z_drag_b2 = 0.238 * omhh.powf(0.223);
        let z_drag = 1291.0 * omhh.powf(0.251) / (1.0 + 0.659 * omhh.powf(0.828))
            * (1.0 + z_drag_b1 * obhh.powf(z_drag_b2));
        let y_drag = z_equality / (1.0 + z_drag);

        let sound_horizon_fit = 44.5 * (9.83 / omhh).ln() / (1.0 + 10.0 * obhh.powf(0.75)).sqrt();

        let p_c = 0.25 * (5.0 - (1.0 + 24.0 * f_cdm).sqrt());
        let p_cb = 0.25 * (5.0 - (1.0 + 24.0 * f_cb).sqrt());

        let omega_curv = 1.0 - omega_m - omega_lambda;
        let omega_denom =
            omega_lambda + (1.0 + redshift).powi(2) * (omega_curv + omega_m * (1.0 + redshift));
        let omega_lambda_z = omega_lambda / omega_denom;
        let omega_matter_z = omega_m * (1.0 + redshift).powi(2) / omega_denom;
        let growth_k0 = z_equality / (1.0 + redshift) * 2.5 * omega_matter_z
            / (omega_matter_z.powf(4.0 / 7.0) - omega_lambda_z
                + (1.0 + omega_matter_z / 2.0) * (1.0 + omega_lambda_z / 70.0));

        let alpha_nu = f_cdm / f_cb * (5.0 - 2.0 * (p_c + p_cb)) / (5.0 - 4.0 * p_cb)
            * (1.0 + y_drag).powf(p_cb - p_c)
            * (1.0 + f_bnu * (-0.553 + 0.126 * f_bnu * f_bnu))
            / (1.0 - 0.193 * (f_hdm * degen_hdm).sqrt() + 0.169 * f_hdm * degen_hdm.powf(0.2))
            * (1.0 + (p_c - p_cb) / 2.0 * (1.0 + 1.0 / (3.0 - 4.0 * p_c) / (7.0 - 4.0 * p_cb))
                / (1.0 + y_drag));
        let alpha_gamma = alpha_nu.sqrt();
        let beta_c = 1.0 / (1.0 - 0.949 * f_bnu);

        Ok(EisensteinHuNeutrino {
            omhh,
            f_hdm,
            num_degen_hdm: degen_hdm,
            p_cb,
            growth_k0,
            alpha_gamma,
            beta_c,
            sound_horizon_fit,
        })
    }

    /// T_cb(k) for k in h/Mpc.
    pub fn t(&self, k_hmpc: f64) -> Result<f64, TransferError> {
        if k_hmpc <= 0.0 {
            return Err(TransferError::InvalidCosmology(
                "EH-Neutrino transfer function is only defined for k > 0".into(),
            ));
        }
        let kk = k_hmpc;
        let qq = kk / self.omhh * (2.728f64 / 2.7).powi(2);

        let y_freestream = 17.2 * self.f_hdm * (1.0 + 0.488 * self.f_hdm.powf(-7.0 / 6.0))
            * (self.num_degen_hdm * qq / self.f_hdm).powi(2);
        let temp1 = self.growth_k0.powf(1.0 - self.p_cb);
        let temp2 = (self.growth_k0 / (1.0 + y_freestream)).powf(0.7);
        let growth_cb = (1.0 + temp2).powf(self.p_cb / 0.7) * temp1;

        let gamma_eff = self.omhh
            * (self.alpha_gamma
                + (1.0 - self.alpha_gamma) / (1.0 + (kk * self.sound_horizon_fit * 0.43).powi(4)));
        let qq_eff = qq * self.omhh / gamma_eff;

        let tf_sup_l = (2.71828 + 1.84 * self.beta_c * self.alpha_gamma * qq_eff).ln();
        let tf_sup_c = 14.4 + 325.0 / (1.0 + 60.5 * qq_eff.powf(1.11));
        let tf_sup = tf_sup_l / (tf_sup_l + tf_sup_c * qq_eff * qq_eff);

        let qq_nu = 3.92 * qq * (self.num_degen_hdm / self.f_hdm).sqrt();
        let max_fs_correction = 1.0
            + 1.2 * self.f_hdm.powf(0.64) * self.num_degen_hdm.powf(0.3 + 0.6 * self.f_hdm)
                / (qq_nu.powf(-1.6) + qq_nu.powf(0.8));
        let tf_master = tf_sup * max_fs_correction;

        let tf_cb = tf_master * growth_cb / self.growth_k0;
        Ok(tf_cb)
    }

    pub fn k_min(&self) -> f64 {
        1e-6
    }

    pub fn k_max(&self) -> f64 {
        1e6
    }
}

impl TransferFunction for EisensteinHuNeutrino {
    fn t(&self, k: f64) -> Result<f64, TransferError> {
        EisensteinHuNeutrino::t(self, k)
    }

    fn k_min(&self) -> f64 {
        EisensteinHuNeutrino::k_min(self)
    }

    fn k_max(&self) -> f64 {
        EisensteinHuNeutrino::k_max(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_reference_values() {
        let tf = EisensteinHu::new(0.3, 0.05, 0.7, 2.726, true).unwrap();
        let t1 = tf.t(0.01).unwrap();
        let t2 = tf.t(0.1).unwrap();
        assert!((t1 - 0.9926).abs() < 0.001, "T(0.01)={t1}");
        assert!((t2 - 0.462).abs() < 0.002, "T(0.1)={t2}");
    }

    #[test]
    fn rejects_non_positive_inputs() {
        assert!(EisensteinHu::new(-0.1, 0.05, 0.7, 2.726, true).is_err());
    }

    #[test]
    fn wdm_suppresses_small_scales() {
        let eh = EisensteinHuWdm::new(0.3, 0.05, 0.7, 2.726, 2.0, 1.5).unwrap();
        let unsuppressed = EisensteinHu::new(0.3, 0.05, 0.7, 2.726, true).unwrap();
        assert!(eh.t(5.0).unwrap() < unsuppressed.t(5.0).unwrap());
    }
}
