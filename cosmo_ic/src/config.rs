//! Typed shape for the configuration keys spec.md §6 says the core reads.
//! Parsing the on-disk config file (TOML/INI/whatever the driver uses) is
//! out of scope; these structs are the surface an external driver
//! populates once it has parsed its own config format.

use cosmo_ic_noise::LevelSeed;

/// `setup/*` keys.
#[derive(Debug, Clone, PartialEq)]
pub struct SetupConfig {
    pub boxlength: f64,
    pub zstart: f64,
    pub levelmin: usize,
    pub levelmax: usize,
    pub baryons: bool,
    pub shift: [f64; 3],
    pub do_sph: bool,
}

impl SetupConfig {
    pub fn a_start(&self) -> f64 {
        1.0 / (1.0 + self.zstart)
    }
}

/// `cosmology/*` keys.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CosmologyConfig {
    pub omega_m: f64,
    pub omega_b: f64,
    pub omega_l: f64,
    pub h0: f64,
    pub sigma8: f64,
    pub nspec: f64,
    pub tcmb: f64,
    pub y_he: Option<f64>,
    pub gamma: Option<f64>,
    pub wdm_mass: Option<f64>,
    pub wdm_g_x: Option<f64>,
    pub omega_hdm: Option<f64>,
    pub degen_hdm: Option<f64>,
    pub a_start: f64,
}

/// `random/*` keys: per-level seeds (numeric or a white-noise filename)
/// plus the cube size every level shares.
#[derive(Debug, Clone, PartialEq)]
pub struct RandomConfig {
    pub seeds: Vec<LevelSeed>,
    pub cubesize: usize,
}

impl Default for RandomConfig {
    fn default() -> Self {
        RandomConfig {
            seeds: Vec::new(),
            cubesize: 32,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a_start_matches_redshift() {
        let setup = SetupConfig {
            boxlength: 100.0,
            zstart: 49.0,
            levelmin: 7,
            levelmax: 9,
            baryons: false,
            shift: [0.0, 0.0, 0.0],
            do_sph: false,
        };
        assert!((setup.a_start() - 0.02).abs() < 1e-12);
    }

    #[test]
    fn random_config_defaults_to_cubesize_32() {
        assert_eq!(RandomConfig::default().cubesize, 32);
    }
}
