//! Deterministic, per-cube white noise and the multi-level composition
//! rules that keep it consistent across a refinement hierarchy.

pub mod composer;
pub mod cube;
pub mod error;
pub mod field;
pub mod seed;

pub use composer::{LevelSeed, MultiScaleWhiteNoise};
pub use cube::{LevelRng, RandomCube};
pub use error::NoiseError;
pub use field::{correct_avg, downsample_average, generate_level, up_project, WhiteNoiseField};
