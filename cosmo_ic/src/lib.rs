//! The umbrella crate: `Cosmology` data model, the typed `Config` surface
//! an external driver hands in, the unified [`IcError`], and a [`prelude`]
//! re-exporting the rest of the workspace's public surface.
//!
//! `cosmo_ic_transfer`, `cosmo_ic_noise`, and `cosmo_ic_grid` are the
//! three core subsystems spec.md describes (transfer function + FFTLog
//! kernel, multi-scale white noise, nested-grid stencil operators); this
//! crate only adds the ambient bookkeeping that binds them into one
//! coherent library surface. It builds nothing a CLI driver, config
//! parser, Poisson solver, or output plug-in would own.

pub mod config;
pub mod cosmology;
pub mod error;
pub mod prelude;

pub use config::{CosmologyConfig, RandomConfig, SetupConfig};
pub use cosmology::{Cosmology, DarkMatterExtension};
pub use error::IcError;
