// Umbrella re-export of the workspace's public surface, the way
// `dcl_data_structures::prelude` gathers its sibling modules' types for a
// single `use cosmo_ic::prelude::*;` import.

pub use crate::config::{CosmologyConfig, RandomConfig, SetupConfig};
pub use crate::cosmology::{Cosmology, DarkMatterExtension};
pub use crate::error::IcError;

pub use cosmo_ic_transfer::{
    Bbks, CambColumn, CambTable, EisensteinHu, EisensteinHuNeutrino, EisensteinHuWdm,
    FftLogConfig, RealKernel, Tabulated, TransferError, TransferFunction, TransferFunctionKind,
};

pub use cosmo_ic_noise::{
    correct_avg, downsample_average, generate_level, up_project, LevelRng, LevelSeed,
    MultiScaleWhiteNoise, NoiseError, RandomCube, WhiteNoiseField,
};

pub use cosmo_ic_grid::{
    read_stream, stream_index, stream_path, two_lpt_source_fft, write_stream, Coord, FieldId,
    GridError, GridHierarchy, GridLevel, PointIndex, StencilOps, Storage, StreamScalar,
    VecStorage, MAX_GHOST,
};
