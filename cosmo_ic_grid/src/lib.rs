//! Nested grid hierarchy and finite-difference stencil operators.
//!
//! `GridHierarchy` owns one ghost-padded scalar field per refinement
//! level; `StencilOps` turns a potential field living on that hierarchy
//! into a 2LPT source term, an LLA density, or a Lu density, all by
//! finite differencing. `fft2lpt` offers the same 2LPT source for a
//! single-level hierarchy via an FFT-based Poisson-solve shortcut
//! instead. `streams` is the on-disk handoff format to an external
//! output plug-in.

pub mod error;
pub mod fft2lpt;
pub mod hierarchy;
pub mod point;
pub mod stencil;
pub mod storage;
pub mod streams;

pub use error::GridError;
pub use fft2lpt::two_lpt_source_fft;
pub use hierarchy::{GridHierarchy, GridLevel, MAX_GHOST};
pub use point::PointIndex;
pub use stencil::StencilOps;
pub use storage::{Storage, VecStorage};
pub use streams::{read_stream, stream_index, stream_path, write_stream, Coord, FieldId, StreamScalar};
