use cosmo_ic_grid::GridError;
use cosmo_ic_noise::NoiseError;
use cosmo_ic_transfer::TransferError;
use std::error::Error;
use std::fmt;

/// The unified error surface the umbrella crate exposes, folding every
/// subcrate's local error type into the eight kinds named in spec.md §7.
#[derive(Debug, Clone, PartialEq)]
pub enum IcError {
    InvalidCosmology(String),
    BadTable(String),
    SeedMissing(String),
    WhiteNoiseShapeMismatch { expected: (usize, usize, usize), found: (usize, usize, usize) },
    UnsupportedOrder(usize),
    UnigridRequired { levelmin: usize, levelmax: usize },
    NumericalFailure(String),
    Io(String),
}

impl fmt::Display for IcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IcError::InvalidCosmology(msg) => write!(f, "InvalidCosmology: {msg}"),
            IcError::BadTable(msg) => write!(f, "BadTable: {msg}"),
            IcError::SeedMissing(msg) => write!(f, "SeedMissing: {msg}"),
            IcError::WhiteNoiseShapeMismatch { expected, found } => write!(
                f,
                "WhiteNoiseShapeMismatch: expected {expected:?}, found {found:?}"
            ),
            IcError::UnsupportedOrder(order) => write!(f, "UnsupportedOrder: {order}"),
            IcError::UnigridRequired { levelmin, levelmax } => write!(
                f,
                "UnigridRequired: levelmin={levelmin} levelmax={levelmax}"
            ),
            IcError::NumericalFailure(msg) => write!(f, "NumericalFailure: {msg}"),
            IcError::Io(msg) => write!(f, "IOFailure: {msg}"),
        }
    }
}

impl Error for IcError {}

impl From<TransferError> for IcError {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::InvalidCosmology(msg) => IcError::InvalidCosmology(msg),
            TransferError::BadTable(msg) => IcError::BadTable(msg),
            TransferError::NumericalFailure(msg) => IcError::NumericalFailure(msg),
        }
    }
}

impl From<NoiseError> for IcError {
    fn from(err: NoiseError) -> Self {
        match err {
            NoiseError::SeedMissing(msg) => IcError::SeedMissing(msg),
            NoiseError::WhiteNoiseShapeMismatch { expected, found } => {
                IcError::WhiteNoiseShapeMismatch { expected, found }
            }
            NoiseError::SeedCollision(msg) => IcError::SeedMissing(format!("seed collision: {msg}")),
            NoiseError::IoFailure(msg) => IcError::Io(msg),
        }
    }
}

impl From<GridError> for IcError {
    fn from(err: GridError) -> Self {
        match err {
            GridError::UnsupportedOrder(order) => IcError::UnsupportedOrder(order),
            GridError::UnigridRequired { levelmin, levelmax } => {
                IcError::UnigridRequired { levelmin, levelmax }
            }
            // GridError::ShapeMismatch carries a free-form message rather
            // than the (expected, found) tuple WhiteNoiseShapeMismatch
            // does; fold it into NumericalFailure instead of inventing a
            // placeholder tuple.
            GridError::ShapeMismatch(msg) => {
                IcError::NumericalFailure(format!("grid shape mismatch: {msg}"))
            }
        }
    }
}

impl From<std::io::Error> for IcError {
    fn from(err: std::io::Error) -> Self {
        IcError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_transfer_error() {
        let err: IcError = TransferError::BadTable("bad.tab".into()).into();
        assert_eq!(err, IcError::BadTable("bad.tab".into()));
    }

    #[test]
    fn converts_grid_shape_mismatch_to_numerical_failure() {
        let err: IcError = GridError::ShapeMismatch("levelmax < levelmin".into()).into();
        assert!(matches!(err, IcError::NumericalFailure(_)));
    }
}
