use std::error::Error;
use std::fmt;

/// Errors raised while constructing or evaluating a transfer function
/// or the FFTLog real-space kernel built from one.
#[derive(Debug, Clone, PartialEq)]
pub enum TransferError {
    InvalidCosmology(String),
    BadTable(String),
    NumericalFailure(String),
}

impl fmt::Display for TransferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferError::InvalidCosmology(msg) => write!(f, "InvalidCosmology: {msg}"),
            TransferError::BadTable(msg) => write!(f, "BadTable: {msg}"),
            TransferError::NumericalFailure(msg) => write!(f, "NumericalFailure: {msg}"),
        }
    }
}

impl Error for TransferError {}
