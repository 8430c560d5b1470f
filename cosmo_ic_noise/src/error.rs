use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum NoiseError {
    SeedMissing(String),
    WhiteNoiseShapeMismatch { expected: (usize, usize, usize), found: (usize, usize, usize) },
    SeedCollision(String),
    IoFailure(String),
}

impl fmt::Display for NoiseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoiseError::SeedMissing(msg) => write!(f, "seed missing: {msg}"),
            NoiseError::WhiteNoiseShapeMismatch { expected, found } => write!(
                f,
                "white noise shape mismatch: expected {expected:?}, found {found:?}"
            ),
            NoiseError::SeedCollision(msg) => write!(f, "seed collision: {msg}"),
            NoiseError::IoFailure(msg) => write!(f, "I/O failure: {msg}"),
        }
    }
}

impl Error for NoiseError {}

impl From<std::io::Error> for NoiseError {
    fn from(err: std::io::Error) -> Self {
        NoiseError::IoFailure(err.to_string())
    }
}
