use std::error::Error;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum GridError {
    UnsupportedOrder(usize),
    UnigridRequired { levelmin: usize, levelmax: usize },
    ShapeMismatch(String),
}

impl fmt::Display for GridError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridError::UnsupportedOrder(order) => {
                write!(f, "unsupported stencil order {order}, expected 2, 4, or 6")
            }
            GridError::UnigridRequired { levelmin, levelmax } => write!(
                f,
                "the FFT-based 2LPT source requires a single-level hierarchy, got levelmin={levelmin} levelmax={levelmax}"
            ),
            GridError::ShapeMismatch(msg) => write!(f, "grid shape mismatch: {msg}"),
        }
    }
}

impl Error for GridError {}
