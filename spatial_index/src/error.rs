//! Error type shared by every vector, dataset and index operation

use std::fmt;

#[derive(Debug)]
pub enum Error {
    /// binary vector operation on vectors of different length
    DimensionMismatch { left: usize, right: usize },
    IndexOutOfRange { index: usize, dimension: usize },
    /// search before any data was added
    EmptyIndex,
    /// a split strategy was handed no indices; the build never does this
    EmptySplitSet,
    ZeroNorm,
    InvalidParameter(String),
    MalformedRecord { line: usize, reason: String },
    Io(std::io::Error),
    Config(serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {

    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::DimensionMismatch { left, right } => {
                write!(f, "dimension mismatch: {} vs {}", left, right)
            },
            Error::IndexOutOfRange { index, dimension } => {
                write!(f, "component {} out of range for dimension {}", index, dimension)
            },
            Error::EmptyIndex => write!(f, "index is empty"),
            Error::EmptySplitSet => write!(f, "split rule requested for an empty index set"),
            Error::ZeroNorm => write!(f, "cannot normalize a vector with zero norm"),
            Error::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
            Error::MalformedRecord { line, reason } => {
                write!(f, "malformed record on line {}: {}", line, reason)
            },
            Error::Io(e) => write!(f, "io error: {}", e),
            Error::Config(e) => write!(f, "config error: {}", e),
        }
    }
}

impl std::error::Error for Error {

    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl std::convert::From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Error {
        Error::Io(e)
    }
}

impl std::convert::From<serde_yaml::Error> for Error {
    fn from(e: serde_yaml::Error) -> Error {
        Error::Config(e)
    }
}
