//! Error types for the feature-extraction collaborators
//!
//! These are the failures a collaborator reports through `Result`. Once a
//! collaborator runs inside a [`Maybe`](crate::Maybe) chain, any `DspError` is
//! converted into an [`Empty`](crate::Empty) carrying its message.

use std::fmt;

/// Errors that can occur while loading or transforming audio
#[derive(Debug)]
pub enum DspError {
    /// Invalid input parameters
    InvalidInput(String),

    /// Audio decoding error
    DecodingError(String),

    /// Processing error during a transform
    ProcessingError(String),

    /// Numerical error (overflow, underflow, etc.)
    NumericalError(String),

    /// Filesystem error
    Io(std::io::Error),
}

impl fmt::Display for DspError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DspError::InvalidInput(msg) => write!(f, "Invalid input: {}", msg),
            DspError::DecodingError(msg) => write!(f, "Decoding error: {}", msg),
            DspError::ProcessingError(msg) => write!(f, "Processing error: {}", msg),
            DspError::NumericalError(msg) => write!(f, "Numerical error: {}", msg),
            DspError::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl std::error::Error for DspError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DspError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for DspError {
    fn from(err: std::io::Error) -> Self {
        DspError::Io(err)
    }
}

impl From<symphonia::core::errors::Error> for DspError {
    fn from(err: symphonia::core::errors::Error) -> Self {
        match err {
            symphonia::core::errors::Error::IoError(io) => DspError::Io(io),
            other => DspError::DecodingError(other.to_string()),
        }
    }
}

impl From<walkdir::Error> for DspError {
    fn from(err: walkdir::Error) -> Self {
        let message = err.to_string();
        match err.into_io_error() {
            Some(io) => DspError::Io(io),
            None => DspError::InvalidInput(message),
        }
    }
}
