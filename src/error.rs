//! Error type for the fallible edges of the core (ROM splitting, image export).
//!
//! Emulation itself never fails; see `cpu::dispatch` for the one
//! unreachable path.

use std::fmt;

#[derive(Debug)]
pub enum CoreError {
    /// Missing `NES\x1A` magic or otherwise malformed header.
    InvalidHeader(String),
    /// Fewer bytes than the header promised.
    Truncated { expected: usize, actual: usize },
    Io(std::io::Error),
    Image(String),
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::InvalidHeader(msg) => write!(f, "invalid iNES header: {msg}"),
            CoreError::Truncated { expected, actual } => write!(
                f,
                "ROM image truncated: expected {expected} bytes, found {actual}"
            ),
            CoreError::Io(e) => write!(f, "I/O error: {e}"),
            CoreError::Image(msg) => write!(f, "image export failed: {msg}"),
        }
    }
}

impl std::error::Error for CoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CoreError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Io(e)
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
