//! Error type for cache operations.

use std::fmt;
use std::io;

/// Error type for cache operations.
///
/// There are exactly three failure kinds and no internal retries: every
/// error surfaces to the caller at the point it occurs.
#[derive(Debug)]
pub enum Error {
    /// A supplied value (or a loaded stream's header) does not match the
    /// cache's configured value width.
    LengthMismatch {
        /// The value width the cache was constructed with, in bytes.
        expected: usize,
        /// The width that was actually supplied.
        actual: usize,
    },
    /// The cache has no free slots left for the operation.
    CacheFull {
        /// The configured maximum number of values.
        capacity: usize,
    },
    /// The underlying byte sink or source failed during save/load.
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::LengthMismatch { expected, actual } => {
                write!(f, "value length must be {expected} bytes, got {actual}")
            }
            Error::CacheFull { capacity } => {
                write!(f, "no free slots left in cache (capacity {capacity})")
            }
            Error::Io(e) => write!(f, "I/O error: {e}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for Error {
    fn from(e: io::Error) -> Self {
        Error::Io(e)
    }
}

/// Result type for cache operations.
pub type Result<T> = std::result::Result<T, Error>;
