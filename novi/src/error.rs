//! Error types

use embedded_io::ErrorKind;
use thiserror::Error;

/// Terminal IO errors. These end the session loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum NoviError {
    #[error("terminal read failed: {0:?}")]
    ReadError(ErrorKind),
    #[error("terminal write failed: {0:?}")]
    WriteError(ErrorKind),
}

impl embedded_io::Error for NoviError {
    fn kind(&self) -> ErrorKind {
        match *self {
            NoviError::ReadError(e) => e.kind(),
            NoviError::WriteError(e) => e.kind(),
        }
    }
}

/// Errors reported by a [`crate::io::FileStore`].
///
/// These never end the session, they are shown on the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FileError {
    #[error("file not found")]
    NotFound,
    #[error("file io failed: {0:?}")]
    Io(ErrorKind),
}

impl From<ErrorKind> for FileError {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::NotFound => FileError::NotFound,
            kind => FileError::Io(kind),
        }
    }
}
