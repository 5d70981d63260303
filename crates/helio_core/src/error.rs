//! Error type for the snapshot pipeline.

use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

use jpl_kernel::KernelError;

/// Any failure that ends a snapshot run.
#[derive(Debug)]
#[non_exhaustive]
pub enum SnapshotError {
    InvalidConfig(&'static str),
    /// Transport-level HTTP failure.
    Http {
        url: String,
        message: String,
    },
    /// Server answered with a non-success status.
    HttpStatus {
        url: String,
        status: u16,
    },
    Io {
        path: String,
        message: String,
    },
    Kernel(KernelError),
    Serialize(String),
}

impl SnapshotError {
    pub(crate) fn io(path: &Path, e: &std::io::Error) -> Self {
        Self::Io {
            path: path.display().to_string(),
            message: e.to_string(),
        }
    }
}

impl Display for SnapshotError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidConfig(msg) => write!(f, "invalid config: {msg}"),
            Self::Http { url, message } => write!(f, "download of {url} failed: {message}"),
            Self::HttpStatus { url, status } => {
                write!(f, "download of {url} returned HTTP {status}")
            }
            Self::Io { path, message } => write!(f, "{path}: {message}"),
            Self::Kernel(_) => f.write_str("ephemeris kernel error"),
            Self::Serialize(msg) => write!(f, "JSON serialisation failed: {msg}"),
        }
    }
}

impl Error for SnapshotError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Kernel(e) => Some(e),
            _ => None,
        }
    }
}

impl From<KernelError> for SnapshotError {
    fn from(e: KernelError) -> Self {
        Self::Kernel(e)
    }
}

impl From<serde_json::Error> for SnapshotError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialize(e.to_string())
    }
}
