//! Error type for kernel loading and evaluation.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from reading or evaluating an SPK kernel.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum KernelError {
    /// Reading the kernel file failed.
    Io(String),
    /// The bytes are not a well-formed DAF/SPK file.
    InvalidFormat(String),
    /// Segment uses an SPK data type this reader does not evaluate.
    UnsupportedDataType {
        target: i32,
        data_type: i32,
    },
    /// No segment links `target` to `center`.
    SegmentNotFound {
        target: i32,
        center: i32,
    },
    /// Segments exist for the pair but none covers the epoch.
    EpochOutOfRange {
        target: i32,
        center: i32,
        epoch_tdb_s: f64,
    },
}

impl Display for KernelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::InvalidFormat(msg) => write!(f, "invalid SPK file: {msg}"),
            Self::UnsupportedDataType { target, data_type } => write!(
                f,
                "segment for body {target} uses unsupported SPK type {data_type}"
            ),
            Self::SegmentNotFound { target, center } => write!(
                f,
                "no segment for target {target} relative to center {center}"
            ),
            Self::EpochOutOfRange {
                target,
                center,
                epoch_tdb_s,
            } => write!(
                f,
                "epoch {epoch_tdb_s} s past J2000 outside coverage of {target} relative to {center}"
            ),
        }
    }
}

impl Error for KernelError {}

impl From<std::io::Error> for KernelError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e.to_string())
    }
}
