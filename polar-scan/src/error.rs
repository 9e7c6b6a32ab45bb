use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Why a single line could not become a sample.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    #[error("Frame must have exactly two fields. Actually {0} fields.")]
    FieldCount(usize),
    #[error("Angle field is empty.")]
    EmptyAngle,
    #[error("Angle {0:?} is not an integer.")]
    InvalidAngle(String),
    #[error("Distance {0:?} is not a non-negative integer.")]
    InvalidDistance(String),
}

impl FrameError {
    /// Structural problems, as opposed to fields that fail to parse as numbers.
    pub fn is_malformed(&self) -> bool {
        matches!(self, FrameError::FieldCount(_) | FrameError::EmptyAngle)
    }
}

#[derive(Debug, Error)]
pub enum ScannerError {
    #[error(transparent)]
    Serial(#[from] serialport::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
    #[error("Transport disconnected")]
    Disconnected,
    #[error("Unparsable frame {line:?}: {source}")]
    UnparsableFrame { line: String, source: FrameError },
    #[error("Failed to write record {}: {source}", path.display())]
    Persistence { path: PathBuf, source: io::Error },
    #[error("Display error: {0}")]
    Display(String),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
