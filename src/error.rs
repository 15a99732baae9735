use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::orchestrator::RunState;

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Everything that can abort a run.
#[derive(Error, Debug)]
pub enum Error {
    /// One or more command-line values failed validation.
    #[error("invalid configuration: {0}")]
    Config(ConfigErrors),

    /// Distribution parameters rejected by the random generator.
    #[error("invalid generation parameters: {0}")]
    InvalidGeneration(String),

    /// Transform sizes must be non-zero powers of two.
    #[error("unsupported transform size {0} (must be a non-zero power of two)")]
    UnsupportedSize(usize),

    /// A buffer handed to a gateway does not match its baked plan.
    #[error("buffer length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// No usable device for the requested runtime.
    #[error("device unavailable: {0}")]
    DeviceUnavailable(String),

    /// Kernel launch or readback failure reported by the backend.
    #[error("backend failure: {0}")]
    Backend(String),

    /// Writing a result file failed.
    #[error("failed to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A run was requested from a state that does not allow it.
    #[error("cannot start a run while {0}")]
    InvalidState(RunState),
}

impl Error {
    /// Configuration problems are reported before any work starts.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::Config(_) | Error::UnsupportedSize(_) | Error::InvalidGeneration(_)
        )
    }
}

/// Every problem found by a single validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConfigErrors(pub Vec<String>);

impl ConfigErrors {
    pub fn push(&mut self, message: impl Into<String>) {
        self.0.push(message.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }
}

impl fmt::Display for ConfigErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join("; "))
    }
}

impl From<ConfigErrors> for Error {
    fn from(errors: ConfigErrors) -> Self {
        Error::Config(errors)
    }
}
