//! Error types of the analysis pipeline.

use thiserror::Error;

use crate::cancel::Cancelled;

/// Result alias used by the MPS reader
pub type MpsResult<T> = Result<T, MpsError>;

/// Errors raised while reading an MPS file.
///
/// Undeclared row or variable references are not errors: they are logged and the
/// offending entry is skipped.
#[derive(Error, Debug)]
pub enum MpsError {
    /// File missing or unreadable
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A line does not match the expected grammar (1-based line number, 0 for end of file)
    #[error("Format error in line {line}: {message}")]
    Format { line: usize, message: String },

    /// Parsing was aborted through the cancellation token
    #[error("Parsing was cancelled")]
    Cancelled,
}

impl MpsError {
    pub fn format<S: Into<String>>(line: usize, message: S) -> Self {
        Self::Format {
            line,
            message: message.into(),
        }
    }
}

impl From<Cancelled> for MpsError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}

/// Errors raised while loading an [`AnalysisConfig`](crate::config::AnalysisConfig)
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Per-instance error of the pipeline. Never aborts a batch.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error(transparent)]
    Mps(MpsError),

    /// The instance deadline elapsed
    #[error("Analysis was cancelled")]
    Cancelled,
}

impl From<MpsError> for AnalysisError {
    fn from(e: MpsError) -> Self {
        match e {
            MpsError::Cancelled => Self::Cancelled,
            e => Self::Mps(e),
        }
    }
}

impl From<Cancelled> for AnalysisError {
    fn from(_: Cancelled) -> Self {
        Self::Cancelled
    }
}
