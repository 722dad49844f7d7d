//! Error types for pipeline construction and evaluation.
//!
//! Failures raised by user stages travel through the pipeline untouched: the
//! stage's own `anyhow::Error` is kept as the `source` of
//! [`PipelineError::Stage`] and can be recovered with
//! [`PipelineError::into_stage_source`] or downcast in place.
//!
//! # Example
//!
//! ```rust
//! use stagepipe::errors::PipelineError;
//!
//! let err = PipelineError::invalid_argument("no stage named 'square'");
//! assert_eq!(err.category(), "InvalidArgument");
//! assert!(!err.is_stage_failure());
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for stagepipe operations
#[derive(Debug, Error)]
pub enum PipelineError {
    /// A user-supplied stage failed while being invoked
    #[error("stage '{stage}' failed: {source}")]
    Stage {
        stage: String,
        #[source]
        source: anyhow::Error,
    },

    /// Something that cannot be used as a stage was supplied
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Insertion index past the end under the strict index policy
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        path: Option<PathBuf>,
    },
}

impl PipelineError {
    /// Wrap a failure raised by the stage called `stage`.
    pub fn stage(stage: impl Into<String>, source: anyhow::Error) -> Self {
        Self::Stage {
            stage: stage.into(),
            source,
        }
    }

    /// Create an invalid-argument error.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            path: None,
        }
    }

    /// Create a configuration error with path context.
    pub fn config_with_path(message: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self::Config {
            message: message.into(),
            path: Some(path.into()),
        }
    }

    /// Get the error category name.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Stage { .. } => "Stage",
            Self::InvalidArgument(_) => "InvalidArgument",
            Self::IndexOutOfRange { .. } => "IndexOutOfRange",
            Self::Config { .. } => "Config",
        }
    }

    /// True when the error came from user stage code rather than the engine.
    pub fn is_stage_failure(&self) -> bool {
        matches!(self, Self::Stage { .. })
    }

    /// Name of the failing stage, if this is a stage failure.
    pub fn stage_name(&self) -> Option<&str> {
        match self {
            Self::Stage { stage, .. } => Some(stage),
            _ => None,
        }
    }

    /// Recover the error raised by user code.
    ///
    /// Returns `Err(self)` for errors produced by the engine itself.
    pub fn into_stage_source(self) -> std::result::Result<anyhow::Error, Self> {
        match self {
            Self::Stage { source, .. } => Ok(source),
            other => Err(other),
        }
    }
}

/// Result type alias for stagepipe operations
pub type Result<T> = std::result::Result<T, PipelineError>;
