//! Error types for pipeline stages.

use thiserror::Error;

/// Error type for pipeline stages.
#[derive(Debug, Error)]
pub enum OpsError {
    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Image has too few components per pixel for this stage.
    #[error("channel mismatch: stage needs at least {expected}, image has {got}")]
    ChannelMismatch {
        /// Minimum channel count the stage needs
        expected: usize,
        /// Channel count of the image
        got: usize,
    },

    /// LUT construction failed.
    #[error(transparent)]
    Lut(#[from] grade_lut::LutError),
}

/// Result type for pipeline stages.
pub type OpsResult<T> = Result<T, OpsError>;
