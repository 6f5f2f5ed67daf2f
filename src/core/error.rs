//! Error types for AlphaPanel.

use thiserror::Error;

/// Result type alias for AlphaPanel operations.
pub type Result<T> = std::result::Result<T, AlphaError>;

/// Error types for the research pipeline.
///
/// Missing data is never an error: undefined standard deviations, zero-sum
/// weight rows, and dates below a minimum valid-asset count all produce NaN
/// or skipped observations. Errors are reserved for invalid configuration
/// and structural problems detected before any computation runs.
#[derive(Error, Debug)]
pub enum AlphaError {
    /// Invalid parameter value.
    #[error("Invalid parameter: {message}")]
    InvalidParameter { message: String },

    /// Invalid stage configuration.
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Data length mismatch between arrays or panel axes.
    #[error("Data length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// Two panels required to share an index have no overlap.
    #[error("Alignment failure: {context}")]
    Alignment { context: String },

    /// Empty data where at least one observation is required.
    #[error("Empty data provided for {context}")]
    EmptyData { context: String },
}

impl AlphaError {
    /// Create an invalid parameter error.
    pub fn invalid_parameter(message: impl Into<String>) -> Self {
        Self::InvalidParameter { message: message.into() }
    }

    /// Create an invalid config error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig { message: message.into() }
    }

    /// Create a length mismatch error.
    pub fn length_mismatch(expected: usize, actual: usize) -> Self {
        Self::LengthMismatch { expected, actual }
    }

    /// Create an alignment error.
    pub fn alignment(context: impl Into<String>) -> Self {
        Self::Alignment { context: context.into() }
    }

    /// Create an empty data error.
    pub fn empty_data(context: impl Into<String>) -> Self {
        Self::EmptyData { context: context.into() }
    }
}
