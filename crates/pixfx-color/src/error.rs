//! Error types for color operations.

use thiserror::Error;

/// Color operation error.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ColorError {
    /// A hex color string could not be parsed.
    #[error("invalid hex color: {0:?}")]
    InvalidHex(String),

    /// A gradient definition is unusable (fewer than two stops, NaN positions).
    #[error("invalid gradient: {0}")]
    InvalidGradient(String),
}

/// Result type for color operations.
pub type ColorResult<T> = Result<T, ColorError>;
