//! Error types for effect transforms.

use thiserror::Error;

/// Error type for effect transforms.
///
/// The pipeline never propagates these to its caller: a failing effect is
/// logged and passes its input through unchanged.
#[derive(Error, Debug)]
pub enum OpsError {
    /// Invalid dimensions specified.
    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// Settings that cannot be clamped into something usable.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Raster allocation or access failed.
    #[error(transparent)]
    Raster(#[from] pixfx_core::Error),

    /// Color definition failed to parse or validate.
    #[error(transparent)]
    Color(#[from] pixfx_color::ColorError),
}

/// Result type for effect transforms.
pub type OpsResult<T> = Result<T, OpsError>;
