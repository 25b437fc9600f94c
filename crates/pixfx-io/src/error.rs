//! Error types for image I/O.

use std::io;
use thiserror::Error;

/// I/O operation error.
#[derive(Debug, Error)]
pub enum IoError {
    /// File I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Decoding error.
    #[error("decode error: {0}")]
    DecodeError(String),

    /// Encoding error.
    #[error("encode error: {0}")]
    EncodeError(String),

    /// Color type / bit depth combination that cannot become RGBA8.
    #[error("unsupported pixel layout: {0}")]
    UnsupportedLayout(String),

    /// Decoded pixels could not be wrapped in a raster.
    #[error(transparent)]
    Raster(#[from] pixfx_core::Error),
}

/// Result type for I/O operations.
pub type IoResult<T> = Result<T, IoError>;
