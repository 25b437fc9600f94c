//! # pixfx-io
//!
//! PNG input and output for pixfx [`Raster`](pixfx_core::Raster)s.
//!
//! ```rust,ignore
//! let image = pixfx_io::read("photo.png")?;
//! pixfx_io::write("photo-fx.png", &image)?;
//! ```

#![warn(missing_docs)]

mod error;
pub mod png;

pub use error::{IoError, IoResult};
pub use crate::png::{PngInfo, decode, encode, probe, read, write};
