//! # pixfx-core
//!
//! Core types for the pixfx effect engine.
//!
//! This crate provides the foundational types used throughout pixfx:
//!
//! - [`Raster`] - Owned RGBA8 pixel buffer handed between effect stages
//! - [`pixel`] - Luminance, rounding, interpolation and quantization helpers
//! - [`Rng`] - Seeded xorshift generator for reproducible "random" effects
//! - [`Error`] - Buffer allocation and bounds errors
//!
//! ## Crate Structure
//!
//! ```text
//! pixfx-core (this crate)
//!    ^
//!    |
//!    +-- pixfx-color (hex, HSL/HSV, blend modes, gradients)
//!    +-- pixfx-ops (effect transforms)
//!    +-- pixfx-pipeline (effect stack, executor, project files)
//!    +-- pixfx-io (PNG in/out)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod error;
pub mod pixel;
pub mod raster;
pub mod rng;

pub use error::{Error, Result};
pub use pixel::{LUMA_B, LUMA_G, LUMA_R, brightness, clamp_u8, luminance, luminance_px};
pub use raster::{CHANNELS, Raster};
pub use rng::{Rng, time_seed};
