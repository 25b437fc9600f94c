//! # pixfx-ops
//!
//! Pixel-transform effects for the pixfx pipeline.
//!
//! Every effect lives in its own module and exposes the same shape:
//!
//! - a settings struct (`serde`, camelCase fields, every field defaulted)
//! - a [`Sanitize`] impl that clamps each field into its documented range
//! - `apply(&Raster, &Settings) -> OpsResult<Raster>`, which never mutates
//!   its input and always returns a raster of the same size
//!
//! # Modules
//!
//! - [`adjust`], [`blur`], [`sharpen`] - tonal and neighbourhood basics
//! - [`edges`] - Sobel / Prewitt / Laplacian edge detection
//! - [`gradient_map`] - luminance to color ramp
//! - [`pixelate`], [`polar`] - region averaging (see [`regions`])
//! - [`posterize`], [`dither`], [`halftone`], [`threshold`], [`ascii`]
//! - [`slice_shift`], [`mosaic_shift`], [`glitch`], [`noise`] - seeded displacement
//! - [`vignette`], [`scanlines`], [`transform3d`]
//!
//! # Example
//!
//! ```rust
//! use pixfx_core::Raster;
//! use pixfx_ops::pixelate::{self, PixelateSettings};
//!
//! let img = Raster::filled(32, 32, [120, 60, 30, 255]);
//! let out = pixelate::apply(&img, &PixelateSettings::default()).unwrap();
//! assert_eq!(out, img);
//! ```
//!
//! # Feature Flags
//!
//! - `parallel` (default) - row-parallel per-pixel effects via rayon; output
//!   is byte-identical to the sequential path

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod params;
pub mod parallel;
pub mod regions;

pub mod adjust;
pub mod ascii;
pub mod blur;
pub mod dither;
pub mod edges;
pub mod glitch;
pub mod gradient_map;
pub mod halftone;
pub mod mosaic_shift;
pub mod noise;
pub mod pixelate;
pub mod polar;
pub mod posterize;
pub mod scanlines;
pub mod sharpen;
pub mod slice_shift;
pub mod threshold;
pub mod transform3d;
pub mod vignette;

pub use error::{OpsError, OpsResult};
pub use params::Sanitize;
pub use regions::RegionVariant;

pub use adjust::AdjustSettings;
pub use ascii::AsciiSettings;
pub use blur::BlurSettings;
pub use dither::DitherSettings;
pub use edges::FindEdgesSettings;
pub use glitch::GlitchSettings;
pub use gradient_map::GradientMapSettings;
pub use halftone::HalftoneSettings;
pub use mosaic_shift::MosaicShiftSettings;
pub use noise::NoiseSettings;
pub use pixelate::PixelateSettings;
pub use polar::PolarPixelSettings;
pub use posterize::PosterizeSettings;
pub use scanlines::ScanlinesSettings;
pub use sharpen::SharpenSettings;
pub use slice_shift::SliceShiftSettings;
pub use threshold::ThresholdSettings;
pub use transform3d::Transform3dSettings;
pub use vignette::VignetteSettings;
