//! # pixfx-color
//!
//! Color utilities used by almost every pixfx effect:
//!
//! - [`hex`] - `#rgb` / `#rrggbb` parsing and the serializable [`Rgb8`] color
//! - [`convert`] - RGB <-> HSL and RGB <-> HSV
//! - [`blend`] - the 16 blend modes and opacity mixing
//! - [`gradient`] - gradient stops and ramp sampling
//!
//! # Architecture
//!
//! ```text
//!      pixfx-color
//!          |
//!   +------+------+--------+
//!   |      |      |        |
//!  hex  convert  blend  gradient
//!                  |        |
//!               convert    hex
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod blend;
pub mod convert;
mod error;
pub mod gradient;
pub mod hex;

pub use blend::{BlendMode, blend_rgb, composite, mix};
pub use convert::{hsl_to_rgb, hsv_to_rgb, rgb_to_hsl, rgb_to_hsv};
pub use error::{ColorError, ColorResult};
pub use gradient::{Gradient, GradientStop};
pub use hex::{Rgb8, hex_to_rgb, rgb_to_hex};
