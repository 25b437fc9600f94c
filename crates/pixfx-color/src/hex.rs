//! Hex color strings and the [`Rgb8`] color value.
//!
//! Settings records carry colors as `"#rrggbb"` strings. [`Rgb8`] is the
//! typed form: it parses from 3- or 6-digit hex (leading `#` optional, no
//! alpha) and always serializes back to lowercase 6-digit hex.
//!
//! ```rust
//! use pixfx_color::{hex_to_rgb, rgb_to_hex, Rgb8};
//!
//! assert_eq!(hex_to_rgb("#f80").unwrap(), [255, 136, 0]);
//! assert_eq!(rgb_to_hex([255, 136, 0]), "#ff8800");
//!
//! let c: Rgb8 = "#336699".parse().unwrap();
//! assert_eq!(c.to_rgba(255), [0x33, 0x66, 0x99, 255]);
//! ```

use crate::{ColorError, ColorResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Parses `#rgb`, `rgb`, `#rrggbb` or `rrggbb` into an RGB triple.
pub fn hex_to_rgb(hex: &str) -> ColorResult<[u8; 3]> {
    let digits = hex.trim().trim_start_matches('#');
    if !digits.is_ascii() {
        return Err(ColorError::InvalidHex(hex.to_string()));
    }
    let parse = |s: &str| u8::from_str_radix(s, 16).map_err(|_| ColorError::InvalidHex(hex.to_string()));
    match digits.len() {
        3 => {
            let mut out = [0u8; 3];
            for (i, slot) in out.iter_mut().enumerate() {
                let v = parse(&digits[i..i + 1])?;
                *slot = v * 17;
            }
            Ok(out)
        }
        6 => Ok([
            parse(&digits[0..2])?,
            parse(&digits[2..4])?,
            parse(&digits[4..6])?,
        ]),
        _ => Err(ColorError::InvalidHex(hex.to_string())),
    }
}

/// Formats an RGB triple as lowercase `#rrggbb`.
pub fn rgb_to_hex(rgb: [u8; 3]) -> String {
    format!("#{:02x}{:02x}{:02x}", rgb[0], rgb[1], rgb[2])
}

/// An opaque 8-bit sRGB color, serialized as a hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb8(pub [u8; 3]);

impl Rgb8 {
    /// Pure black.
    pub const BLACK: Rgb8 = Rgb8([0, 0, 0]);
    /// Pure white.
    pub const WHITE: Rgb8 = Rgb8([255, 255, 255]);

    /// Builds a color from components.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// Returns the color as an RGBA pixel with the given alpha.
    #[inline]
    pub fn to_rgba(self, alpha: u8) -> [u8; 4] {
        [self.0[0], self.0[1], self.0[2], alpha]
    }

    /// Normalized `[0, 1]` components.
    #[inline]
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.0[0] as f32 / 255.0,
            self.0[1] as f32 / 255.0,
            self.0[2] as f32 / 255.0,
        ]
    }
}

impl FromStr for Rgb8 {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        hex_to_rgb(s).map(Rgb8)
    }
}

impl TryFrom<String> for Rgb8 {
    type Error = ColorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb8> for String {
    fn from(value: Rgb8) -> Self {
        rgb_to_hex(value.0)
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&rgb_to_hex(self.0))
    }
}
