//! ASCII art overlay.
//!
//! The image is cut into square cells. Each cell's mean brightness picks a
//! character from `charset` (first = darkest, last = densest) which is drawn
//! from a built-in 5x7 bitmap font, scaled to the cell.
//!
//! Characters without a bitmap are drawn as a solid block.

use crate::params::{Sanitize, clamp_u32, lenient_u32};
use crate::regions::{RegionVariant, average_regions, grid_labels};
use crate::OpsResult;
use pixfx_color::Rgb8;
use pixfx_core::{CHANNELS, Raster, luminance_px};
use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Default brightness ramp.
pub const DEFAULT_CHARSET: &str = " .:-=+*#%@";

const GLYPH_W: u32 = 5;
const GLYPH_H: u32 = 7;

/// 5x7 glyph rows, bit 4 is the leftmost column.
const GLYPHS: &[(char, [u8; 7])] = &[
    (' ', [0, 0, 0, 0, 0, 0, 0]),
    ('.', [0, 0, 0, 0, 0, 0, 0b00100]),
    (',', [0, 0, 0, 0, 0, 0b00100, 0b01000]),
    (':', [0, 0, 0b00100, 0, 0, 0b00100, 0]),
    (';', [0, 0, 0b00100, 0, 0, 0b00100, 0b01000]),
    ('-', [0, 0, 0, 0b01110, 0, 0, 0]),
    ('=', [0, 0, 0b11111, 0, 0b11111, 0, 0]),
    ('+', [0, 0b00100, 0b00100, 0b11111, 0b00100, 0b00100, 0]),
    ('*', [0, 0b00100, 0b10101, 0b01110, 0b10101, 0b00100, 0]),
    ('#', [0b01010, 0b01010, 0b11111, 0b01010, 0b11111, 0b01010, 0b01010]),
    ('%', [0b11000, 0b11001, 0b00010, 0b00100, 0b01000, 0b10011, 0b00011]),
    ('@', [0b01110, 0b10001, 0b10111, 0b10101, 0b10111, 0b10000, 0b01110]),
    ('o', [0, 0, 0b01110, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('O', [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110]),
    ('0', [0b01110, 0b10011, 0b10101, 0b10101, 0b10101, 0b11001, 0b01110]),
    ('x', [0, 0, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001]),
    ('X', [0b10001, 0b10001, 0b01010, 0b00100, 0b01010, 0b10001, 0b10001]),
    ('/', [0b00001, 0b00010, 0b00010, 0b00100, 0b01000, 0b01000, 0b10000]),
    ('\\', [0b10000, 0b01000, 0b01000, 0b00100, 0b00010, 0b00010, 0b00001]),
    ('|', [0b00100; 7]),
    ('$', [0b00100, 0b01111, 0b10100, 0b01110, 0b00101, 0b11110, 0b00100]),
    ('&', [0b01100, 0b10010, 0b10100, 0b01000, 0b10101, 0b10010, 0b01101]),
    ('8', [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110]),
    ('B', [0b11110, 0b10001, 0b10001, 0b11110, 0b10001, 0b10001, 0b11110]),
    ('M', [0b10001, 0b11011, 0b10101, 0b10101, 0b10001, 0b10001, 0b10001]),
    ('W', [0b10001, 0b10001, 0b10001, 0b10101, 0b10101, 0b10101, 0b01010]),
];

const SOLID: [u8; 7] = [0b11111; 7];

/// Bitmap for `c`, or a solid block for unknown characters.
pub fn glyph(c: char) -> [u8; 7] {
    GLYPHS
        .iter()
        .find(|(g, _)| *g == c)
        .map(|(_, rows)| *rows)
        .unwrap_or(SOLID)
}

/// Settings for the ascii effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AsciiSettings {
    /// Cell size in pixels, `4..=64`.
    #[serde(deserialize_with = "lenient_u32")]
    pub cell_size: u32,
    /// Brightness ramp, darkest first. Empty falls back to the default ramp.
    pub charset: String,
    /// Draw glyphs in the cell's mean color.
    pub colored: bool,
    /// Map dark cells to dense glyphs.
    pub invert: bool,
    /// Glyph color when not colored.
    pub foreground: Rgb8,
    /// Cell background.
    pub background: Rgb8,
}

impl Default for AsciiSettings {
    fn default() -> Self {
        Self {
            cell_size: 10,
            charset: DEFAULT_CHARSET.to_string(),
            colored: false,
            invert: false,
            foreground: Rgb8::WHITE,
            background: Rgb8::BLACK,
        }
    }
}

impl Sanitize for AsciiSettings {
    fn sanitize(&mut self) {
        clamp_u32(&mut self.cell_size, 4, 64);
        if self.charset.is_empty() {
            self.charset = DEFAULT_CHARSET.to_string();
        }
    }
}

/// Renders the image as ASCII art. Alpha is preserved.
pub fn apply(src: &Raster, settings: &AsciiSettings) -> OpsResult<Raster> {
    let s = settings.sanitized();
    trace!(cell = s.cell_size, charset = %s.charset, "ascii");

    let (w, h) = src.dimensions();
    let cell = s.cell_size;
    let means = average_regions(src, &grid_labels(w, h, cell), RegionVariant::Classic, 2, 2)?;

    let chars: Vec<[u8; 7]> = s.charset.chars().map(glyph).collect();
    let last = (chars.len() - 1) as f32;

    let mut dst = src.try_new_like()?;
    for y in 0..h {
        for x in 0..w {
            let mean = means.pixel(x, y);
            let b = luminance_px(mean) / 255.0;
            let level = if s.invert { 1.0 - b } else { b };
            let rows = chars[(level * last).round().clamp(0.0, last) as usize];

            // Glyphs fill 5x7 of a 6x8 grid, leaving one column and row of spacing.
            let gx = (x % cell) * (GLYPH_W + 1) / cell;
            let gy = (y % cell) * (GLYPH_H + 1) / cell;
            let ink = gx < GLYPH_W && gy < GLYPH_H && rows[gy as usize] & (1 << (GLYPH_W - 1 - gx)) != 0;

            let rgb = if !ink {
                s.background.0
            } else if s.colored {
                [mean[0], mean[1], mean[2]]
            } else {
                s.foreground.0
            };
            let i = dst.index(x, y);
            let alpha = src.as_bytes()[i + CHANNELS - 1];
            dst.as_bytes_mut()[i..i + CHANNELS].copy_from_slice(&[rgb[0], rgb[1], rgb[2], alpha]);
        }
    }
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_image_is_background() {
        let img = Raster::filled(20, 20, [0, 0, 0, 255]);
        let s = AsciiSettings {
            background: Rgb8::new(5, 6, 7),
            ..Default::default()
        };
        let out = apply(&img, &s).unwrap();
        assert!(out.as_bytes().chunks_exact(4).all(|p| p == [5, 6, 7, 255]));
    }

    #[test]
    fn test_white_image_draws_densest_glyph() {
        let img = Raster::filled(10, 10, [255, 255, 255, 255]);
        let out = apply(&img, &AsciiSettings::default()).unwrap();
        let ink = out.as_bytes().chunks_exact(4).filter(|p| p[0] == 255).count();
        assert!(ink > 10 && ink < 100);
        // spacing column stays background
        assert_eq!(out.pixel(9, 0), [0, 0, 0, 255]);
    }

    #[test]
    fn test_unknown_glyph_is_solid() {
        assert_eq!(glyph('\u{2603}'), SOLID);
        assert_eq!(glyph(' '), [0; 7]);
    }

    #[test]
    fn test_empty_charset_falls_back() {
        let s = AsciiSettings {
            charset: String::new(),
            ..Default::default()
        };
        assert_eq!(s.sanitized().charset, DEFAULT_CHARSET);
    }

    #[test]
    fn test_colored_uses_cell_mean() {
        let img = Raster::filled(10, 10, [250, 250, 10, 255]);
        let s = AsciiSettings {
            colored: true,
            charset: "#".to_string(),
            ..Default::default()
        };
        let out = apply(&img, &s).unwrap();
        assert!(out.as_bytes().chunks_exact(4).any(|p| p == [250, 250, 10, 255]));
    }
}
