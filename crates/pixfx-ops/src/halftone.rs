//! Halftone screen.
//!
//! The image is divided into cells laid out by the arrangement. Each cell
//! samples the source at its center and draws one dot whose area tracks the
//! sample's darkness; everything outside the dot is paper.

use crate::parallel::map_pixels;
use crate::params::{Sanitize, clamp_f32, clamp_u32, lenient_u32};
use crate::OpsResult;
use pixfx_color::Rgb8;
use pixfx_core::{Raster, luminance_px, pixel::lerp_u8};
use serde::{Deserialize, Serialize};
use std::f32::consts::{FRAC_1_SQRT_2, SQRT_2};

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Dot shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HalftoneShape {
    /// Round dots.
    #[default]
    Circle,
    /// Axis-aligned squares.
    Square,
    /// Squares rotated 45 degrees.
    Diamond,
    /// Horizontal lines.
    Line,
}

/// Cell layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HalftoneArrangement {
    /// Square grid.
    #[default]
    Grid,
    /// Odd rows offset by half a cell.
    Hex,
    /// Grid rotated 45 degrees.
    Diagonal,
}

/// Settings for the halftone effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HalftoneSettings {
    /// Dot shape.
    pub shape: HalftoneShape,
    /// Cell layout.
    pub arrangement: HalftoneArrangement,
    /// Cell size in pixels, `3..=128`.
    #[serde(deserialize_with = "lenient_u32")]
    pub cell_size: u32,
    /// Blend between source and halftone, `0..=1`.
    pub mix: f32,
    /// Dots take the sampled color instead of `inkColor`.
    pub colored: bool,
    /// Dot size tracks brightness instead of darkness.
    pub invert_brightness: bool,
    /// Dot color when not colored.
    pub ink_color: Rgb8,
    /// Background color.
    pub paper_color: Rgb8,
}

impl Default for HalftoneSettings {
    fn default() -> Self {
        Self {
            shape: HalftoneShape::Circle,
            arrangement: HalftoneArrangement::Grid,
            cell_size: 8,
            mix: 1.0,
            colored: false,
            invert_brightness: false,
            ink_color: Rgb8::BLACK,
            paper_color: Rgb8::WHITE,
        }
    }
}

impl Sanitize for HalftoneSettings {
    fn sanitize(&mut self) {
        clamp_u32(&mut self.cell_size, 3, 128);
        clamp_f32(&mut self.mix, 0.0, 1.0, 1.0);
    }
}

/// Cell center and the pixel's offset from it, in cell units (`-0.5..0.5`).
fn locate(arrangement: HalftoneArrangement, x: f32, y: f32, cs: f32) -> ((f32, f32), (f32, f32)) {
    match arrangement {
        HalftoneArrangement::Grid => {
            let (i, j) = ((x / cs).floor(), (y / cs).floor());
            let center = ((i + 0.5) * cs, (j + 0.5) * cs);
            (center, ((x - center.0) / cs, (y - center.1) / cs))
        }
        HalftoneArrangement::Hex => {
            let j = (y / cs).floor();
            let shift = if (j as i64).rem_euclid(2) == 1 { cs * 0.5 } else { 0.0 };
            let i = ((x - shift) / cs).floor();
            let center = ((i + 0.5) * cs + shift, (j + 0.5) * cs);
            (center, ((x - center.0) / cs, (y - center.1) / cs))
        }
        HalftoneArrangement::Diagonal => {
            let u = (x + y) * FRAC_1_SQRT_2;
            let v = (y - x) * FRAC_1_SQRT_2;
            let (i, j) = ((u / cs).floor(), (v / cs).floor());
            let (cu, cv) = ((i + 0.5) * cs, (j + 0.5) * cs);
            let center = ((cu - cv) * FRAC_1_SQRT_2, (cu + cv) * FRAC_1_SQRT_2);
            (center, ((u - cu) / cs, (v - cv) / cs))
        }
    }
}

/// Returns `true` when offset `(dx, dy)` lies inside a dot of the given coverage.
fn inside(shape: HalftoneShape, dx: f32, dy: f32, coverage: f32) -> bool {
    if coverage <= 0.0 {
        return false;
    }
    match shape {
        HalftoneShape::Circle => (dx * dx + dy * dy).sqrt() * 2.0 < coverage.sqrt() * SQRT_2,
        HalftoneShape::Square => dx.abs().max(dy.abs()) * 2.0 < coverage.sqrt(),
        HalftoneShape::Diamond => dx.abs() + dy.abs() < coverage.sqrt(),
        HalftoneShape::Line => dy.abs() * 2.0 < coverage,
    }
}

/// Applies the halftone effect. Alpha is preserved.
pub fn apply(src: &Raster, settings: &HalftoneSettings) -> OpsResult<Raster> {
    let s = settings.sanitized();
    trace!(shape = ?s.shape, arrangement = ?s.arrangement, cell = s.cell_size, "halftone");

    let cs = s.cell_size as f32;
    map_pixels(src, |px, x, y| {
        let (center, (dx, dy)) = locate(s.arrangement, x as f32 + 0.5, y as f32 + 0.5, cs);
        let sample = src.pixel_clamped(center.0.floor() as i64, center.1.floor() as i64);
        let b = luminance_px(sample).round() / 255.0;
        let coverage = if s.invert_brightness { b } else { 1.0 - b };

        let tone = if inside(s.shape, dx, dy, coverage) {
            if s.colored {
                [sample[0], sample[1], sample[2]]
            } else {
                s.ink_color.0
            }
        } else {
            s.paper_color.0
        };

        [
            lerp_u8(px[0], tone[0], s.mix),
            lerp_u8(px[1], tone[1], s.mix),
            lerp_u8(px[2], tone[2], s.mix),
            px[3],
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SHAPES: [HalftoneShape; 4] = [
        HalftoneShape::Circle,
        HalftoneShape::Square,
        HalftoneShape::Diamond,
        HalftoneShape::Line,
    ];
    const ARRANGEMENTS: [HalftoneArrangement; 3] = [
        HalftoneArrangement::Grid,
        HalftoneArrangement::Hex,
        HalftoneArrangement::Diagonal,
    ];

    #[test]
    fn test_white_is_all_paper() {
        let img = Raster::filled(20, 20, [255, 255, 255, 255]);
        for shape in SHAPES {
            for arrangement in ARRANGEMENTS {
                let s = HalftoneSettings {
                    shape,
                    arrangement,
                    paper_color: Rgb8::new(250, 240, 230),
                    ..Default::default()
                };
                let out = apply(&img, &s).unwrap();
                assert!(out.as_bytes().chunks_exact(4).all(|p| p == [250, 240, 230, 255]));
            }
        }
    }

    #[test]
    fn test_black_grid_is_all_ink() {
        let img = Raster::filled(16, 16, [0, 0, 0, 255]);
        for shape in [HalftoneShape::Square, HalftoneShape::Line] {
            let s = HalftoneSettings {
                shape,
                ink_color: Rgb8::new(10, 20, 30),
                ..Default::default()
            };
            let out = apply(&img, &s).unwrap();
            assert!(out.as_bytes().chunks_exact(4).all(|p| p == [10, 20, 30, 255]));
        }
    }

    #[test]
    fn test_mid_gray_mixes_ink_and_paper() {
        let img = Raster::filled(32, 32, [128, 128, 128, 255]);
        let out = apply(&img, &HalftoneSettings::default()).unwrap();
        let ink = out.as_bytes().chunks_exact(4).filter(|p| p[0] == 0).count();
        assert!(ink > 0 && ink < 32 * 32);
    }

    #[test]
    fn test_zero_mix_is_identity() {
        let img = Raster::filled(9, 9, [30, 60, 90, 128]);
        let s = HalftoneSettings {
            mix: 0.0,
            ..Default::default()
        };
        assert_eq!(apply(&img, &s).unwrap(), img);
    }

    #[test]
    fn test_colored_dots_use_sample() {
        let img = Raster::filled(16, 16, [200, 0, 0, 255]);
        let s = HalftoneSettings {
            colored: true,
            ..Default::default()
        };
        let out = apply(&img, &s).unwrap();
        assert_eq!(out.pixel(4, 4), [200, 0, 0, 255]);
    }

    #[test]
    fn test_diagonal_center_round_trip() {
        let ((cx, cy), (dx, dy)) = locate(HalftoneArrangement::Diagonal, 10.0, 4.0, 6.0);
        assert!(dx.abs() <= 0.5 && dy.abs() <= 0.5);
        assert!((cx - 10.0).abs() < 6.0 && (cy - 4.0).abs() < 6.0);
    }
}
