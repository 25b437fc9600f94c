//! Mosaic shift: cut the image into a grid of tiles and displace each tile.

use crate::parallel::map_pixels;
use crate::params::{Sanitize, clamp_f32, clamp_u32, lenient_u32};
use crate::slice_shift::gap_pixel;
use crate::OpsResult;
use pixfx_color::Rgb8;
use pixfx_core::{Raster, Rng};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

#[allow(unused_imports)]
use tracing::{debug, trace};

/// How tile offsets are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MosaicPattern {
    /// Seeded uniform offsets.
    #[default]
    Random,
    /// Alternating `+max` / `-max` like a checkerboard.
    Checker,
    /// Sinusoid across rows (x offset) and columns (y offset).
    Wave,
}

/// Settings for the mosaic-shift effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MosaicShiftSettings {
    /// Tile columns, `1..=256`.
    #[serde(deserialize_with = "lenient_u32")]
    pub columns: u32,
    /// Tile rows, `1..=256`.
    #[serde(deserialize_with = "lenient_u32")]
    pub rows: u32,
    /// Largest horizontal displacement, `0..=2000`.
    pub max_offset_x: f32,
    /// Largest vertical displacement, `0..=2000`.
    pub max_offset_y: f32,
    /// Offset pattern.
    pub pattern: MosaicPattern,
    /// PRNG seed.
    pub seed: u32,
    /// Fill gaps with `backgroundColor` instead of transparency.
    pub fill_background: bool,
    /// Gap color.
    pub background_color: Rgb8,
}

impl Default for MosaicShiftSettings {
    fn default() -> Self {
        Self {
            columns: 8,
            rows: 8,
            max_offset_x: 24.0,
            max_offset_y: 24.0,
            pattern: MosaicPattern::Random,
            seed: 1,
            fill_background: false,
            background_color: Rgb8::BLACK,
        }
    }
}

impl Sanitize for MosaicShiftSettings {
    fn sanitize(&mut self) {
        clamp_u32(&mut self.columns, 1, 256);
        clamp_u32(&mut self.rows, 1, 256);
        clamp_f32(&mut self.max_offset_x, 0.0, 2000.0, 24.0);
        clamp_f32(&mut self.max_offset_y, 0.0, 2000.0, 24.0);
    }
}

/// Integer `(dx, dy)` per tile, row-major.
pub fn tile_offsets(s: &MosaicShiftSettings) -> Vec<(i64, i64)> {
    let mut rng = Rng::new(s.seed);
    let mut out = Vec::with_capacity((s.columns * s.rows) as usize);
    for j in 0..s.rows {
        for i in 0..s.columns {
            let (dx, dy) = match s.pattern {
                MosaicPattern::Random => (rng.signed(s.max_offset_x), rng.signed(s.max_offset_y)),
                MosaicPattern::Checker => {
                    let sign = if (i + j) % 2 == 0 { 1.0 } else { -1.0 };
                    (sign * s.max_offset_x, sign * s.max_offset_y)
                }
                MosaicPattern::Wave => (
                    s.max_offset_x * (TAU * j as f32 / s.rows as f32).sin(),
                    s.max_offset_y * (TAU * i as f32 / s.columns as f32).sin(),
                ),
            };
            out.push((dx.round() as i64, dy.round() as i64));
        }
    }
    out
}

/// Applies the mosaic shift.
pub fn apply(src: &Raster, settings: &MosaicShiftSettings) -> OpsResult<Raster> {
    let s = settings.sanitized();
    trace!(columns = s.columns, rows = s.rows, pattern = ?s.pattern, seed = s.seed, "mosaic_shift");

    let (w, h) = src.dimensions();
    let offsets = tile_offsets(&s);
    let gap = gap_pixel(s.fill_background, s.background_color);
    let cols = s.columns as u64;
    let rows = s.rows as u64;

    map_pixels(src, |_, x, y| {
        let i = (x as u64 * cols / w as u64) as usize;
        let j = (y as u64 * rows / h as u64) as usize;
        let (dx, dy) = offsets[j * cols as usize + i];
        let sx = x as i64 - dx;
        let sy = y as i64 - dy;
        if sx < 0 || sy < 0 || sx >= w as i64 || sy >= h as i64 {
            gap
        } else {
            src.pixel(sx as u32, sy as u32)
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coords(w: u32, h: u32) -> Raster {
        let mut img = Raster::new(w, h);
        for y in 0..h {
            for x in 0..w {
                img.set_pixel(x, y, [x as u8, y as u8, 0, 255]);
            }
        }
        img
    }

    #[test]
    fn test_zero_offsets_identity() {
        let img = coords(30, 20);
        let s = MosaicShiftSettings {
            max_offset_x: 0.0,
            max_offset_y: 0.0,
            ..Default::default()
        };
        assert_eq!(apply(&img, &s).unwrap(), img);
    }

    #[test]
    fn test_checker_offsets() {
        let s = MosaicShiftSettings {
            columns: 2,
            rows: 2,
            max_offset_x: 3.0,
            max_offset_y: 1.0,
            pattern: MosaicPattern::Checker,
            ..Default::default()
        };
        assert_eq!(tile_offsets(&s), vec![(3, 1), (-3, -1), (-3, -1), (3, 1)]);
    }

    #[test]
    fn test_seeded() {
        let img = coords(40, 40);
        let s = MosaicShiftSettings::default();
        let a = apply(&img, &s).unwrap();
        assert_eq!(a, apply(&img, &s).unwrap());
        assert_ne!(a, apply(&img, &MosaicShiftSettings { seed: 2, ..s }).unwrap());
    }

    #[test]
    fn test_gap_fill() {
        let img = coords(8, 8);
        let s = MosaicShiftSettings {
            columns: 1,
            rows: 1,
            max_offset_x: 2.0,
            max_offset_y: 0.0,
            pattern: MosaicPattern::Checker,
            fill_background: true,
            background_color: Rgb8::new(1, 2, 3),
            ..Default::default()
        };
        let out = apply(&img, &s).unwrap();
        assert_eq!(out.pixel(0, 0), [1, 2, 3, 255]);
        assert_eq!(out.pixel(2, 5), img.pixel(0, 5));
    }
}
