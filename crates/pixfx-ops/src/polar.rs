//! Polar pixel effect: ring x segment sectors filled with their mean color.
//!
//! Shares [`sector_labels`] with the radial pixelate mode; for equal
//! rings, segments, center and variant both produce identical output.

use crate::params::{Sanitize, clamp_f32, clamp_u32, lenient_u32};
use crate::regions::{RegionVariant, average_regions, sector_labels};
use crate::OpsResult;
use pixfx_core::Raster;
use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Settings for the polar-pixel effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PolarPixelSettings {
    /// Ring count, `1..=200`.
    #[serde(deserialize_with = "lenient_u32")]
    pub rings: u32,
    /// Angular segment count, `1..=360`.
    #[serde(deserialize_with = "lenient_u32")]
    pub segments: u32,
    /// Horizontal center as a fraction of width, `0..=1`.
    pub center_x: f32,
    /// Vertical center as a fraction of height, `0..=1`.
    pub center_y: f32,
    /// Post-processing of each sector's mean.
    pub variant: RegionVariant,
    /// Steps per channel for the posterized variant, `2..=8`.
    #[serde(deserialize_with = "lenient_u32")]
    pub posterize_levels: u32,
    /// Gray steps for the grayscale variant, `2..=256`.
    #[serde(deserialize_with = "lenient_u32")]
    pub grayscale_levels: u32,
}

impl Default for PolarPixelSettings {
    fn default() -> Self {
        Self {
            rings: 12,
            segments: 24,
            center_x: 0.5,
            center_y: 0.5,
            variant: RegionVariant::Classic,
            posterize_levels: 4,
            grayscale_levels: 8,
        }
    }
}

impl Sanitize for PolarPixelSettings {
    fn sanitize(&mut self) {
        clamp_u32(&mut self.rings, 1, 200);
        clamp_u32(&mut self.segments, 1, 360);
        clamp_f32(&mut self.center_x, 0.0, 1.0, 0.5);
        clamp_f32(&mut self.center_y, 0.0, 1.0, 0.5);
        clamp_u32(&mut self.posterize_levels, 2, 8);
        clamp_u32(&mut self.grayscale_levels, 2, 256);
    }
}

/// Applies the polar pixel effect.
pub fn apply(src: &Raster, settings: &PolarPixelSettings) -> OpsResult<Raster> {
    let s = settings.sanitized();
    trace!(rings = s.rings, segments = s.segments, "polar_pixel");

    let map = sector_labels(src.width(), src.height(), s.rings, s.segments, s.center_x, s.center_y);
    average_regions(src, &map, s.variant, s.posterize_levels, s.grayscale_levels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixelate::{self, PixelateMode, PixelateSettings};

    fn gradient(w: u32, h: u32) -> Raster {
        let mut img = Raster::new(w, h);
        for y in 0..h {
            for x in 0..w {
                img.set_pixel(x, y, [(x * 7) as u8, (y * 5) as u8, ((x ^ y) * 3) as u8, 255]);
            }
        }
        img
    }

    #[test]
    fn test_matches_radial_pixelate() {
        let img = gradient(31, 24);
        let polar = PolarPixelSettings {
            rings: 5,
            segments: 9,
            center_x: 0.3,
            center_y: 0.6,
            ..Default::default()
        };
        let radial = PixelateSettings {
            mode: PixelateMode::Radial,
            rings: 5,
            segments: 9,
            center_x: 0.3,
            center_y: 0.6,
            ..Default::default()
        };
        assert_eq!(apply(&img, &polar).unwrap(), pixelate::apply(&img, &radial).unwrap());
    }

    #[test]
    fn test_single_sector_is_global_mean() {
        let img = gradient(4, 4);
        let s = PolarPixelSettings {
            rings: 1,
            segments: 1,
            ..Default::default()
        };
        let out = apply(&img, &s).unwrap();
        let first = out.pixel(0, 0);
        assert!(out.as_bytes().chunks_exact(4).all(|p| p == &first[..]));
    }
}
