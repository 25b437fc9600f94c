//! CRT-style scanlines.

use crate::parallel::map_pixels;
use crate::params::{Sanitize, clamp_f32, clamp_u32, lenient_u32};
use crate::OpsResult;
use pixfx_color::Rgb8;
use pixfx_core::{Raster, pixel::lerp_u8};
use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Line orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScanlineDirection {
    /// Rows.
    #[default]
    Horizontal,
    /// Columns.
    Vertical,
}

/// Settings for the scanlines effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ScanlinesSettings {
    /// Line period in pixels, `2..=64`.
    #[serde(deserialize_with = "lenient_u32")]
    pub spacing: u32,
    /// Line thickness in pixels, `1..=32`, never more than `spacing - 1`.
    #[serde(deserialize_with = "lenient_u32")]
    pub thickness: u32,
    /// Line strength, `0..=1`.
    pub opacity: f32,
    /// Line color.
    pub color: Rgb8,
    /// Line orientation.
    pub direction: ScanlineDirection,
}

impl Default for ScanlinesSettings {
    fn default() -> Self {
        Self {
            spacing: 4,
            thickness: 1,
            opacity: 0.5,
            color: Rgb8::BLACK,
            direction: ScanlineDirection::Horizontal,
        }
    }
}

impl Sanitize for ScanlinesSettings {
    fn sanitize(&mut self) {
        clamp_u32(&mut self.spacing, 2, 64);
        clamp_u32(&mut self.thickness, 1, 32);
        self.thickness = self.thickness.min(self.spacing - 1);
        clamp_f32(&mut self.opacity, 0.0, 1.0, 0.5);
    }
}

/// Applies scanlines. Alpha is preserved.
pub fn apply(src: &Raster, settings: &ScanlinesSettings) -> OpsResult<Raster> {
    let s = settings.sanitized();
    trace!(spacing = s.spacing, thickness = s.thickness, "scanlines");

    let color = s.color.0;
    map_pixels(src, |px, x, y| {
        let pos = match s.direction {
            ScanlineDirection::Horizontal => y,
            ScanlineDirection::Vertical => x,
        };
        if pos % s.spacing >= s.thickness {
            return px;
        }
        [
            lerp_u8(px[0], color[0], s.opacity),
            lerp_u8(px[1], color[1], s.opacity),
            lerp_u8(px[2], color[2], s.opacity),
            px[3],
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines_every_spacing() {
        let img = Raster::filled(4, 8, [200, 100, 50, 255]);
        let out = apply(&img, &ScanlinesSettings::default()).unwrap();
        assert_eq!(out.pixel(0, 0), [100, 50, 25, 255]);
        assert_eq!(out.pixel(0, 1), [200, 100, 50, 255]);
        assert_eq!(out.pixel(3, 4), [100, 50, 25, 255]);
    }

    #[test]
    fn test_vertical() {
        let img = Raster::filled(8, 2, [200, 200, 200, 255]);
        let s = ScanlinesSettings {
            direction: ScanlineDirection::Vertical,
            opacity: 1.0,
            color: Rgb8::new(0, 255, 0),
            ..Default::default()
        };
        let out = apply(&img, &s).unwrap();
        assert_eq!(out.pixel(4, 1), [0, 255, 0, 255]);
        assert_eq!(out.pixel(5, 1), [200, 200, 200, 255]);
    }

    #[test]
    fn test_thickness_never_covers_period() {
        let s = ScanlinesSettings {
            spacing: 3,
            thickness: 30,
            ..Default::default()
        }
        .sanitized();
        assert_eq!(s.thickness, 2);
    }
}
