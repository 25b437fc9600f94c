//! Radial vignette.

use crate::parallel::map_pixels;
use crate::params::{Sanitize, clamp_f32};
use crate::OpsResult;
use pixfx_color::Rgb8;
use pixfx_core::{Raster, pixel::lerp_u8};
use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Settings for the vignette effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct VignetteSettings {
    /// Maximum darkening at the corners, `0..=1`.
    pub amount: f32,
    /// Distance where the falloff starts, as a fraction of the half-diagonal, `0..=1.5`.
    pub radius: f32,
    /// Width of the falloff, `0.01..=1`.
    pub softness: f32,
    /// Vignette color.
    pub color: Rgb8,
}

impl Default for VignetteSettings {
    fn default() -> Self {
        Self {
            amount: 0.5,
            radius: 0.75,
            softness: 0.5,
            color: Rgb8::BLACK,
        }
    }
}

impl Sanitize for VignetteSettings {
    fn sanitize(&mut self) {
        clamp_f32(&mut self.amount, 0.0, 1.0, 0.5);
        clamp_f32(&mut self.radius, 0.0, 1.5, 0.75);
        clamp_f32(&mut self.softness, 0.01, 1.0, 0.5);
    }
}

/// Applies the vignette. Alpha is preserved.
pub fn apply(src: &Raster, settings: &VignetteSettings) -> OpsResult<Raster> {
    let s = settings.sanitized();
    trace!(amount = s.amount, radius = s.radius, "vignette");

    let cx = src.width() as f32 * 0.5;
    let cy = src.height() as f32 * 0.5;
    let half_diag = (cx * cx + cy * cy).sqrt().max(f32::EPSILON);
    let color = s.color.0;

    map_pixels(src, |px, x, y| {
        let dx = x as f32 + 0.5 - cx;
        let dy = y as f32 + 0.5 - cy;
        let d = (dx * dx + dy * dy).sqrt() / half_diag;
        let t = ((d - s.radius) / s.softness).clamp(0.0, 1.0);
        // smoothstep
        let f = t * t * (3.0 - 2.0 * t) * s.amount;
        [
            lerp_u8(px[0], color[0], f),
            lerp_u8(px[1], color[1], f),
            lerp_u8(px[2], color[2], f),
            px[3],
        ]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_center_untouched_corners_darker() {
        let img = Raster::filled(21, 21, [200, 200, 200, 255]);
        let out = apply(&img, &VignetteSettings::default()).unwrap();
        assert_eq!(out.pixel(10, 10), [200, 200, 200, 255]);
        assert!(out.pixel(0, 0)[0] < 200);
    }

    #[test]
    fn test_zero_amount_identity() {
        let img = Raster::filled(9, 5, [1, 2, 3, 4]);
        let s = VignetteSettings {
            amount: 0.0,
            ..Default::default()
        };
        assert_eq!(apply(&img, &s).unwrap(), img);
    }
}
