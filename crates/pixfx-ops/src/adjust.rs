//! Basic color adjustments: brightness, contrast, saturation, hue, gamma, invert.
//!
//! Steps run in that order on every pixel. Neutral settings are an exact
//! identity: the HSL round trip and the gamma curve are skipped when they
//! would not change anything.

use crate::parallel::map_pixels;
use crate::params::{Sanitize, clamp_f32};
use crate::OpsResult;
use pixfx_color::convert::{hsl_to_rgb, rgb_to_hsl};
use pixfx_core::{Raster, clamp_u8};
use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Settings for the adjust effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AdjustSettings {
    /// Additive brightness, `-100..=100`.
    pub brightness: f32,
    /// Contrast, `-100..=100`.
    pub contrast: f32,
    /// Saturation change in percent, `-100..=100`.
    pub saturation: f32,
    /// Hue rotation in degrees, `-180..=180`.
    pub hue: f32,
    /// Gamma, `0.1..=5`.
    pub gamma: f32,
    /// Invert the result.
    pub invert: bool,
}

impl Default for AdjustSettings {
    fn default() -> Self {
        Self {
            brightness: 0.0,
            contrast: 0.0,
            saturation: 0.0,
            hue: 0.0,
            gamma: 1.0,
            invert: false,
        }
    }
}

impl Sanitize for AdjustSettings {
    fn sanitize(&mut self) {
        clamp_f32(&mut self.brightness, -100.0, 100.0, 0.0);
        clamp_f32(&mut self.contrast, -100.0, 100.0, 0.0);
        clamp_f32(&mut self.saturation, -100.0, 100.0, 0.0);
        clamp_f32(&mut self.hue, -180.0, 180.0, 0.0);
        clamp_f32(&mut self.gamma, 0.1, 5.0, 1.0);
    }
}

/// Applies the adjustments.
pub fn apply(src: &Raster, settings: &AdjustSettings) -> OpsResult<Raster> {
    let s = settings.sanitized();
    trace!(?s, "adjust");

    let offset = s.brightness * 2.55;
    // Classic contrast correction factor; c in -255..255.
    let c = s.contrast * 2.55;
    let factor = (259.0 * (c + 255.0)) / (255.0 * (259.0 - c));
    let do_hsl = s.saturation != 0.0 || s.hue != 0.0;
    let sat_scale = 1.0 + s.saturation / 100.0;
    let inv_gamma = 1.0 / s.gamma;
    let do_gamma = s.gamma != 1.0;

    let lut: Vec<u8> = (0..=255u8)
        .map(|v| {
            let mut f = v as f32 + offset;
            f = factor * (f - 128.0) + 128.0;
            clamp_u8(f)
        })
        .collect();

    map_pixels(src, |px, _, _| {
        let mut rgb = [lut[px[0] as usize], lut[px[1] as usize], lut[px[2] as usize]];

        if do_hsl {
            let mut hsl = rgb_to_hsl(rgb.map(|v| v as f32 / 255.0));
            hsl[0] = (hsl[0] + s.hue).rem_euclid(360.0);
            hsl[1] = (hsl[1] * sat_scale).clamp(0.0, 1.0);
            rgb = hsl_to_rgb(hsl).map(|v| clamp_u8(v * 255.0));
        }

        if do_gamma {
            rgb = rgb.map(|v| clamp_u8((v as f32 / 255.0).powf(inv_gamma) * 255.0));
        }

        if s.invert {
            rgb = rgb.map(|v| 255 - v);
        }

        [rgb[0], rgb[1], rgb[2], px[3]]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Raster {
        let mut img = Raster::new(16, 16);
        for y in 0..16 {
            for x in 0..16 {
                img.set_pixel(x, y, [(x * 16) as u8, (y * 16) as u8, ((x + y) * 8) as u8, 200]);
            }
        }
        img
    }

    #[test]
    fn test_defaults_are_identity() {
        let img = sample();
        assert_eq!(apply(&img, &AdjustSettings::default()).unwrap(), img);
    }

    #[test]
    fn test_invert_twice() {
        let img = sample();
        let s = AdjustSettings {
            invert: true,
            ..Default::default()
        };
        let once = apply(&img, &s).unwrap();
        assert_eq!(once.pixel(1, 0), [239, 255, 247, 200]);
        assert_eq!(apply(&once, &s).unwrap(), img);
    }

    #[test]
    fn test_full_desaturation_is_gray() {
        let s = AdjustSettings {
            saturation: -100.0,
            ..Default::default()
        };
        let out = apply(&sample(), &s).unwrap();
        for px in out.as_bytes().chunks_exact(4) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
    }

    #[test]
    fn test_brightness_saturates() {
        let img = Raster::filled(2, 2, [250, 10, 128, 255]);
        let s = AdjustSettings {
            brightness: 100.0,
            ..Default::default()
        };
        assert_eq!(apply(&img, &s).unwrap().pixel(0, 0)[0], 255);
    }

    #[test]
    fn test_nan_is_neutral() {
        let img = sample();
        let s = AdjustSettings {
            gamma: f32::NAN,
            contrast: f32::NAN,
            ..Default::default()
        };
        assert_eq!(apply(&img, &s).unwrap(), img);
    }
}
