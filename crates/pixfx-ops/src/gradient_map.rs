//! Gradient map: recolors each pixel from a ramp indexed by its luminance.

use crate::parallel::map_pixels;
use crate::params::{Sanitize, clamp_f32};
use crate::OpsResult;
use pixfx_color::{BlendMode, Gradient, GradientStop, Rgb8, composite};
use pixfx_core::{Raster, luminance_px};
use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Settings for the gradient-map effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GradientMapSettings {
    /// Ramp stops; fewer than two is an error.
    pub stops: Vec<GradientStop>,
    /// How the ramp color combines with the original pixel.
    pub blend_mode: BlendMode,
    /// Mix between original and blended result, `0..=1`.
    pub opacity: f32,
}

impl Default for GradientMapSettings {
    fn default() -> Self {
        Self {
            stops: vec![
                GradientStop::new(0.0, Rgb8::new(0x1a, 0x1a, 0x2e)),
                GradientStop::new(50.0, Rgb8::new(0xe9, 0x45, 0x60)),
                GradientStop::new(100.0, Rgb8::new(0xf5, 0xe6, 0xc8)),
            ],
            blend_mode: BlendMode::Normal,
            opacity: 1.0,
        }
    }
}

impl Sanitize for GradientMapSettings {
    fn sanitize(&mut self) {
        self.stops.retain(|s| s.position.is_finite());
        for stop in &mut self.stops {
            stop.position = stop.position.clamp(0.0, 100.0);
        }
        clamp_f32(&mut self.opacity, 0.0, 1.0, 1.0);
    }
}

/// Applies the gradient map. Alpha is preserved.
///
/// # Errors
///
/// [`OpsError::Color`](crate::OpsError::Color) when fewer than two stops are given.
pub fn apply(src: &Raster, settings: &GradientMapSettings) -> OpsResult<Raster> {
    let s = settings.sanitized();
    trace!(stops = s.stops.len(), mode = %s.blend_mode, opacity = s.opacity, "gradient_map");

    let lut = Gradient::new(s.stops)?.lut();
    map_pixels(src, |px, _, _| {
        let l = luminance_px(px).round().clamp(0.0, 255.0) as usize;
        composite(px, lut[l], s.blend_mode, s.opacity)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bw_settings() -> GradientMapSettings {
        GradientMapSettings {
            stops: vec![
                GradientStop::new(100.0, Rgb8::WHITE),
                GradientStop::new(0.0, Rgb8::BLACK),
            ],
            ..Default::default()
        }
    }

    #[test]
    fn test_black_white_ramp_is_grayscale() {
        let img = Raster::filled(3, 3, [255, 0, 0, 99]);
        let out = apply(&img, &bw_settings()).unwrap();
        // luminance of pure red is 76.245
        assert_eq!(out.pixel(1, 1), [76, 76, 76, 99]);
    }

    #[test]
    fn test_single_stop_is_rejected() {
        let img = Raster::filled(3, 3, [10, 20, 30, 255]);
        let s = GradientMapSettings {
            stops: vec![GradientStop::new(0.0, Rgb8::WHITE)],
            ..Default::default()
        };
        assert!(matches!(apply(&img, &s), Err(crate::OpsError::Color(_))));
    }

    #[test]
    fn test_zero_opacity_is_identity() {
        let img = Raster::filled(3, 3, [10, 200, 30, 255]);
        let s = GradientMapSettings {
            opacity: 0.0,
            ..Default::default()
        };
        assert_eq!(apply(&img, &s).unwrap(), img);
    }

    #[test]
    fn test_settings_json_defaults() {
        let s: GradientMapSettings = serde_json::from_str(r#"{"opacity": 0.5}"#).unwrap();
        assert_eq!(s.stops.len(), 3);
        assert_eq!(s.blend_mode, BlendMode::Normal);
        let s: GradientMapSettings =
            serde_json::from_str(r##"{"stops":[{"position":0,"color":"#000"},{"position":100,"color":"#fff"}],"blendMode":"multiply"}"##)
                .unwrap();
        assert_eq!(s.blend_mode, BlendMode::Multiply);
        assert_eq!(s.stops[1].color, Rgb8::WHITE);
    }
}
