//! Posterize: reduce the number of tonal levels.
//!
//! Three strategies:
//!
//! - `rgb` quantizes the channel sum and rescales the channels by the same
//!   ratio, so hue survives; with `preserveColor` off each channel is
//!   quantized on its own
//! - `hsv` quantizes hue, saturation and value independently
//! - `lab` quantizes luminance only, keeping the channel ratio or going gray
//!
//! An optional Floyd-Steinberg pass spreads the quantization error
//! (7/16 right, 3/16 below-left, 5/16 below, 1/16 below-right), scaled by
//! `ditherAmount`.

use crate::params::{Sanitize, clamp_f32, clamp_u32, lenient_u32};
use crate::OpsResult;
use pixfx_color::convert::{hsv_to_rgb, rgb_to_hsv};
use pixfx_core::{CHANNELS, LUMA_B, LUMA_G, LUMA_R, Raster, clamp_u8};
use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Color space used for quantization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PosterizeSpace {
    /// Channel-sum proxy.
    #[default]
    Rgb,
    /// Hue, saturation and value.
    Hsv,
    /// Luminance only.
    Lab,
}

/// Settings for the posterize effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PosterizeSettings {
    /// Levels per quantized component, `2..=32`.
    #[serde(deserialize_with = "lenient_u32")]
    pub levels: u32,
    /// Quantization space.
    pub color_space: PosterizeSpace,
    /// Keep channel ratios in `rgb` and `lab`.
    pub preserve_color: bool,
    /// Diffuse quantization error.
    pub dither: bool,
    /// Fraction of the error that is diffused, `0..=1`.
    pub dither_amount: f32,
}

impl Default for PosterizeSettings {
    fn default() -> Self {
        Self {
            levels: 4,
            color_space: PosterizeSpace::Rgb,
            preserve_color: true,
            dither: false,
            dither_amount: 0.5,
        }
    }
}

impl Sanitize for PosterizeSettings {
    fn sanitize(&mut self) {
        clamp_u32(&mut self.levels, 2, 32);
        clamp_f32(&mut self.dither_amount, 0.0, 1.0, 0.5);
    }
}

#[inline]
fn step(v: f32, levels: u32) -> f32 {
    let n = (levels - 1) as f32;
    (v.clamp(0.0, 1.0) * n).round() / n
}

/// Ratio-rescales `rgb` so its proxy moves from `from` to `to`.
fn rescale(rgb: [f32; 3], from: f32, to: f32) -> [f32; 3] {
    if from <= f32::EPSILON {
        [to; 3]
    } else {
        rgb.map(|c| (c * to / from).clamp(0.0, 255.0))
    }
}

/// Quantizes one color (components in `0..=255`).
pub fn quantize(rgb: [f32; 3], s: &PosterizeSettings) -> [f32; 3] {
    let levels = s.levels;
    match s.color_space {
        PosterizeSpace::Rgb if s.preserve_color => {
            let sum = rgb[0] + rgb[1] + rgb[2];
            let q = step(sum / 765.0, levels) * 765.0;
            if sum <= f32::EPSILON {
                [q / 3.0; 3]
            } else {
                rescale(rgb, sum / 3.0, q / 3.0)
            }
        }
        PosterizeSpace::Rgb => rgb.map(|c| step(c / 255.0, levels) * 255.0),
        PosterizeSpace::Hsv => {
            let [h, sat, v] = rgb_to_hsv(rgb.map(|c| (c / 255.0).clamp(0.0, 1.0)));
            let h = (h / 360.0 * levels as f32).round() / levels as f32 * 360.0;
            let out = hsv_to_rgb([h.rem_euclid(360.0), step(sat, levels), step(v, levels)]);
            out.map(|c| c * 255.0)
        }
        PosterizeSpace::Lab => {
            let l = LUMA_R * rgb[0] + LUMA_G * rgb[1] + LUMA_B * rgb[2];
            let q = step(l / 255.0, levels) * 255.0;
            if s.preserve_color {
                rescale(rgb, l, q)
            } else {
                [q; 3]
            }
        }
    }
}

/// Applies posterization.
pub fn apply(src: &Raster, settings: &PosterizeSettings) -> OpsResult<Raster> {
    let s = settings.sanitized();
    trace!(levels = s.levels, space = ?s.color_space, dither = s.dither, "posterize");

    let w = src.width() as usize;
    let h = src.height() as usize;
    let mut work: Vec<[f32; 3]> = src
        .as_bytes()
        .chunks_exact(CHANNELS)
        .map(|p| [p[0] as f32, p[1] as f32, p[2] as f32])
        .collect();

    let mut dst = src.try_new_like()?;
    let diffuse = s.dither && s.dither_amount > 0.0;
    let out = dst.as_bytes_mut();

    for y in 0..h {
        for x in 0..w {
            let i = y * w + x;
            let old = work[i];
            let new = quantize(old, &s);
            let o = i * CHANNELS;
            out[o] = clamp_u8(new[0]);
            out[o + 1] = clamp_u8(new[1]);
            out[o + 2] = clamp_u8(new[2]);
            out[o + 3] = src.as_bytes()[o + 3];

            if diffuse {
                let err = [0, 1, 2].map(|c| (old[c] - new[c]) * s.dither_amount);
                let mut spread = |dx: isize, dy: usize, weight: f32| {
                    let nx = x as isize + dx;
                    let ny = y + dy;
                    if nx >= 0 && (nx as usize) < w && ny < h {
                        let cell = &mut work[ny * w + nx as usize];
                        for c in 0..3 {
                            cell[c] += err[c] * weight;
                        }
                    }
                };
                spread(1, 0, 7.0 / 16.0);
                spread(-1, 1, 3.0 / 16.0);
                spread(0, 1, 5.0 / 16.0);
                spread(1, 1, 1.0 / 16.0);
            }
        }
    }
    Ok(dst)
}
