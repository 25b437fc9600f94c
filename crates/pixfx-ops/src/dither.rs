//! Dithering: error diffusion, ordered Bayer, threshold and random.
//!
//! Values are processed normalized to `[0, 1]` and quantized to `levels`
//! evenly spaced steps. Grayscale mode dithers luminance; rgb mode dithers
//! each channel. `pixelScale > 1` dithers a block-averaged grid and expands
//! it back, giving chunky dots.

use crate::params::{Sanitize, clamp_f32, clamp_u32, lenient_u32};
use crate::OpsResult;
use pixfx_core::{CHANNELS, LUMA_B, LUMA_G, LUMA_R, Raster, Rng, clamp_u8};
use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Dithering algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DitherAlgorithm {
    /// Floyd-Steinberg diffusion.
    #[default]
    FloydSteinberg,
    /// Atkinson diffusion (only 6/8 of the error is spread).
    Atkinson,
    /// Jarvis-Judice-Ninke diffusion.
    JarvisJudiceNinke,
    /// Stucki diffusion.
    Stucki,
    /// Ordered 2x2 Bayer.
    Bayer2,
    /// Ordered 4x4 Bayer.
    Bayer4,
    /// Ordered 8x8 Bayer.
    Bayer8,
    /// Plain quantization.
    Threshold,
    /// Seeded random threshold.
    Random,
}

/// Channels that get dithered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DitherColorMode {
    /// Luminance only; output is gray.
    #[default]
    Grayscale,
    /// Each RGB channel independently.
    Rgb,
}

/// Settings for the dither effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DitherSettings {
    /// Algorithm.
    pub algorithm: DitherAlgorithm,
    /// Output levels per channel, `2..=16`.
    #[serde(deserialize_with = "lenient_u32")]
    pub levels: u32,
    /// Grayscale or per-channel.
    pub color_mode: DitherColorMode,
    /// Dot size in pixels, `1..=16`.
    #[serde(deserialize_with = "lenient_u32")]
    pub pixel_scale: u32,
    /// Bias toward dark (positive) or light (negative), `-1..=1`.
    pub threshold: f32,
    /// PRNG seed for the random algorithm.
    pub seed: u32,
}

impl Default for DitherSettings {
    fn default() -> Self {
        Self {
            algorithm: DitherAlgorithm::FloydSteinberg,
            levels: 2,
            color_mode: DitherColorMode::Grayscale,
            pixel_scale: 1,
            threshold: 0.0,
            seed: 1,
        }
    }
}

impl Sanitize for DitherSettings {
    fn sanitize(&mut self) {
        clamp_u32(&mut self.levels, 2, 16);
        clamp_u32(&mut self.pixel_scale, 1, 16);
        clamp_f32(&mut self.threshold, -1.0, 1.0, 0.0);
    }
}

/// Error diffusion entry: `(dx, dy, weight)`.
type Diffusion = (i32, i32, f32);

impl DitherAlgorithm {
    fn diffusion(self) -> Option<&'static [Diffusion]> {
        match self {
            DitherAlgorithm::FloydSteinberg => Some(&[
                (1, 0, 7.0 / 16.0),
                (-1, 1, 3.0 / 16.0),
                (0, 1, 5.0 / 16.0),
                (1, 1, 1.0 / 16.0),
            ]),
            DitherAlgorithm::Atkinson => Some(&[
                (1, 0, 1.0 / 8.0),
                (2, 0, 1.0 / 8.0),
                (-1, 1, 1.0 / 8.0),
                (0, 1, 1.0 / 8.0),
                (1, 1, 1.0 / 8.0),
                (0, 2, 1.0 / 8.0),
            ]),
            DitherAlgorithm::JarvisJudiceNinke => Some(&[
                (1, 0, 7.0 / 48.0),
                (2, 0, 5.0 / 48.0),
                (-2, 1, 3.0 / 48.0),
                (-1, 1, 5.0 / 48.0),
                (0, 1, 7.0 / 48.0),
                (1, 1, 5.0 / 48.0),
                (2, 1, 3.0 / 48.0),
                (-2, 2, 1.0 / 48.0),
                (-1, 2, 3.0 / 48.0),
                (0, 2, 5.0 / 48.0),
                (1, 2, 3.0 / 48.0),
                (2, 2, 1.0 / 48.0),
            ]),
            DitherAlgorithm::Stucki => Some(&[
                (1, 0, 8.0 / 42.0),
                (2, 0, 4.0 / 42.0),
                (-2, 1, 2.0 / 42.0),
                (-1, 1, 4.0 / 42.0),
                (0, 1, 8.0 / 42.0),
                (1, 1, 4.0 / 42.0),
                (2, 1, 2.0 / 42.0),
                (-2, 2, 1.0 / 42.0),
                (-1, 2, 2.0 / 42.0),
                (0, 2, 4.0 / 42.0),
                (1, 2, 2.0 / 42.0),
                (2, 2, 1.0 / 42.0),
            ]),
            _ => None,
        }
    }

    fn bayer_order(self) -> Option<u32> {
        match self {
            DitherAlgorithm::Bayer2 => Some(1),
            DitherAlgorithm::Bayer4 => Some(2),
            DitherAlgorithm::Bayer8 => Some(3),
            _ => None,
        }
    }
}

/// Bayer matrix entry for a `2^order` square matrix, in `0..4^order`.
///
/// Built from the 2x2 base `[[0, 2], [3, 1]]`: the low bits of `x` and `y`
/// select the most significant base-4 digit.
pub fn bayer_index(order: u32, x: u32, y: u32) -> u32 {
    let mut v = 0;
    for bit in 0..order {
        let xb = (x >> bit) & 1;
        let yb = (y >> bit) & 1;
        v = v * 4 + (((xb ^ yb) << 1) | yb);
    }
    v
}

#[inline]
fn quantize(v: f32, levels: u32) -> f32 {
    let n = (levels - 1) as f32;
    ((v * n).round() / n).clamp(0.0, 1.0)
}

/// Dithers a planar buffer of normalized values in place.
fn dither_plane(values: &mut [[f32; 3]], width: usize, height: usize, channels: usize, s: &DitherSettings) {
    let step = 1.0 / (s.levels - 1) as f32;
    let bias = s.threshold * step * 0.5;

    if let Some(kernel) = s.algorithm.diffusion() {
        for y in 0..height {
            for x in 0..width {
                let i = y * width + x;
                let old = values[i];
                let mut new = old;
                for c in 0..channels {
                    new[c] = quantize(old[c] - bias, s.levels);
                }
                values[i] = new;
                for &(dx, dy, weight) in kernel {
                    let nx = x as i32 + dx;
                    let ny = y + dy as usize;
                    if nx >= 0 && (nx as usize) < width && ny < height {
                        let cell = &mut values[ny * width + nx as usize];
                        for c in 0..channels {
                            cell[c] += (old[c] - new[c]) * weight;
                        }
                    }
                }
            }
        }
        return;
    }

    let mut rng = Rng::new(s.seed);
    let order = s.algorithm.bayer_order();
    for y in 0..height {
        for x in 0..width {
            let offset = match (s.algorithm, order) {
                (_, Some(order)) => {
                    let n = (1u32 << order) as f32;
                    let t = (bayer_index(order, x as u32, y as u32) as f32 + 0.5) / (n * n);
                    (t - 0.5) * step
                }
                (DitherAlgorithm::Random, None) => (rng.next_f32() - 0.5) * step,
                _ => 0.0,
            };
            let px = &mut values[y * width + x];
            for c in 0..channels {
                px[c] = quantize(px[c] + offset - bias, s.levels);
            }
        }
    }
}

/// Applies dithering. Alpha is preserved.
pub fn apply(src: &Raster, settings: &DitherSettings) -> OpsResult<Raster> {
    let s = settings.sanitized();
    trace!(algorithm = ?s.algorithm, levels = s.levels, scale = s.pixel_scale, "dither");

    let w = src.width() as usize;
    let h = src.height() as usize;
    let scale = s.pixel_scale as usize;
    let gw = w.div_ceil(scale);
    let gh = h.div_ceil(scale);

    // Block-average into the dither grid.
    let mut sums = vec![[0.0f32; 3]; gw * gh];
    let mut counts = vec![0u32; gw * gh];
    for (i, px) in src.as_bytes().chunks_exact(CHANNELS).enumerate() {
        let g = (i / w / scale) * gw + (i % w) / scale;
        for c in 0..3 {
            sums[g][c] += px[c] as f32 / 255.0;
        }
        counts[g] += 1;
    }
    let grayscale = s.color_mode == DitherColorMode::Grayscale;
    let mut grid: Vec<[f32; 3]> = sums
        .iter()
        .zip(&counts)
        .map(|(sum, &n)| {
            let m = sum.map(|v| v / n.max(1) as f32);
            if grayscale {
                [LUMA_R * m[0] + LUMA_G * m[1] + LUMA_B * m[2], 0.0, 0.0]
            } else {
                m
            }
        })
        .collect();

    dither_plane(&mut grid, gw, gh, if grayscale { 1 } else { 3 }, &s);

    let mut dst = src.try_new_like()?;
    let out = dst.as_bytes_mut();
    for (i, px) in src.as_bytes().chunks_exact(CHANNELS).enumerate() {
        let g = grid[(i / w / scale) * gw + (i % w) / scale];
        let rgb = if grayscale { [g[0]; 3] } else { g };
        let o = i * CHANNELS;
        for c in 0..3 {
            out[o + c] = clamp_u8(rgb[c] * 255.0);
        }
        out[o + 3] = px[3];
    }
    Ok(dst)
}
