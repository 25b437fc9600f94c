//! Box blur.
//!
//! A separable sliding-window box filter with clamp-to-edge sampling.
//! Repeating it a few passes approximates a Gaussian; three passes is the
//! usual compromise and is what the edge detector uses for its pre-blur.
//!
//! # Example
//!
//! ```rust
//! use pixfx_core::Raster;
//! use pixfx_ops::blur::{apply, BlurSettings};
//!
//! let img = Raster::filled(8, 8, [40, 80, 120, 255]);
//! let out = apply(&img, &BlurSettings::default()).unwrap();
//! assert_eq!(out, img);
//! ```

use crate::params::{Sanitize, clamp_f32, clamp_u32, lenient_u32};
use crate::OpsResult;
use pixfx_core::{CHANNELS, Raster};
use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Settings for the blur effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BlurSettings {
    /// Window radius in pixels, `0..=100`.
    pub radius: f32,
    /// Number of box passes, `1..=5`.
    #[serde(deserialize_with = "lenient_u32")]
    pub passes: u32,
}

impl Default for BlurSettings {
    fn default() -> Self {
        Self {
            radius: 4.0,
            passes: 3,
        }
    }
}

impl Sanitize for BlurSettings {
    fn sanitize(&mut self) {
        clamp_f32(&mut self.radius, 0.0, 100.0, 4.0);
        clamp_u32(&mut self.passes, 1, 5);
    }
}

/// Applies the blur effect.
pub fn apply(src: &Raster, settings: &BlurSettings) -> OpsResult<Raster> {
    let s = settings.sanitized();
    box_blur(src, s.radius.round() as usize, s.passes)
}

/// Multi-pass box blur over all four channels.
///
/// A radius of zero returns an unchanged copy.
pub fn box_blur(src: &Raster, radius: usize, passes: u32) -> OpsResult<Raster> {
    trace!(width = src.width(), height = src.height(), radius, passes, "box_blur");

    let w = src.width() as usize;
    let h = src.height() as usize;
    let mut cur = src.as_bytes().to_vec();
    if radius == 0 {
        return Ok(Raster::from_rgba(src.width(), src.height(), cur)?);
    }

    let mut tmp = src.try_new_like()?.into_bytes();

    for _ in 0..passes.max(1) {
        blur_horizontal(&cur, &mut tmp, w, h, radius);
        blur_vertical(&tmp, &mut cur, w, h, radius);
    }

    Ok(Raster::from_rgba(src.width(), src.height(), cur)?)
}

#[inline]
fn average(sum: u32, size: u32) -> u8 {
    ((sum + size / 2) / size) as u8
}

fn blur_horizontal(src: &[u8], dst: &mut [u8], width: usize, height: usize, radius: usize) {
    let size = (2 * radius + 1) as u32;
    for y in 0..height {
        let row = y * width;
        for c in 0..CHANNELS {
            let at = |x: usize| src[(row + x) * CHANNELS + c] as u32;
            let mut sum = at(0) * radius as u32;
            for kx in 0..=radius {
                sum += at(kx.min(width - 1));
            }
            for x in 0..width {
                dst[(row + x) * CHANNELS + c] = average(sum, size);
                let left = x.saturating_sub(radius);
                let right = (x + radius + 1).min(width - 1);
                sum = sum - at(left) + at(right);
            }
        }
    }
}

fn blur_vertical(src: &[u8], dst: &mut [u8], width: usize, height: usize, radius: usize) {
    let size = (2 * radius + 1) as u32;
    for x in 0..width {
        for c in 0..CHANNELS {
            let at = |y: usize| src[(y * width + x) * CHANNELS + c] as u32;
            let mut sum = at(0) * radius as u32;
            for ky in 0..=radius {
                sum += at(ky.min(height - 1));
            }
            for y in 0..height {
                dst[(y * width + x) * CHANNELS + c] = average(sum, size);
                let top = y.saturating_sub(radius);
                let bottom = (y + radius + 1).min(height - 1);
                sum = sum - at(top) + at(bottom);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_image_is_fixed_point() {
        let img = Raster::filled(7, 5, [12, 200, 99, 128]);
        for passes in 1..=5 {
            assert_eq!(box_blur(&img, 3, passes).unwrap(), img);
        }
    }

    #[test]
    fn test_zero_radius_copies() {
        let mut img = Raster::new(4, 4);
        img.set_pixel(1, 2, [255, 0, 0, 255]);
        assert_eq!(box_blur(&img, 0, 3).unwrap(), img);
    }

    #[test]
    fn test_spreads_single_pixel() {
        let mut img = Raster::filled(9, 9, [0, 0, 0, 255]);
        img.set_pixel(4, 4, [255, 255, 255, 255]);
        let out = box_blur(&img, 1, 1).unwrap();
        // 255 / 9 rounds to 28
        assert_eq!(out.pixel(4, 4)[0], 28);
        assert_eq!(out.pixel(3, 3)[0], 28);
        assert_eq!(out.pixel(2, 2)[0], 0);
    }

    #[test]
    fn test_radius_larger_than_image() {
        let mut img = Raster::filled(2, 1, [0, 0, 0, 255]);
        img.set_pixel(1, 0, [200, 200, 200, 255]);
        let out = box_blur(&img, 10, 1).unwrap();
        assert_eq!(out.dimensions(), (2, 1));
    }

    #[test]
    fn test_settings_clamped() {
        let s = BlurSettings {
            radius: f32::NAN,
            passes: 99,
        }
        .sanitized();
        assert_eq!(s.radius, 4.0);
        assert_eq!(s.passes, 5);
    }
}
