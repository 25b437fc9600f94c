//! Edge detection.
//!
//! Convolves a 3x3 luminance neighbourhood with a gradient kernel pair,
//! scales the gradient magnitude by `intensity / 100` and binarizes it
//! against `threshold`. The one-pixel image border is never an edge.
//!
//! [`EdgeAlgorithm::Canny`] is a lightweight approximation: it uses the
//! Sobel gradient without non-maximum suppression or hysteresis.
//!
//! # Example
//!
//! ```rust
//! use pixfx_core::Raster;
//! use pixfx_ops::edges::{apply, FindEdgesSettings};
//!
//! let flat = Raster::filled(16, 16, [80, 80, 80, 255]);
//! let out = apply(&flat, &FindEdgesSettings::default()).unwrap();
//! assert!(out.as_bytes().chunks_exact(4).all(|px| px[0] == 0));
//! ```

use crate::blur::box_blur;
use crate::parallel::map_pixels;
use crate::params::{Sanitize, clamp_f32};
use crate::OpsResult;
use pixfx_core::{Raster, luminance_px};
use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Gradient kernel family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeAlgorithm {
    /// Sobel 3x3.
    #[default]
    Sobel,
    /// Prewitt 3x3.
    Prewitt,
    /// Isotropic Laplacian; both gradient components use the same response.
    Laplacian,
    /// Sobel gradient without suppression or hysteresis.
    Canny,
}

/// How edge pixels are colored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EdgeColorMode {
    /// White edges on black.
    #[default]
    Grayscale,
    /// Source color on edges, black elsewhere.
    Color,
    /// Inverted source color on edges, white elsewhere.
    Inverted,
}

/// Settings for the find-edges effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FindEdgesSettings {
    /// Kernel family.
    pub algorithm: EdgeAlgorithm,
    /// Magnitude scale in percent, `0..=500`.
    pub intensity: f32,
    /// Binarization threshold, `0..=255`.
    pub threshold: f32,
    /// Swap black and white in grayscale mode.
    pub invert: bool,
    /// Output coloring.
    pub color_mode: EdgeColorMode,
    /// Pre-blur radius, `0..=10`.
    pub blur_radius: f32,
}

impl Default for FindEdgesSettings {
    fn default() -> Self {
        Self {
            algorithm: EdgeAlgorithm::Sobel,
            intensity: 100.0,
            threshold: 30.0,
            invert: false,
            color_mode: EdgeColorMode::Grayscale,
            blur_radius: 0.0,
        }
    }
}

impl Sanitize for FindEdgesSettings {
    fn sanitize(&mut self) {
        clamp_f32(&mut self.intensity, 0.0, 500.0, 100.0);
        clamp_f32(&mut self.threshold, 0.0, 255.0, 30.0);
        clamp_f32(&mut self.blur_radius, 0.0, 10.0, 0.0);
    }
}

type Kernel3 = [[f32; 3]; 3];

const SOBEL_X: Kernel3 = [[-1.0, 0.0, 1.0], [-2.0, 0.0, 2.0], [-1.0, 0.0, 1.0]];
const SOBEL_Y: Kernel3 = [[-1.0, -2.0, -1.0], [0.0, 0.0, 0.0], [1.0, 2.0, 1.0]];
const PREWITT_X: Kernel3 = [[-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0], [-1.0, 0.0, 1.0]];
const PREWITT_Y: Kernel3 = [[-1.0, -1.0, -1.0], [0.0, 0.0, 0.0], [1.0, 1.0, 1.0]];
const LAPLACIAN: Kernel3 = [[0.0, 1.0, 0.0], [1.0, -4.0, 1.0], [0.0, 1.0, 0.0]];

impl EdgeAlgorithm {
    fn kernels(self) -> (&'static Kernel3, &'static Kernel3) {
        match self {
            EdgeAlgorithm::Sobel | EdgeAlgorithm::Canny => (&SOBEL_X, &SOBEL_Y),
            EdgeAlgorithm::Prewitt => (&PREWITT_X, &PREWITT_Y),
            EdgeAlgorithm::Laplacian => (&LAPLACIAN, &LAPLACIAN),
        }
    }
}

/// Scaled gradient magnitude per pixel, `0..=255`, zero on the border.
///
/// Luminance is rounded to whole 8-bit steps first, so a flat region
/// yields an exact zero response.
pub fn gradient_magnitude(src: &Raster, algorithm: EdgeAlgorithm, intensity: f32) -> Vec<f32> {
    let w = src.width() as usize;
    let h = src.height() as usize;
    let luma: Vec<f32> = src
        .as_bytes()
        .chunks_exact(4)
        .map(|px| luminance_px([px[0], px[1], px[2], px[3]]).round())
        .collect();

    let (kx, ky) = algorithm.kernels();
    let scale = intensity / 100.0;
    let mut mag = vec![0.0f32; w * h];
    if w < 3 || h < 3 {
        return mag;
    }

    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let mut gx = 0.0f32;
            let mut gy = 0.0f32;
            for (j, (rx, ry)) in kx.iter().zip(ky.iter()).enumerate() {
                let row = (y + j - 1) * w;
                for i in 0..3 {
                    let l = luma[row + x + i - 1];
                    gx += rx[i] * l;
                    gy += ry[i] * l;
                }
            }
            mag[y * w + x] = ((gx * gx + gy * gy).sqrt() * scale).min(255.0);
        }
    }
    mag
}

/// Applies edge detection.
pub fn apply(src: &Raster, settings: &FindEdgesSettings) -> OpsResult<Raster> {
    let s = settings.sanitized();
    trace!(algorithm = ?s.algorithm, threshold = s.threshold, "find_edges");

    let radius = s.blur_radius.round() as usize;
    let mag = if radius > 0 {
        let blurred = box_blur(src, radius, 3)?;
        gradient_magnitude(&blurred, s.algorithm, s.intensity)
    } else {
        gradient_magnitude(src, s.algorithm, s.intensity)
    };

    let w = src.width() as usize;
    map_pixels(src, |px, x, y| {
        let edge = mag[y as usize * w + x as usize] > s.threshold;
        let rgb = match s.color_mode {
            EdgeColorMode::Grayscale => {
                let v = if edge != s.invert { 255 } else { 0 };
                [v, v, v]
            }
            EdgeColorMode::Color if edge => [px[0], px[1], px[2]],
            EdgeColorMode::Color => [0, 0, 0],
            EdgeColorMode::Inverted if edge => [255 - px[0], 255 - px[1], 255 - px[2]],
            EdgeColorMode::Inverted => [255, 255, 255],
        };
        [rgb[0], rgb[1], rgb[2], px[3]]
    })
}
