//! Seeded additive noise.

use crate::params::{Sanitize, clamp_f32};
use crate::OpsResult;
use pixfx_core::{CHANNELS, Raster, Rng, clamp_u8};
use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Settings for the noise effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NoiseSettings {
    /// Strength in percent of full range, `0..=100`.
    pub amount: f32,
    /// Same offset on all three channels.
    pub monochrome: bool,
    /// PRNG seed.
    pub seed: u32,
}

impl Default for NoiseSettings {
    fn default() -> Self {
        Self {
            amount: 20.0,
            monochrome: true,
            seed: 1,
        }
    }
}

impl Sanitize for NoiseSettings {
    fn sanitize(&mut self) {
        clamp_f32(&mut self.amount, 0.0, 100.0, 20.0);
    }
}

/// Adds uniform noise in `-amount..=amount` percent. Alpha is preserved.
///
/// Pixels are visited in row-major order so one seed always yields the same
/// grain.
pub fn apply(src: &Raster, settings: &NoiseSettings) -> OpsResult<Raster> {
    let s = settings.sanitized();
    trace!(amount = s.amount, monochrome = s.monochrome, seed = s.seed, "noise");

    let magnitude = s.amount * 2.55;
    let mut rng = Rng::new(s.seed);
    let mut dst = src.try_new_like()?;
    for (out, px) in dst
        .as_bytes_mut()
        .chunks_exact_mut(CHANNELS)
        .zip(src.as_bytes().chunks_exact(CHANNELS))
    {
        let n = if s.monochrome {
            [rng.signed(magnitude); 3]
        } else {
            [rng.signed(magnitude), rng.signed(magnitude), rng.signed(magnitude)]
        };
        for c in 0..3 {
            out[c] = clamp_u8(px[c] as f32 + n[c]);
        }
        out[3] = px[3];
    }
    Ok(dst)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_amount_identity() {
        let img = Raster::filled(8, 8, [10, 128, 250, 77]);
        let s = NoiseSettings {
            amount: 0.0,
            ..Default::default()
        };
        assert_eq!(apply(&img, &s).unwrap(), img);
    }

    #[test]
    fn test_bounded_and_seeded() {
        let img = Raster::filled(16, 16, [128, 128, 128, 255]);
        let s = NoiseSettings {
            amount: 10.0,
            ..Default::default()
        };
        let a = apply(&img, &s).unwrap();
        assert_eq!(a, apply(&img, &s).unwrap());
        assert_ne!(a, img);
        for p in a.as_bytes().chunks_exact(4) {
            assert!((p[0] as i32 - 128).abs() <= 26);
            assert_eq!(p[0], p[1]);
            assert_eq!(p[3], 255);
        }
    }

    #[test]
    fn test_color_noise_differs_per_channel() {
        let img = Raster::filled(16, 16, [128, 128, 128, 255]);
        let s = NoiseSettings {
            monochrome: false,
            ..Default::default()
        };
        let out = apply(&img, &s).unwrap();
        assert!(out.as_bytes().chunks_exact(4).any(|p| p[0] != p[1]));
    }
}
