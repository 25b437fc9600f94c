//! Unsharp-mask sharpening.

use crate::blur::box_blur;
use crate::params::{Sanitize, clamp_f32};
use crate::OpsResult;
use pixfx_core::{CHANNELS, Raster, clamp_u8};
use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Settings for the sharpen effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SharpenSettings {
    /// Strength of the high-pass boost, `0..=5`.
    pub amount: f32,
    /// Radius of the blur used as the low-pass, `1..=20`.
    pub radius: f32,
}

impl Default for SharpenSettings {
    fn default() -> Self {
        Self {
            amount: 1.0,
            radius: 1.0,
        }
    }
}

impl Sanitize for SharpenSettings {
    fn sanitize(&mut self) {
        clamp_f32(&mut self.amount, 0.0, 5.0, 1.0);
        clamp_f32(&mut self.radius, 1.0, 20.0, 1.0);
    }
}

/// Applies `src + amount * (src - blur(src))` to RGB; alpha is kept.
pub fn apply(src: &Raster, settings: &SharpenSettings) -> OpsResult<Raster> {
    let s = settings.sanitized();
    trace!(amount = s.amount, radius = s.radius, "sharpen");

    let low = box_blur(src, s.radius.round() as usize, 1)?;
    let mut dst = src.try_new_like()?;
    for ((out, a), b) in dst
        .as_bytes_mut()
        .chunks_exact_mut(CHANNELS)
        .zip(src.as_bytes().chunks_exact(CHANNELS))
        .zip(low.as_bytes().chunks_exact(CHANNELS))
    {
        for c in 0..3 {
            let v = a[c] as f32;
            out[c] = clamp_u8(v + s.amount * (v - b[c] as f32));
        }
        out[3] = a[3];
    }
    Ok(dst)
}
