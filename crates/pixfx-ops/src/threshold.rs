//! Two-tone threshold.

use crate::parallel::map_pixels;
use crate::params::{Sanitize, clamp_f32};
use crate::OpsResult;
use pixfx_color::Rgb8;
use pixfx_core::{Raster, luminance_px};
use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Settings for the threshold effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThresholdSettings {
    /// Luminance cut, `0..=255`; pixels at or above it are light.
    pub level: f32,
    /// Color below the cut.
    pub dark_color: Rgb8,
    /// Color at or above the cut.
    pub light_color: Rgb8,
}

impl Default for ThresholdSettings {
    fn default() -> Self {
        Self {
            level: 128.0,
            dark_color: Rgb8::BLACK,
            light_color: Rgb8::WHITE,
        }
    }
}

impl Sanitize for ThresholdSettings {
    fn sanitize(&mut self) {
        clamp_f32(&mut self.level, 0.0, 255.0, 128.0);
    }
}

/// Applies the threshold. Alpha is preserved.
pub fn apply(src: &Raster, settings: &ThresholdSettings) -> OpsResult<Raster> {
    let s = settings.sanitized();
    trace!(level = s.level, "threshold");

    map_pixels(src, |px, _, _| {
        let c = if luminance_px(px) >= s.level {
            s.light_color
        } else {
            s.dark_color
        };
        c.to_rgba(px[3])
    })
}
