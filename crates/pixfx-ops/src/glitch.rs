//! Digital glitch: RGB channel split plus horizontally displaced row blocks.
//!
//! Blocks are drawn from the seeded generator and applied in order, each
//! one wrapping its rows around horizontally.

use crate::parallel::map_pixels;
use crate::params::{Sanitize, clamp_f32, clamp_u32, lenient_u32};
use crate::OpsResult;
use pixfx_core::{CHANNELS, Raster, Rng};
use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Settings for the glitch effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GlitchSettings {
    /// Red/blue channel separation in pixels, `0..=100`.
    pub rgb_split: f32,
    /// Number of displaced blocks, `0..=64`.
    #[serde(deserialize_with = "lenient_u32")]
    pub blocks: u32,
    /// Largest block displacement in pixels, `0..=500`.
    pub max_block_shift: f32,
    /// Tallest block in rows, `1..=200`.
    #[serde(deserialize_with = "lenient_u32")]
    pub max_block_height: u32,
    /// PRNG seed.
    pub seed: u32,
}

impl Default for GlitchSettings {
    fn default() -> Self {
        Self {
            rgb_split: 8.0,
            blocks: 10,
            max_block_shift: 40.0,
            max_block_height: 20,
            seed: 1,
        }
    }
}

impl Sanitize for GlitchSettings {
    fn sanitize(&mut self) {
        clamp_f32(&mut self.rgb_split, 0.0, 100.0, 8.0);
        clamp_u32(&mut self.blocks, 0, 64);
        clamp_f32(&mut self.max_block_shift, 0.0, 500.0, 40.0);
        clamp_u32(&mut self.max_block_height, 1, 200);
    }
}

/// A displaced band of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GlitchBlock {
    /// First row.
    pub y: u32,
    /// Row count.
    pub height: u32,
    /// Horizontal shift, wrapping.
    pub shift: i64,
}

/// Draws the block list for an image of the given height.
pub fn blocks(height: u32, s: &GlitchSettings) -> Vec<GlitchBlock> {
    let mut rng = Rng::new(s.seed);
    (0..s.blocks)
        .map(|_| {
            let y = rng.below(height as usize) as u32;
            let bh = rng.range_inclusive(1, s.max_block_height as usize) as u32;
            GlitchBlock {
                y,
                height: bh.min(height - y),
                shift: rng.signed(s.max_block_shift).round() as i64,
            }
        })
        .collect()
}

/// Applies the glitch effect. Alpha is preserved.
pub fn apply(src: &Raster, settings: &GlitchSettings) -> OpsResult<Raster> {
    let s = settings.sanitized();
    trace!(split = s.rgb_split, blocks = s.blocks, seed = s.seed, "glitch");

    let split = s.rgb_split.round() as i64;
    let mut out = map_pixels(src, |px, x, y| {
        let r = src.pixel_clamped(x as i64 - split, y as i64)[0];
        let b = src.pixel_clamped(x as i64 + split, y as i64)[2];
        [r, px[1], b, px[3]]
    })?;

    let w = src.width() as i64;
    let stride = out.stride();
    for block in blocks(src.height(), &s) {
        if block.shift == 0 {
            continue;
        }
        for y in block.y..block.y + block.height {
            let start = y as usize * stride;
            let row = out.as_bytes()[start..start + stride].to_vec();
            let dst = &mut out.as_bytes_mut()[start..start + stride];
            for x in 0..w {
                let sx = (x - block.shift).rem_euclid(w) as usize;
                let d = x as usize * CHANNELS;
                dst[d..d + CHANNELS].copy_from_slice(&row[sx * CHANNELS..sx * CHANNELS + CHANNELS]);
            }
        }
    }
    Ok(out)
}
