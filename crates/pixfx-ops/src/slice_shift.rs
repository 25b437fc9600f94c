//! Slice shift: cut the image into bands and displace or rearrange them.
//!
//! Horizontal slices are full-width bands shifted along x; vertical slices
//! are full-height bands shifted along y. `both` runs the horizontal pass,
//! then the vertical pass on its output, drawing from one PRNG stream.
//!
//! Every "random" choice comes from the seeded xorshift generator, so the
//! same seed always reproduces the same offsets and permutations.

use crate::parallel::map_pixels;
use crate::params::{Sanitize, clamp_f32, clamp_u32, lenient_u32};
use crate::OpsResult;
use pixfx_color::Rgb8;
use pixfx_core::{Raster, Rng, pixel::lerp_px};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Slice orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SliceDirection {
    /// Full-width bands shifted sideways.
    #[default]
    Horizontal,
    /// Full-height bands shifted up and down.
    Vertical,
    /// Horizontal pass followed by a vertical pass.
    Both,
}

/// How each slice's displacement is chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SliceMode {
    /// Uniform in `-maxOffset..=maxOffset`.
    #[default]
    Random,
    /// `+maxOffset` on even slices, `-maxOffset` on odd ones.
    Alternating,
    /// Sinusoid across the slice index.
    Wave,
    /// Slices keep their place in the image but show another slice's content.
    Rearrange,
    /// Odd slices copy the slice before them.
    Repeat,
}

/// Permutation used by [`SliceMode::Rearrange`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RearrangeMode {
    /// Last slice first.
    #[default]
    Reverse,
    /// Even slices first, then odd slices.
    Alternate,
    /// Random permutation.
    Shuffle,
    /// Each slice picks a random source; repeats allowed.
    Random,
}

/// Settings for the slice-shift effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SliceShiftSettings {
    /// Slice orientation.
    pub direction: SliceDirection,
    /// Number of slices, `1..=512`.
    #[serde(deserialize_with = "lenient_u32")]
    pub slices: u32,
    /// Largest displacement in pixels, `0..=2000`.
    pub max_offset: f32,
    /// Displacement strategy.
    pub mode: SliceMode,
    /// Permutation for rearrange mode.
    pub rearrange: RearrangeMode,
    /// Wave cycles across all slices, `0..=20`.
    pub wave_frequency: f32,
    /// PRNG seed.
    pub seed: u32,
    /// Fill gaps with `backgroundColor` instead of transparency.
    pub fill_background: bool,
    /// Gap color.
    pub background_color: Rgb8,
    /// Fade slice edges toward the background.
    pub feather: bool,
    /// Fade width in pixels, `0..=200`.
    pub feather_width: f32,
}

impl Default for SliceShiftSettings {
    fn default() -> Self {
        Self {
            direction: SliceDirection::Horizontal,
            slices: 16,
            max_offset: 60.0,
            mode: SliceMode::Random,
            rearrange: RearrangeMode::Reverse,
            wave_frequency: 1.0,
            seed: 1,
            fill_background: false,
            background_color: Rgb8::BLACK,
            feather: false,
            feather_width: 8.0,
        }
    }
}

impl Sanitize for SliceShiftSettings {
    fn sanitize(&mut self) {
        clamp_u32(&mut self.slices, 1, 512);
        clamp_f32(&mut self.max_offset, 0.0, 2000.0, 60.0);
        clamp_f32(&mut self.wave_frequency, 0.0, 20.0, 1.0);
        clamp_f32(&mut self.feather_width, 0.0, 200.0, 8.0);
    }
}

/// Pixel shown where a displacement exposes nothing.
pub(crate) fn gap_pixel(fill: bool, color: Rgb8) -> [u8; 4] {
    if fill { color.to_rgba(255) } else { [0, 0, 0, 0] }
}

/// Per-slice displacement for the offset-based modes.
///
/// Rearrange and repeat do not displace and return zeros.
pub fn slice_offsets(count: usize, s: &SliceShiftSettings, rng: &mut Rng) -> Vec<f32> {
    (0..count)
        .map(|i| match s.mode {
            SliceMode::Random => rng.signed(s.max_offset),
            SliceMode::Alternating if i % 2 == 0 => s.max_offset,
            SliceMode::Alternating => -s.max_offset,
            SliceMode::Wave => s.max_offset * (TAU * s.wave_frequency * i as f32 / count as f32).sin(),
            SliceMode::Rearrange | SliceMode::Repeat => 0.0,
        })
        .collect()
}

/// Source slice for each target slice.
pub fn slice_sources(count: usize, s: &SliceShiftSettings, rng: &mut Rng) -> Vec<usize> {
    match s.mode {
        SliceMode::Rearrange => match s.rearrange {
            RearrangeMode::Reverse => (0..count).rev().collect(),
            RearrangeMode::Alternate => (0..count).step_by(2).chain((1..count).step_by(2)).collect(),
            RearrangeMode::Shuffle => {
                let mut order: Vec<usize> = (0..count).collect();
                rng.shuffle(&mut order);
                order
            }
            RearrangeMode::Random => (0..count).map(|_| rng.below(count)).collect(),
        },
        SliceMode::Repeat => (0..count).map(|i| i - i % 2).collect(),
        _ => (0..count).collect(),
    }
}

#[derive(Debug, Clone, Copy)]
struct Band {
    start: u32,
    len: u32,
}

fn bands(extent: u32, count: u32) -> Vec<Band> {
    let count = count.min(extent).max(1) as u64;
    (0..count)
        .map(|k| {
            let start = (k * extent as u64 / count) as u32;
            let end = ((k + 1) * extent as u64 / count) as u32;
            Band {
                start,
                len: end - start,
            }
        })
        .collect()
}

fn shift_pass(src: &Raster, along_x: bool, s: &SliceShiftSettings, rng: &mut Rng) -> OpsResult<Raster> {
    let (w, h) = src.dimensions();
    let (extent, span) = if along_x { (h, w) } else { (w, h) };
    let bands = bands(extent, s.slices);
    let offsets: Vec<i64> = slice_offsets(bands.len(), s, rng)
        .into_iter()
        .map(|o| o.round() as i64)
        .collect();
    let sources = slice_sources(bands.len(), s, rng);

    let mut slice_of = Vec::with_capacity(extent as usize);
    for (k, b) in bands.iter().enumerate() {
        slice_of.extend(std::iter::repeat_n(k, b.len as usize));
    }

    let gap = gap_pixel(s.fill_background, s.background_color);
    let feather = if s.feather { s.feather_width } else { 0.0 };
    debug!(slices = bands.len(), along_x, "slice pass");

    map_pixels(src, |_, x, y| {
        let (a, c) = if along_x { (x, y) } else { (y, x) };
        let k = slice_of[c as usize];
        let dst_band = bands[k];
        let src_band = bands[sources[k]];
        let local = (c - dst_band.start) as u64;
        let src_c = src_band.start + (local * src_band.len as u64 / dst_band.len as u64) as u32;
        let src_a = a as i64 - offsets[k];

        let px = if src_a < 0 || src_a >= span as i64 {
            gap
        } else if along_x {
            src.pixel(src_a as u32, src_c)
        } else {
            src.pixel(src_c, src_a as u32)
        };

        if feather <= 0.0 {
            return px;
        }
        let end = dst_band.start + dst_band.len;
        let mut d = f32::INFINITY;
        if dst_band.start > 0 {
            d = d.min((c - dst_band.start) as f32 + 0.5);
        }
        if end < extent {
            d = d.min((end - 1 - c) as f32 + 0.5);
        }
        if d < feather {
            lerp_px(gap, px, d / feather)
        } else {
            px
        }
    })
}

/// Applies the slice shift.
pub fn apply(src: &Raster, settings: &SliceShiftSettings) -> OpsResult<Raster> {
    let s = settings.sanitized();
    trace!(direction = ?s.direction, mode = ?s.mode, slices = s.slices, seed = s.seed, "slice_shift");

    let mut rng = Rng::new(s.seed);
    match s.direction {
        SliceDirection::Horizontal => shift_pass(src, true, &s, &mut rng),
        SliceDirection::Vertical => shift_pass(src, false, &s, &mut rng),
        SliceDirection::Both => {
            let first = shift_pass(src, true, &s, &mut rng)?;
            shift_pass(&first, false, &s, &mut rng)
        }
    }
}
