//! Region averaging (sector-average binning).
//!
//! Every pixelation-style effect is the same two passes:
//!
//! 1. assign each pixel a region label (grid cell, ring x angle sector,
//!    band, Voronoi cell, ...)
//! 2. replace every pixel with the mean color of its region
//!
//! The label builders here are shared: [`sector_labels`] backs both the
//! radial pixelate mode and the polar pixel effect, so the two cannot drift
//! apart.

use crate::OpsResult;
use pixfx_core::pixel::quantize_u8;
use pixfx_core::{Raster, luminance_px};
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Post-processing applied to each region's mean color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RegionVariant {
    /// Plain mean color.
    #[default]
    Classic,
    /// Each RGB channel quantized to `posterize_levels` steps.
    Posterized,
    /// Luminance quantized to `grayscale_levels` steps.
    Grayscale,
}

impl RegionVariant {
    /// Applies the variant to an averaged color. Alpha is untouched.
    pub fn apply(self, px: [u8; 4], posterize_levels: u32, grayscale_levels: u32) -> [u8; 4] {
        match self {
            RegionVariant::Classic => px,
            RegionVariant::Posterized => [
                quantize_u8(px[0], posterize_levels),
                quantize_u8(px[1], posterize_levels),
                quantize_u8(px[2], posterize_levels),
                px[3],
            ],
            RegionVariant::Grayscale => {
                let l = luminance_px(px).round().clamp(0.0, 255.0) as u8;
                let g = quantize_u8(l, grayscale_levels);
                [g, g, g, px[3]]
            }
        }
    }
}

/// Per-pixel region labels plus the number of distinct regions.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelMap {
    labels: Vec<u32>,
    regions: usize,
}

impl LabelMap {
    /// Wraps a label buffer. Every label must be `< regions`.
    pub fn new(labels: Vec<u32>, regions: usize) -> Self {
        debug_assert!(labels.iter().all(|&l| (l as usize) < regions));
        Self { labels, regions }
    }

    /// Label of each pixel, row-major.
    pub fn labels(&self) -> &[u32] {
        &self.labels
    }

    /// Number of regions.
    pub fn regions(&self) -> usize {
        self.regions
    }
}

/// Square cells of side `cell`; the last row and column may be smaller.
pub fn grid_labels(width: u32, height: u32, cell: u32) -> LabelMap {
    let cell = cell.max(1);
    let cols = width.div_ceil(cell);
    let rows = height.div_ceil(cell);
    let mut labels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        let row = (y / cell) * cols;
        labels.extend((0..width).map(|x| row + x / cell));
    }
    LabelMap::new(labels, (cols * rows) as usize)
}

/// Ring x angle sectors about `(cx, cy)`, given as fractions of the image size.
///
/// Rings split the distance from the center to the farthest corner into
/// `rings` equal bands; segments split the full turn starting at +x.
pub fn sector_labels(width: u32, height: u32, rings: u32, segments: u32, cx: f32, cy: f32) -> LabelMap {
    let rings = rings.max(1);
    let segments = segments.max(1);
    let center_x = cx * width as f32;
    let center_y = cy * height as f32;

    let max_r = [
        (0.0, 0.0),
        (width as f32, 0.0),
        (0.0, height as f32),
        (width as f32, height as f32),
    ]
    .iter()
    .map(|&(x, y)| ((x - center_x).powi(2) + (y - center_y).powi(2)).sqrt())
    .fold(0.0f32, f32::max)
    .max(1.0);

    let mut labels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        let dy = y as f32 + 0.5 - center_y;
        for x in 0..width {
            let dx = x as f32 + 0.5 - center_x;
            let r = (dx * dx + dy * dy).sqrt();
            let ring = ((r / max_r * rings as f32) as u32).min(rings - 1);
            let mut angle = dy.atan2(dx);
            if angle < 0.0 {
                angle += TAU;
            }
            let seg = ((angle / TAU * segments as f32) as u32).min(segments - 1);
            labels.push(ring * segments + seg);
        }
    }
    LabelMap::new(labels, (rings * segments) as usize)
}

/// Replaces each pixel with its region's rounded mean, then applies `variant`.
///
/// Channel sums are accumulated as integers; empty regions are never read.
pub fn average_regions(
    src: &Raster,
    map: &LabelMap,
    variant: RegionVariant,
    posterize_levels: u32,
    grayscale_levels: u32,
) -> OpsResult<Raster> {
    trace!(width = src.width(), height = src.height(), regions = map.regions(), "average_regions");

    let mut sums = vec![[0u64; 4]; map.regions()];
    let mut counts = vec![0u64; map.regions()];
    for (px, &label) in src.as_bytes().chunks_exact(4).zip(map.labels()) {
        let acc = &mut sums[label as usize];
        for c in 0..4 {
            acc[c] += px[c] as u64;
        }
        counts[label as usize] += 1;
    }

    let means: Vec<[u8; 4]> = sums
        .iter()
        .zip(&counts)
        .map(|(sum, &n)| {
            if n == 0 {
                return [0; 4];
            }
            let mean = sum.map(|s| ((s + n / 2) / n) as u8);
            variant.apply(mean, posterize_levels, grayscale_levels)
        })
        .collect();

    let mut dst = src.try_new_like()?;
    for (out, &label) in dst.as_bytes_mut().chunks_exact_mut(4).zip(map.labels()) {
        out.copy_from_slice(&means[label as usize]);
    }
    Ok(dst)
}
