//! Pixelation family.
//!
//! Each mode only decides how the image is partitioned into regions; the
//! averaging and the color variant are shared (see [`crate::regions`]).
//!
//! | Mode | Regions |
//! |------|---------|
//! | `grid` | `cellSize` squares |
//! | `radial` | `rings x segments` sectors about `(centerX, centerY)` |
//! | `off-grid` | full-width or full-height bands `cellSize` thick |
//! | `voronoi` | nearest of `voronoiPoints` seeded random points |
//! | `rings` | concentric rings `cellSize` wide about `(centerX, centerY)` |
//! | `random` | randomly sized blocks tiling row by row |
//!
//! Partial cells at the right and bottom edges are averaged over their real
//! extent. Voronoi points and random block sizes come from the `seed`.

use crate::parallel::label_rows;
use crate::params::{Sanitize, clamp_f32, clamp_u32, lenient_u32};
use crate::regions::{LabelMap, RegionVariant, average_regions, grid_labels, sector_labels};
use crate::OpsResult;
use pixfx_core::{Raster, Rng};
use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Region partitioning strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PixelateMode {
    /// Square cells.
    #[default]
    Grid,
    /// Ring x angle sectors.
    Radial,
    /// Full-width or full-height bands.
    OffGrid,
    /// Nearest-seed cells.
    Voronoi,
    /// Concentric rings.
    Rings,
    /// Random rectangular blocks.
    Random,
}

/// Orientation of `off-grid` bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BandDirection {
    /// Bands span the full width.
    #[default]
    Horizontal,
    /// Bands span the full height.
    Vertical,
}

/// Settings for the pixelate effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PixelateSettings {
    /// Partitioning strategy.
    pub mode: PixelateMode,
    /// Cell, band or ring size in pixels, `2..=256`.
    #[serde(deserialize_with = "lenient_u32")]
    pub cell_size: u32,
    /// Post-processing of each region's mean.
    pub variant: RegionVariant,
    /// Steps per channel for the posterized variant, `2..=8`.
    #[serde(deserialize_with = "lenient_u32")]
    pub posterize_levels: u32,
    /// Gray steps for the grayscale variant, `2..=256`.
    #[serde(deserialize_with = "lenient_u32")]
    pub grayscale_levels: u32,
    /// Ring count in radial mode, `1..=200`.
    #[serde(deserialize_with = "lenient_u32")]
    pub rings: u32,
    /// Angular segment count in radial mode, `1..=360`.
    #[serde(deserialize_with = "lenient_u32")]
    pub segments: u32,
    /// Horizontal center as a fraction of width, `0..=1`.
    pub center_x: f32,
    /// Vertical center as a fraction of height, `0..=1`.
    pub center_y: f32,
    /// Band orientation in off-grid mode.
    pub band_direction: BandDirection,
    /// Seed point count in voronoi mode, `2..=4096`.
    #[serde(deserialize_with = "lenient_u32")]
    pub voronoi_points: u32,
    /// PRNG seed for voronoi and random modes.
    pub seed: u32,
}

impl Default for PixelateSettings {
    fn default() -> Self {
        Self {
            mode: PixelateMode::Grid,
            cell_size: 10,
            variant: RegionVariant::Classic,
            posterize_levels: 4,
            grayscale_levels: 8,
            rings: 12,
            segments: 24,
            center_x: 0.5,
            center_y: 0.5,
            band_direction: BandDirection::Horizontal,
            voronoi_points: 200,
            seed: 1,
        }
    }
}

impl Sanitize for PixelateSettings {
    fn sanitize(&mut self) {
        clamp_u32(&mut self.cell_size, 2, 256);
        clamp_u32(&mut self.posterize_levels, 2, 8);
        clamp_u32(&mut self.grayscale_levels, 2, 256);
        clamp_u32(&mut self.rings, 1, 200);
        clamp_u32(&mut self.segments, 1, 360);
        clamp_f32(&mut self.center_x, 0.0, 1.0, 0.5);
        clamp_f32(&mut self.center_y, 0.0, 1.0, 0.5);
        clamp_u32(&mut self.voronoi_points, 2, 4096);
    }
}

/// Builds the region label map for the configured mode.
pub fn labels(width: u32, height: u32, s: &PixelateSettings) -> LabelMap {
    match s.mode {
        PixelateMode::Grid => grid_labels(width, height, s.cell_size),
        PixelateMode::Radial => sector_labels(width, height, s.rings, s.segments, s.center_x, s.center_y),
        PixelateMode::OffGrid => band_labels(width, height, s.cell_size, s.band_direction),
        PixelateMode::Voronoi => voronoi_labels(width, height, s.voronoi_points, s.seed),
        PixelateMode::Rings => ring_labels(width, height, s.cell_size, s.center_x, s.center_y),
        PixelateMode::Random => random_block_labels(width, height, s.cell_size, s.seed),
    }
}

/// Applies the pixelate effect.
pub fn apply(src: &Raster, settings: &PixelateSettings) -> OpsResult<Raster> {
    let s = settings.sanitized();
    trace!(mode = ?s.mode, cell = s.cell_size, variant = ?s.variant, "pixelate");

    let map = labels(src.width(), src.height(), &s);
    debug!(regions = map.regions(), "pixelate regions");
    average_regions(src, &map, s.variant, s.posterize_levels, s.grayscale_levels)
}

fn band_labels(width: u32, height: u32, cell: u32, direction: BandDirection) -> LabelMap {
    let labels = match direction {
        BandDirection::Horizontal => label_rows(width, height, |_, y| y / cell),
        BandDirection::Vertical => label_rows(width, height, |x, _| x / cell),
    };
    let extent = match direction {
        BandDirection::Horizontal => height,
        BandDirection::Vertical => width,
    };
    LabelMap::new(labels, extent.div_ceil(cell) as usize)
}

fn ring_labels(width: u32, height: u32, cell: u32, cx: f32, cy: f32) -> LabelMap {
    let center_x = cx * width as f32;
    let center_y = cy * height as f32;
    let far_x = center_x.max(width as f32 - center_x);
    let far_y = center_y.max(height as f32 - center_y);
    let regions = ((far_x * far_x + far_y * far_y).sqrt() / cell as f32) as usize + 1;

    let labels = label_rows(width, height, |x, y| {
        let dx = x as f32 + 0.5 - center_x;
        let dy = y as f32 + 0.5 - center_y;
        (((dx * dx + dy * dy).sqrt() / cell as f32) as usize).min(regions - 1) as u32
    });
    LabelMap::new(labels, regions)
}

fn voronoi_labels(width: u32, height: u32, points: u32, seed: u32) -> LabelMap {
    let mut rng = Rng::new(seed);
    let sites: Vec<(f32, f32)> = (0..points)
        .map(|_| (rng.next_f32() * width as f32, rng.next_f32() * height as f32))
        .collect();

    let labels = label_rows(width, height, |x, y| {
        let px = x as f32 + 0.5;
        let py = y as f32 + 0.5;
        let mut best = 0u32;
        let mut best_d = f32::INFINITY;
        for (i, &(sx, sy)) in sites.iter().enumerate() {
            let d = (px - sx) * (px - sx) + (py - sy) * (py - sy);
            if d < best_d {
                best_d = d;
                best = i as u32;
            }
        }
        best
    });
    LabelMap::new(labels, sites.len())
}

fn random_block_labels(width: u32, height: u32, cell: u32, seed: u32) -> LabelMap {
    let mut rng = Rng::new(seed);
    let min = (cell / 2).max(1) as usize;
    let max = (cell + cell / 2) as usize;

    let w = width as usize;
    let mut labels = vec![0u32; w * height as usize];
    let mut next = 0u32;
    let mut y = 0usize;
    while y < height as usize {
        let bh = rng.range_inclusive(min, max).min(height as usize - y);
        let mut x = 0usize;
        while x < w {
            let bw = rng.range_inclusive(min, max).min(w - x);
            for row in y..y + bh {
                labels[row * w + x..row * w + x + bw].fill(next);
            }
            next += 1;
            x += bw;
        }
        y += bh;
    }
    LabelMap::new(labels, next as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noise(w: u32, h: u32) -> Raster {
        let mut rng = Rng::new(17);
        let mut img = Raster::new(w, h);
        for b in img.as_bytes_mut() {
            *b = (rng.next_u32() >> 24) as u8;
        }
        img
    }

    fn with_mode(mode: PixelateMode) -> PixelateSettings {
        PixelateSettings {
            mode,
            cell_size: 4,
            ..Default::default()
        }
    }

    #[test]
    fn test_grid_cell_is_rounded_mean() {
        let img = noise(8, 8);
        let out = apply(&img, &with_mode(PixelateMode::Grid)).unwrap();
        for c in 0..4 {
            let mut sum = 0u32;
            for y in 4..8 {
                for x in 0..4 {
                    sum += img.pixel(x, y)[c] as u32;
                }
            }
            let mean = ((sum + 8) / 16) as u8;
            for y in 4..8 {
                for x in 0..4 {
                    assert_eq!(out.pixel(x, y)[c], mean);
                }
            }
        }
    }

    #[test]
    fn test_flat_input_stays_flat_in_every_mode() {
        let img = Raster::filled(23, 17, [12, 34, 56, 255]);
        for mode in [
            PixelateMode::Grid,
            PixelateMode::Radial,
            PixelateMode::OffGrid,
            PixelateMode::Voronoi,
            PixelateMode::Rings,
            PixelateMode::Random,
        ] {
            assert_eq!(apply(&img, &with_mode(mode)).unwrap(), img, "{mode:?}");
        }
    }

    #[test]
    fn test_grid_is_idempotent() {
        let img = noise(16, 16);
        let once = apply(&img, &with_mode(PixelateMode::Grid)).unwrap();
        let twice = apply(&once, &with_mode(PixelateMode::Grid)).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_remainder_cells() {
        let map = labels(10, 10, &with_mode(PixelateMode::Grid));
        assert_eq!(map.regions(), 9);
    }

    #[test]
    fn test_band_regions() {
        let s = PixelateSettings {
            band_direction: BandDirection::Vertical,
            ..with_mode(PixelateMode::OffGrid)
        };
        let map = labels(10, 3, &s);
        assert_eq!(map.regions(), 3);
        assert_eq!(map.labels()[9], 2);
        assert_eq!(map.labels()[10], 0);
    }

    #[test]
    fn test_seeded_modes_are_deterministic() {
        for mode in [PixelateMode::Voronoi, PixelateMode::Random] {
            let a = labels(40, 30, &with_mode(mode));
            let b = labels(40, 30, &with_mode(mode));
            assert_eq!(a, b);
            let c = labels(
                40,
                30,
                &PixelateSettings {
                    seed: 999,
                    ..with_mode(mode)
                },
            );
            assert_ne!(a, c);
        }
    }

    #[test]
    fn test_random_blocks_cover_image() {
        let map = labels(37, 29, &with_mode(PixelateMode::Random));
        assert!(map.labels().iter().all(|&l| (l as usize) < map.regions()));
    }

    #[test]
    fn test_grayscale_variant() {
        let s = PixelateSettings {
            variant: RegionVariant::Grayscale,
            ..with_mode(PixelateMode::Grid)
        };
        let out = apply(&noise(8, 8), &s).unwrap();
        for px in out.as_bytes().chunks_exact(4) {
            assert_eq!(px[0], px[1]);
            assert_eq!(px[1], px[2]);
        }
    }

    #[test]
    fn test_negative_cell_size_clamps() {
        let s: PixelateSettings = serde_json::from_str(r#"{"cellSize": -3, "mode": "grid"}"#).unwrap();
        assert_eq!(s.sanitized().cell_size, 2);
    }
}
