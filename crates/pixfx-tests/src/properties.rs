//! Behavioral guarantees of the effect families.

use crate::fixtures::{distinct, gray_ramp, scene};
use pixfx_color::{BlendMode, Gradient, GradientStop, Rgb8, composite};
use pixfx_core::{Raster, Rng};
use pixfx_ops::edges::{self, EdgeAlgorithm, FindEdgesSettings};
use pixfx_ops::pixelate::{self, PixelateMode, PixelateSettings};
use pixfx_ops::posterize::{self, PosterizeSettings};
use pixfx_ops::slice_shift::{self, SliceShiftSettings};
use pixfx_pipeline::{EffectKind, EffectStack, render};

const GRID: [u8; 6] = [0, 1, 64, 127, 200, 255];

#[test]
fn test_disabled_effect_is_identity_for_every_kind() {
    let img = scene(37, 23);
    for kind in EffectKind::ALL {
        let mut stack = EffectStack::new();
        let id = stack.add(kind);
        stack.set_enabled(&id, false).unwrap();
        assert_eq!(render(&img, &stack), img, "{kind}");
    }
}

#[test]
fn test_every_kind_keeps_dimensions() {
    for (w, h) in [(1, 1), (3, 50), (41, 17)] {
        let img = scene(w, h);
        for kind in EffectKind::ALL {
            let out = render(&img, &EffectStack::with_kinds([kind]));
            assert_eq!(out.dimensions(), (w, h), "{kind} at {w}x{h}");
        }
    }
}

#[test]
fn test_render_is_deterministic() {
    let img = scene(48, 32);
    let stack = EffectStack::with_kinds(EffectKind::ALL);
    let a = render(&img, &stack);
    let b = render(&img, &stack);
    assert_eq!(a, b);
}

#[test]
fn test_gradient_midpoint_and_clamp() {
    let g = Gradient::new(vec![
        GradientStop::new(0.0, Rgb8::BLACK),
        GradientStop::new(100.0, Rgb8::WHITE),
    ])
    .unwrap();
    for c in g.sample(50.0) {
        assert!(c == 127 || c == 128, "{c}");
    }
    assert_eq!(g.sample(-10.0), [0, 0, 0]);
    assert_eq!(g.sample(110.0), [255, 255, 255]);
}

#[test]
fn test_blend_identities() {
    for &a in &GRID {
        for &b in &GRID {
            let d = [a, b, 255 - a, 255];
            assert_eq!(composite(d, [255, 255, 255], BlendMode::Multiply, 1.0), d);
            assert_eq!(composite(d, [0, 0, 0], BlendMode::Screen, 1.0), d);
            for &c in &GRID {
                let s = [c, a, b];
                assert_eq!(
                    composite(d, s, BlendMode::Normal, 1.0),
                    [s[0], s[1], s[2], 255]
                );
            }
        }
    }
}

#[test]
fn test_posterize_two_levels_on_ramp() {
    let s = PosterizeSettings {
        levels: 2,
        ..Default::default()
    };
    let out = posterize::apply(&gray_ramp(), &s).unwrap();
    for channel in 0..3 {
        assert_eq!(distinct(&out, channel).len(), 2);
    }
}

#[test]
fn test_grid_pixelate_is_cell_mean() {
    let img = scene(32, 24);
    let cell = 8;
    let s = PixelateSettings {
        mode: PixelateMode::Grid,
        cell_size: cell,
        ..Default::default()
    };
    let out = pixelate::apply(&img, &s).unwrap();

    for cy in 0..24 / cell {
        for cx in 0..32 / cell {
            let mut sum = [0u64; 4];
            for y in cy * cell..(cy + 1) * cell {
                for x in cx * cell..(cx + 1) * cell {
                    for (c, v) in img.pixel(x, y).iter().enumerate() {
                        sum[c] += *v as u64;
                    }
                }
            }
            let n = (cell * cell) as u64;
            let mean = sum.map(|s| ((s + n / 2) / n) as u8);
            for y in cy * cell..(cy + 1) * cell {
                for x in cx * cell..(cx + 1) * cell {
                    assert_eq!(out.pixel(x, y), mean);
                }
            }
        }
    }

    // A second, coarser pass over a flat result stays flat.
    let flat = Raster::filled(32, 24, out.pixel(0, 0));
    let again = pixelate::apply(
        &flat,
        &PixelateSettings {
            cell_size: 16,
            ..s
        },
    )
    .unwrap();
    assert_eq!(again, flat);
}

#[test]
fn test_seeded_slice_offsets() {
    let s = SliceShiftSettings::default();
    let a = slice_shift::slice_offsets(32, &s, &mut Rng::new(1234));
    let b = slice_shift::slice_offsets(32, &s, &mut Rng::new(1234));
    let c = slice_shift::slice_offsets(32, &s, &mut Rng::new(1235));
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn test_reroll_changes_slice_output() {
    let img = scene(64, 64);
    let mut stack = EffectStack::with_kinds([EffectKind::SliceShift]);
    let id = stack.instances()[0].id.clone();
    let before = render(&img, &stack);
    assert_eq!(render(&img, &stack), before);
    stack.reroll_seed(&id, 987_654).unwrap();
    assert_ne!(render(&img, &stack), before);
}

#[test]
fn test_flat_image_has_no_edges() {
    let img = Raster::filled(20, 15, [90, 140, 30, 255]);
    for algorithm in [
        EdgeAlgorithm::Sobel,
        EdgeAlgorithm::Prewitt,
        EdgeAlgorithm::Laplacian,
        EdgeAlgorithm::Canny,
    ] {
        let mag = edges::gradient_magnitude(&img, algorithm, 500.0);
        assert!(mag.iter().all(|&m| m == 0.0), "{algorithm:?}");

        let s = FindEdgesSettings {
            algorithm,
            threshold: 1.0,
            ..Default::default()
        };
        let out = edges::apply(&img, &s).unwrap();
        let first = out.pixel(0, 0);
        assert!(out.as_bytes().chunks_exact(4).all(|p| p == first));
    }
}
