//! Perspective 3D rotation of the image plane.
//!
//! The image is treated as a plane through the origin, scaled and rotated
//! (X, then Y, then Z) and viewed by a pinhole camera `perspective` pixels
//! in front of it. Every output pixel casts a ray back onto the rotated
//! plane and samples the source bilinearly at the hit point; rays that miss
//! the plane or the image show the background.

use crate::parallel::map_pixels;
use crate::params::{Sanitize, clamp_f32};
use crate::OpsResult;
use pixfx_color::Rgb8;
use pixfx_core::{Raster, clamp_u8};
use serde::{Deserialize, Serialize};

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Settings for the transform3d effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Transform3dSettings {
    /// Rotation about the horizontal axis in degrees, `-180..=180`.
    pub rotate_x: f32,
    /// Rotation about the vertical axis in degrees, `-180..=180`.
    pub rotate_y: f32,
    /// Rotation in the image plane in degrees, `-180..=180`.
    pub rotate_z: f32,
    /// Camera distance in pixels, `50..=10000`.
    pub perspective: f32,
    /// Uniform scale, `0.05..=10`.
    pub scale: f32,
    /// Color outside the transformed image.
    pub background_color: Rgb8,
    /// Leave the outside transparent instead.
    pub transparent_background: bool,
}

impl Default for Transform3dSettings {
    fn default() -> Self {
        Self {
            rotate_x: 0.0,
            rotate_y: 0.0,
            rotate_z: 0.0,
            perspective: 1000.0,
            scale: 1.0,
            background_color: Rgb8::BLACK,
            transparent_background: true,
        }
    }
}

impl Sanitize for Transform3dSettings {
    fn sanitize(&mut self) {
        clamp_f32(&mut self.rotate_x, -180.0, 180.0, 0.0);
        clamp_f32(&mut self.rotate_y, -180.0, 180.0, 0.0);
        clamp_f32(&mut self.rotate_z, -180.0, 180.0, 0.0);
        clamp_f32(&mut self.perspective, 50.0, 10000.0, 1000.0);
        clamp_f32(&mut self.scale, 0.05, 10.0, 1.0);
    }
}

type Mat3 = [[f32; 3]; 3];

fn mul(a: &Mat3, b: &Mat3) -> Mat3 {
    let mut out = [[0.0; 3]; 3];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, v) in row.iter_mut().enumerate() {
            *v = (0..3).map(|k| a[i][k] * b[k][j]).sum();
        }
    }
    out
}

/// `Rz * Ry * Rx` for angles in degrees.
fn rotation(rx: f32, ry: f32, rz: f32) -> Mat3 {
    let (sx, cx) = rx.to_radians().sin_cos();
    let (sy, cy) = ry.to_radians().sin_cos();
    let (sz, cz) = rz.to_radians().sin_cos();
    let x = [[1.0, 0.0, 0.0], [0.0, cx, -sx], [0.0, sx, cx]];
    let y = [[cy, 0.0, sy], [0.0, 1.0, 0.0], [-sy, 0.0, cy]];
    let z = [[cz, -sz, 0.0], [sz, cz, 0.0], [0.0, 0.0, 1.0]];
    mul(&z, &mul(&y, &x))
}

/// Bilinear sample at pixel-center coordinates; `None` outside the image.
///
/// Neighbours past the last row or column are clamped, so the full
/// `-0.5..size-0.5` range is valid.
pub fn sample_bilinear(src: &Raster, x: f32, y: f32) -> Option<[u8; 4]> {
    let (w, h) = src.dimensions();
    if !(x >= -0.5 && y >= -0.5 && x < w as f32 - 0.5 && y < h as f32 - 0.5) {
        return None;
    }
    let x0 = x.floor();
    let y0 = y.floor();
    let fx = x - x0;
    let fy = y - y0;
    let (x0, y0) = (x0 as i64, y0 as i64);

    let p00 = src.pixel_clamped(x0, y0);
    let p10 = src.pixel_clamped(x0 + 1, y0);
    let p01 = src.pixel_clamped(x0, y0 + 1);
    let p11 = src.pixel_clamped(x0 + 1, y0 + 1);

    let mut out = [0u8; 4];
    for c in 0..4 {
        let top = p00[c] as f32 * (1.0 - fx) + p10[c] as f32 * fx;
        let bot = p01[c] as f32 * (1.0 - fx) + p11[c] as f32 * fx;
        out[c] = clamp_u8(top * (1.0 - fy) + bot * fy);
    }
    Some(out)
}

/// Applies the 3D transform.
pub fn apply(src: &Raster, settings: &Transform3dSettings) -> OpsResult<Raster> {
    let s = settings.sanitized();
    trace!(rx = s.rotate_x, ry = s.rotate_y, rz = s.rotate_z, d = s.perspective, "transform3d");

    let r = rotation(s.rotate_x, s.rotate_y, s.rotate_z);
    // Plane normal is the rotated +z axis.
    let n = [r[0][2], r[1][2], r[2][2]];
    let d = s.perspective;
    let half_w = src.width() as f32 * 0.5;
    let half_h = src.height() as f32 * 0.5;
    let background = if s.transparent_background {
        [0, 0, 0, 0]
    } else {
        s.background_color.to_rgba(255)
    };

    map_pixels(src, |_, x, y| {
        let sx = x as f32 + 0.5 - half_w;
        let sy = y as f32 + 0.5 - half_h;

        // Ray from the camera at (0, 0, -d) through (sx, sy, 0).
        let denom = n[0] * sx + n[1] * sy + n[2] * d;
        if denom.abs() <= f32::EPSILON {
            return background;
        }
        let t = n[2] * d / denom;
        if t <= 0.0 {
            return background;
        }
        let hit = [t * sx, t * sy, t * d - d];

        // Back into plane coordinates: R^T * hit / scale.
        let u = (r[0][0] * hit[0] + r[1][0] * hit[1] + r[2][0] * hit[2]) / s.scale;
        let v = (r[0][1] * hit[0] + r[1][1] * hit[1] + r[2][1] * hit[2]) / s.scale;

        sample_bilinear(src, u + half_w - 0.5, v + half_h - 0.5).unwrap_or(background)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn coords(w: u32, h: u32) -> Raster {
        let mut img = Raster::new(w, h);
        for y in 0..h {
            for x in 0..w {
                img.set_pixel(x, y, [(x * 9) as u8, (y * 9) as u8, 50, 255]);
            }
        }
        img
    }

    #[test]
    fn test_defaults_are_identity() {
        let img = coords(17, 12);
        assert_eq!(apply(&img, &Transform3dSettings::default()).unwrap(), img);
    }

    #[test]
    fn test_rotation_is_orthonormal() {
        let r = rotation(30.0, -45.0, 120.0);
        for i in 0..3 {
            for j in 0..3 {
                let dot: f32 = (0..3).map(|k| r[k][i] * r[k][j]).sum();
                assert_abs_diff_eq!(dot, if i == j { 1.0 } else { 0.0 }, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn test_z_180_flips_both_axes() {
        let img = coords(8, 6);
        let s = Transform3dSettings {
            rotate_z: 180.0,
            ..Default::default()
        };
        let out = apply(&img, &s).unwrap();
        assert_eq!(out.pixel(0, 0), img.pixel(7, 5));
        assert_eq!(out.pixel(6, 1), img.pixel(1, 4));
    }

    #[test]
    fn test_shrink_shows_background() {
        let img = coords(20, 20);
        let s = Transform3dSettings {
            scale: 0.5,
            transparent_background: false,
            background_color: Rgb8::new(7, 7, 7),
            ..Default::default()
        };
        let out = apply(&img, &s).unwrap();
        assert_eq!(out.pixel(0, 0), [7, 7, 7, 255]);
        assert_eq!(out.pixel(10, 10)[3], 255);
        assert_ne!(out.pixel(10, 10), [7, 7, 7, 255]);
    }

    #[test]
    fn test_edge_on_plane_is_empty() {
        let img = coords(10, 10);
        let s = Transform3dSettings {
            rotate_y: 90.0,
            ..Default::default()
        };
        let out = apply(&img, &s).unwrap();
        let visible = out.as_bytes().chunks_exact(4).filter(|p| p[3] != 0).count();
        assert!(visible <= 10 * 2);
    }

    #[test]
    fn test_bilinear_midpoint() {
        let mut img = Raster::filled(2, 1, [0, 0, 0, 255]);
        img.set_pixel(1, 0, [100, 200, 50, 255]);
        assert_eq!(sample_bilinear(&img, 0.5, 0.0), Some([50, 100, 25, 255]));
        assert_eq!(sample_bilinear(&img, -1.0, 0.0), None);
    }
}
