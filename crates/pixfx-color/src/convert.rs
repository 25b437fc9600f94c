//! RGB <-> HSL and RGB <-> HSV conversions.
//!
//! All functions work on normalized floats:
//! - RGB components in `[0, 1]`
//! - hue in degrees, `[0, 360)`
//! - saturation, lightness and value in `[0, 1]`
//!
//! # Example
//!
//! ```rust
//! use pixfx_color::convert::{rgb_to_hsl, hsl_to_rgb};
//!
//! let hsl = rgb_to_hsl([1.0, 0.0, 0.0]);
//! assert_eq!(hsl, [0.0, 1.0, 0.5]);
//! let rgb = hsl_to_rgb(hsl);
//! assert!((rgb[0] - 1.0).abs() < 1e-6);
//! ```

/// Converts RGB to `[hue, saturation, lightness]`.
pub fn rgb_to_hsl(rgb: [f32; 3]) -> [f32; 3] {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) * 0.5;
    let d = max - min;

    if d <= f32::EPSILON {
        return [0.0, 0.0, l];
    }

    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    [hue_of(r, g, b, max, d), s, l]
}

/// Converts `[hue, saturation, lightness]` back to RGB.
pub fn hsl_to_rgb(hsl: [f32; 3]) -> [f32; 3] {
    let [h, s, l] = hsl;
    if s <= 0.0 {
        return [l, l, l];
    }
    let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
    let p = 2.0 * l - q;
    let hk = h.rem_euclid(360.0) / 360.0;
    [
        hue_to_channel(p, q, hk + 1.0 / 3.0),
        hue_to_channel(p, q, hk),
        hue_to_channel(p, q, hk - 1.0 / 3.0),
    ]
}

/// Converts RGB to `[hue, saturation, value]`.
pub fn rgb_to_hsv(rgb: [f32; 3]) -> [f32; 3] {
    let [r, g, b] = rgb;
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let d = max - min;

    let s = if max <= 0.0 { 0.0 } else { d / max };
    let h = if d <= f32::EPSILON { 0.0 } else { hue_of(r, g, b, max, d) };
    [h, s, max]
}

/// Converts `[hue, saturation, value]` back to RGB.
pub fn hsv_to_rgb(hsv: [f32; 3]) -> [f32; 3] {
    let [h, s, v] = hsv;
    let h6 = h.rem_euclid(360.0) / 60.0;
    let sector = h6.floor();
    let f = h6 - sector;
    let p = v * (1.0 - s);
    let q = v * (1.0 - s * f);
    let t = v * (1.0 - s * (1.0 - f));
    match sector as i32 {
        0 => [v, t, p],
        1 => [q, v, p],
        2 => [p, v, t],
        3 => [p, q, v],
        4 => [t, p, v],
        _ => [v, p, q],
    }
}

/// 8-bit convenience wrapper around [`rgb_to_hsl`].
#[inline]
pub fn rgb8_to_hsl(rgb: [u8; 3]) -> [f32; 3] {
    rgb_to_hsl(normalize(rgb))
}

/// 8-bit convenience wrapper around [`hsl_to_rgb`].
#[inline]
pub fn hsl_to_rgb8(hsl: [f32; 3]) -> [u8; 3] {
    denormalize(hsl_to_rgb(hsl))
}

/// `[0, 255]` -> `[0, 1]`.
#[inline]
pub fn normalize(rgb: [u8; 3]) -> [f32; 3] {
    [rgb[0] as f32 / 255.0, rgb[1] as f32 / 255.0, rgb[2] as f32 / 255.0]
}

/// `[0, 1]` -> `[0, 255]` with rounding and clamping.
#[inline]
pub fn denormalize(rgb: [f32; 3]) -> [u8; 3] {
    [
        pixfx_core::clamp_u8(rgb[0] * 255.0),
        pixfx_core::clamp_u8(rgb[1] * 255.0),
        pixfx_core::clamp_u8(rgb[2] * 255.0),
    ]
}

#[inline]
fn hue_of(r: f32, g: f32, b: f32, max: f32, d: f32) -> f32 {
    let h = if max == r {
        ((g - b) / d).rem_euclid(6.0)
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    let deg = h * 60.0;
    if deg >= 360.0 { deg - 360.0 } else { deg }
}

#[inline]
fn hue_to_channel(p: f32, q: f32, t: f32) -> f32 {
    let t = t.rem_euclid(1.0);
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn assert_rgb_eq(a: [f32; 3], b: [f32; 3]) {
        for i in 0..3 {
            assert_abs_diff_eq!(a[i], b[i], epsilon = 1e-4);
        }
    }

    #[test]
    fn test_hsl_primaries() {
        assert_rgb_eq(rgb_to_hsl([0.0, 1.0, 0.0]), [120.0, 1.0, 0.5]);
        assert_rgb_eq(rgb_to_hsl([0.0, 0.0, 1.0]), [240.0, 1.0, 0.5]);
        assert_rgb_eq(rgb_to_hsl([0.5, 0.5, 0.5]), [0.0, 0.0, 0.5]);
    }

    #[test]
    fn test_hsl_roundtrip() {
        let samples = [
            [0.2, 0.4, 0.6],
            [0.9, 0.1, 0.3],
            [1.0, 1.0, 0.0],
            [0.05, 0.8, 0.8],
        ];
        for rgb in samples {
            assert_rgb_eq(hsl_to_rgb(rgb_to_hsl(rgb)), rgb);
        }
    }

    #[test]
    fn test_hue_range() {
        let h = rgb_to_hsl([1.0, 0.0, 0.0001])[0];
        assert!((0.0..360.0).contains(&h));
    }

    #[test]
    fn test_hsv_roundtrip() {
        let samples = [[0.2, 0.4, 0.6], [1.0, 0.5, 0.0], [0.3, 0.3, 0.3]];
        for rgb in samples {
            assert_rgb_eq(hsv_to_rgb(rgb_to_hsv(rgb)), rgb);
        }
        assert_rgb_eq(rgb_to_hsv([1.0, 0.0, 0.0]), [0.0, 1.0, 1.0]);
    }

    #[test]
    fn test_u8_wrappers() {
        assert_eq!(hsl_to_rgb8(rgb8_to_hsl([12, 200, 99])), [12, 200, 99]);
    }
}
