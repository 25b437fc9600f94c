//! Per-pixel helpers shared by every effect.
//!
//! Luminance uses the Rec.601 weights (`0.299 R + 0.587 G + 0.114 B`),
//! which is what brightness-driven effects (edge detection, gradient map,
//! halftone dot sizing, ASCII ramp lookup) are tuned against.

/// Rec.601 red weight.
pub const LUMA_R: f32 = 0.299;
/// Rec.601 green weight.
pub const LUMA_G: f32 = 0.587;
/// Rec.601 blue weight.
pub const LUMA_B: f32 = 0.114;

/// Luminance of an 8-bit RGB triple, in `0.0..=255.0`.
///
/// # Example
///
/// ```rust
/// use pixfx_core::pixel::luminance;
///
/// assert!((luminance(255, 255, 255) - 255.0).abs() < 1e-3);
/// assert_eq!(luminance(0, 0, 0), 0.0);
/// ```
#[inline]
pub fn luminance(r: u8, g: u8, b: u8) -> f32 {
    LUMA_R * r as f32 + LUMA_G * g as f32 + LUMA_B * b as f32
}

/// Luminance of an RGBA pixel, ignoring alpha.
#[inline]
pub fn luminance_px(px: [u8; 4]) -> f32 {
    luminance(px[0], px[1], px[2])
}

/// Luminance of a pixel normalized to `0.0..=1.0`.
#[inline]
pub fn brightness(px: [u8; 4]) -> f32 {
    luminance_px(px) / 255.0
}

/// Rounds and clamps a float channel into `0..=255`. NaN maps to 0.
#[inline]
pub fn clamp_u8(v: f32) -> u8 {
    if v.is_nan() {
        0
    } else {
        v.round().clamp(0.0, 255.0) as u8
    }
}

/// Linear interpolation between two 8-bit values, `t` in `0.0..=1.0`.
#[inline]
pub fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    clamp_u8(a as f32 + (b as f32 - a as f32) * t)
}

/// Per-channel linear interpolation of two RGBA pixels, alpha included.
#[inline]
pub fn lerp_px(a: [u8; 4], b: [u8; 4], t: f32) -> [u8; 4] {
    [
        lerp_u8(a[0], b[0], t),
        lerp_u8(a[1], b[1], t),
        lerp_u8(a[2], b[2], t),
        lerp_u8(a[3], b[3], t),
    ]
}

/// Quantizes an 8-bit value to `levels` evenly spaced steps over `0..=255`.
///
/// `levels` below 2 is treated as 2.
///
/// # Example
///
/// ```rust
/// use pixfx_core::pixel::quantize_u8;
///
/// assert_eq!(quantize_u8(100, 2), 0);
/// assert_eq!(quantize_u8(200, 2), 255);
/// assert_eq!(quantize_u8(128, 3), 128);
/// ```
#[inline]
pub fn quantize_u8(v: u8, levels: u32) -> u8 {
    let steps = levels.max(2) as f32 - 1.0;
    let q = (v as f32 / 255.0 * steps).round() / steps;
    clamp_u8(q * 255.0)
}
