//! Blend-mode compositing.
//!
//! Combines a destination (backdrop) pixel `d` with a source (layer) pixel
//! `s`, both normalized to `[0, 1]`. Separable modes apply a closed-form
//! per-channel formula; the four non-separable modes (hue, saturation,
//! color, luminosity) convert both pixels to HSL, take one or two HSL
//! components from the source and the rest from the destination, then
//! convert back.
//!
//! Alpha is never touched by a blend mode. Opacity is applied afterwards as
//! a linear interpolation between the original destination and the blended
//! result.
//!
//! # Example
//!
//! ```rust
//! use pixfx_color::blend::{blend_rgb, BlendMode};
//!
//! let d = [0.8, 0.5, 0.2];
//! let out = blend_rgb(d, [1.0, 1.0, 1.0], BlendMode::Multiply);
//! assert_eq!(out, d);
//! ```

use crate::convert::{denormalize, hsl_to_rgb, normalize, rgb_to_hsl};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Blend mode for compositing a source color onto a destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BlendMode {
    /// Source replaces destination.
    #[default]
    Normal,
    /// `d * s`.
    Multiply,
    /// `1 - (1 - d)(1 - s)`.
    Screen,
    /// Multiply or screen depending on the destination.
    Overlay,
    /// `min(d, s)`.
    Darken,
    /// `max(d, s)`.
    Lighten,
    /// Brightens the destination by the source.
    ColorDodge,
    /// Darkens the destination by the source.
    ColorBurn,
    /// Multiply or screen depending on the source.
    HardLight,
    /// Softer version of hard light.
    SoftLight,
    /// `|d - s|`.
    Difference,
    /// `d + s - 2ds`.
    Exclusion,
    /// Source hue, destination saturation and lightness.
    Hue,
    /// Source saturation, destination hue and lightness.
    Saturation,
    /// Source hue and saturation, destination lightness.
    Color,
    /// Source lightness, destination hue and saturation.
    Luminosity,
}

impl BlendMode {
    /// Every mode, in declaration order.
    pub const ALL: [BlendMode; 16] = [
        BlendMode::Normal,
        BlendMode::Multiply,
        BlendMode::Screen,
        BlendMode::Overlay,
        BlendMode::Darken,
        BlendMode::Lighten,
        BlendMode::ColorDodge,
        BlendMode::ColorBurn,
        BlendMode::HardLight,
        BlendMode::SoftLight,
        BlendMode::Difference,
        BlendMode::Exclusion,
        BlendMode::Hue,
        BlendMode::Saturation,
        BlendMode::Color,
        BlendMode::Luminosity,
    ];

    /// Stable kebab-case name, as used in settings files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Normal => "normal",
            Self::Multiply => "multiply",
            Self::Screen => "screen",
            Self::Overlay => "overlay",
            Self::Darken => "darken",
            Self::Lighten => "lighten",
            Self::ColorDodge => "color-dodge",
            Self::ColorBurn => "color-burn",
            Self::HardLight => "hard-light",
            Self::SoftLight => "soft-light",
            Self::Difference => "difference",
            Self::Exclusion => "exclusion",
            Self::Hue => "hue",
            Self::Saturation => "saturation",
            Self::Color => "color",
            Self::Luminosity => "luminosity",
        }
    }

    /// Returns `true` for modes computed channel by channel.
    #[inline]
    pub fn is_separable(self) -> bool {
        !matches!(
            self,
            Self::Hue | Self::Saturation | Self::Color | Self::Luminosity
        )
    }
}

impl fmt::Display for BlendMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlendMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|m| m.name() == needle)
            .ok_or_else(|| format!("unknown blend mode '{s}'"))
    }
}

/// Blends one channel with a separable mode.
///
/// Non-separable modes fall back to returning `s`; use [`blend_rgb`] for them.
#[inline]
pub fn blend_channel(d: f32, s: f32, mode: BlendMode) -> f32 {
    match mode {
        BlendMode::Normal => s,
        BlendMode::Multiply => d * s,
        BlendMode::Screen => screen(d, s),
        BlendMode::Overlay => hard_light(s, d),
        BlendMode::Darken => d.min(s),
        BlendMode::Lighten => d.max(s),
        BlendMode::ColorDodge => {
            if d <= 0.0 {
                0.0
            } else if s >= 1.0 {
                1.0
            } else {
                (d / (1.0 - s)).min(1.0)
            }
        }
        BlendMode::ColorBurn => {
            if d >= 1.0 {
                1.0
            } else if s <= 0.0 {
                0.0
            } else {
                1.0 - ((1.0 - d) / s).min(1.0)
            }
        }
        BlendMode::HardLight => hard_light(d, s),
        BlendMode::SoftLight => {
            if s <= 0.5 {
                d - (1.0 - 2.0 * s) * d * (1.0 - d)
            } else {
                let dd = if d <= 0.25 {
                    ((16.0 * d - 12.0) * d + 4.0) * d
                } else {
                    d.sqrt()
                };
                d + (2.0 * s - 1.0) * (dd - d)
            }
        }
        BlendMode::Difference => (d - s).abs(),
        BlendMode::Exclusion => d + s - 2.0 * d * s,
        BlendMode::Hue | BlendMode::Saturation | BlendMode::Color | BlendMode::Luminosity => s,
    }
}

#[inline]
fn screen(d: f32, s: f32) -> f32 {
    1.0 - (1.0 - d) * (1.0 - s)
}

/// Hard light with `s` as the branching layer; overlay is hard light with
/// the arguments swapped.
#[inline]
fn hard_light(d: f32, s: f32) -> f32 {
    if s < 0.5 {
        2.0 * d * s
    } else {
        screen(d, 2.0 * s - 1.0)
    }
}

/// Blends an RGB destination with an RGB source.
pub fn blend_rgb(d: [f32; 3], s: [f32; 3], mode: BlendMode) -> [f32; 3] {
    if mode.is_separable() {
        return [
            blend_channel(d[0], s[0], mode),
            blend_channel(d[1], s[1], mode),
            blend_channel(d[2], s[2], mode),
        ];
    }

    let dh = rgb_to_hsl(d);
    let sh = rgb_to_hsl(s);
    let hsl = match mode {
        BlendMode::Hue => [sh[0], dh[1], dh[2]],
        BlendMode::Saturation => [dh[0], sh[1], dh[2]],
        BlendMode::Color => [sh[0], sh[1], dh[2]],
        _ => [dh[0], dh[1], sh[2]],
    };
    hsl_to_rgb(hsl)
}

/// Linear interpolation between `original` and `blended` by `opacity`.
#[inline]
pub fn mix(original: [f32; 3], blended: [f32; 3], opacity: f32) -> [f32; 3] {
    let t = opacity.clamp(0.0, 1.0);
    [
        original[0] + (blended[0] - original[0]) * t,
        original[1] + (blended[1] - original[1]) * t,
        original[2] + (blended[2] - original[2]) * t,
    ]
}

/// Composites an 8-bit source color onto an RGBA destination pixel.
///
/// The destination alpha is carried through unchanged.
pub fn composite(dst: [u8; 4], src: [u8; 3], mode: BlendMode, opacity: f32) -> [u8; 4] {
    let d = normalize([dst[0], dst[1], dst[2]]);
    let s = normalize(src);
    let out = denormalize(mix(d, blend_rgb(d, s, mode), opacity));
    [out[0], out[1], out[2], dst[3]]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const GRID: [f32; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

    #[test]
    fn test_multiply_white_is_identity() {
        for &a in &GRID {
            for &b in &GRID {
                let d = [a, b, 0.3];
                assert_eq!(blend_rgb(d, [1.0, 1.0, 1.0], BlendMode::Multiply), d);
            }
        }
    }

    #[test]
    fn test_screen_black_is_identity() {
        for &a in &GRID {
            let d = [a, 1.0 - a, 0.6];
            let out = blend_rgb(d, [0.0, 0.0, 0.0], BlendMode::Screen);
            for i in 0..3 {
                assert_abs_diff_eq!(out[i], d[i], epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_normal_returns_source() {
        for &a in &GRID {
            let s = [a, 0.1, 0.9];
            assert_eq!(blend_rgb([0.4, 0.4, 0.4], s, BlendMode::Normal), s);
        }
    }

    #[test]
    fn test_overlay_branches_on_destination() {
        assert_abs_diff_eq!(blend_channel(0.25, 0.5, BlendMode::Overlay), 0.25, epsilon = 1e-6);
        assert_abs_diff_eq!(blend_channel(0.75, 0.5, BlendMode::Overlay), 0.75, epsilon = 1e-6);
        assert_abs_diff_eq!(blend_channel(0.25, 1.0, BlendMode::Overlay), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_dodge_and_burn_edges() {
        assert_eq!(blend_channel(0.0, 1.0, BlendMode::ColorDodge), 0.0);
        assert_eq!(blend_channel(0.5, 1.0, BlendMode::ColorDodge), 1.0);
        assert_eq!(blend_channel(1.0, 0.0, BlendMode::ColorBurn), 1.0);
        assert_eq!(blend_channel(0.5, 0.0, BlendMode::ColorBurn), 0.0);
        assert_abs_diff_eq!(blend_channel(0.25, 0.5, BlendMode::ColorDodge), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_difference_exclusion() {
        assert_abs_diff_eq!(blend_channel(0.2, 0.7, BlendMode::Difference), 0.5, epsilon = 1e-6);
        assert_abs_diff_eq!(blend_channel(0.5, 0.5, BlendMode::Exclusion), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_luminosity_takes_source_lightness() {
        let d = [1.0, 0.0, 0.0];
        let out = blend_rgb(d, [0.2, 0.2, 0.2], BlendMode::Luminosity);
        let hsl = rgb_to_hsl(out);
        assert_abs_diff_eq!(hsl[2], 0.2, epsilon = 1e-4);
        assert_abs_diff_eq!(hsl[0], 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_color_keeps_destination_lightness() {
        let out = blend_rgb([0.5, 0.5, 0.5], [0.0, 0.0, 1.0], BlendMode::Color);
        assert_abs_diff_eq!(rgb_to_hsl(out)[2], 0.5, epsilon = 1e-4);
        assert!(out[2] > out[0]);
    }

    #[test]
    fn test_composite_alpha_and_opacity() {
        let dst = [10, 20, 30, 77];
        assert_eq!(composite(dst, [200, 200, 200], BlendMode::Normal, 0.0), dst);
        assert_eq!(
            composite(dst, [200, 100, 0], BlendMode::Normal, 1.0),
            [200, 100, 0, 77]
        );
    }

    #[test]
    fn test_names_roundtrip() {
        for mode in BlendMode::ALL {
            assert_eq!(mode.name().parse::<BlendMode>().unwrap(), mode);
        }
        assert_eq!("color_dodge".parse::<BlendMode>().unwrap(), BlendMode::ColorDodge);
        assert!("glow".parse::<BlendMode>().is_err());
    }
}
