//! Settings validation helpers.
//!
//! Every settings struct implements [`Sanitize`]: before a transform runs,
//! NaN and infinities are replaced by the field default and every numeric
//! field is clamped into its documented range. Integer fields also accept
//! any JSON number on load (negative, fractional, huge) and saturate into
//! `u32`, so an out-of-range value is clamped instead of rejected.

use serde::{Deserialize, Deserializer};

/// Clamps every field of a settings record into its documented range.
pub trait Sanitize {
    /// Clamps in place.
    fn sanitize(&mut self);

    /// Returns a clamped copy.
    fn sanitized(&self) -> Self
    where
        Self: Clone,
    {
        let mut out = self.clone();
        out.sanitize();
        out
    }
}

/// Clamps a float into `[min, max]`, replacing non-finite values with `default`.
#[inline]
pub fn clamp_f32(v: &mut f32, min: f32, max: f32, default: f32) {
    if !v.is_finite() {
        *v = default;
    }
    *v = v.clamp(min, max);
}

/// Clamps an integer into `[min, max]`.
#[inline]
pub fn clamp_u32(v: &mut u32, min: u32, max: u32) {
    *v = (*v).clamp(min, max);
}

/// Deserializes any JSON number into a saturated `u32`.
pub fn lenient_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    let v = f64::deserialize(deserializer)?;
    Ok(saturate_u32(v))
}

#[inline]
fn saturate_u32(v: f64) -> u32 {
    if v.is_nan() {
        0
    } else {
        v.round().clamp(0.0, u32::MAX as f64) as u32
    }
}
