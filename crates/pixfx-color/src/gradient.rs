//! One-dimensional color ramps defined by gradient stops.
//!
//! A gradient is a list of at least two [`GradientStop`]s sorted by
//! position (`0..=100`). Sampling below the first stop returns the first
//! color, above the last stop returns the last color, and anything in
//! between linearly interpolates RGB between the two bounding stops.
//!
//! # Example
//!
//! ```rust
//! use pixfx_color::{Gradient, GradientStop, Rgb8};
//!
//! let g = Gradient::new(vec![
//!     GradientStop::new(0.0, Rgb8::BLACK),
//!     GradientStop::new(100.0, Rgb8::WHITE),
//! ]).unwrap();
//!
//! assert_eq!(g.sample(-10.0), [0, 0, 0]);
//! assert_eq!(g.sample(110.0), [255, 255, 255]);
//! ```

use crate::{ColorError, ColorResult, Rgb8};
use serde::{Deserialize, Serialize};

/// A `(position, color)` anchor on a gradient.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// Position along the ramp, `0..=100`.
    pub position: f32,
    /// Color at this position.
    pub color: Rgb8,
}

impl GradientStop {
    /// Creates a stop.
    #[inline]
    pub const fn new(position: f32, color: Rgb8) -> Self {
        Self { position, color }
    }
}

/// Validated, position-sorted gradient.
#[derive(Debug, Clone, PartialEq)]
pub struct Gradient {
    stops: Vec<GradientStop>,
}

impl Gradient {
    /// Builds a gradient, sorting stops by position.
    ///
    /// # Errors
    ///
    /// [`ColorError::InvalidGradient`] if fewer than two stops are given or a
    /// position is not finite.
    pub fn new(mut stops: Vec<GradientStop>) -> ColorResult<Self> {
        if stops.len() < 2 {
            return Err(ColorError::InvalidGradient(format!(
                "need at least 2 stops, got {}",
                stops.len()
            )));
        }
        if let Some(bad) = stops.iter().find(|s| !s.position.is_finite()) {
            return Err(ColorError::InvalidGradient(format!(
                "non-finite stop position {}",
                bad.position
            )));
        }
        stops.sort_by(|a, b| a.position.total_cmp(&b.position));
        Ok(Self { stops })
    }

    /// Sorted stops.
    #[inline]
    pub fn stops(&self) -> &[GradientStop] {
        &self.stops
    }

    /// Samples the ramp at `position` (`0..=100`, clamped at the end stops).
    pub fn sample(&self, position: f32) -> [u8; 3] {
        let first = self.stops[0];
        let last = self.stops[self.stops.len() - 1];
        if position.is_nan() || position <= first.position {
            return first.color.0;
        }
        if position >= last.position {
            return last.color.0;
        }

        // First stop strictly after `position`; the one before it bounds from below.
        let upper = self.stops.partition_point(|s| s.position <= position);
        let lo = self.stops[upper - 1];
        let hi = self.stops[upper];
        let span = hi.position - lo.position;
        let t = if span <= f32::EPSILON {
            1.0
        } else {
            (position - lo.position) / span
        };

        let mut out = [0u8; 3];
        for (c, slot) in out.iter_mut().enumerate() {
            let a = lo.color.0[c] as f32;
            let b = hi.color.0[c] as f32;
            *slot = pixfx_core::clamp_u8(a + (b - a) * t);
        }
        out
    }

    /// Precomputes a 256-entry lookup table indexed by 8-bit brightness.
    pub fn lut(&self) -> [[u8; 3]; 256] {
        let mut table = [[0u8; 3]; 256];
        for (i, entry) in table.iter_mut().enumerate() {
            *entry = self.sample(i as f32 / 255.0 * 100.0);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bw() -> Gradient {
        Gradient::new(vec![
            GradientStop::new(0.0, Rgb8::BLACK),
            GradientStop::new(100.0, Rgb8::WHITE),
        ])
        .unwrap()
    }

    #[test]
    fn test_midpoint() {
        let mid = bw().sample(50.0);
        for c in mid {
            assert!(c == 127 || c == 128, "got {c}");
        }
    }

    #[test]
    fn test_clamps_outside_range() {
        let g = bw();
        assert_eq!(g.sample(-10.0), [0, 0, 0]);
        assert_eq!(g.sample(110.0), [255, 255, 255]);
        assert_eq!(g.sample(f32::NAN), [0, 0, 0]);
    }

    #[test]
    fn test_requires_two_stops() {
        assert!(Gradient::new(vec![]).is_err());
        assert!(Gradient::new(vec![GradientStop::new(0.0, Rgb8::BLACK)]).is_err());
        assert!(Gradient::new(vec![
            GradientStop::new(f32::NAN, Rgb8::BLACK),
            GradientStop::new(1.0, Rgb8::WHITE),
        ])
        .is_err());
    }

    #[test]
    fn test_sorts_and_picks_bounding_pair() {
        let g = Gradient::new(vec![
            GradientStop::new(100.0, Rgb8::new(0, 0, 255)),
            GradientStop::new(0.0, Rgb8::new(255, 0, 0)),
            GradientStop::new(50.0, Rgb8::new(0, 255, 0)),
        ])
        .unwrap();
        assert_eq!(g.stops()[0].position, 0.0);
        assert_eq!(g.sample(50.0), [0, 255, 0]);
        assert_eq!(g.sample(75.0), [0, 128, 128]);
        assert_eq!(g.sample(25.0), [128, 128, 0]);
    }

    #[test]
    fn test_duplicate_positions() {
        let g = Gradient::new(vec![
            GradientStop::new(0.0, Rgb8::BLACK),
            GradientStop::new(50.0, Rgb8::new(255, 0, 0)),
            GradientStop::new(50.0, Rgb8::new(0, 0, 255)),
            GradientStop::new(100.0, Rgb8::WHITE),
        ])
        .unwrap();
        assert_eq!(g.sample(50.0), [0, 0, 255]);
        assert_eq!(g.sample(49.999), [255, 0, 0]);
    }

    #[test]
    fn test_lut_endpoints() {
        let lut = bw().lut();
        assert_eq!(lut[0], [0, 0, 0]);
        assert_eq!(lut[255], [255, 255, 255]);
    }
}
