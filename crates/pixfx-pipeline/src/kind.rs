//! Effect kinds.

use crate::error::PipelineError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every effect the pipeline can run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EffectKind {
    /// Brightness, contrast, saturation, hue, gamma, invert.
    Adjust,
    /// Separable box blur.
    Blur,
    /// Unsharp mask.
    Sharpen,
    /// Edge detection.
    FindEdges,
    /// Luminance to color ramp.
    GradientMap,
    /// Region averaging in several layouts.
    Pixelate,
    /// Ring/segment sector averaging.
    PolarPixel,
    /// Color level reduction.
    Posterize,
    /// Error diffusion and ordered dithering.
    Dither,
    /// Dot/line screens.
    Halftone,
    /// Displaced strips.
    SliceShift,
    /// Displaced tiles.
    MosaicShift,
    /// Channel split and row block displacement.
    Glitch,
    /// Additive grain.
    Noise,
    /// Two-tone luminance threshold.
    Threshold,
    /// Radial darkening.
    Vignette,
    /// Character cells.
    Ascii,
    /// Perspective rotation.
    Transform3d,
    /// Line overlay.
    Scanlines,
}

impl EffectKind {
    /// Every kind, in catalog order.
    pub const ALL: [EffectKind; 19] = [
        EffectKind::Adjust,
        EffectKind::Blur,
        EffectKind::Sharpen,
        EffectKind::FindEdges,
        EffectKind::GradientMap,
        EffectKind::Pixelate,
        EffectKind::PolarPixel,
        EffectKind::Posterize,
        EffectKind::Dither,
        EffectKind::Halftone,
        EffectKind::SliceShift,
        EffectKind::MosaicShift,
        EffectKind::Glitch,
        EffectKind::Noise,
        EffectKind::Threshold,
        EffectKind::Vignette,
        EffectKind::Ascii,
        EffectKind::Transform3d,
        EffectKind::Scanlines,
    ];

    /// Stable kebab-case name, used in ids and files.
    pub fn name(self) -> &'static str {
        match self {
            Self::Adjust => "adjust",
            Self::Blur => "blur",
            Self::Sharpen => "sharpen",
            Self::FindEdges => "find-edges",
            Self::GradientMap => "gradient-map",
            Self::Pixelate => "pixelate",
            Self::PolarPixel => "polar-pixel",
            Self::Posterize => "posterize",
            Self::Dither => "dither",
            Self::Halftone => "halftone",
            Self::SliceShift => "slice-shift",
            Self::MosaicShift => "mosaic-shift",
            Self::Glitch => "glitch",
            Self::Noise => "noise",
            Self::Threshold => "threshold",
            Self::Vignette => "vignette",
            Self::Ascii => "ascii",
            Self::Transform3d => "transform3d",
            Self::Scanlines => "scanlines",
        }
    }

    /// Human-readable title.
    pub fn label(self) -> &'static str {
        match self {
            Self::Adjust => "Adjust",
            Self::Blur => "Blur",
            Self::Sharpen => "Sharpen",
            Self::FindEdges => "Find Edges",
            Self::GradientMap => "Gradient Map",
            Self::Pixelate => "Pixelate",
            Self::PolarPixel => "Polar Pixel",
            Self::Posterize => "Posterize",
            Self::Dither => "Dither",
            Self::Halftone => "Halftone",
            Self::SliceShift => "Slice Shift",
            Self::MosaicShift => "Mosaic Shift",
            Self::Glitch => "Glitch",
            Self::Noise => "Noise",
            Self::Threshold => "Threshold",
            Self::Vignette => "Vignette",
            Self::Ascii => "ASCII",
            Self::Transform3d => "3D Transform",
            Self::Scanlines => "Scanlines",
        }
    }

    /// One-line description for listings.
    pub fn description(self) -> &'static str {
        match self {
            Self::Adjust => "brightness, contrast, saturation, hue, gamma and invert",
            Self::Blur => "separable box blur",
            Self::Sharpen => "unsharp mask",
            Self::FindEdges => "Sobel, Prewitt or Laplacian edge detection",
            Self::GradientMap => "map luminance onto a color gradient",
            Self::Pixelate => "average regions in grid, radial, voronoi and other layouts",
            Self::PolarPixel => "average ring and segment sectors",
            Self::Posterize => "reduce color levels in RGB, HSV or Lab",
            Self::Dither => "error diffusion and ordered dithering",
            Self::Halftone => "dot and line screens",
            Self::SliceShift => "displace horizontal or vertical strips",
            Self::MosaicShift => "displace grid tiles",
            Self::Glitch => "RGB split and shifted row blocks",
            Self::Noise => "additive grain",
            Self::Threshold => "two-tone luminance threshold",
            Self::Vignette => "darken towards the corners",
            Self::Ascii => "character cell rendering",
            Self::Transform3d => "perspective 3D rotation",
            Self::Scanlines => "line overlay",
        }
    }

    /// Returns `true` if the kind's settings carry a PRNG seed.
    pub fn is_seeded(self) -> bool {
        matches!(
            self,
            Self::Pixelate
                | Self::Dither
                | Self::SliceShift
                | Self::MosaicShift
                | Self::Glitch
                | Self::Noise
        )
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.name())
    }
}

impl FromStr for EffectKind {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL
            .into_iter()
            .find(|k| k.name() == key)
            .ok_or_else(|| PipelineError::UnknownKind(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for kind in EffectKind::ALL {
            assert_eq!(kind.name().parse::<EffectKind>().unwrap(), kind);
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.name()));
        }
    }

    #[test]
    fn test_parse_is_forgiving() {
        assert_eq!("Find_Edges".parse::<EffectKind>().unwrap(), EffectKind::FindEdges);
        assert!(matches!(
            "sepia".parse::<EffectKind>(),
            Err(PipelineError::UnknownKind(_))
        ));
    }

    #[test]
    fn test_all_is_complete() {
        let mut names: Vec<_> = EffectKind::ALL.iter().map(|k| k.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), 19);
    }
}
