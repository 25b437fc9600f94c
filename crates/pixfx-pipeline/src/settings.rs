//! Tagged-union effect settings.
//!
//! [`EffectSettings`] has one variant per [`EffectKind`], each wrapping the
//! kind's settings struct from `pixfx-ops`. On the wire it is a flat JSON
//! object with a `"type"` tag:
//!
//! ```json
//! { "type": "pixelate", "mode": "radial", "rings": 12, "segments": 24 }
//! ```
//!
//! Missing fields take their defaults, so an older or partial record still
//! loads.

use crate::error::{PipelineError, PipelineResult};
use crate::kind::EffectKind;
use pixfx_core::Raster;
use pixfx_ops::{
    AdjustSettings, AsciiSettings, BlurSettings, DitherSettings, FindEdgesSettings, GlitchSettings,
    GradientMapSettings, HalftoneSettings, MosaicShiftSettings, NoiseSettings, OpsResult,
    PixelateSettings, PolarPixelSettings, PosterizeSettings, Sanitize, ScanlinesSettings,
    SharpenSettings, SliceShiftSettings, ThresholdSettings, Transform3dSettings, VignetteSettings,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Settings for one effect instance, tagged by kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
#[allow(missing_docs)]
pub enum EffectSettings {
    Adjust(AdjustSettings),
    Blur(BlurSettings),
    Sharpen(SharpenSettings),
    FindEdges(FindEdgesSettings),
    GradientMap(GradientMapSettings),
    Pixelate(PixelateSettings),
    PolarPixel(PolarPixelSettings),
    Posterize(PosterizeSettings),
    Dither(DitherSettings),
    Halftone(HalftoneSettings),
    SliceShift(SliceShiftSettings),
    MosaicShift(MosaicShiftSettings),
    Glitch(GlitchSettings),
    Noise(NoiseSettings),
    Threshold(ThresholdSettings),
    Vignette(VignetteSettings),
    Ascii(AsciiSettings),
    Transform3d(Transform3dSettings),
    Scanlines(ScanlinesSettings),
}

/// Expands `$body` once per variant with `$s` bound to the inner settings.
macro_rules! each_variant {
    ($value:expr, $s:ident => $body:expr) => {
        match $value {
            EffectSettings::Adjust($s) => $body,
            EffectSettings::Blur($s) => $body,
            EffectSettings::Sharpen($s) => $body,
            EffectSettings::FindEdges($s) => $body,
            EffectSettings::GradientMap($s) => $body,
            EffectSettings::Pixelate($s) => $body,
            EffectSettings::PolarPixel($s) => $body,
            EffectSettings::Posterize($s) => $body,
            EffectSettings::Dither($s) => $body,
            EffectSettings::Halftone($s) => $body,
            EffectSettings::SliceShift($s) => $body,
            EffectSettings::MosaicShift($s) => $body,
            EffectSettings::Glitch($s) => $body,
            EffectSettings::Noise($s) => $body,
            EffectSettings::Threshold($s) => $body,
            EffectSettings::Vignette($s) => $body,
            EffectSettings::Ascii($s) => $body,
            EffectSettings::Transform3d($s) => $body,
            EffectSettings::Scanlines($s) => $body,
        }
    };
}

macro_rules! impl_from {
    ($($settings:ident => $variant:ident),* $(,)?) => {
        $(
            impl From<$settings> for EffectSettings {
                fn from(s: $settings) -> Self {
                    EffectSettings::$variant(s)
                }
            }
        )*
    };
}

impl_from! {
    AdjustSettings => Adjust,
    BlurSettings => Blur,
    SharpenSettings => Sharpen,
    FindEdgesSettings => FindEdges,
    GradientMapSettings => GradientMap,
    PixelateSettings => Pixelate,
    PolarPixelSettings => PolarPixel,
    PosterizeSettings => Posterize,
    DitherSettings => Dither,
    HalftoneSettings => Halftone,
    SliceShiftSettings => SliceShift,
    MosaicShiftSettings => MosaicShift,
    GlitchSettings => Glitch,
    NoiseSettings => Noise,
    ThresholdSettings => Threshold,
    VignetteSettings => Vignette,
    AsciiSettings => Ascii,
    Transform3dSettings => Transform3d,
    ScanlinesSettings => Scanlines,
}

impl EffectSettings {
    /// Built-in defaults for a kind.
    pub fn default_for(kind: EffectKind) -> Self {
        match kind {
            EffectKind::Adjust => Self::Adjust(Default::default()),
            EffectKind::Blur => Self::Blur(Default::default()),
            EffectKind::Sharpen => Self::Sharpen(Default::default()),
            EffectKind::FindEdges => Self::FindEdges(Default::default()),
            EffectKind::GradientMap => Self::GradientMap(Default::default()),
            EffectKind::Pixelate => Self::Pixelate(Default::default()),
            EffectKind::PolarPixel => Self::PolarPixel(Default::default()),
            EffectKind::Posterize => Self::Posterize(Default::default()),
            EffectKind::Dither => Self::Dither(Default::default()),
            EffectKind::Halftone => Self::Halftone(Default::default()),
            EffectKind::SliceShift => Self::SliceShift(Default::default()),
            EffectKind::MosaicShift => Self::MosaicShift(Default::default()),
            EffectKind::Glitch => Self::Glitch(Default::default()),
            EffectKind::Noise => Self::Noise(Default::default()),
            EffectKind::Threshold => Self::Threshold(Default::default()),
            EffectKind::Vignette => Self::Vignette(Default::default()),
            EffectKind::Ascii => Self::Ascii(Default::default()),
            EffectKind::Transform3d => Self::Transform3d(Default::default()),
            EffectKind::Scanlines => Self::Scanlines(Default::default()),
        }
    }

    /// Kind tag of this record.
    pub fn kind(&self) -> EffectKind {
        match self {
            Self::Adjust(_) => EffectKind::Adjust,
            Self::Blur(_) => EffectKind::Blur,
            Self::Sharpen(_) => EffectKind::Sharpen,
            Self::FindEdges(_) => EffectKind::FindEdges,
            Self::GradientMap(_) => EffectKind::GradientMap,
            Self::Pixelate(_) => EffectKind::Pixelate,
            Self::PolarPixel(_) => EffectKind::PolarPixel,
            Self::Posterize(_) => EffectKind::Posterize,
            Self::Dither(_) => EffectKind::Dither,
            Self::Halftone(_) => EffectKind::Halftone,
            Self::SliceShift(_) => EffectKind::SliceShift,
            Self::MosaicShift(_) => EffectKind::MosaicShift,
            Self::Glitch(_) => EffectKind::Glitch,
            Self::Noise(_) => EffectKind::Noise,
            Self::Threshold(_) => EffectKind::Threshold,
            Self::Vignette(_) => EffectKind::Vignette,
            Self::Ascii(_) => EffectKind::Ascii,
            Self::Transform3d(_) => EffectKind::Transform3d,
            Self::Scanlines(_) => EffectKind::Scanlines,
        }
    }

    /// PRNG seed, for seeded kinds.
    pub fn seed(&self) -> Option<u32> {
        match self {
            Self::Pixelate(s) => Some(s.seed),
            Self::Dither(s) => Some(s.seed),
            Self::SliceShift(s) => Some(s.seed),
            Self::MosaicShift(s) => Some(s.seed),
            Self::Glitch(s) => Some(s.seed),
            Self::Noise(s) => Some(s.seed),
            _ => None,
        }
    }

    /// Replaces the seed. Returns `false` for kinds without one.
    pub fn set_seed(&mut self, seed: u32) -> bool {
        let slot = match self {
            Self::Pixelate(s) => &mut s.seed,
            Self::Dither(s) => &mut s.seed,
            Self::SliceShift(s) => &mut s.seed,
            Self::MosaicShift(s) => &mut s.seed,
            Self::Glitch(s) => &mut s.seed,
            Self::Noise(s) => &mut s.seed,
            _ => return false,
        };
        *slot = seed;
        true
    }

    /// Runs the effect on `src`.
    pub fn apply(&self, src: &Raster) -> OpsResult<Raster> {
        use pixfx_ops::*;
        match self {
            Self::Adjust(s) => adjust::apply(src, s),
            Self::Blur(s) => blur::apply(src, s),
            Self::Sharpen(s) => sharpen::apply(src, s),
            Self::FindEdges(s) => edges::apply(src, s),
            Self::GradientMap(s) => gradient_map::apply(src, s),
            Self::Pixelate(s) => pixelate::apply(src, s),
            Self::PolarPixel(s) => polar::apply(src, s),
            Self::Posterize(s) => posterize::apply(src, s),
            Self::Dither(s) => dither::apply(src, s),
            Self::Halftone(s) => halftone::apply(src, s),
            Self::SliceShift(s) => slice_shift::apply(src, s),
            Self::MosaicShift(s) => mosaic_shift::apply(src, s),
            Self::Glitch(s) => glitch::apply(src, s),
            Self::Noise(s) => noise::apply(src, s),
            Self::Threshold(s) => threshold::apply(src, s),
            Self::Vignette(s) => vignette::apply(src, s),
            Self::Ascii(s) => ascii::apply(src, s),
            Self::Transform3d(s) => transform3d::apply(src, s),
            Self::Scanlines(s) => scanlines::apply(src, s),
        }
    }

    /// Serializes to a JSON object including the `"type"` tag.
    ///
    /// Returns `Value::Null`, with a warning, if serialization fails.
    pub fn to_json(&self) -> Value {
        match serde_json::to_value(self) {
            Ok(value) => value,
            Err(e) => {
                warn!(kind = %self.kind(), error = %e, "cannot serialize settings");
                Value::Null
            }
        }
    }

    /// Shallow-merges a JSON object of field values into a copy of `self`.
    ///
    /// Every key must name an existing field. A `"type"` key is allowed only
    /// if it matches the current kind. The result is sanitized. On any error
    /// `self` is untouched and nothing is returned.
    pub fn merged(&self, patch: &Value) -> PipelineResult<Self> {
        let Value::Object(fields) = patch else {
            return Err(PipelineError::invalid_patch("patch must be a JSON object"));
        };
        let kind = self.kind();
        let mut value = self.to_json();
        let Some(target) = value.as_object_mut() else {
            return Err(PipelineError::invalid_patch(format!("{kind} settings are not an object")));
        };

        for (key, v) in fields {
            if key == "type" {
                let found = v
                    .as_str()
                    .ok_or_else(|| PipelineError::invalid_patch("type must be a string"))?
                    .parse::<EffectKind>()?;
                if found != kind {
                    return Err(PipelineError::KindMismatch {
                        expected: kind,
                        found,
                    });
                }
                continue;
            }
            if !target.contains_key(key) {
                return Err(PipelineError::invalid_patch(format!(
                    "unknown setting `{key}` for {kind}"
                )));
            }
            target.insert(key.clone(), v.clone());
        }

        let out: EffectSettings = serde_json::from_value(value)
            .map_err(|e| PipelineError::invalid_patch(format!("{kind}: {e}")))?;
        Ok(out.sanitized())
    }
}

impl Sanitize for EffectSettings {
    fn sanitize(&mut self) {
        each_variant!(self, s => s.sanitize())
    }
}
