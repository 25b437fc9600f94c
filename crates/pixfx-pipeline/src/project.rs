//! Persisted project files.
//!
//! A project is the whole effect stack as one JSON document:
//!
//! ```json
//! {
//!   "version": 1,
//!   "effectInstances": [{ "id": "blur-1", "type": "blur", "enabled": true }],
//!   "instanceSettings": { "blur-1": { "type": "blur", "radius": 4.0, "passes": 3 } },
//!   "defaultSettings": {}
//! }
//! ```
//!
//! Loading validates the whole document before touching any stack, so a
//! malformed file never leaves a half-applied state behind.

use crate::error::{PipelineError, PipelineResult};
use crate::instance::{EffectId, EffectInstance};
use crate::kind::EffectKind;
use crate::settings::EffectSettings;
use crate::stack::EffectStack;
use pixfx_ops::Sanitize;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::Path;
use tracing::debug;

/// Current project format version.
pub const PROJECT_VERSION: u32 = 1;

/// On-disk form of an [`EffectStack`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectFile {
    /// Format version.
    pub version: u32,
    /// Instances in render order.
    #[serde(default)]
    pub effect_instances: Vec<EffectInstance>,
    /// Per-instance settings.
    #[serde(default)]
    pub instance_settings: BTreeMap<EffectId, EffectSettings>,
    /// Per-kind defaults.
    #[serde(default)]
    pub default_settings: BTreeMap<EffectKind, EffectSettings>,
}

impl ProjectFile {
    /// Snapshot of a stack.
    pub fn from_stack(stack: &EffectStack) -> Self {
        Self {
            version: PROJECT_VERSION,
            effect_instances: stack.instances().to_vec(),
            instance_settings: stack.instance_settings().clone(),
            default_settings: stack.stored_defaults().clone(),
        }
    }

    /// Validates and converts into a stack.
    ///
    /// # Errors
    ///
    /// [`PipelineError::Load`] for an unsupported version, empty or duplicate
    /// ids, settings for unknown instances, or settings whose kind does not
    /// match their instance or default slot.
    pub fn into_stack(self) -> PipelineResult<EffectStack> {
        if self.version == 0 || self.version > PROJECT_VERSION {
            return Err(PipelineError::load(format!(
                "unsupported project version {} (expected 1..={PROJECT_VERSION})",
                self.version
            )));
        }

        let mut seen = HashSet::new();
        for inst in &self.effect_instances {
            if inst.id.as_str().is_empty() {
                return Err(PipelineError::load("empty effect id"));
            }
            if !seen.insert(&inst.id) {
                return Err(PipelineError::load(format!("duplicate effect id {}", inst.id)));
            }
        }

        let mut instance_settings = BTreeMap::new();
        for (id, settings) in self.instance_settings {
            let Some(inst) = self.effect_instances.iter().find(|i| i.id == id) else {
                return Err(PipelineError::load(format!("settings for unknown effect {id}")));
            };
            if settings.kind() != inst.kind {
                return Err(PipelineError::load(format!(
                    "settings for {id} are {}, instance is {}",
                    settings.kind(),
                    inst.kind
                )));
            }
            instance_settings.insert(id, settings.sanitized());
        }

        let mut default_settings = BTreeMap::new();
        for (kind, settings) in self.default_settings {
            if settings.kind() != kind {
                return Err(PipelineError::load(format!(
                    "default for {kind} holds {} settings",
                    settings.kind()
                )));
            }
            default_settings.insert(kind, settings.sanitized());
        }

        Ok(EffectStack::from_parts(
            self.effect_instances,
            instance_settings,
            default_settings,
        ))
    }
}

/// Serializes a stack to pretty-printed project JSON.
pub fn to_json(stack: &EffectStack) -> PipelineResult<String> {
    let json = serde_json::to_string_pretty(&ProjectFile::from_stack(stack))
        .map_err(std::io::Error::from)?;
    Ok(json)
}

/// Parses and validates project JSON.
pub fn from_json(json: &str) -> PipelineResult<EffectStack> {
    let file: ProjectFile =
        serde_json::from_str(json).map_err(|e| PipelineError::load(e.to_string()))?;
    file.into_stack()
}

/// Writes a project file.
pub fn save(stack: &EffectStack, path: impl AsRef<Path>) -> PipelineResult<()> {
    let path = path.as_ref();
    fs::write(path, to_json(stack)?)?;
    debug!(path = %path.display(), effects = stack.len(), "saved project");
    Ok(())
}

/// Reads a project file.
pub fn load(path: impl AsRef<Path>) -> PipelineResult<EffectStack> {
    let path = path.as_ref();
    let stack = from_json(&fs::read_to_string(path)?)?;
    debug!(path = %path.display(), effects = stack.len(), "loaded project");
    Ok(stack)
}

impl EffectStack {
    /// Replaces this stack with a parsed project. On error `self` is untouched.
    pub fn load_json(&mut self, json: &str) -> PipelineResult<()> {
        *self = from_json(json)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> EffectStack {
        let mut stack = EffectStack::with_kinds([
            EffectKind::Pixelate,
            EffectKind::GradientMap,
            EffectKind::SliceShift,
        ]);
        stack
            .patch_settings(&"pixelate-1".into(), &json!({"mode": "radial", "rings": 5}))
            .unwrap();
        stack.set_enabled(&"gradient-map-1".into(), false).unwrap();
        stack
            .patch_defaults(EffectKind::Noise, &json!({"amount": 42}))
            .unwrap();
        stack
    }

    #[test]
    fn test_round_trip() {
        let stack = sample();
        let json = to_json(&stack).unwrap();
        assert_eq!(from_json(&json).unwrap(), stack);
    }

    #[test]
    fn test_wire_shape() {
        let v: serde_json::Value = serde_json::from_str(&to_json(&sample()).unwrap()).unwrap();
        assert_eq!(v["version"], 1);
        assert_eq!(v["effectInstances"][1]["type"], "gradient-map");
        assert_eq!(v["effectInstances"][1]["enabled"], false);
        assert_eq!(v["instanceSettings"]["pixelate-1"]["mode"], "radial");
        assert_eq!(v["defaultSettings"]["noise"]["amount"], 42.0);
    }

    #[test]
    fn test_partial_settings_load_with_defaults() {
        let stack = from_json(
            r#"{"version": 1,
                "effectInstances": [{"id": "a", "type": "blur"}],
                "instanceSettings": {"a": {"type": "blur", "radius": 2}}}"#,
        )
        .unwrap();
        let EffectSettings::Blur(b) = stack.resolve(&"a".into()).unwrap() else {
            panic!("wrong kind");
        };
        assert_eq!((b.radius, b.passes), (2.0, 3));
    }

    #[test]
    fn test_invalid_files_rejected() {
        let bad = [
            "not json",
            r#"{"version": 9}"#,
            r#"{"version": 1, "effectInstances": [{"id": "a", "type": "blur"}, {"id": "a", "type": "noise"}]}"#,
            r#"{"version": 1, "instanceSettings": {"ghost": {"type": "blur"}}}"#,
            r#"{"version": 1, "effectInstances": [{"id": "a", "type": "blur"}],
                "instanceSettings": {"a": {"type": "noise"}}}"#,
            r#"{"version": 1, "defaultSettings": {"blur": {"type": "noise"}}}"#,
            r#"{"version": 1, "effectInstances": [{"id": "a", "type": "sepia"}]}"#,
        ];
        for json in bad {
            assert!(matches!(from_json(json), Err(PipelineError::Load(_))), "{json}");
        }
    }

    #[test]
    fn test_failed_load_leaves_stack() {
        let mut stack = sample();
        let before = stack.clone();
        assert!(stack.load_json(r#"{"version": 1, "effectInstances": 3}"#).is_err());
        assert_eq!(stack, before);
        stack.load_json(r#"{"version": 1}"#).unwrap();
        assert!(stack.is_empty());
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("project.json");
        let stack = sample();
        save(&stack, &path).unwrap();
        assert_eq!(load(&path).unwrap(), stack);
        assert!(matches!(load(dir.path().join("missing.json")), Err(PipelineError::Io(_))));
    }
}
