//! The ordered effect stack and its edit operations.
//!
//! A stack holds three things:
//!
//! - the ordered list of [`EffectInstance`]s
//! - per-instance settings, keyed by id
//! - per-kind default settings, used for new instances and as a fallback
//!
//! All edits are atomic: an operation that returns `Err` leaves the stack
//! exactly as it was.
//!
//! # Example
//!
//! ```rust
//! use pixfx_pipeline::{EffectKind, EffectStack};
//! use serde_json::json;
//!
//! let mut stack = EffectStack::new();
//! let id = stack.add(EffectKind::Pixelate);
//! stack.patch_settings(&id, &json!({"cellSize": 16, "mode": "radial"})).unwrap();
//! let copy = stack.duplicate(&id).unwrap();
//! stack.move_up(&copy).unwrap();
//! assert_eq!(stack.instances()[0].id, copy);
//! ```

use crate::error::{PipelineError, PipelineResult};
use crate::instance::{EffectId, EffectInstance};
use crate::kind::EffectKind;
use crate::settings::EffectSettings;
use pixfx_ops::Sanitize;
use serde_json::Value;
use std::collections::BTreeMap;

#[allow(unused_imports)]
use tracing::{debug, trace};

/// Ordered effect instances plus their settings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectStack {
    instances: Vec<EffectInstance>,
    instance_settings: BTreeMap<EffectId, EffectSettings>,
    default_settings: BTreeMap<EffectKind, EffectSettings>,
}

impl EffectStack {
    /// Empty stack.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stack with one default instance per kind, in order.
    pub fn with_kinds(kinds: impl IntoIterator<Item = EffectKind>) -> Self {
        let mut stack = Self::new();
        for kind in kinds {
            stack.add(kind);
        }
        stack
    }

    pub(crate) fn from_parts(
        instances: Vec<EffectInstance>,
        instance_settings: BTreeMap<EffectId, EffectSettings>,
        default_settings: BTreeMap<EffectKind, EffectSettings>,
    ) -> Self {
        Self {
            instances,
            instance_settings,
            default_settings,
        }
    }

    /// Instances in render order.
    pub fn instances(&self) -> &[EffectInstance] {
        &self.instances
    }

    /// Stored per-instance settings.
    pub fn instance_settings(&self) -> &BTreeMap<EffectId, EffectSettings> {
        &self.instance_settings
    }

    /// Stored per-kind defaults.
    pub fn stored_defaults(&self) -> &BTreeMap<EffectKind, EffectSettings> {
        &self.default_settings
    }

    /// Number of instances.
    pub fn len(&self) -> usize {
        self.instances.len()
    }

    /// Returns `true` if there are no instances.
    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Looks up an instance.
    pub fn get(&self, id: &EffectId) -> Option<&EffectInstance> {
        self.instances.iter().find(|i| &i.id == id)
    }

    /// Position of an instance.
    pub fn position(&self, id: &EffectId) -> Option<usize> {
        self.instances.iter().position(|i| &i.id == id)
    }

    fn require(&self, id: &EffectId) -> PipelineResult<usize> {
        self.position(id)
            .ok_or_else(|| PipelineError::UnknownInstance(id.to_string()))
    }

    /// Fresh `"<kind>-<n>"` id, one past the highest serial in use.
    fn next_id(&self, kind: EffectKind) -> EffectId {
        let mut n = self
            .instances
            .iter()
            .filter_map(|i| i.id.serial_for(kind))
            .max()
            .unwrap_or(0)
            + 1;
        loop {
            let id = EffectId::new(format!("{}-{n}", kind.name()));
            if self.position(&id).is_none() {
                return id;
            }
            n += 1;
        }
    }

    /// Appends an instance of `kind` with a copy of the kind's defaults.
    pub fn add(&mut self, kind: EffectKind) -> EffectId {
        let settings = self.default_settings(kind);
        self.add_with(settings)
    }

    /// Appends an instance with explicit settings.
    pub fn add_with(&mut self, settings: EffectSettings) -> EffectId {
        let kind = settings.kind();
        let id = self.next_id(kind);
        debug!(id = %id, "add effect");
        self.instance_settings.insert(id.clone(), settings.sanitized());
        self.instances.push(EffectInstance::new(id.clone(), kind));
        id
    }

    /// Removes an instance and discards its settings.
    pub fn remove(&mut self, id: &EffectId) -> PipelineResult<EffectInstance> {
        let pos = self.require(id)?;
        debug!(id = %id, "remove effect");
        self.instance_settings.remove(id);
        Ok(self.instances.remove(pos))
    }

    /// Inserts a copy right after `id`, with a fresh id.
    pub fn duplicate(&mut self, id: &EffectId) -> PipelineResult<EffectId> {
        let pos = self.require(id)?;
        let settings = self.resolve(id)?;
        let original = &self.instances[pos];
        let copy = EffectInstance {
            id: self.next_id(original.kind),
            kind: original.kind,
            enabled: original.enabled,
        };
        let new_id = copy.id.clone();
        debug!(id = %id, copy = %new_id, "duplicate effect");
        self.instance_settings.insert(new_id.clone(), settings);
        self.instances.insert(pos + 1, copy);
        Ok(new_id)
    }

    /// Swaps with the previous instance. Returns `false` if already first.
    pub fn move_up(&mut self, id: &EffectId) -> PipelineResult<bool> {
        let pos = self.require(id)?;
        if pos == 0 {
            return Ok(false);
        }
        self.instances.swap(pos - 1, pos);
        Ok(true)
    }

    /// Swaps with the next instance. Returns `false` if already last.
    pub fn move_down(&mut self, id: &EffectId) -> PipelineResult<bool> {
        let pos = self.require(id)?;
        if pos + 1 >= self.instances.len() {
            return Ok(false);
        }
        self.instances.swap(pos, pos + 1);
        Ok(true)
    }

    /// Moves the instance at `from` so that it ends up at index `to`.
    pub fn reorder(&mut self, from: usize, to: usize) -> PipelineResult<()> {
        let len = self.instances.len();
        for index in [from, to] {
            if index >= len {
                return Err(PipelineError::IndexOutOfRange { index, len });
            }
        }
        let inst = self.instances.remove(from);
        self.instances.insert(to, inst);
        Ok(())
    }

    /// Enables or disables an instance.
    pub fn set_enabled(&mut self, id: &EffectId, enabled: bool) -> PipelineResult<()> {
        let pos = self.require(id)?;
        self.instances[pos].enabled = enabled;
        Ok(())
    }

    /// Flips the enabled flag and returns the new state.
    pub fn toggle(&mut self, id: &EffectId) -> PipelineResult<bool> {
        let pos = self.require(id)?;
        let inst = &mut self.instances[pos];
        inst.enabled = !inst.enabled;
        Ok(inst.enabled)
    }

    /// Replaces an instance's settings. The kind must match.
    pub fn set_settings(&mut self, id: &EffectId, settings: EffectSettings) -> PipelineResult<()> {
        let pos = self.require(id)?;
        let expected = self.instances[pos].kind;
        if settings.kind() != expected {
            return Err(PipelineError::KindMismatch {
                expected,
                found: settings.kind(),
            });
        }
        self.instance_settings.insert(id.clone(), settings.sanitized());
        Ok(())
    }

    /// Shallow-merges a JSON object into an instance's settings.
    ///
    /// ```rust
    /// use pixfx_pipeline::{EffectKind, EffectStack};
    /// use serde_json::json;
    ///
    /// let mut stack = EffectStack::new();
    /// let id = stack.add(EffectKind::Blur);
    /// assert!(stack.patch_settings(&id, &json!({"radius": "wide"})).is_err());
    /// stack.patch_settings(&id, &json!({"radius": 2})).unwrap();
    /// ```
    pub fn patch_settings(&mut self, id: &EffectId, patch: &Value) -> PipelineResult<()> {
        let merged = self.resolve(id)?.merged(patch)?;
        trace!(id = %id, %patch, "patch settings");
        self.instance_settings.insert(id.clone(), merged);
        Ok(())
    }

    /// Re-seeds a seeded instance. Returns `false` for unseeded kinds.
    pub fn reroll_seed(&mut self, id: &EffectId, seed: u32) -> PipelineResult<bool> {
        let mut settings = self.resolve(id)?;
        if !settings.set_seed(seed) {
            return Ok(false);
        }
        debug!(id = %id, seed, "reroll seed");
        self.instance_settings.insert(id.clone(), settings);
        Ok(true)
    }

    /// Stored default for `kind`, or the built-in default; sanitized.
    pub fn default_settings(&self, kind: EffectKind) -> EffectSettings {
        match self.default_settings.get(&kind) {
            Some(s) if s.kind() == kind => s.sanitized(),
            _ => EffectSettings::default_for(kind),
        }
    }

    /// Replaces the default for the settings' kind.
    pub fn set_default_settings(&mut self, settings: EffectSettings) {
        self.default_settings
            .insert(settings.kind(), settings.sanitized());
    }

    /// Shallow-merges a JSON object into the default for `kind`.
    pub fn patch_defaults(&mut self, kind: EffectKind, patch: &Value) -> PipelineResult<()> {
        let merged = self.default_settings(kind).merged(patch)?;
        self.default_settings.insert(kind, merged);
        Ok(())
    }

    /// Settings an instance renders with.
    ///
    /// The instance's own record if present and of the right kind, else the
    /// kind default, else the built-in default; always sanitized.
    pub fn resolve(&self, id: &EffectId) -> PipelineResult<EffectSettings> {
        let pos = self.require(id)?;
        Ok(self.resolve_instance(&self.instances[pos]))
    }

    pub(crate) fn resolve_instance(&self, inst: &EffectInstance) -> EffectSettings {
        match self.instance_settings.get(&inst.id) {
            Some(s) if s.kind() == inst.kind => s.sanitized(),
            _ => self.default_settings(inst.kind),
        }
    }

    /// Removes every instance. Defaults are kept.
    pub fn clear(&mut self) {
        self.instances.clear();
        self.instance_settings.clear();
    }
}
