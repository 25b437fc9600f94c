//! Effect instances and their ids.

use crate::kind::EffectKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of an effect instance, unique within a stack.
///
/// Generated ids look like `"<kind>-<n>"`, e.g. `"pixelate-2"`; loaded
/// projects may carry any non-empty string.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectId(String);

impl EffectId {
    /// Wraps a string id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Serial number of a generated id of `kind`, if it is one.
    pub(crate) fn serial_for(&self, kind: EffectKind) -> Option<u64> {
        self.0
            .strip_prefix(kind.name())?
            .strip_prefix('-')?
            .parse()
            .ok()
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(&self.0)
    }
}

impl From<&str> for EffectId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EffectId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// One entry of an effect stack. Order is the position in the stack.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EffectInstance {
    /// Unique id.
    pub id: EffectId,
    /// Effect kind.
    #[serde(rename = "type")]
    pub kind: EffectKind,
    /// Disabled instances are skipped during rendering.
    #[serde(default = "enabled_default")]
    pub enabled: bool,
}

fn enabled_default() -> bool {
    true
}

impl EffectInstance {
    /// Enabled instance.
    pub fn new(id: impl Into<EffectId>, kind: EffectKind) -> Self {
        Self {
            id: id.into(),
            kind,
            enabled: true,
        }
    }
}
