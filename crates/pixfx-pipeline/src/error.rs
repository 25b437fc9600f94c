//! Error types for effect stacks and project files.

use crate::kind::EffectKind;
use thiserror::Error;

/// Result type alias using [`PipelineError`].
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Errors raised by stack edits and project loading.
///
/// Rendering itself never fails: a failing effect is logged and skipped.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// No instance with this id in the stack.
    #[error("unknown effect instance: {0}")]
    UnknownInstance(String),

    /// Effect kind name not recognized.
    #[error("unknown effect kind: {0}")]
    UnknownKind(String),

    /// Settings of one kind supplied for an instance or default of another.
    #[error("settings kind mismatch: expected {expected}, got {found}")]
    KindMismatch {
        /// Kind of the target
        expected: EffectKind,
        /// Kind of the supplied settings
        found: EffectKind,
    },

    /// A settings patch was rejected; nothing was changed.
    #[error("invalid settings patch: {0}")]
    InvalidPatch(String),

    /// Reorder index past the end of the stack.
    #[error("index {index} out of range for stack of {len}")]
    IndexOutOfRange {
        /// Requested index
        index: usize,
        /// Stack length
        len: usize,
    },

    /// Project file malformed or inconsistent; the stack was left untouched.
    #[error("failed to load project: {0}")]
    Load(String),

    /// Project file could not be read or written.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl PipelineError {
    /// Creates a [`PipelineError::Load`] error.
    #[inline]
    pub fn load(reason: impl Into<String>) -> Self {
        Self::Load(reason.into())
    }

    /// Creates a [`PipelineError::InvalidPatch`] error.
    #[inline]
    pub fn invalid_patch(reason: impl Into<String>) -> Self {
        Self::InvalidPatch(reason.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = PipelineError::KindMismatch {
            expected: EffectKind::Blur,
            found: EffectKind::Noise,
        };
        assert_eq!(err.to_string(), "settings kind mismatch: expected blur, got noise");
        assert!(PipelineError::load("bad version").to_string().contains("bad version"));
    }
}
