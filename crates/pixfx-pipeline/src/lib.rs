//! # pixfx-pipeline
//!
//! Effect stack model and executor for pixfx.
//!
//! - [`EffectKind`] - the catalog of effects
//! - [`EffectSettings`] - tagged union of every kind's settings, with `match`
//!   dispatch to the transforms in `pixfx-ops`
//! - [`EffectStack`] - ordered instances plus per-instance and per-kind
//!   settings, with add / remove / duplicate / reorder / patch operations
//! - [`render`] / [`render_with_report`] - run a stack over a raster
//! - [`project`] - JSON project files
//! - [`RenderSession`] - debounced background rendering
//!
//! # Example
//!
//! ```rust
//! use pixfx_core::Raster;
//! use pixfx_pipeline::{render, EffectKind, EffectStack};
//!
//! let src = Raster::filled(32, 32, [90, 140, 200, 255]);
//! let stack = EffectStack::with_kinds([EffectKind::Posterize, EffectKind::Vignette]);
//! let out = render(&src, &stack);
//! assert_eq!(out.dimensions(), src.dimensions());
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod error;
pub mod executor;
pub mod instance;
pub mod kind;
pub mod project;
pub mod session;
pub mod settings;
pub mod stack;

pub use error::{PipelineError, PipelineResult};
pub use executor::{RenderReport, StepOutcome, StepReport, render, render_with_report};
pub use instance::{EffectId, EffectInstance};
pub use kind::EffectKind;
pub use project::{PROJECT_VERSION, ProjectFile};
pub use session::{Frame, RenderSession, SessionConfig};
pub use settings::EffectSettings;
pub use stack::EffectStack;
