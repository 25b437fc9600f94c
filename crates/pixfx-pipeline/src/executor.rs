//! Pipeline executor.
//!
//! Runs every enabled instance of a stack, in order, over a copy of the
//! source raster. A step that fails (allocation failure, unusable settings)
//! is logged and skipped: the working buffer passes through unchanged and
//! the remaining steps still run.

use crate::instance::{EffectId, EffectInstance};
use crate::kind::EffectKind;
use crate::stack::EffectStack;
use pixfx_core::Raster;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// What happened to one instance during a render.
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The effect ran and replaced the working buffer.
    Applied,
    /// The instance is disabled.
    Skipped,
    /// The effect failed; the buffer passed through.
    Failed(String),
}

/// Per-instance record of a render.
#[derive(Debug, Clone, PartialEq)]
pub struct StepReport {
    /// Instance id.
    pub id: EffectId,
    /// Instance kind.
    pub kind: EffectKind,
    /// Outcome.
    pub outcome: StepOutcome,
    /// Wall time spent in the effect.
    pub elapsed: Duration,
}

/// Summary of a whole render.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderReport {
    /// One entry per instance, in stack order.
    pub steps: Vec<StepReport>,
    /// Wall time of the whole pass.
    pub elapsed: Duration,
}

impl RenderReport {
    /// Number of steps that ran successfully.
    pub fn applied(&self) -> usize {
        self.count(|o| matches!(o, StepOutcome::Applied))
    }

    /// Number of steps that failed and passed through.
    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, StepOutcome::Failed(_)))
    }

    fn count(&self, f: impl Fn(&StepOutcome) -> bool) -> usize {
        self.steps.iter().filter(|s| f(&s.outcome)).count()
    }
}

/// Renders `source` through `stack`.
///
/// The output always has the source's dimensions. An empty stack, or one
/// where every instance is disabled, returns an identical copy.
pub fn render(source: &Raster, stack: &EffectStack) -> Raster {
    render_with_report(source, stack).0
}

/// Renders and also returns per-step outcomes and timings.
pub fn render_with_report(source: &Raster, stack: &EffectStack) -> (Raster, RenderReport) {
    let start = Instant::now();
    let mut current = source.clone();
    let mut steps = Vec::with_capacity(stack.len());

    for inst in stack.instances() {
        let step_start = Instant::now();
        let outcome = run_step(&mut current, stack, inst);
        steps.push(StepReport {
            id: inst.id.clone(),
            kind: inst.kind,
            outcome,
            elapsed: step_start.elapsed(),
        });
    }

    let report = RenderReport {
        steps,
        elapsed: start.elapsed(),
    };
    info!(
        width = source.width(),
        height = source.height(),
        steps = report.steps.len(),
        applied = report.applied(),
        failed = report.failed(),
        elapsed_ms = report.elapsed.as_secs_f64() * 1000.0,
        "render complete"
    );
    (current, report)
}

fn run_step(current: &mut Raster, stack: &EffectStack, inst: &EffectInstance) -> StepOutcome {
    if !inst.enabled {
        debug!(id = %inst.id, "skip disabled effect");
        return StepOutcome::Skipped;
    }

    let settings = stack.resolve_instance(inst);
    match settings.apply(current) {
        Ok(out) if out.dimensions() == current.dimensions() => {
            *current = out;
            StepOutcome::Applied
        }
        Ok(out) => {
            let msg = format!(
                "output {}x{} does not match input {}x{}",
                out.width(),
                out.height(),
                current.width(),
                current.height()
            );
            warn!(id = %inst.id, kind = %inst.kind, "{msg}; passing through");
            StepOutcome::Failed(msg)
        }
        Err(e) => {
            warn!(id = %inst.id, kind = %inst.kind, error = %e, "effect failed; passing through");
            StepOutcome::Failed(e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::EffectSettings;
    use pixfx_ops::GradientMapSettings;
    use serde_json::json;

    fn coords(w: u32, h: u32) -> Raster {
        let mut img = Raster::new(w, h);
        for y in 0..h {
            for x in 0..w {
                img.set_pixel(x, y, [(x * 7) as u8, (y * 11) as u8, 90, 255]);
            }
        }
        img
    }

    #[test]
    fn test_empty_stack_is_identity() {
        let img = coords(12, 9);
        assert_eq!(render(&img, &EffectStack::new()), img);
    }

    #[test]
    fn test_all_disabled_is_identity() {
        let img = coords(12, 9);
        let mut stack = EffectStack::with_kinds(EffectKind::ALL);
        let ids: Vec<_> = stack.instances().iter().map(|i| i.id.clone()).collect();
        for id in &ids {
            stack.set_enabled(id, false).unwrap();
        }
        let (out, report) = render_with_report(&img, &stack);
        assert_eq!(out, img);
        assert!(report.steps.iter().all(|s| s.outcome == StepOutcome::Skipped));
    }

    #[test]
    fn test_steps_run_in_order() {
        let img = coords(16, 16);
        let mut stack = EffectStack::new();
        let a = stack.add(EffectKind::Threshold);
        let b = stack.add(EffectKind::Adjust);
        stack.patch_settings(&b, &json!({"invert": true})).unwrap();

        let out = render(&img, &stack);
        let t = EffectSettings::default_for(EffectKind::Threshold).apply(&img).unwrap();
        let expected = stack.resolve(&b).unwrap().apply(&t).unwrap();
        assert_eq!(out, expected);

        stack.move_up(&b).unwrap();
        let swapped = render(&img, &stack);
        let i = stack.resolve(&b).unwrap().apply(&img).unwrap();
        assert_eq!(swapped, stack.resolve(&a).unwrap().apply(&i).unwrap());
    }

    #[test]
    fn test_failed_step_passes_through() {
        let img = coords(10, 10);
        let mut stack = EffectStack::new();
        let id = stack.add_with(EffectSettings::GradientMap(GradientMapSettings {
            stops: Vec::new(),
            ..Default::default()
        }));
        let (out, report) = render_with_report(&img, &stack);
        assert_eq!(out, img);
        assert_eq!(report.steps[0].id, id);
        assert!(matches!(&report.steps[0].outcome, StepOutcome::Failed(m) if m.contains("2 stops")));
        assert_eq!(report.failed(), 1);
    }

    #[test]
    fn test_dimensions_preserved() {
        let img = coords(23, 7);
        let stack = EffectStack::with_kinds(EffectKind::ALL);
        let (out, report) = render_with_report(&img, &stack);
        assert_eq!(out.dimensions(), (23, 7));
        assert_eq!(report.steps.len(), 19);
        assert_eq!(report.failed(), 0);
    }
}
