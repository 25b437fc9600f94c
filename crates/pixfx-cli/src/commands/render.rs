//! Render command
//!
//! Loads a project file and runs its whole effect stack over an image.

use crate::RenderArgs;
use anyhow::Result;
use pixfx_pipeline::{StepOutcome, render_with_report};
#[allow(unused_imports)]
use tracing::{debug, info, trace};

pub fn run(args: RenderArgs, verbose: u8) -> Result<()> {
    trace!(input = %args.input.display(), project = %args.project.display(), "render::run");

    let stack = super::load_project(&args.project)?;
    let image = super::load_image(&args.input)?;
    info!(effects = stack.len(), w = image.width(), h = image.height(), "Rendering");

    let (output, report) = render_with_report(&image, &stack);
    super::save_image(&args.output, &output)?;

    if args.report || verbose > 0 {
        for step in &report.steps {
            let status = match &step.outcome {
                StepOutcome::Applied => "ok".to_string(),
                StepOutcome::Skipped => "disabled".to_string(),
                StepOutcome::Failed(msg) => format!("failed: {msg}"),
            };
            println!(
                "  {:<20} {:<14} {:>8.2} ms  {}",
                step.id,
                step.kind,
                step.elapsed.as_secs_f64() * 1000.0,
                status
            );
        }
        println!(
            "Rendered {} -> {} ({} applied, {} failed, {:.2} ms)",
            args.input.display(),
            args.output.display(),
            report.applied(),
            report.failed(),
            report.elapsed.as_secs_f64() * 1000.0
        );
    }

    Ok(())
}
