//! Init command
//!
//! Writes a project file with default instances of the given kinds.

use crate::InitArgs;
use anyhow::{Result, bail};
use pixfx_pipeline::{EffectKind, EffectStack};
#[allow(unused_imports)]
use tracing::{debug, info, trace};

pub fn run(args: InitArgs, verbose: u8) -> Result<()> {
    trace!(output = %args.output.display(), kinds = ?args.kinds, "init::run");

    if args.output.exists() && !args.force {
        bail!(
            "{} already exists (use --force to overwrite)",
            args.output.display()
        );
    }

    let kinds = args
        .kinds
        .iter()
        .map(|k| k.parse::<EffectKind>())
        .collect::<Result<Vec<_>, _>>()?;
    let stack = EffectStack::with_kinds(kinds);
    super::save_project(&args.output, &stack)?;

    if verbose > 0 {
        println!(
            "Wrote {} with {} effect(s)",
            args.output.display(),
            stack.len()
        );
    }
    Ok(())
}
