//! Effects command
//!
//! Lists effect kinds, optionally with their default settings as JSON.

use crate::EffectsArgs;
use anyhow::Result;
use pixfx_pipeline::{EffectKind, EffectSettings};
use serde_json::{Value, json};

pub fn run(args: EffectsArgs) -> Result<()> {
    if args.json {
        println!("{}", serde_json::to_string_pretty(&catalog())?);
        return Ok(());
    }

    for kind in EffectKind::ALL {
        let seeded = if kind.is_seeded() { " (seeded)" } else { "" };
        println!("  {:<14} {}{}", kind.name(), kind.description(), seeded);
    }
    Ok(())
}

fn catalog() -> Value {
    Value::Array(
        EffectKind::ALL
            .iter()
            .map(|&kind| {
                json!({
                    "type": kind.name(),
                    "label": kind.label(),
                    "description": kind.description(),
                    "seeded": kind.is_seeded(),
                    "defaults": EffectSettings::default_for(kind).to_json(),
                })
            })
            .collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_lists_every_kind() {
        let Value::Array(items) = catalog() else {
            panic!("expected array");
        };
        assert_eq!(items.len(), EffectKind::ALL.len());
        assert_eq!(items[3]["type"], "find-edges");
        assert_eq!(items[3]["defaults"]["type"], "find-edges");
    }
}
