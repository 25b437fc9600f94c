//! CLI command implementations

pub mod apply;
pub mod effects;
pub mod info;
pub mod init;
pub mod render;

use anyhow::{Context, Result, bail};
use pixfx_core::Raster;
use pixfx_pipeline::{EffectStack, project};
use serde_json::{Map, Value};
use std::path::Path;

/// Load image from path
pub fn load_image(path: &Path) -> Result<Raster> {
    pixfx_io::read(path).with_context(|| format!("Failed to load: {}", path.display()))
}

/// Save image to path
pub fn save_image(path: &Path, image: &Raster) -> Result<()> {
    pixfx_io::write(path, image).with_context(|| format!("Failed to save: {}", path.display()))
}

/// Load project from path
pub fn load_project(path: &Path) -> Result<EffectStack> {
    project::load(path).with_context(|| format!("Failed to load project: {}", path.display()))
}

/// Save project to path
pub fn save_project(path: &Path, stack: &EffectStack) -> Result<()> {
    project::save(stack, path)
        .with_context(|| format!("Failed to save project: {}", path.display()))
}

/// Builds a settings patch from `key=value` pairs.
///
/// Keys may be camelCase, kebab-case or snake_case. Values are parsed as
/// JSON when possible (`12`, `true`, `"#ff0000"`, `[...]`), otherwise taken
/// as a plain string, so `shape=diamond` works without quotes.
pub fn parse_assignments(pairs: &[String]) -> Result<Value> {
    let mut patch = Map::new();
    for pair in pairs {
        let Some((key, value)) = pair.split_once('=') else {
            bail!("expected KEY=VALUE, got {pair:?}");
        };
        let key = key.trim();
        if key.is_empty() {
            bail!("empty key in {pair:?}");
        }
        let value = value.trim();
        let parsed =
            serde_json::from_str(value).unwrap_or_else(|_| Value::String(value.to_string()));
        patch.insert(camel_case(key), parsed);
    }
    Ok(Value::Object(patch))
}

/// `cell-size` / `cell_size` -> `cellSize`.
fn camel_case(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut upper = false;
    for c in key.chars() {
        if c == '-' || c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Format file size for display
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_case() {
        assert_eq!(camel_case("cell-size"), "cellSize");
        assert_eq!(camel_case("max_offset_x"), "maxOffsetX");
        assert_eq!(camel_case("seed"), "seed");
    }

    #[test]
    fn test_parse_assignments() {
        let pairs = [
            "cell-size=12".to_string(),
            "shape=diamond".to_string(),
            "colored = true".to_string(),
            "inkColor=\"#ff0000\"".to_string(),
        ];
        assert_eq!(
            parse_assignments(&pairs).unwrap(),
            json!({"cellSize": 12, "shape": "diamond", "colored": true, "inkColor": "#ff0000"})
        );
    }

    #[test]
    fn test_parse_assignments_rejects_missing_equals() {
        assert!(parse_assignments(&["radius".to_string()]).is_err());
        assert!(parse_assignments(&["=3".to_string()]).is_err());
    }

    #[test]
    fn test_format_size() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(2048), "2.00 KB");
    }
}
