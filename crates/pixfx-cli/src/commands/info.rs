//! Image info command.
//!
//! Displays PNG header facts plus basic pixel statistics.

use crate::InfoArgs;
use anyhow::{Context, Result};
use pixfx_core::{Raster, luminance_px};
use serde_json::json;
use std::fs;
use std::path::Path;

/// Runs the info command.
pub fn run(args: InfoArgs, verbose: u8) -> Result<()> {
    for path in &args.input {
        let file_size = fs::metadata(path)
            .with_context(|| format!("Failed to stat: {}", path.display()))?
            .len();
        let header = pixfx_io::probe(path)
            .with_context(|| format!("Failed to read header: {}", path.display()))?;
        let image = super::load_image(path)?;
        let stats = Stats::of(&image);

        if args.json {
            let v = json!({
                "path": path.display().to_string(),
                "width": header.width,
                "height": header.height,
                "colorType": header.color_type,
                "bitDepth": header.bit_depth,
                "interlaced": header.interlaced,
                "fileSize": file_size,
                "meanLuminance": stats.mean_luminance,
                "opaque": stats.opaque,
            });
            println!("{}", serde_json::to_string_pretty(&v)?);
        } else {
            print_text(path, &header, file_size, &stats, verbose);
        }

        if args.input.len() > 1 {
            println!();
        }
    }
    Ok(())
}

fn print_text(path: &Path, header: &pixfx_io::PngInfo, file_size: u64, stats: &Stats, verbose: u8) {
    println!("{}", path.display());
    println!("  Resolution: {}x{}", header.width, header.height);
    println!("  Stored as:  {} {}-bit", header.color_type, header.bit_depth);
    println!("  Pixels:     {}", header.width as u64 * header.height as u64);
    println!("  File size:  {}", super::format_size(file_size));
    if verbose > 0 {
        println!("  Interlaced: {}", header.interlaced);
        println!("  Mean luma:  {:.2}", stats.mean_luminance);
        println!("  Opaque:     {}", stats.opaque);
    }
}

struct Stats {
    mean_luminance: f64,
    opaque: bool,
}

impl Stats {
    fn of(image: &Raster) -> Self {
        let mut sum = 0.0f64;
        let mut opaque = true;
        for px in image.as_bytes().chunks_exact(4) {
            let px = [px[0], px[1], px[2], px[3]];
            sum += luminance_px(px) as f64;
            opaque &= px[3] == 255;
        }
        Self {
            mean_luminance: sum / image.pixel_count() as f64,
            opaque,
        }
    }
}
