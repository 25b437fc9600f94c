//! Shared test images.

use pixfx_core::Raster;

/// Smoothly varying RGBA image with a few hard edges.
pub fn scene(w: u32, h: u32) -> Raster {
    let mut img = Raster::new(w, h);
    for y in 0..h {
        for x in 0..w {
            let r = (x * 255 / (w - 1).max(1)) as u8;
            let g = (y * 255 / (h - 1).max(1)) as u8;
            let b = if (x / 8 + y / 8) % 2 == 0 { 40 } else { 210 };
            img.set_pixel(x, y, [r, g, b, 255]);
        }
    }
    img
}

/// Horizontal 0..=255 gray ramp, one column per level.
pub fn gray_ramp() -> Raster {
    let mut img = Raster::new(256, 4);
    for y in 0..4 {
        for x in 0..256 {
            let v = x as u8;
            img.set_pixel(x, y, [v, v, v, 255]);
        }
    }
    img
}

/// Distinct values per channel in an image.
pub fn distinct(img: &Raster, channel: usize) -> Vec<u8> {
    let mut values: Vec<u8> = img.as_bytes().chunks_exact(4).map(|p| p[channel]).collect();
    values.sort_unstable();
    values.dedup();
    values
}
