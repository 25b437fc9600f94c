//! Row-wise iteration for stateless per-pixel effects.
//!
//! When the `parallel` feature is enabled rows are processed with rayon.
//! Callers only pass closures whose output depends on `(x, y)` and the
//! source raster, so both paths produce byte-identical results.

use crate::OpsResult;
use pixfx_core::{CHANNELS, Raster};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Runs `f(y, row)` over every row of `dst`.
#[cfg(feature = "parallel")]
pub fn for_each_row<F>(dst: &mut Raster, f: F)
where
    F: Fn(u32, &mut [u8]) + Sync + Send,
{
    let stride = dst.stride().max(1);
    dst.as_bytes_mut()
        .par_chunks_mut(stride)
        .enumerate()
        .for_each(|(y, row)| f(y as u32, row));
}

/// Runs `f(y, row)` over every row of `dst` (single-threaded fallback).
#[cfg(not(feature = "parallel"))]
pub fn for_each_row<F>(dst: &mut Raster, f: F)
where
    F: Fn(u32, &mut [u8]),
{
    for (y, row) in dst.rows_mut().enumerate() {
        f(y as u32, row);
    }
}

/// Builds a row-major `u32` map by evaluating `f(x, y)` at every pixel.
#[cfg(feature = "parallel")]
pub fn label_rows<F>(width: u32, height: u32, f: F) -> Vec<u32>
where
    F: Fn(u32, u32) -> u32 + Sync + Send,
{
    let w = width as usize;
    let mut labels = vec![0u32; w * height as usize];
    labels
        .par_chunks_mut(w.max(1))
        .enumerate()
        .for_each(|(y, row)| {
            for (x, l) in row.iter_mut().enumerate() {
                *l = f(x as u32, y as u32);
            }
        });
    labels
}

/// Builds a row-major `u32` map by evaluating `f(x, y)` at every pixel.
#[cfg(not(feature = "parallel"))]
pub fn label_rows<F>(width: u32, height: u32, f: F) -> Vec<u32>
where
    F: Fn(u32, u32) -> u32,
{
    let mut labels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        labels.extend((0..width).map(|x| f(x, y)));
    }
    labels
}

/// Builds a new raster by mapping every source pixel through `f(px, x, y)`.
pub fn map_pixels<F>(src: &Raster, f: F) -> OpsResult<Raster>
where
    F: Fn([u8; 4], u32, u32) -> [u8; 4] + Sync + Send,
{
    let mut dst = src.try_new_like()?;
    for_each_row(&mut dst, |y, row| {
        for (x, out) in row.chunks_exact_mut(CHANNELS).enumerate() {
            let px = src.pixel(x as u32, y);
            out.copy_from_slice(&f(px, x as u32, y));
        }
    });
    Ok(dst)
}
