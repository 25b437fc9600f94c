//! PNG reading and writing.
//!
//! Every PNG layout is normalized to 8-bit RGBA on read: palettes and low
//! bit depths are expanded, 16-bit samples are stripped to 8 bits, gray is
//! replicated into RGB and a missing alpha channel becomes opaque.
//! Writing always produces 8-bit RGBA with an sRGB chunk.
//!
//! # Example
//!
//! ```rust,ignore
//! use pixfx_io::png::{read, write};
//!
//! let image = read("input.png")?;
//! write("output.png", &image)?;
//! ```

use crate::{IoError, IoResult};
use pixfx_core::Raster;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Cursor, Seek, Write};
use std::path::Path;
use tracing::debug;

/// Header facts about a PNG file, before normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PngInfo {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Stored color type, e.g. `Rgba`.
    pub color_type: String,
    /// Stored bits per sample.
    pub bit_depth: u8,
    /// Whether the file is interlaced.
    pub interlaced: bool,
}

/// Reads a PNG file into an RGBA8 raster.
pub fn read<P: AsRef<Path>>(path: P) -> IoResult<Raster> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let raster = decode_from(BufReader::new(file))?;
    debug!(path = %path.display(), width = raster.width(), height = raster.height(), "read png");
    Ok(raster)
}

/// Decodes PNG bytes into an RGBA8 raster.
pub fn decode(bytes: &[u8]) -> IoResult<Raster> {
    decode_from(Cursor::new(bytes))
}

/// Reads only the PNG header.
pub fn probe<P: AsRef<Path>>(path: P) -> IoResult<PngInfo> {
    let file = File::open(path.as_ref())?;
    let decoder = png::Decoder::new(BufReader::new(file));
    let reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    let info = reader.info();
    Ok(PngInfo {
        width: info.width,
        height: info.height,
        color_type: format!("{:?}", info.color_type),
        bit_depth: info.bit_depth as u8,
        interlaced: info.interlaced,
    })
}

fn decode_from<R: BufRead + Seek>(input: R) -> IoResult<Raster> {
    let mut decoder = png::Decoder::new(input);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;

    let buf_size = reader
        .output_buffer_size()
        .ok_or_else(|| IoError::DecodeError("cannot determine output buffer size".into()))?;
    let mut buf = vec![0u8; buf_size];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e: png::DecodingError| IoError::DecodeError(e.to_string()))?;
    let data = &buf[..info.buffer_size()];

    let rgba: Vec<u8> = match (info.color_type, info.bit_depth) {
        (png::ColorType::Rgba, png::BitDepth::Eight) => data.to_vec(),
        (png::ColorType::Rgb, png::BitDepth::Eight) => data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        (png::ColorType::Grayscale, png::BitDepth::Eight) => {
            data.iter().flat_map(|&g| [g, g, g, 255]).collect()
        }
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => data
            .chunks_exact(2)
            .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
            .collect(),
        (color_type, bit_depth) => {
            return Err(IoError::UnsupportedLayout(format!(
                "{:?} {:?}",
                color_type, bit_depth
            )));
        }
    };

    Ok(Raster::from_rgba(info.width, info.height, rgba)?)
}

/// Writes a raster to a PNG file.
pub fn write<P: AsRef<Path>>(path: P, image: &Raster) -> IoResult<()> {
    let path = path.as_ref();
    let file = File::create(path)?;
    encode_to(BufWriter::new(file), image)?;
    debug!(path = %path.display(), width = image.width(), height = image.height(), "wrote png");
    Ok(())
}

/// Encodes a raster as PNG bytes.
pub fn encode(image: &Raster) -> IoResult<Vec<u8>> {
    let mut out = Vec::new();
    encode_to(&mut out, image)?;
    Ok(out)
}

fn encode_to<W: Write>(writer: W, image: &Raster) -> IoResult<()> {
    let mut encoder = png::Encoder::new(writer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::default());
    encoder.set_source_srgb(png::SrgbRenderingIntent::Perceptual);

    let mut png_writer = encoder
        .write_header()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .write_image_data(image.as_bytes())
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    png_writer
        .finish()
        .map_err(|e| IoError::EncodeError(e.to_string()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn gradient(w: u32, h: u32) -> Raster {
        let mut img = Raster::new(w, h);
        for y in 0..h {
            for x in 0..w {
                img.set_pixel(x, y, [(x * 8) as u8, (y * 8) as u8, 64, (x * y) as u8]);
            }
        }
        img
    }

    fn encode_raw(w: u32, h: u32, color: png::ColorType, data: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut out, w, h);
            encoder.set_color(color);
            encoder.set_depth(png::BitDepth::Eight);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        out
    }

    #[test]
    fn test_roundtrip_rgba() {
        let image = gradient(16, 12);
        let bytes = encode(&image).unwrap();
        assert_eq!(decode(&bytes).unwrap(), image);
    }

    #[test]
    fn test_rgb_gets_opaque_alpha() {
        let bytes = encode_raw(2, 1, png::ColorType::Rgb, &[1, 2, 3, 4, 5, 6]);
        let img = decode(&bytes).unwrap();
        assert_eq!(img.pixel(0, 0), [1, 2, 3, 255]);
        assert_eq!(img.pixel(1, 0), [4, 5, 6, 255]);
    }

    #[test]
    fn test_gray_expands() {
        let bytes = encode_raw(2, 1, png::ColorType::GrayscaleAlpha, &[10, 20, 30, 40]);
        let img = decode(&bytes).unwrap();
        assert_eq!(img.pixel(0, 0), [10, 10, 10, 20]);
        assert_eq!(img.pixel(1, 0), [30, 30, 30, 40]);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        assert!(matches!(decode(b"not a png"), Err(IoError::DecodeError(_))));
    }

    #[test]
    fn test_file_roundtrip_and_probe() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.png");
        let image = gradient(9, 5);
        write(&path, &image).unwrap();
        assert_eq!(read(&path).unwrap(), image);

        let info = probe(&path).unwrap();
        assert_eq!((info.width, info.height, info.bit_depth), (9, 5, 8));
        assert_eq!(info.color_type, "Rgba");
    }
}
