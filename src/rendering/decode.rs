//! Artwork decoding.
//!
//! Every PNG layout is normalized to 8-bit RGB before separation. Palette
//! images are expanded, 16-bit samples are stripped to 8 bits and alpha is
//! composited over white paper.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use spot_separation::RasterImage;

use crate::error::ExportError;

/// Decode a PNG file into an RGB raster
pub fn decode_png(path: &Path) -> Result<RasterImage, ExportError> {
    let file = File::open(path)?;
    let image = decode_reader(BufReader::new(file))?;
    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "Decoded artwork"
    );
    Ok(image)
}

/// Decode PNG bytes held in memory
pub fn decode_png_bytes(data: &[u8]) -> Result<RasterImage, ExportError> {
    decode_reader(data)
}

fn decode_reader<R: Read>(reader: R) -> Result<RasterImage, ExportError> {
    let mut decoder = png::Decoder::new(reader);
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| ExportError::PngDecode(e.to_string()))?;

    let mut buf = vec![0u8; reader.output_buffer_size()];
    let frame = reader
        .next_frame(&mut buf)
        .map_err(|e| ExportError::PngDecode(e.to_string()))?;
    let bytes = &buf[..frame.buffer_size()];
    let width = frame.width as usize;
    let height = frame.height as usize;

    if frame.bit_depth != png::BitDepth::Eight {
        return Err(ExportError::UnsupportedPng(format!(
            "{:?} samples after normalization",
            frame.bit_depth
        )));
    }

    let image = match frame.color_type {
        png::ColorType::Rgb => RasterImage::from_rgb8(width, height, bytes)?,
        png::ColorType::Rgba => RasterImage::from_rgba8(width, height, bytes)?,
        png::ColorType::Grayscale => {
            let rgb: Vec<u8> = bytes.iter().flat_map(|&v| [v, v, v]).collect();
            RasterImage::from_rgb8(width, height, &rgb)?
        }
        png::ColorType::GrayscaleAlpha => {
            let rgba: Vec<u8> = bytes
                .chunks_exact(2)
                .flat_map(|ga| [ga[0], ga[0], ga[0], ga[1]])
                .collect();
            RasterImage::from_rgba8(width, height, &rgba)?
        }
        png::ColorType::Indexed => {
            return Err(ExportError::UnsupportedPng(
                "palette was not expanded".to_string(),
            ));
        }
    };
    Ok(image)
}
