//! Channel export.
//!
//! Grayscale output is a film positive: ink prints black (0), paper stays
//! white (255). Indexed output is a 1-bit proof whose PLTE holds paper white
//! and the channel's ink color.

use std::fs;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use spot_separation::channel::INK;
use spot_separation::{Channel, OutputFormat};

use crate::error::ExportError;

/// Replace anything but ASCII alphanumerics with single underscores.
pub fn sanitize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for c in name.chars() {
        if c.is_ascii_alphanumeric() {
            out.push(c);
        } else if !out.ends_with('_') && !out.is_empty() {
            out.push('_');
        }
    }
    let trimmed = out.trim_end_matches('_');
    if trimmed.is_empty() {
        "channel".to_string()
    } else {
        trimmed.to_string()
    }
}

/// `NN_<name>.png`, with `position` 1-based print position.
pub fn channel_file_name(position: usize, name: &str) -> String {
    format!("{:02}_{}.png", position, sanitize_name(name))
}

/// Encode one channel mask as PNG bytes.
pub fn encode_channel(channel: &Channel, format: OutputFormat) -> Result<Vec<u8>, ExportError> {
    let mask = &channel.mask;
    let width = mask.width() as u32;
    let height = mask.height() as u32;

    let png_bytes = match format {
        OutputFormat::Grayscale => {
            let film: Vec<u8> = mask.data().iter().map(|&v| 255 - v).collect();
            encode_png(
                width,
                height,
                png::ColorType::Grayscale,
                png::BitDepth::Eight,
                None,
                &film,
            )?
        }
        OutputFormat::Indexed => {
            let indices: Vec<u8> = mask.data().iter().map(|&v| u8::from(v == INK)).collect();
            let [r, g, b] = channel.color.to_bytes();
            let plte = [255, 255, 255, r, g, b];
            let packed = pack_nbits(&indices, width, 1);
            encode_png(
                width,
                height,
                png::ColorType::Indexed,
                png::BitDepth::One,
                Some(&plte),
                &packed,
            )?
        }
    };

    // Re-compress with oxipng; keep the plain encoding if that fails
    let optimized = oxipng::optimize_from_memory(
        &png_bytes,
        &oxipng::Options {
            strip: oxipng::StripChunks::Safe,
            optimize_alpha: false,
            ..Default::default()
        },
    )
    .unwrap_or(png_bytes);
    Ok(optimized)
}

/// True for names written by [`channel_file_name`].
fn is_channel_file(name: &str) -> bool {
    let bytes = name.as_bytes();
    bytes.len() > 7
        && bytes[0].is_ascii_digit()
        && bytes[1].is_ascii_digit()
        && bytes[2] == b'_'
        && name.ends_with(".png")
}

/// Delete channel files left in `dir` by an earlier run. Other files stay.
fn clear_channel_files(dir: &Path) -> Result<usize, ExportError> {
    let mut removed = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let is_stale = entry.file_type()?.is_file()
            && entry.file_name().to_str().is_some_and(is_channel_file);
        if is_stale {
            fs::remove_file(entry.path())?;
            removed += 1;
        }
    }
    if removed > 0 {
        tracing::info!(dir = %dir.display(), removed, "Removed channel files from earlier run");
    }
    Ok(removed)
}

/// Write every channel to `dir` in print order, replacing channel files
/// from earlier runs. Returns the file names.
pub fn export_channels(
    dir: &Path,
    channels: &[Channel],
    format: OutputFormat,
) -> Result<Vec<String>, ExportError> {
    fs::create_dir_all(dir)?;
    clear_channel_files(dir)?;
    let mut files = Vec::with_capacity(channels.len());
    for (i, channel) in channels.iter().enumerate() {
        let name = channel_file_name(i + 1, &channel.name);
        let path: PathBuf = dir.join(&name);
        let bytes = encode_channel(channel, format)?;
        fs::write(&path, &bytes)?;
        tracing::debug!(
            file = %path.display(),
            channel = %channel.name,
            bytes = bytes.len(),
            "Wrote channel"
        );
        files.push(name);
    }
    Ok(files)
}

/// Encode packed pixel data as a PNG.
fn encode_png(
    width: u32,
    height: u32,
    color_type: png::ColorType,
    bit_depth: png::BitDepth,
    plte: Option<&[u8]>,
    packed: &[u8],
) -> Result<Vec<u8>, ExportError> {
    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(color_type);
        encoder.set_depth(bit_depth);
        encoder.set_compression(png::Compression::Fast);
        encoder.set_filter(png::FilterType::NoFilter);
        if let Some(plte) = plte {
            encoder.set_palette(plte);
        }
        let mut writer = encoder
            .write_header()
            .map_err(|e| ExportError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(packed)
            .map_err(|e| ExportError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Pack pixel values into N-bit PNG row data (1, 2, or 4 bits per pixel).
fn pack_nbits(indices: &[u8], width: u32, bits: u8) -> Vec<u8> {
    let pixels_per_byte = 8 / bits as usize;
    let bytes_per_row = (width as usize).div_ceil(pixels_per_byte);
    let height = indices.len() / width as usize;
    let mask = (1u8 << bits) - 1;
    let mut packed = Vec::with_capacity(bytes_per_row * height);

    for row in indices.chunks(width as usize) {
        let mut byte = 0u8;
        for (i, &idx) in row.iter().enumerate() {
            let shift = (8 - bits) - (i % pixels_per_byte) as u8 * bits;
            byte |= (idx & mask) << shift;

            if (i % pixels_per_byte) == pixels_per_byte - 1 || i == row.len() - 1 {
                packed.push(byte);
                byte = 0;
            }
        }
    }

    packed
}
