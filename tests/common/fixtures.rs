//! Test fixtures and artwork builders.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use spotsep::models::AppConfig;

/// Colors used by the striped test artwork
pub mod colors {
    pub const RED: [u8; 3] = [255, 0, 0];
    pub const GREEN: [u8; 3] = [0, 255, 0];
    pub const BLUE: [u8; 3] = [0, 0, 255];
    pub const YELLOW: [u8; 3] = [255, 255, 0];
    pub const BLACK: [u8; 3] = [0, 0, 0];
    pub const WHITE: [u8; 3] = [255, 255, 255];

    /// Six flat inks, first one the most common in striped artwork
    pub const SIX: [[u8; 3]; 6] = [RED, GREEN, BLUE, YELLOW, BLACK, WHITE];
}

/// RGB bytes of vertical stripes, widest stripe first.
///
/// Stripe `i` is `colors.len() + 1 - i` pixels wide, so each color has a
/// distinct pixel count and palette order follows the input order.
pub fn striped_rgb(colors: &[[u8; 3]], height: u32) -> (u32, u32, Vec<u8>) {
    let mut row = Vec::new();
    for (i, color) in colors.iter().enumerate() {
        for _ in 0..(colors.len() + 1 - i) {
            row.extend_from_slice(color);
        }
    }
    let width = (row.len() / 3) as u32;
    let data = row.repeat(height as usize);
    (width, height, data)
}

/// Smooth RGB gradient with many distinct colors
pub fn gradient_rgb(width: u32, height: u32) -> Vec<u8> {
    let mut data = Vec::with_capacity((width * height * 3) as usize);
    for y in 0..height {
        for x in 0..width {
            data.push((x * 255 / (width - 1)) as u8);
            data.push((y * 255 / (height - 1)) as u8);
            data.push(((x + y) * 255 / (width + height - 2)) as u8);
        }
    }
    data
}

/// Write 8-bit RGB data as a PNG file
pub fn write_rgb_png(path: &Path, width: u32, height: u32, data: &[u8]) {
    let file = File::create(path).unwrap();
    let mut encoder = png::Encoder::new(BufWriter::new(file), width, height);
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);
    let mut writer = encoder.write_header().unwrap();
    writer.write_image_data(data).unwrap();
}

/// Write striped artwork into `dir` and return its path
pub fn striped_artwork(dir: &Path, colors: &[[u8; 3]]) -> PathBuf {
    let path = dir.join("artwork.png");
    let (width, height, data) = striped_rgb(colors, 4);
    write_rgb_png(&path, width, height, &data);
    path
}

/// Default configuration writing into `out`
pub fn config_for(out: &Path, color_count: u32) -> AppConfig {
    let mut config = AppConfig::default();
    config.output.dir = out.to_path_buf();
    config.separation.color_count = color_count;
    config
}
