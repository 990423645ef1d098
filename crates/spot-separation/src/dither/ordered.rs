//! Ordered (threshold matrix) dithering against an arbitrary palette.
//!
//! Each pixel is shifted by a position-dependent offset from an 8x8 Bayer
//! matrix before nearest-color search. No error crosses pixel boundaries, so
//! the result is stable under crops and reproducible pixel by pixel.

use crate::color::{LinearRgb, Oklab};
use crate::palette::Palette;

/// 8x8 Bayer index matrix (values 0..64).
const BAYER_8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Squared Oklab distance under which a pixel counts as already sitting on a
/// palette color. About one 8-bit code value.
const FLAT_MATCH_SQ: f32 = 2.5e-5;

/// Threshold offset for a pixel position, centred on zero (-0.5..0.5).
#[inline]
pub fn bayer_offset(x: usize, y: usize) -> f32 {
    (BAYER_8[y % 8][x % 8] as f32 + 0.5) / 64.0 - 0.5
}

/// Mean linear-RGB gap between each palette color and its nearest distinct
/// neighbour. Zero for single-color or all-duplicate palettes.
pub fn palette_spread(palette: &Palette) -> f32 {
    let mut total = 0.0;
    let mut counted = 0;
    for i in 0..palette.len() {
        let a = palette.linear(i);
        let nearest = (0..palette.len())
            .filter(|&j| j != i && palette.color(j) != palette.color(i))
            .map(|j| {
                let d = a - palette.linear(j);
                (d.r * d.r + d.g * d.g + d.b * d.b).sqrt()
            })
            .fold(f32::INFINITY, f32::min);
        if nearest.is_finite() {
            total += nearest;
            counted += 1;
        }
    }
    if counted == 0 {
        0.0
    } else {
        total / counted as f32
    }
}

/// Map pixels to palette indices with Bayer threshold modulation.
///
/// `strength` (0.0..=1.0) scales the offset amplitude relative to the
/// palette spread; 0.0 degenerates to plain nearest-color mapping. Pixels
/// that already match a palette color are never shifted, so flat inks map
/// exactly at any strength.
pub fn ordered_dither(
    image: &[LinearRgb],
    width: usize,
    height: usize,
    palette: &Palette,
    strength: f32,
) -> Vec<u8> {
    let amplitude = palette_spread(palette) * strength;
    let mut output = vec![0u8; width * height];

    for y in 0..height {
        for x in 0..width {
            let idx = y * width + x;
            let (exact, dist) = palette.find_nearest(Oklab::from(image[idx]));
            if dist <= FLAT_MATCH_SQ || amplitude == 0.0 {
                output[idx] = exact as u8;
                continue;
            }
            let offset = bayer_offset(x, y) * amplitude;
            let shifted = image[idx] + LinearRgb::new(offset, offset, offset);
            let (nearest, _) = palette.find_nearest(Oklab::from(shifted));
            output[idx] = nearest as u8;
        }
    }

    output
}
