//! Selective reduction: popularity palette, ordered mapping.

use super::{pad_palette, Quantizer};
use crate::color::{LinearRgb, Oklab, Srgb};
use crate::dither::ordered_dither;
use crate::palette::Palette;

/// Histogram resolution per channel, in bits.
const BUCKET_BITS: u32 = 5;
const BUCKET_COUNT: usize = 1 << (3 * BUCKET_BITS);

/// Minimum squared Oklab distance between two picks in the first pass.
const MIN_SEPARATION_SQ: f32 = 0.06 * 0.06;

/// Popularity selection with perceptual spacing.
///
/// Pixels are binned into a 5-bit-per-channel histogram. Buckets are visited
/// from most to least populated and a bucket's mean color is accepted when it
/// sits far enough from every color already chosen. A second pass fills any
/// remaining slots with the most popular unused buckets regardless of
/// spacing. Mapping uses Bayer ordered dithering; pixels that already match a
/// palette color are left unshifted.
#[derive(Debug, Clone, Copy, Default)]
pub struct Selective;

#[derive(Clone, Copy, Default)]
struct Bucket {
    count: u32,
    sum: [f32; 3],
}

impl Bucket {
    fn mean(&self) -> Srgb {
        let n = self.count as f32;
        Srgb::from(LinearRgb::new(self.sum[0] / n, self.sum[1] / n, self.sum[2] / n))
    }
}

fn bucket_key(c: Srgb) -> usize {
    let shift = 8 - BUCKET_BITS;
    let r = (c.r >> shift) as usize;
    let g = (c.g >> shift) as usize;
    let b = (c.b >> shift) as usize;
    (r << (2 * BUCKET_BITS)) | (g << BUCKET_BITS) | b
}

impl Quantizer for Selective {
    fn name(&self) -> &'static str {
        "selective"
    }

    fn build_palette(&self, pixels: &[Srgb], color_count: usize) -> Vec<Srgb> {
        let mut histogram = vec![Bucket::default(); BUCKET_COUNT];
        for &p in pixels {
            let bucket = &mut histogram[bucket_key(p)];
            let lin = LinearRgb::from(p).to_array();
            bucket.count += 1;
            for (s, v) in bucket.sum.iter_mut().zip(lin) {
                *s += v;
            }
        }

        let mut ranked: Vec<(usize, u32)> = histogram
            .iter()
            .enumerate()
            .filter(|(_, b)| b.count > 0)
            .map(|(key, b)| (key, b.count))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let candidates: Vec<Srgb> = ranked.iter().map(|&(key, _)| histogram[key].mean()).collect();

        let mut chosen: Vec<Srgb> = Vec::with_capacity(color_count);
        let mut used = vec![false; candidates.len()];

        for (i, &color) in candidates.iter().enumerate() {
            if chosen.len() == color_count {
                break;
            }
            let lab = Oklab::from(LinearRgb::from(color));
            let spaced = chosen
                .iter()
                .all(|&c| Oklab::from(LinearRgb::from(c)).distance_squared(lab) >= MIN_SEPARATION_SQ);
            if spaced {
                chosen.push(color);
                used[i] = true;
            }
        }

        for (i, &color) in candidates.iter().enumerate() {
            if chosen.len() == color_count {
                break;
            }
            if !used[i] && !chosen.contains(&color) {
                chosen.push(color);
                used[i] = true;
            }
        }

        pad_palette(chosen, color_count)
    }

    fn map_pixels(
        &self,
        linear: &[LinearRgb],
        width: usize,
        height: usize,
        palette: &Palette,
        strength: f32,
    ) -> Vec<u8> {
        ordered_dither(linear, width, height, palette, strength)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_popular_first() {
        let mut pixels = vec![Srgb::new(0, 128, 0); 5];
        pixels.extend(vec![Srgb::new(200, 0, 0); 50]);
        pixels.extend(vec![Srgb::new(0, 0, 200); 20]);

        let palette = Selective.build_palette(&pixels, 3);
        assert_eq!(palette.len(), 3);
        assert_eq!(palette[0], Srgb::new(200, 0, 0));
        assert_eq!(palette[1], Srgb::new(0, 0, 200));
        assert_eq!(palette[2], Srgb::new(0, 128, 0));
    }

    #[test]
    fn test_near_duplicates_skipped_in_first_pass() {
        // Two nearly identical reds dominate; a distinct blue should still
        // make it into a two-color palette.
        let mut pixels = vec![Srgb::new(200, 0, 0); 50];
        pixels.extend(vec![Srgb::new(208, 0, 0); 40]);
        pixels.extend(vec![Srgb::new(0, 0, 200); 10]);

        let palette = Selective.build_palette(&pixels, 2);
        assert_eq!(palette, vec![Srgb::new(200, 0, 0), Srgb::new(0, 0, 200)]);
    }

    #[test]
    fn test_fills_remaining_slots() {
        let mut pixels = vec![Srgb::new(200, 0, 0); 50];
        pixels.extend(vec![Srgb::new(208, 0, 0); 40]);
        let palette = Selective.build_palette(&pixels, 2);
        assert_eq!(palette, vec![Srgb::new(200, 0, 0), Srgb::new(208, 0, 0)]);
    }

    #[test]
    fn test_flat_stripes_survive_full_strength() {
        use crate::config::QuantizerKind;
        use crate::image::RasterImage;
        use crate::quantize::reduce;

        let inks = [
            Srgb::new(255, 0, 0),
            Srgb::new(0, 255, 0),
            Srgb::new(0, 0, 255),
            Srgb::new(255, 255, 255),
        ];
        // 32x28 raster of four vertical 8-pixel stripes
        let pixels: Vec<Srgb> = (0..32 * 28).map(|i| inks[(i % 32) / 8]).collect();
        let image = RasterImage::new(32, 28, pixels.clone()).unwrap();

        let q = reduce(&image, 4, 100, QuantizerKind::Selective).unwrap();
        for (i, &idx) in q.image.indices().iter().enumerate() {
            assert_eq!(q.entries[idx as usize].color, pixels[i], "pixel {i}");
        }
    }

    #[test]
    fn test_bucket_key_is_five_bit() {
        assert_eq!(bucket_key(Srgb::new(0, 0, 0)), 0);
        assert_eq!(bucket_key(Srgb::new(255, 255, 255)), BUCKET_COUNT - 1);
        assert_eq!(bucket_key(Srgb::new(7, 7, 7)), 0);
        assert_eq!(bucket_key(Srgb::new(8, 0, 0)), 1 << 10);
    }
}
