//! Adaptive reduction: median-cut palette, error-diffusion mapping.

use std::collections::BTreeMap;

use super::{pad_palette, Quantizer};
use crate::color::{LinearRgb, Srgb};
use crate::dither::{diffuse, DiffusionOptions, FLOYD_STEINBERG};
use crate::palette::Palette;

/// Median cut over the image's distinct colors.
///
/// The box with the widest single-channel extent is split at the
/// population-weighted median of that channel until the requested number of
/// boxes exists or no box holds more than one distinct color. Each box
/// contributes its population-weighted mean, averaged in linear light.
/// Entries are ordered by population, largest first.
#[derive(Debug, Clone, Copy, Default)]
pub struct MedianCut;

/// A distinct color and how many pixels carry it.
type Bin = (Srgb, u32);

impl MedianCut {
    fn widest_channel(bins: &[Bin]) -> (usize, u8) {
        let mut best = (0, 0);
        for channel in 0..3 {
            let (lo, hi) = bins.iter().fold((u8::MAX, u8::MIN), |(lo, hi), (c, _)| {
                let v = c.to_bytes()[channel];
                (lo.min(v), hi.max(v))
            });
            let extent = hi.saturating_sub(lo);
            if extent > best.1 {
                best = (channel, extent);
            }
        }
        best
    }

    fn split(mut bins: Vec<Bin>, channel: usize) -> (Vec<Bin>, Vec<Bin>) {
        bins.sort_by_key(|(c, _)| (c.to_bytes()[channel], *c));
        let total: u64 = bins.iter().map(|&(_, n)| n as u64).sum();
        let mut running = 0u64;
        let mut cut = 1;
        for (i, &(_, n)) in bins.iter().enumerate() {
            running += n as u64;
            if running * 2 >= total {
                cut = i + 1;
                break;
            }
        }
        // Both halves must be non-empty
        let cut = cut.clamp(1, bins.len() - 1);
        let upper = bins.split_off(cut);
        (bins, upper)
    }

    fn mean_color(bins: &[Bin]) -> (Srgb, u64) {
        let mut sum = LinearRgb::default();
        let mut population = 0u64;
        for &(color, n) in bins {
            sum += LinearRgb::from(color) * n as f32;
            population += n as u64;
        }
        (Srgb::from(sum * (1.0 / population as f32)), population)
    }
}

impl Quantizer for MedianCut {
    fn name(&self) -> &'static str {
        "adaptive"
    }

    fn build_palette(&self, pixels: &[Srgb], color_count: usize) -> Vec<Srgb> {
        let mut counts: BTreeMap<Srgb, u32> = BTreeMap::new();
        for &p in pixels {
            *counts.entry(p).or_insert(0) += 1;
        }

        let mut boxes: Vec<Vec<Bin>> = vec![counts.into_iter().collect()];

        while boxes.len() < color_count {
            // Widest splittable box; ties go to the earliest box
            let candidate = boxes
                .iter()
                .enumerate()
                .filter(|(_, b)| b.len() > 1)
                .map(|(i, b)| (i, Self::widest_channel(b)))
                .fold(None, |best: Option<(usize, (usize, u8))>, cur| match best {
                    Some(b) if b.1 .1 >= cur.1 .1 => Some(b),
                    _ => Some(cur),
                });

            let Some((box_idx, (channel, _))) = candidate else {
                break;
            };

            let bins = boxes.remove(box_idx);
            let (lower, upper) = Self::split(bins, channel);
            boxes.insert(box_idx, upper);
            boxes.insert(box_idx, lower);
        }

        let mut means: Vec<(Srgb, u64)> = boxes.iter().map(|b| Self::mean_color(b)).collect();
        means.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));

        let colors: Vec<Srgb> = means.into_iter().map(|(c, _)| c).collect();
        pad_palette(colors, color_count)
    }

    fn map_pixels(
        &self,
        linear: &[LinearRgb],
        width: usize,
        height: usize,
        palette: &Palette,
        strength: f32,
    ) -> Vec<u8> {
        let options = DiffusionOptions::new().strength(strength);
        diffuse(linear, width, height, palette, &FLOYD_STEINBERG, &options)
    }
}
