//! Dithering: mapping continuous-tone pixels onto a reduced palette.
//!
//! Two families are provided, one per reduction strategy:
//!
//! - **Error diffusion** ([`diffuse`]): kernel-driven, serpentine scan,
//!   error computed and propagated in linear RGB. The propagated share is
//!   scaled by the configured dither strength.
//! - **Ordered** ([`ordered_dither`]): Bayer threshold modulation, no error
//!   transport between pixels.
//!
//! Both are deterministic; neither touches the source pixels.

mod kernel;
mod ordered;

pub use kernel::{Kernel, FLOYD_STEINBERG};
pub use ordered::{bayer_offset, ordered_dither, palette_spread};

use crate::color::{LinearRgb, Oklab};
use crate::palette::Palette;

/// Configuration for [`diffuse`].
#[derive(Debug, Clone)]
pub struct DiffusionOptions {
    /// Alternate scan direction per row, mirroring the kernel on reverse
    /// rows. Removes the directional "worm" texture of one-way scans.
    pub serpentine: bool,
    /// Fraction of the kernel's error actually propagated (0.0..=1.0).
    pub strength: f32,
    /// Accumulated error is clamped to `[-error_clamp, 1 + error_clamp]`
    /// per channel, which keeps small palettes from blooming.
    pub error_clamp: f32,
}

impl Default for DiffusionOptions {
    fn default() -> Self {
        Self {
            serpentine: true,
            strength: 1.0,
            error_clamp: 0.5,
        }
    }
}

impl DiffusionOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn strength(mut self, strength: f32) -> Self {
        self.strength = strength.clamp(0.0, 1.0);
        self
    }
}

/// Sliding window of error rows.
///
/// Only the rows the kernel can reach are kept (`max_dy + 1`); after each
/// image row the window rotates and the freed row is zeroed.
#[derive(Debug)]
pub struct ErrorBuffer {
    /// rows[0] is the current row, rows[1] the next, and so on.
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    pub fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    #[inline]
    pub fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to a future pixel. Out-of-bounds targets are ignored.
    #[inline]
    pub fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            for c in 0..3 {
                self.rows[row_offset][x][c] += error[c];
            }
        }
    }

    pub fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

/// Error-diffusion mapping of linear pixels to palette indices.
///
/// Matching happens in Oklab (perceptual), error arithmetic in linear RGB
/// (physical light). Returns one index per pixel, row-major.
pub fn diffuse(
    image: &[LinearRgb],
    width: usize,
    height: usize,
    palette: &Palette,
    kernel: &Kernel,
    options: &DiffusionOptions,
) -> Vec<u8> {
    let mut output = vec![0u8; width * height];
    let mut error_buf = ErrorBuffer::new(width, kernel.max_dy + 1);
    let divisor = kernel.divisor as f32;

    for y in 0..height {
        let reverse = options.serpentine && y % 2 == 1;

        let x_range: Box<dyn Iterator<Item = usize>> = if reverse {
            Box::new((0..width).rev())
        } else {
            Box::new(0..width)
        };

        for x in x_range {
            let idx = y * width + x;

            let accumulated = LinearRgb::from_array(error_buf.get_accumulated(x));
            let pixel = (image[idx] + accumulated).clamp_with_margin(options.error_clamp);

            let (nearest, _) = palette.find_nearest(Oklab::from(pixel));
            output[idx] = nearest as u8;

            let error = ((pixel - palette.linear(nearest)) * options.strength).to_array();
            if error == [0.0; 3] {
                continue;
            }

            for &(dx, dy, weight) in kernel.entries {
                let effective_dx = if reverse { -dx } else { dx };
                let nx = x as i32 + effective_dx;
                if nx < 0 || nx as usize >= width || y + dy as usize >= height {
                    continue;
                }
                let share = weight as f32 / divisor;
                error_buf.add_error(
                    nx as usize,
                    dy as usize,
                    [error[0] * share, error[1] * share, error[2] * share],
                );
            }
        }

        error_buf.advance_row();
    }

    output
}
