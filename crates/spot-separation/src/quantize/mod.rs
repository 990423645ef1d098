//! Palette reduction.
//!
//! A [`Quantizer`] chooses the palette and maps every pixel onto it. The
//! strategy is picked once from [`QuantizerKind`]; [`PaletteReducer`] wraps
//! it with argument validation and the output contract: exactly `n` palette
//! entries, every pixel index below `n`.

mod median_cut;
mod selective;

pub use median_cut::MedianCut;
pub use selective::Selective;

use crate::color::{LinearRgb, Srgb};
use crate::config::{validate_counts, QuantizerKind};
use crate::error::ConfigError;
use crate::image::{IndexedImage, RasterImage};
use crate::palette::{Palette, PaletteEntry};

/// Output of [`PaletteReducer::reduce`].
#[derive(Debug, Clone, PartialEq)]
pub struct QuantizedImage {
    /// Palette entries in index order.
    pub entries: Vec<PaletteEntry>,
    /// One palette index per source pixel.
    pub image: IndexedImage,
}

impl QuantizedImage {
    pub fn width(&self) -> usize {
        self.image.width()
    }

    pub fn height(&self) -> usize {
        self.image.height()
    }
}

/// A palette reduction strategy.
pub trait Quantizer: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Choose exactly `color_count` colors for `pixels`. Duplicates are
    /// allowed when the image holds fewer distinct colors.
    fn build_palette(&self, pixels: &[Srgb], color_count: usize) -> Vec<Srgb>;

    /// Assign a palette index to every pixel. `strength` is in `0.0..=1.0`.
    fn map_pixels(
        &self,
        linear: &[LinearRgb],
        width: usize,
        height: usize,
        palette: &Palette,
        strength: f32,
    ) -> Vec<u8>;
}

impl QuantizerKind {
    /// The strategy for this kind.
    pub fn quantizer(self) -> Box<dyn Quantizer> {
        match self {
            QuantizerKind::Adaptive => Box::new(MedianCut),
            QuantizerKind::Selective => Box::new(Selective),
        }
    }
}

/// Extends a short palette to `color_count` by cycling its colors.
pub(crate) fn pad_palette(mut colors: Vec<Srgb>, color_count: usize) -> Vec<Srgb> {
    if colors.is_empty() {
        colors.push(Srgb::WHITE);
    }
    let mut i = 0;
    while colors.len() < color_count {
        colors.push(colors[i]);
        i += 1;
    }
    colors.truncate(color_count);
    colors
}

/// Reduces an image to a fixed-size palette with a chosen strategy.
pub struct PaletteReducer {
    quantizer: Box<dyn Quantizer>,
}

impl std::fmt::Debug for PaletteReducer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaletteReducer")
            .field("quantizer", &self.quantizer.name())
            .finish()
    }
}

impl PaletteReducer {
    pub fn new(kind: QuantizerKind) -> Self {
        Self {
            quantizer: kind.quantizer(),
        }
    }

    /// Use a custom strategy.
    pub fn with_quantizer(quantizer: Box<dyn Quantizer>) -> Self {
        Self { quantizer }
    }

    pub fn quantizer_name(&self) -> &'static str {
        self.quantizer.name()
    }

    /// Reduce `image` to `color_count` colors.
    ///
    /// Arguments are checked before any pixel is touched. The returned
    /// image's palette holds exactly `color_count` entries in index order.
    ///
    /// # Errors
    ///
    /// [`ConfigError::ColorCount`] or [`ConfigError::DitherStrength`] for
    /// out-of-range arguments, [`ConfigError::Quantization`] if the strategy
    /// breaks the output contract.
    pub fn reduce(
        &self,
        image: &RasterImage,
        color_count: u32,
        dither_strength: u32,
    ) -> Result<QuantizedImage, ConfigError> {
        validate_counts(color_count, dither_strength)?;
        let n = color_count as usize;

        let colors = self.quantizer.build_palette(image.pixels(), n);
        if colors.len() != n {
            return Err(ConfigError::Quantization(format!(
                "{} strategy produced {} colors, expected {n}",
                self.quantizer.name(),
                colors.len()
            )));
        }
        let palette =
            Palette::from_colors(&colors).map_err(|e| ConfigError::Quantization(e.to_string()))?;

        let linear: Vec<LinearRgb> = image.pixels().iter().map(|&p| LinearRgb::from(p)).collect();
        let strength = dither_strength as f32 / 100.0;
        let indices =
            self.quantizer
                .map_pixels(&linear, image.width(), image.height(), &palette, strength);

        if indices.len() != image.pixels().len() {
            return Err(ConfigError::Quantization(format!(
                "{} strategy mapped {} pixels, expected {}",
                self.quantizer.name(),
                indices.len(),
                image.pixels().len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= n) {
            return Err(ConfigError::Quantization(format!(
                "pixel index {bad} outside palette of {n}"
            )));
        }

        let entries = palette.entries().to_vec();
        Ok(QuantizedImage {
            entries,
            image: IndexedImage::new(indices, image.width(), image.height(), palette),
        })
    }
}

/// Reduce `image` with the strategy for `kind`.
///
/// ```
/// use spot_separation::{reduce, QuantizerKind, RasterImage, Srgb};
///
/// let image = RasterImage::new(2, 1, vec![Srgb::new(255, 0, 0), Srgb::WHITE]).unwrap();
/// let reduced = reduce(&image, 2, 20, QuantizerKind::Adaptive).unwrap();
/// assert_eq!(reduced.entries.len(), 2);
/// ```
pub fn reduce(
    image: &RasterImage,
    color_count: u32,
    dither_strength: u32,
    kind: QuantizerKind,
) -> Result<QuantizedImage, ConfigError> {
    PaletteReducer::new(kind).reduce(image, color_count, dither_strength)
}
