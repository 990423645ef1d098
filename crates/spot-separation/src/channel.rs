//! Separation channels and how they are built.

use crate::color::Srgb;
use crate::error::ChannelBuildError;
use crate::names::ColorNameResolver;
use crate::palette::PaletteEntry;
use crate::quantize::QuantizedImage;

/// Mask value for a pixel that receives ink.
pub const INK: u8 = 255;
/// Mask value for a pixel left bare.
pub const NO_INK: u8 = 0;

/// Ink density recorded on every channel, in percent.
pub const FULL_INK_DENSITY: u8 = 100;

/// Per-pixel ink coverage, same dimensions as the source raster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverageMask {
    width: usize,
    height: usize,
    data: Vec<u8>,
}

impl CoverageMask {
    /// # Errors
    ///
    /// [`ChannelBuildError::DimensionMismatch`] when `data` does not hold
    /// exactly `width * height` values or either dimension is zero.
    pub fn new(width: usize, height: usize, data: Vec<u8>) -> Result<Self, ChannelBuildError> {
        if width == 0 || height == 0 || data.len() != width * height {
            return Err(ChannelBuildError::DimensionMismatch {
                width,
                height,
                pixels: data.len(),
            });
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> u8 {
        self.data[y * self.width + x]
    }

    pub fn covered_pixels(&self) -> usize {
        self.data.iter().filter(|&&v| v != NO_INK).count()
    }

    /// Fraction of pixels carrying ink, in `0.0..=1.0`.
    pub fn coverage(&self) -> f64 {
        self.covered_pixels() as f64 / self.data.len() as f64
    }
}

/// One named spot-color separation.
#[derive(Debug, Clone, PartialEq)]
pub struct Channel {
    pub name: String,
    pub palette_index: usize,
    pub color: Srgb,
    pub mask: CoverageMask,
    /// Always [`FULL_INK_DENSITY`].
    pub ink_density: u8,
    /// 0..=100, assigned by the orderer.
    pub opacity: u8,
    pub knockout: bool,
}

impl Channel {
    /// Color as `RRGGBB`.
    pub fn hex(&self) -> String {
        self.color.to_hex()
    }
}

/// Builds the channel for one palette entry.
///
/// Implementations must be shareable across worker threads; the pipeline may
/// call `build` for several entries at once.
pub trait BuildChannel: Send + Sync {
    fn build(
        &self,
        quantized: &QuantizedImage,
        entry: &PaletteEntry,
        resolver: &ColorNameResolver,
    ) -> Result<Channel, ChannelBuildError>;
}

/// Selection against the quantized rendition.
///
/// A pixel is inked when it was assigned to the entry's own palette index.
/// With a non-zero `match_tolerance` the selection widens to pixels of other
/// entries whose color lies within that many code values of the entry color
/// on every channel. Entries carrying the exact same color are never merged,
/// so a padded duplicate stays empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelBuilder {
    match_tolerance: u8,
}

impl ChannelBuilder {
    pub fn new(match_tolerance: u8) -> Self {
        Self { match_tolerance }
    }

    fn select(
        &self,
        quantized: &QuantizedImage,
        entry: &PaletteEntry,
    ) -> Result<Vec<u8>, ChannelBuildError> {
        let image = &quantized.image;
        let pixels = image.indices().len();

        let mut data = Vec::new();
        data.try_reserve_exact(pixels)
            .map_err(|_| ChannelBuildError::Allocation { bytes: pixels })?;

        // Decide once per palette index, not per pixel
        let palette = image.palette();
        let selected: Vec<bool> = (0..palette.len())
            .map(|i| {
                if i == entry.index {
                    return true;
                }
                if self.match_tolerance == 0 {
                    return false;
                }
                let color = palette.color(i);
                color != entry.color && color.max_channel_diff(entry.color) <= self.match_tolerance
            })
            .collect();

        data.extend(image.indices().iter().map(|&idx| {
            if selected.get(idx as usize).copied().unwrap_or(false) {
                INK
            } else {
                NO_INK
            }
        }));
        Ok(data)
    }
}

impl BuildChannel for ChannelBuilder {
    fn build(
        &self,
        quantized: &QuantizedImage,
        entry: &PaletteEntry,
        resolver: &ColorNameResolver,
    ) -> Result<Channel, ChannelBuildError> {
        let len = quantized.image.palette().len();
        if entry.index >= len {
            return Err(ChannelBuildError::IndexOutOfRange {
                index: entry.index,
                len,
            });
        }

        let data = self.select(quantized, entry)?;
        let mask = CoverageMask::new(quantized.width(), quantized.height(), data)?;
        if mask.covered_pixels() == 0 {
            return Err(ChannelBuildError::EmptyMask { index: entry.index });
        }

        let hex = entry.hex();
        Ok(Channel {
            name: resolver.resolve(&hex, entry.index),
            palette_index: entry.index,
            color: entry.color,
            mask,
            ink_density: FULL_INK_DENSITY,
            opacity: 0,
            knockout: false,
        })
    }
}
