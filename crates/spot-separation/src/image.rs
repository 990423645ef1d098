//! Raster containers: the continuous-tone input and its quantized rendition.

use crate::color::Srgb;
use crate::error::ImageError;
use crate::palette::Palette;

/// Continuous-tone RGB input image, row-major.
///
/// Read-only for the duration of a separation run; the pipeline never
/// writes to it, so it can be shared across channel-building workers.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterImage {
    width: usize,
    height: usize,
    pixels: Vec<Srgb>,
}

impl RasterImage {
    /// Wrap a pixel buffer, checking it matches the dimensions.
    pub fn new(width: usize, height: usize, pixels: Vec<Srgb>) -> Result<Self, ImageError> {
        if width == 0 || height == 0 {
            return Err(ImageError::ZeroDimension { width, height });
        }
        let expected = width * height;
        if pixels.len() != expected {
            return Err(ImageError::BufferSize {
                expected,
                actual: pixels.len(),
            });
        }
        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build from packed `[R, G, B, R, G, B, ...]` bytes.
    ///
    /// ```
    /// use spot_separation::RasterImage;
    ///
    /// let image = RasterImage::from_rgb8(2, 1, &[255, 0, 0, 0, 0, 255]).unwrap();
    /// assert_eq!(image.pixel(1, 0).b, 255);
    /// ```
    pub fn from_rgb8(width: usize, height: usize, data: &[u8]) -> Result<Self, ImageError> {
        if data.len() != width * height * 3 {
            return Err(ImageError::BufferSize {
                expected: width * height * 3,
                actual: data.len(),
            });
        }
        let pixels = data
            .chunks_exact(3)
            .map(|c| Srgb::new(c[0], c[1], c[2]))
            .collect();
        Self::new(width, height, pixels)
    }

    /// Build from packed RGBA bytes; alpha is composited over white paper.
    pub fn from_rgba8(width: usize, height: usize, data: &[u8]) -> Result<Self, ImageError> {
        if data.len() != width * height * 4 {
            return Err(ImageError::BufferSize {
                expected: width * height * 4,
                actual: data.len(),
            });
        }
        let pixels = data
            .chunks_exact(4)
            .map(|c| Srgb::over_white([c[0], c[1], c[2], c[3]]))
            .collect();
        Self::new(width, height, pixels)
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
    pub fn pixels(&self) -> &[Srgb] {
        &self.pixels
    }

    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> Srgb {
        self.pixels[y * self.width + x]
    }
}

/// The quantized rendition of a [`RasterImage`]: one palette index per pixel.
///
/// This is the logical "indexed color" document that color-range selection
/// runs against. It is separate from the source raster, which stays
/// untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexedImage {
    indices: Vec<u8>,
    width: usize,
    height: usize,
    palette: Palette,
}

impl IndexedImage {
    /// # Panics (debug only)
    ///
    /// Debug-asserts that `indices.len() == width * height`.
    pub fn new(indices: Vec<u8>, width: usize, height: usize, palette: Palette) -> Self {
        debug_assert_eq!(
            indices.len(),
            width * height,
            "indices length ({}) must match width * height ({}x{})",
            indices.len(),
            width,
            height,
        );
        Self {
            indices,
            width,
            height,
            palette,
        }
    }

    #[inline]
    pub fn indices(&self) -> &[u8] {
        &self.indices
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
    pub fn palette(&self) -> &Palette {
        &self.palette
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raster_rejects_bad_buffers() {
        assert_eq!(
            RasterImage::new(0, 3, vec![]),
            Err(ImageError::ZeroDimension {
                width: 0,
                height: 3
            })
        );
        assert_eq!(
            RasterImage::new(2, 2, vec![Srgb::BLACK; 3]),
            Err(ImageError::BufferSize {
                expected: 4,
                actual: 3
            })
        );
        assert!(RasterImage::from_rgb8(2, 2, &[0; 11]).is_err());
    }

    #[test]
    fn test_from_rgba8_composites_over_white() {
        let image = RasterImage::from_rgba8(2, 1, &[0, 0, 0, 255, 0, 0, 0, 0]).unwrap();
        assert_eq!(image.pixel(0, 0), Srgb::BLACK);
        assert_eq!(image.pixel(1, 0), Srgb::WHITE);
    }

    #[test]
    fn test_indexed_rendition() {
        let red = Srgb::new(255, 0, 0);
        let palette = Palette::from_colors(&[Srgb::WHITE, red]).unwrap();
        let indexed = IndexedImage::new(vec![0, 1, 1, 0], 2, 2, palette);

        assert_eq!(indexed.width(), 2);
        assert_eq!(indexed.height(), 2);
        assert_eq!(indexed.indices(), &[0, 1, 1, 0]);
        assert_eq!(indexed.palette().color(1), red);
    }
}
