//! Error types for the separation pipeline.
//!
//! [`ConfigError`] is fatal: a run that hits it produces no report.
//! [`ChannelBuildError`] is scoped to one palette entry and only ever
//! surfaces as data in [`SeparationReport::failures`](crate::SeparationReport).

use thiserror::Error;

use crate::config::{COLOR_COUNT_RANGE, DITHER_STRENGTH_RANGE};

/// Invalid configuration or a palette reduction that could not complete.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error(
        "color count {0} out of range ({lo}..={hi})",
        lo = COLOR_COUNT_RANGE.start(),
        hi = COLOR_COUNT_RANGE.end()
    )]
    ColorCount(u32),

    #[error(
        "dither strength {0} out of range ({lo}..={hi})",
        lo = DITHER_STRENGTH_RANGE.start(),
        hi = DITHER_STRENGTH_RANGE.end()
    )]
    DitherStrength(u32),

    #[error("palette reduction failed: {0}")]
    Quantization(String),
}

/// Recoverable failure while building one separation channel.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ChannelBuildError {
    #[error("no pixels match palette entry {index}")]
    EmptyMask { index: usize },

    #[error("palette index {index} outside palette of {len} colors")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("mask of {pixels} pixels does not fit raster bounds {width}x{height}")]
    DimensionMismatch {
        width: usize,
        height: usize,
        pixels: usize,
    },

    #[error("could not allocate {bytes} bytes for coverage mask")]
    Allocation { bytes: usize },
}

/// A selector string that names no known variant.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown {kind} '{value}', expected one of: {expected}")]
pub struct UnknownVariantError {
    pub kind: &'static str,
    pub value: String,
    pub expected: &'static str,
}

/// Invalid raster construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ImageError {
    #[error("image dimensions must be non-zero, got {width}x{height}")]
    ZeroDimension { width: usize, height: usize },

    #[error("pixel buffer holds {actual} samples, expected {expected}")]
    BufferSize { expected: usize, actual: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_error_messages() {
        assert_eq!(
            ConfigError::ColorCount(13).to_string(),
            "color count 13 out of range (2..=12)"
        );
        assert_eq!(
            ConfigError::DitherStrength(0).to_string(),
            "dither strength 0 out of range (1..=100)"
        );
    }

    #[test]
    fn test_channel_error_messages() {
        assert_eq!(
            ChannelBuildError::EmptyMask { index: 3 }.to_string(),
            "no pixels match palette entry 3"
        );
        let err = ChannelBuildError::DimensionMismatch {
            width: 4,
            height: 4,
            pixels: 12,
        };
        assert_eq!(
            err.to_string(),
            "mask of 12 pixels does not fit raster bounds 4x4"
        );
    }

    #[test]
    fn test_image_error_messages() {
        let err = ImageError::BufferSize {
            expected: 12,
            actual: 9,
        };
        assert_eq!(err.to_string(), "pixel buffer holds 9 samples, expected 12");
    }
}
