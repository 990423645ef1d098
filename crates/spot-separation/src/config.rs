//! Separation configuration.
//!
//! [`SeparationConfig`] is an explicit value handed to the pipeline; there is
//! no process-wide configuration. Validation reports out-of-range values as
//! [`ConfigError`] instead of clamping them.

use std::ops::RangeInclusive;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, UnknownVariantError};

/// Allowed palette sizes.
pub const COLOR_COUNT_RANGE: RangeInclusive<u32> = 2..=12;

/// Allowed dither strengths, in percent.
pub const DITHER_STRENGTH_RANGE: RangeInclusive<u32> = 1..=100;

/// Palette reduction policy, chosen once when the configuration is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum QuantizerKind {
    /// Median-cut palette with error-diffusion mapping.
    #[default]
    Adaptive,
    /// Popularity palette with ordered (Bayer) threshold mapping.
    Selective,
}

/// How the host should write channel files.
///
/// The core never writes files; this selector is carried through so the
/// host exporter can honour it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// 8-bit grayscale mask per channel, ink rendered black.
    #[default]
    Grayscale,
    /// 1-bit indexed mask per channel with paper and ink colors in the PLTE.
    Indexed,
}

impl FromStr for QuantizerKind {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adaptive" => Ok(Self::Adaptive),
            "selective" => Ok(Self::Selective),
            other => Err(UnknownVariantError {
                kind: "quantizer",
                value: other.to_string(),
                expected: "adaptive, selective",
            }),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "grayscale" => Ok(Self::Grayscale),
            "indexed" => Ok(Self::Indexed),
            other => Err(UnknownVariantError {
                kind: "output format",
                value: other.to_string(),
                expected: "grayscale, indexed",
            }),
        }
    }
}

/// Parameters for one separation run.
///
/// # Example
///
/// ```
/// use spot_separation::SeparationConfig;
///
/// let config = SeparationConfig::default().color_count(8).dither_strength(40);
/// assert!(config.validate().is_ok());
///
/// let bad = SeparationConfig::default().color_count(13);
/// assert!(bad.validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SeparationConfig {
    /// Number of separations to produce (2..=12).
    pub color_count: u32,
    /// Dither strength in percent (1..=100).
    pub dither_strength: u32,
    /// Production metadata, passed through unmodified.
    pub min_stroke_mm: f32,
    pub output_format: OutputFormat,
    pub quantizer: QuantizerKind,
    /// Color-range fuzziness in 8-bit code values; 0 selects exact matches only.
    pub match_tolerance: u8,
    /// Look palette colors up in the known-color table before falling back
    /// to generated names.
    pub use_known_colors: bool,
    /// Build channels on the rayon thread pool.
    pub parallel: bool,
}

impl Default for SeparationConfig {
    fn default() -> Self {
        Self {
            color_count: 6,
            dither_strength: 20,
            min_stroke_mm: 0.3,
            output_format: OutputFormat::default(),
            quantizer: QuantizerKind::default(),
            match_tolerance: 0,
            use_known_colors: true,
            parallel: true,
        }
    }
}

impl SeparationConfig {
    #[inline]
    pub fn color_count(mut self, count: u32) -> Self {
        self.color_count = count;
        self
    }

    #[inline]
    pub fn dither_strength(mut self, strength: u32) -> Self {
        self.dither_strength = strength;
        self
    }

    #[inline]
    pub fn quantizer(mut self, kind: QuantizerKind) -> Self {
        self.quantizer = kind;
        self
    }

    #[inline]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[inline]
    pub fn match_tolerance(mut self, tolerance: u8) -> Self {
        self.match_tolerance = tolerance;
        self
    }

    #[inline]
    pub fn use_known_colors(mut self, enabled: bool) -> Self {
        self.use_known_colors = enabled;
        self
    }

    #[inline]
    pub fn parallel(mut self, enabled: bool) -> Self {
        self.parallel = enabled;
        self
    }

    /// Check every range-limited field. `min_stroke_mm` is metadata and is
    /// never rejected.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_counts(self.color_count, self.dither_strength)
    }
}

/// Range check shared by the config and the palette reducer entry point.
pub(crate) fn validate_counts(color_count: u32, dither_strength: u32) -> Result<(), ConfigError> {
    if !COLOR_COUNT_RANGE.contains(&color_count) {
        return Err(ConfigError::ColorCount(color_count));
    }
    if !DITHER_STRENGTH_RANGE.contains(&dither_strength) {
        return Err(ConfigError::DitherStrength(dither_strength));
    }
    Ok(())
}
