//! spot-separation: spot-color separations for screen and offset print
//!
//! This library turns a continuous-tone raster into a fixed set of named,
//! ordered spot-color channels. A run reduces the image to a small palette,
//! extracts one coverage mask per palette entry, names each channel and
//! assigns the opacity that decides print stacking.
//!
//! # Quick Start
//!
//! ```
//! use spot_separation::{RasterImage, SeparationConfig, SeparationPipeline, Srgb};
//!
//! let red = Srgb::new(255, 0, 0);
//! let green = Srgb::new(0, 255, 0);
//! let image = RasterImage::new(3, 1, vec![red, green, Srgb::WHITE]).unwrap();
//!
//! let config = SeparationConfig::default().color_count(3);
//! let report = SeparationPipeline::new(config).unwrap().run(&image).unwrap();
//!
//! assert_eq!(report.channels.len(), 3);
//! assert!(report.failures.is_empty());
//! assert!(report.channels.iter().all(|c| c.knockout && c.opacity >= 30));
//! ```
//!
//! # Run Stages
//!
//! ```text
//! RasterImage
//!     |
//!     v
//! [PaletteReducer]      (Adaptive: median cut + Floyd-Steinberg,
//!     |                  Selective: popularity + Bayer ordered)
//!     v
//! QuantizedImage        (n PaletteEntry + one index per pixel)
//!     |
//!     v
//! [ChannelBuilder] x n  (color-range mask, name, ink density;
//!     |                  failures become ChannelFailure records)
//!     v
//! [SeparationOrderer]   (opacity 100 - 5i, sort, floor 30, knockout)
//!     |
//!     v
//! SeparationReport
//! ```
//!
//! # Color Spaces
//!
//! - [`Srgb`]: 8-bit encoded colors, used for input, palettes and masks
//! - [`LinearRgb`]: light intensity; palette averaging and diffused error
//! - [`Oklab`]: perceptual distance for nearest-color search and spacing
//!
//! # Failure Model
//!
//! [`ConfigError`] ends a run before any channel is built. A
//! [`ChannelBuildError`] only removes its own channel: it is reported in
//! [`SeparationReport::failures`] and passed to the pipeline's
//! [`FailureSink`] while every other entry is still built.

pub mod channel;
pub mod color;
pub mod config;
pub mod dither;
pub mod error;
pub mod image;
pub mod names;
pub mod order;
pub mod palette;
pub mod pipeline;
pub mod quantize;


pub use channel::{BuildChannel, Channel, ChannelBuilder, CoverageMask};
pub use color::{LinearRgb, Oklab, Srgb};
pub use config::{OutputFormat, QuantizerKind, SeparationConfig};
pub use error::{ChannelBuildError, ConfigError, ImageError, UnknownVariantError};
pub use image::{IndexedImage, RasterImage};
pub use names::{ColorNameResolver, KnownColorTable};
pub use order::SeparationOrderer;
pub use palette::{Palette, PaletteEntry, PaletteError, ParseColorError};
pub use pipeline::{
    ChannelFailure, FailureSink, RunState, SeparationPipeline, SeparationReport, TracingSink,
};
pub use quantize::{reduce, PaletteReducer, QuantizedImage, Quantizer};
