//! Color types used throughout the separation pipeline.
//!
//! - [`Srgb`]: 8-bit gamma-encoded color, the unit of raster input, palette
//!   entries and exact color-range matching.
//! - [`LinearRgb`]: linear light, used for palette averaging and error
//!   diffusion arithmetic.
//! - [`Oklab`]: perceptual space, used for nearest-color search.
//!
//! ```
//! use spot_separation::{LinearRgb, Oklab, Srgb};
//!
//! let red: Srgb = "#FF0000".parse().unwrap();
//! let linear = LinearRgb::from(red);
//! let perceptual = Oklab::from(linear);
//! assert!(perceptual.chroma() > 0.2);
//! assert_eq!(Srgb::from(linear), red);
//! ```

mod linear_rgb;
mod lut;
mod oklab;
mod srgb;

pub use linear_rgb::LinearRgb;
pub use oklab::Oklab;
pub use srgb::Srgb;
