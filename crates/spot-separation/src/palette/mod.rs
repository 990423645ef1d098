//! Palette types: ordered [`PaletteEntry`] values with perceptual
//! nearest-color search.

mod error;
#[allow(clippy::module_inception)]
mod palette;

pub use error::{PaletteError, ParseColorError};
pub use palette::{Palette, PaletteEntry};
