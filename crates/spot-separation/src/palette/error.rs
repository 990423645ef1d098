//! Error types for color parsing and palette construction

use thiserror::Error;

/// Error returned when a hex color string cannot be parsed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseColorError {
    /// Hex string has invalid length (must be 3 or 6 digits after stripping '#')
    #[error("invalid hex color length {0} (expected 3 or 6 digits)")]
    InvalidLength(usize),
    /// Invalid hexadecimal character encountered
    #[error("invalid hex character: {0}")]
    InvalidHex(#[from] hex::FromHexError),
}

/// Error returned when a palette cannot be constructed.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PaletteError {
    #[error("palette cannot be empty")]
    EmptyPalette,
    #[error("palette has {len} colors, more than the {max} an indexed raster can address")]
    TooLarge { len: usize, max: usize },
}
