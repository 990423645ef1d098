//! Ordered palette with precomputed linear and perceptual representations.

use std::fmt;

use super::error::PaletteError;
use crate::color::{LinearRgb, Oklab, Srgb};

/// One entry of a reduced palette.
///
/// `index` is the entry's position in the palette and doubles as the
/// channel identity downstream: it is never reused within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PaletteEntry {
    pub index: usize,
    pub color: Srgb,
}

impl PaletteEntry {
    pub fn new(index: usize, color: Srgb) -> Self {
        Self { index, color }
    }

    /// Canonical hex of the entry color (`RRGGBB`).
    pub fn hex(&self) -> String {
        self.color.to_hex()
    }
}

impl fmt::Display for PaletteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.index, self.color)
    }
}

/// An ordered palette of up to 256 colors.
///
/// Unlike a device palette, duplicate colors are allowed: a reducer asked for
/// more colors than the image contains fills the palette with degenerate
/// repeats and leaves detecting them to the caller. Nearest-color search
/// breaks ties toward the lowest index, so a duplicate never receives pixels.
///
/// Linear and Oklab forms are computed once at construction so per-pixel
/// matching does no conversions on the palette side.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
    linear: Vec<LinearRgb>,
    oklab: Vec<Oklab>,
}

impl Palette {
    /// Largest palette an 8-bit index raster can address.
    pub const MAX_LEN: usize = 256;

    /// Build a palette from colors in order; entry `i` gets index `i`.
    ///
    /// ```
    /// use spot_separation::{Palette, Srgb};
    ///
    /// let palette = Palette::from_colors(&[Srgb::BLACK, Srgb::WHITE]).unwrap();
    /// assert_eq!(palette.len(), 2);
    /// assert_eq!(palette.entries()[1].index, 1);
    /// ```
    pub fn from_colors(colors: &[Srgb]) -> Result<Self, PaletteError> {
        if colors.is_empty() {
            return Err(PaletteError::EmptyPalette);
        }
        if colors.len() > Self::MAX_LEN {
            return Err(PaletteError::TooLarge {
                len: colors.len(),
                max: Self::MAX_LEN,
            });
        }

        let entries: Vec<PaletteEntry> = colors
            .iter()
            .enumerate()
            .map(|(i, &c)| PaletteEntry::new(i, c))
            .collect();
        let linear: Vec<LinearRgb> = colors.iter().map(|&c| LinearRgb::from(c)).collect();
        let oklab: Vec<Oklab> = linear.iter().map(|&l| Oklab::from(l)).collect();

        Ok(Self {
            entries,
            linear,
            oklab,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: empty palettes are rejected at construction.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[inline]
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    #[inline]
    pub fn color(&self, idx: usize) -> Srgb {
        self.entries[idx].color
    }

    #[inline]
    pub fn linear(&self, idx: usize) -> LinearRgb {
        self.linear[idx]
    }

    /// Find the perceptually nearest entry (squared Oklab distance).
    ///
    /// Linear scan; palettes here hold at most a dozen colors. Ties go to
    /// the lower index.
    #[inline]
    pub fn find_nearest(&self, color: Oklab) -> (usize, f32) {
        let mut best_idx = 0;
        let mut best_dist = f32::MAX;

        for (i, &candidate) in self.oklab.iter().enumerate() {
            let dist = color.distance_squared(candidate);
            if dist < best_dist {
                best_dist = dist;
                best_idx = i;
            }
        }

        (best_idx, best_dist)
    }
}
