//! Linear RGB color type
//!
//! Light adds linearly, so palette averaging and quantization error live
//! here rather than in gamma-encoded sRGB.

use std::ops::{Add, AddAssign, Mul, Sub};

use super::lut::srgb8_to_linear;
use super::srgb::Srgb;

/// A color in linear RGB color space.
///
/// Values are nominally 0.0..=1.0 but may leave that range while error
/// diffusion accumulates quantization error.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LinearRgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl LinearRgb {
    #[inline]
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Clamp each channel into `[-margin, 1.0 + margin]`.
    #[inline]
    pub fn clamp_with_margin(self, margin: f32) -> Self {
        Self::new(
            self.r.clamp(-margin, 1.0 + margin),
            self.g.clamp(-margin, 1.0 + margin),
            self.b.clamp(-margin, 1.0 + margin),
        )
    }

    #[inline]
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    #[inline]
    pub fn from_array(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl From<Srgb> for LinearRgb {
    fn from(srgb: Srgb) -> Self {
        Self {
            r: srgb8_to_linear(srgb.r),
            g: srgb8_to_linear(srgb.g),
            b: srgb8_to_linear(srgb.b),
        }
    }
}

impl Add for LinearRgb {
    type Output = LinearRgb;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.r + rhs.r, self.g + rhs.g, self.b + rhs.b)
    }
}

impl AddAssign for LinearRgb {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.r += rhs.r;
        self.g += rhs.g;
        self.b += rhs.b;
    }
}

impl Sub for LinearRgb {
    type Output = LinearRgb;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.r - rhs.r, self.g - rhs.g, self.b - rhs.b)
    }
}

impl Mul<f32> for LinearRgb {
    type Output = LinearRgb;

    #[inline]
    fn mul(self, k: f32) -> Self {
        Self::new(self.r * k, self.g * k, self.b * k)
    }
}
