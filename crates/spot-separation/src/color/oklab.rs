//! Oklab perceptual color space
//!
//! Björn Ottosson, "A perceptual color space for image processing"
//! <https://bottosson.github.io/posts/oklab/>

use super::linear_rgb::LinearRgb;

/// A color in Oklab perceptual color space.
///
/// Euclidean distance here tracks perceived difference, which is what
/// nearest-palette-color search needs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Oklab {
    /// Lightness: 0.0 (black) to 1.0 (white) for in-gamut colors
    pub l: f32,
    /// Green-red axis
    pub a: f32,
    /// Blue-yellow axis
    pub b: f32,
}

impl Oklab {
    #[inline]
    pub fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    /// Squared Euclidean distance. Avoids the sqrt when only ranking.
    #[inline]
    pub fn distance_squared(self, other: Oklab) -> f32 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }

    /// Chroma magnitude `sqrt(a² + b²)`.
    #[inline]
    pub fn chroma(self) -> f32 {
        (self.a * self.a + self.b * self.b).sqrt()
    }
}

impl From<LinearRgb> for Oklab {
    fn from(rgb: LinearRgb) -> Self {
        // Linear sRGB to LMS (M1, 2021-01-25 revision)
        let l = 0.4122214708 * rgb.r + 0.5363325363 * rgb.g + 0.0514459929 * rgb.b;
        let m = 0.2119034982 * rgb.r + 0.6806995451 * rgb.g + 0.1073969566 * rgb.b;
        let s = 0.0883024619 * rgb.r + 0.2817188376 * rgb.g + 0.6299787005 * rgb.b;

        // cbrt keeps the sign for out-of-gamut diffusion values
        let l_ = l.cbrt();
        let m_ = m.cbrt();
        let s_ = s.cbrt();

        Self {
            l: 0.2104542553 * l_ + 0.7936177850 * m_ - 0.0040720468 * s_,
            a: 1.9779984951 * l_ - 2.4285922050 * m_ + 0.4505937099 * s_,
            b: 0.0259040371 * l_ + 0.7827717662 * m_ - 0.8086757660 * s_,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_white_and_black() {
        let white = Oklab::from(LinearRgb::new(1.0, 1.0, 1.0));
        assert!((white.l - 1.0).abs() < 1e-3);
        assert!(white.chroma() < 1e-3);

        let black = Oklab::from(LinearRgb::new(0.0, 0.0, 0.0));
        assert!(black.l.abs() < 1e-6);
    }

    #[test]
    fn test_grey_is_achromatic() {
        let grey = Oklab::from(LinearRgb::new(0.2, 0.2, 0.2));
        assert!(grey.chroma() < 1e-3, "grey chroma {}", grey.chroma());
    }

    #[test]
    fn test_distance_symmetry() {
        let a = Oklab::new(0.5, 0.1, -0.1);
        let b = Oklab::new(0.7, -0.05, 0.02);
        assert!((a.distance_squared(b) - b.distance_squared(a)).abs() < 1e-9);
        assert_eq!(a.distance_squared(a), 0.0);
    }
}
