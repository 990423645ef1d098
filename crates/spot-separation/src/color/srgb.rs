//! 8-bit sRGB color type with hex parsing and formatting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::linear_rgb::LinearRgb;
use super::lut::linear_to_srgb8;
use crate::palette::ParseColorError;

/// A gamma-encoded 8-bit sRGB color.
///
/// This is the color of raster pixels and palette entries. Equality is
/// byte-exact, which is what zero-tolerance color-range matching needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Srgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Srgb {
    pub const BLACK: Srgb = Srgb::new(0, 0, 0);
    pub const WHITE: Srgb = Srgb::new(255, 255, 255);

    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    #[inline]
    pub const fn from_bytes(bytes: [u8; 3]) -> Self {
        Self::new(bytes[0], bytes[1], bytes[2])
    }

    #[inline]
    pub const fn to_bytes(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Canonical hex form: six uppercase digits, no leading `#`.
    ///
    /// ```
    /// use spot_separation::Srgb;
    /// assert_eq!(Srgb::new(255, 0, 10).to_hex(), "FF000A");
    /// ```
    pub fn to_hex(self) -> String {
        hex::encode_upper(self.to_bytes())
    }

    /// Largest per-channel absolute difference, in 8-bit code values.
    ///
    /// Used as the color-range fuzziness measure: a pixel is within
    /// tolerance `t` of a target when `max_channel_diff <= t`.
    #[inline]
    pub fn max_channel_diff(self, other: Srgb) -> u8 {
        self.r
            .abs_diff(other.r)
            .max(self.g.abs_diff(other.g))
            .max(self.b.abs_diff(other.b))
    }

    /// Alpha-composite an RGBA sample over white paper.
    #[inline]
    pub fn over_white(rgba: [u8; 4]) -> Self {
        let a = rgba[3] as u16;
        let blend = |c: u8| ((c as u16 * a + 255 * (255 - a) + 127) / 255) as u8;
        Self::new(blend(rgba[0]), blend(rgba[1]), blend(rgba[2]))
    }
}

impl From<LinearRgb> for Srgb {
    fn from(linear: LinearRgb) -> Self {
        Self {
            r: linear_to_srgb8(linear.r),
            g: linear_to_srgb8(linear.g),
            b: linear_to_srgb8(linear.b),
        }
    }
}

impl fmt::Display for Srgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl FromStr for Srgb {
    type Err = ParseColorError;

    /// Parse `#RRGGBB`, `RRGGBB`, `#RGB` or `RGB`, case-insensitive,
    /// surrounding whitespace ignored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_prefix('#').unwrap_or(s);

        let mut bytes = [0u8; 3];
        match s.len() {
            3 => {
                // Shorthand: each digit is doubled (F -> FF)
                let expanded: String = s.chars().flat_map(|c| [c, c]).collect();
                hex::decode_to_slice(expanded, &mut bytes)?;
            }
            6 => hex::decode_to_slice(s, &mut bytes)?,
            _ => return Err(ParseColorError::InvalidLength(s.len())),
        }
        Ok(Self::from_bytes(bytes))
    }
}

/// Serialized as `#RRGGBB`.
impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_forms() {
        let expected = Srgb::new(0xFF, 0x00, 0x00);
        assert_eq!("#FF0000".parse::<Srgb>().unwrap(), expected);
        assert_eq!("ff0000".parse::<Srgb>().unwrap(), expected);
        assert_eq!("  #f00 ".parse::<Srgb>().unwrap(), expected);
        assert_eq!("F00".parse::<Srgb>().unwrap(), expected);
    }

    #[test]
    fn test_parse_errors() {
        assert_eq!(
            "#FF00".parse::<Srgb>(),
            Err(ParseColorError::InvalidLength(4))
        );
        assert!(matches!(
            "GG0000".parse::<Srgb>(),
            Err(ParseColorError::InvalidHex(_))
        ));
    }

    #[test]
    fn test_hex_and_display() {
        let c = Srgb::new(0x12, 0x34, 0x56);
        assert_eq!(c.to_hex(), "123456");
        assert_eq!(c.to_string(), "#123456");
    }

    #[test]
    fn test_max_channel_diff() {
        let a = Srgb::new(10, 200, 30);
        let b = Srgb::new(12, 190, 30);
        assert_eq!(a.max_channel_diff(b), 10);
        assert_eq!(a.max_channel_diff(a), 0);
    }

    #[test]
    fn test_over_white() {
        assert_eq!(Srgb::over_white([0, 0, 0, 255]), Srgb::BLACK);
        assert_eq!(Srgb::over_white([0, 0, 0, 0]), Srgb::WHITE);
        let half = Srgb::over_white([0, 0, 0, 128]);
        assert!(half.r > 120 && half.r < 135, "got {half:?}");
    }

    #[test]
    fn test_serde_as_hex() {
        let yaml = serde_yaml::to_string(&Srgb::new(255, 0, 16)).unwrap();
        assert!(yaml.contains("#FF0010"), "got {yaml}");
        let back: Srgb = serde_yaml::from_str("\"00ff00\"").unwrap();
        assert_eq!(back, Srgb::new(0, 255, 0));
    }
}
