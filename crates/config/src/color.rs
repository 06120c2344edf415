//! `#rrggbb` colors used for vertex painting.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// An RGB color with channels in `[0, 1]`.
///
/// Serialized as a `#rrggbb` string so survey configuration files stay
/// readable. Two colors are considered the same paint when their quantized
/// 8-bit hex values match, see [`Rgb::to_hex`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a packed `0xRRGGBB` value.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub const fn from_array(rgb: [f32; 3]) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }

    pub const fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    /// Quantize to a packed `0xRRGGBB` value.
    pub fn to_hex(self) -> u32 {
        (quantize_channel(self.r) << 16) | (quantize_channel(self.g) << 8) | quantize_channel(self.b)
    }

    /// Quantized hex of a raw color attribute slot.
    pub fn hex_of(rgb: [f32; 3]) -> u32 {
        Self::from_array(rgb).to_hex()
    }
}

fn quantize_channel(channel: f32) -> u32 {
    (channel * 255.0).round().clamp(0.0, 255.0) as u32
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:06x}", self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if digits.len() != 6 {
            return Err(ConfigError::InvalidColor(s.to_string()));
        }
        let hex = u32::from_str_radix(digits, 16)
            .map_err(|_| ConfigError::InvalidColor(s.to_string()))?;
        Ok(Self::from_hex(hex))
    }
}

impl TryFrom<String> for Rgb {
    type Error = ConfigError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_string() {
        let color: Rgb = "#424242".parse().unwrap();
        assert_eq!(color.to_hex(), 0x424242);
        assert_eq!(color.to_string(), "#424242");

        let bare: Rgb = "abcabc".parse().unwrap();
        assert_eq!(bare.to_hex(), 0xabcabc);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#zzzzzz".parse::<Rgb>().is_err());
        assert!("".parse::<Rgb>().is_err());
    }

    #[test]
    fn test_hex_ignores_small_drift() {
        let drifted = [1.0 - 1e-5, 0.2588 + 1e-6, 0.2588];
        let exact = Rgb::from_hex(0xff4242).to_array();
        assert_eq!(Rgb::hex_of(drifted), Rgb::hex_of(exact));
    }

    #[test]
    fn test_out_of_range_channels_clamp() {
        assert_eq!(Rgb::new(2.0, -1.0, 0.5).to_hex(), 0xff0080);
    }
}
