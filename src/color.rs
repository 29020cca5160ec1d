//! RGBA colors and the hex notation used by filter configuration.

use std::fmt;
use std::str::FromStr;

use palette::Srgb;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An 8-bit-per-channel, non-premultiplied RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);
    pub const DARK_GRAY: Color = Color::rgb(0x40, 0x40, 0x40);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xff)
    }

    pub fn is_opaque(&self) -> bool {
        self.a == 0xff
    }

    /// Parses a color string.
    ///
    /// `#AARRGGBB` (9 characters) carries its own alpha, `#RRGGBB`
    /// (7 characters) is opaque. Any other length goes through a generic
    /// decode that accepts `0x`-prefixed hex, decimal integers, short hex
    /// (`#RGB`) and bare hex digits, all opaque.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = || Error::InvalidColor(raw.to_string());

        match raw.len() {
            9 => {
                let digits = raw
                    .strip_prefix('#')
                    .filter(|digits| digits.bytes().all(|b| b.is_ascii_hexdigit()))
                    .ok_or_else(invalid)?;
                let value = u32::from_str_radix(digits, 16).map_err(|_| invalid())?;
                let [a, r, g, b] = value.to_be_bytes();
                Ok(Color::new(r, g, b, a))
            }
            7 if raw.starts_with('#') => {
                let rgb: Srgb<u8> = raw.parse().map_err(|_| invalid())?;
                Ok(rgb.into())
            }
            _ => decode_generic(raw).ok_or_else(invalid),
        }
    }

    /// Formats the color back into `#AARRGGBB` notation.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}{:02X}", self.a, self.r, self.g, self.b)
    }
}

fn decode_generic(raw: &str) -> Option<Color> {
    let trimmed = raw.trim();
    if let Some(hex) = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
    {
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        return rgb_from_int(u32::from_str_radix(hex, 16).ok()?);
    }
    if let Ok(value) = trimmed.parse::<u32>() {
        return rgb_from_int(value);
    }
    trimmed.parse::<Srgb<u8>>().ok().map(Color::from)
}

fn rgb_from_int(value: u32) -> Option<Color> {
    if value > 0x00ff_ffff {
        return None;
    }
    let [_, r, g, b] = value.to_be_bytes();
    Some(Color::rgb(r, g, b))
}

impl From<Srgb<u8>> for Color {
    fn from(rgb: Srgb<u8>) -> Self {
        Color::rgb(rgb.red, rgb.green, rgb.blue)
    }
}

impl From<Color> for resvg::tiny_skia::Color {
    fn from(color: Color) -> Self {
        resvg::tiny_skia::Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

impl FromStr for Color {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Color::parse(s)
    }
}

impl TryFrom<String> for Color {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Color::parse(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_opaque_rgb() {
        assert_eq!(Color::parse("#FF0000").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(Color::parse("#00ff7f").unwrap(), Color::rgb(0, 255, 127));
    }

    #[test]
    fn parses_argb() {
        let color = Color::parse("#99007200").unwrap();
        assert_eq!(color, Color::new(0, 0x72, 0, 0x99));
        assert!(!color.is_opaque());
    }

    #[test]
    fn falls_back_to_generic_decode() {
        assert_eq!(Color::parse("#f00").unwrap(), Color::rgb(255, 0, 0));
        assert_eq!(Color::parse("0x00FF00").unwrap(), Color::rgb(0, 255, 0));
        assert_eq!(Color::parse("255").unwrap(), Color::rgb(0, 0, 255));
    }

    #[test]
    fn rejects_malformed_strings() {
        for raw in ["", "#GGGGGG", "#12345", "red", "#zz112233", "123456789", "#+1234567", "0x+FF00"] {
            assert!(
                matches!(Color::parse(raw), Err(Error::InvalidColor(_))),
                "`{raw}` should be rejected"
            );
        }
    }

    #[test]
    fn hex_notation_roundtrips_through_serde() {
        let color = Color::new(0x11, 0x22, 0x33, 0x44);
        let json = serde_json::to_string(&color).unwrap();
        assert_eq!(json, "\"#44112233\"");
        assert_eq!(serde_json::from_str::<Color>(&json).unwrap(), color);
    }
}
