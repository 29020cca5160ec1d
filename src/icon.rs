//! Icon geometry: pixel sizes, rectangles and the safe drawing viewport.
//!
//! Legacy launcher icons are flat images whose whole surface is visible.
//! Adaptive icons are drawn on a 108x108 logical canvas of which only the
//! centered 72x72 region is guaranteed to survive the platform mask, so every
//! filter derives its drawable area from [`Viewport`] instead of the raw
//! canvas size.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Fraction of an adaptive icon's canvas that is guaranteed to be visible.
pub const ADAPTIVE_SCALE: f32 = 72.0 / 108.0;

/// A rectangle defined in pixel coordinates.
///
/// Coordinates are signed because ribbons may be anchored relative to the
/// canvas edges and then rotated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RectPx {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl RectPx {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns the bottom edge coordinate (y + height).
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    pub fn center_x(&self) -> f32 {
        self.x as f32 + self.width as f32 / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y as f32 + self.height as f32 / 2.0
    }
}

/// A 2D size in pixel units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SizePx {
    pub width: u32,
    pub height: u32,
}

impl SizePx {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// The visible drawing area of an icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    /// Computes the viewport of a `canvas`-sized icon.
    pub fn of(canvas: SizePx, adaptive: bool) -> Self {
        Self {
            width: viewport_width(canvas.width, adaptive),
            height: viewport_height(canvas.height, adaptive),
        }
    }
}

/// Width of the visible area: the full width for legacy icons, the inner
/// 72/108 for adaptive ones.
pub fn viewport_width(canvas_width: u32, adaptive: bool) -> u32 {
    inset(canvas_width, adaptive)
}

/// Height of the visible area, see [`viewport_width`].
pub fn viewport_height(canvas_height: u32, adaptive: bool) -> u32 {
    inset(canvas_height, adaptive)
}

fn inset(length: u32, adaptive: bool) -> u32 {
    let scale = if adaptive { ADAPTIVE_SCALE } else { 1.0 };
    (length as f32 * scale).round() as u32
}

/// A declared drawable dimension such as `108dp` or `108.0dp`.
///
/// The unit suffix (`dp`, `dip`, `px`, `sp`) is accepted and ignored; the
/// density pipeline multiplies the bare value by each density factor.
/// Serialized as a number; deserialized from a number or a string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDimension", into = "f32")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "jsonschema", schemars(with = "String"))]
pub struct Dimension(pub f32);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDimension {
    Number(f32),
    Text(String),
}

impl Dimension {
    pub fn value(&self) -> f32 {
        self.0
    }

    fn positive(value: f32, raw: &str) -> Result<Self, Error> {
        if value.is_finite() && value > 0.0 {
            Ok(Dimension(value))
        } else {
            Err(Error::InvalidProperty {
                key: "dimension",
                reason: format!("`{raw}` is not a positive size"),
            })
        }
    }
}

impl FromStr for Dimension {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let number = ["dip", "dp", "px", "sp"]
            .iter()
            .find_map(|unit| trimmed.strip_suffix(unit))
            .unwrap_or(trimmed);
        let value = number.trim().parse::<f32>().unwrap_or(f32::NAN);
        Dimension::positive(value, s)
    }
}

impl TryFrom<RawDimension> for Dimension {
    type Error = Error;

    fn try_from(raw: RawDimension) -> Result<Self, Self::Error> {
        match raw {
            RawDimension::Number(value) => Dimension::positive(value, &value.to_string()),
            RawDimension::Text(text) => text.parse(),
        }
    }
}

impl From<Dimension> for f32 {
    fn from(dimension: Dimension) -> Self {
        dimension.0
    }
}

/// Declared logical size of an adaptive icon, as read from its description.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdaptiveSize {
    pub width: Dimension,
    pub height: Dimension,
}

impl AdaptiveSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width: Dimension(width),
            height: Dimension(height),
        }
    }

    /// Pixel size of this icon at a density `multiplier`.
    pub fn at_density(&self, multiplier: f32) -> SizePx {
        SizePx::new(
            (self.width.value() * multiplier).round() as u32,
            (self.height.value() * multiplier).round() as u32,
        )
    }
}
