//! Colored ribbon with a label, either horizontal or across a corner.

use std::collections::BTreeSet;
use std::f32::consts::SQRT_2;

use log::debug;
use resvg::tiny_skia::Transform;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::FilterEffect;
use crate::canvas::{Canvas, FillMode};
use crate::color::Color;
use crate::error::Result;
use crate::icon::{RectPx, SizePx, Viewport};
use crate::properties::{Properties, Token};
use crate::text::{resolve_font_size, FitBox, FontSpec, TextBounds, TextMeasure, Typeface};

const DEFAULT_RIBBON_COLOR: Color = Color::new(0, 0x72, 0, 0x99);

// ============================================================================
// Enumerations
// ============================================================================

/// Where the ribbon is drawn.
///
/// `TopLeft` and `TopRight` rotate the drawing frame by 45 degrees about the
/// canvas center, turning the top band into a diagonal corner ribbon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum RibbonGravity {
    Top,
    Bottom,
    #[default]
    TopLeft,
    TopRight,
}

impl RibbonGravity {
    /// Rotation of the drawing frame in degrees.
    fn rotation(self) -> Option<f32> {
        match self {
            RibbonGravity::Top | RibbonGravity::Bottom => None,
            RibbonGravity::TopLeft => Some(-45.0),
            RibbonGravity::TopRight => Some(45.0),
        }
    }
}

impl Token for RibbonGravity {
    const KIND: &'static str = "gravity";
    const ALL: &'static [Self] = &[
        RibbonGravity::Top,
        RibbonGravity::Bottom,
        RibbonGravity::TopLeft,
        RibbonGravity::TopRight,
    ];

    fn name(self) -> &'static str {
        match self {
            RibbonGravity::Top => "TOP",
            RibbonGravity::Bottom => "BOTTOM",
            RibbonGravity::TopLeft => "TOPLEFT",
            RibbonGravity::TopRight => "TOPRIGHT",
        }
    }
}

/// Optional tweaks to how the ribbon is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum DrawingOption {
    /// Keep the ribbon off transparent pixels of legacy icons.
    IgnoreTransparentPixels,
    /// Push the ribbon inwards by a tenth of the viewport, as adaptive
    /// padding does.
    AddExtraPadding,
}

impl Token for DrawingOption {
    const KIND: &'static str = "option";
    const ALL: &'static [Self] = &[DrawingOption::IgnoreTransparentPixels, DrawingOption::AddExtraPadding];

    fn name(self) -> &'static str {
        match self {
            DrawingOption::IgnoreTransparentPixels => "IGNORE_TRANSPARENT_PIXELS",
            DrawingOption::AddExtraPadding => "ADD_EXTRA_PADDING",
        }
    }

    /// Underscores are optional, so `ignoreTransparentPixels` matches too.
    fn matches(self, raw: &str) -> bool {
        let strip = |s: &str| s.replace('_', "");
        strip(raw).eq_ignore_ascii_case(&strip(self.name()))
    }
}

/// Ready-made translucent ribbon colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum RibbonPreset {
    Gray,
    Green,
    Orange,
    Yellow,
    Red,
    Blue,
}

impl RibbonPreset {
    pub fn color(self) -> Color {
        match self {
            RibbonPreset::Gray => Color::new(0x60, 0x60, 0x60, 0x99),
            RibbonPreset::Green => Color::new(0, 0x72, 0, 0x99),
            RibbonPreset::Orange => Color::new(0xff, 0x76, 0, 0x99),
            RibbonPreset::Yellow => Color::new(0xff, 0xfb, 0, 0x99),
            RibbonPreset::Red => Color::new(0xff, 0, 0, 0x99),
            RibbonPreset::Blue => Color::new(0, 0, 0xff, 0x99),
        }
    }

    /// A ribbon config in this preset's color.
    pub fn config(self, label: impl Into<String>) -> ColorRibbonConfig {
        ColorRibbonConfig::new(label).with_ribbon_color(self.color())
    }
}

// ============================================================================
// ColorRibbonConfig
// ============================================================================

/// Configuration for [`ColorRibbonFilter`].
///
/// Unset fields fall back to: translucent green ribbon, white label,
/// top-left gravity, automatic text size and adaptive padding enabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ColorRibbonConfig {
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ribbon_color: Option<Color>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_color: Option<Color>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity: Option<RibbonGravity>,

    /// Label size as a fraction of the viewport height; disables fitting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_size_ratio: Option<f32>,

    #[serde(default)]
    pub font: FontSpec,

    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub drawing_options: BTreeSet<DrawingOption>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adaptive_padding: Option<bool>,
}

impl ColorRibbonConfig {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_ribbon_color(mut self, color: Color) -> Self {
        self.ribbon_color = Some(color);
        self
    }

    pub fn with_label_color(mut self, color: Color) -> Self {
        self.label_color = Some(color);
        self
    }

    pub fn with_gravity(mut self, gravity: RibbonGravity) -> Self {
        self.gravity = Some(gravity);
        self
    }

    pub fn with_text_size_ratio(mut self, ratio: f32) -> Self {
        self.text_size_ratio = Some(ratio);
        self
    }

    pub fn with_font(mut self, font: FontSpec) -> Self {
        self.font = font;
        self
    }

    pub fn with_option(mut self, option: DrawingOption) -> Self {
        self.drawing_options.insert(option);
        self
    }

    pub fn with_adaptive_padding(mut self, enabled: bool) -> Self {
        self.adaptive_padding = Some(enabled);
        self
    }

    /// Parses a property bag.
    ///
    /// Recognized keys: `label`/`name`, `ribbonColor`, `labelColor`,
    /// `position`/`gravity`, `textSizeRatio`, `font`/`fontName`,
    /// `drawingOptions` and `adaptivePadding`.
    pub fn from_properties(properties: &Map<String, Value>, default_label: &str) -> Result<Self> {
        let props = Properties::new(properties);
        Ok(Self {
            label: props
                .string(&["label", "name"])
                .unwrap_or_else(|| default_label.to_string()),
            ribbon_color: props.color("ribbonColor")?,
            label_color: props.color("labelColor")?,
            gravity: props.token(&["position", "gravity"])?,
            text_size_ratio: props.float("textSizeRatio"),
            font: props.font()?,
            drawing_options: props.tokens("drawingOptions")?.into_iter().collect(),
            adaptive_padding: props.boolean("adaptivePadding"),
        })
    }

    fn has_option(&self, option: DrawingOption) -> bool {
        self.drawing_options.contains(&option)
    }
}

// ============================================================================
// ColorRibbonFilter
// ============================================================================

/// Geometry of one application of [`ColorRibbonFilter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RibbonLayout {
    /// Drawing frame: identity, or a rotation about the canvas center.
    pub frame: Transform,
    /// Ribbon rectangle in the drawing frame.
    pub band: RectPx,
    pub font_size: u32,
    /// Label bounds at `font_size`, relative to the baseline origin.
    pub text: TextBounds,
}

/// Draws a ribbon with a centered label, either as a horizontal band or as a
/// diagonal strip across the top-left or top-right corner.
#[derive(Debug, Clone)]
pub struct ColorRibbonFilter {
    config: ColorRibbonConfig,
    typeface: Typeface,
}

impl ColorRibbonFilter {
    /// Creates the filter, loading its font.
    pub fn new(config: ColorRibbonConfig) -> Self {
        let typeface = config.font.resolve();
        Self { config, typeface }
    }

    pub fn config(&self) -> &ColorRibbonConfig {
        &self.config
    }

    /// Computes the frame, ribbon and label size for a canvas of `size`.
    pub fn layout(&self, size: SizePx, adaptive: bool, measure: &impl TextMeasure) -> RibbonLayout {
        let gravity = self.config.gravity.unwrap_or_default();
        let viewport = Viewport::of(size, adaptive);
        let adaptive_padding = self.config.adaptive_padding.unwrap_or(true);
        let extra_padding =
            if (adaptive_padding && adaptive) || self.config.has_option(DrawingOption::AddExtraPadding) {
                viewport.height as f32 / 10.0
            } else {
                0.0
            };
        let vertical_padding =
            ((size.height - viewport.height) as f32 / 2.0 + extra_padding).round() as i32;

        let frame = match gravity.rotation() {
            Some(degrees) => {
                Transform::from_rotate_at(degrees, size.width as f32 / 2.0, size.height as f32 / 2.0)
            }
            None => Transform::identity(),
        };

        let max_label_width = (viewport.width as f32 * SQRT_2).round() as u32;
        let max_label_height = (viewport.height as f32 / 6.0).round() as u32;
        let font_size = resolve_font_size(
            measure,
            &self.config.label,
            self.config.text_size_ratio,
            viewport.height,
            max_label_height,
            FitBox {
                max_width: max_label_width,
                max_height: None,
            },
        );

        let text = measure.measure(&self.config.label, font_size as f32);
        let text_padding = text.height / 10.0;
        let label_height = (text.height + text_padding * 2.0).round() as u32;

        let band = match gravity {
            RibbonGravity::Top | RibbonGravity::TopLeft | RibbonGravity::TopRight => {
                RectPx::new(0, vertical_padding, size.width, label_height)
            }
            RibbonGravity::Bottom => RectPx::new(
                0,
                size.height as i32 - label_height as i32 - vertical_padding,
                size.width,
                label_height,
            ),
        };

        RibbonLayout {
            frame,
            band,
            font_size,
            text,
        }
    }

    fn clips_to_icon(&self, adaptive: bool) -> bool {
        self.config.has_option(DrawingOption::IgnoreTransparentPixels) && !adaptive
    }

    /// Fills the ribbon only, without the label.
    pub fn fill_ribbon(&self, canvas: &mut Canvas, layout: &RibbonLayout, adaptive: bool) {
        let mode = if self.clips_to_icon(adaptive) {
            FillMode::InsideOpaque
        } else {
            FillMode::Over
        };
        let color = self.config.ribbon_color.unwrap_or(DEFAULT_RIBBON_COLOR);
        canvas.fill_rect(layout.band, color, mode, layout.frame);
    }
}

impl FilterEffect for ColorRibbonFilter {
    fn apply(&self, canvas: &mut Canvas, adaptive: bool) {
        let layout = self.layout(canvas.size(), adaptive, &self.typeface);
        let clip = self.clips_to_icon(adaptive).then(|| canvas.alpha_mask());

        self.fill_ribbon(canvas, &layout, adaptive);

        debug!(
            "ribbon label `{}` at {}px in a {}px band",
            self.config.label, layout.font_size, layout.band.height
        );
        if layout.font_size == 0 {
            return;
        }

        let origin = (
            layout.band.center_x() - layout.text.center_x(),
            layout.band.center_y() - layout.text.center_y(),
        );
        self.typeface.draw(
            canvas,
            &self.config.label,
            layout.font_size,
            self.config.label_color.unwrap_or(Color::WHITE),
            origin,
            layout.frame,
            clip.as_ref(),
        );
    }
}
