//! Browser-chrome style band with a label.

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
use crate::text::{resolve_font_size, FitBox, FontSpec, TextMeasure, Typeface};

const DEFAULT_OVERLAY_RATIO: f32 = 0.4;

// ============================================================================
// ChromeGravity
// ============================================================================

/// Edge the band is anchored to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum ChromeGravity {
    Top,
    #[default]
    Bottom,
}

impl Token for ChromeGravity {
    const KIND: &'static str = "gravity";
    const ALL: &'static [Self] = &[ChromeGravity::Top, ChromeGravity::Bottom];

    fn name(self) -> &'static str {
        match self {
            ChromeGravity::Top => "TOP",
            ChromeGravity::Bottom => "BOTTOM",
        }
    }
}

// ============================================================================
// ChromeLikeConfig
// ============================================================================

/// Configuration for [`ChromeLikeFilter`].
///
/// Unset fields fall back to: dark gray ribbon, white label, no label
/// padding, a band 0.4 of the viewport tall, bottom gravity, automatic text
/// size and adaptive padding enabled.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct ChromeLikeConfig {
    pub label: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ribbon_color: Option<Color>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_color: Option<Color>,

    /// Fixed distance in pixels between the band edge and the label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label_padding: Option<i32>,

    /// Band height as a fraction of the viewport height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overlay_height: Option<f32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gravity: Option<ChromeGravity>,

    /// Label size as a fraction of the viewport height; disables fitting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text_size_ratio: Option<f32>,

    #[serde(default)]
    pub font: FontSpec,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adaptive_padding: Option<bool>,
}

impl ChromeLikeConfig {
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

    pub fn with_gravity(mut self, gravity: ChromeGravity) -> Self {
        self.gravity = Some(gravity);
        self
    }

    pub fn with_overlay_height(mut self, ratio: f32) -> Self {
        self.overlay_height = Some(ratio);
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

    pub fn with_adaptive_padding(mut self, enabled: bool) -> Self {
        self.adaptive_padding = Some(enabled);
        self
    }

    /// Parses a property bag.
    ///
    /// Recognized keys: `label`/`name`, `ribbonColor`, `labelColor`,
    /// `labelPadding`, `overlayHeight`, `gravity`/`position`,
    /// `textSizeRatio`, `font`/`fontName` and `adaptivePadding`.
    pub fn from_properties(properties: &Map<String, Value>, default_label: &str) -> Result<Self> {
        let props = Properties::new(properties);
        Ok(Self {
            label: props
                .string(&["label", "name"])
                .unwrap_or_else(|| default_label.to_string()),
            ribbon_color: props.color("ribbonColor")?,
            label_color: props.color("labelColor")?,
            label_padding: props.integer("labelPadding"),
            overlay_height: props.float("overlayHeight"),
            gravity: props.token(&["gravity", "position"])?,
            text_size_ratio: props.float("textSizeRatio"),
            font: props.font()?,
            adaptive_padding: props.boolean("adaptivePadding"),
        })
    }
}

// ============================================================================
// ChromeLikeFilter
// ============================================================================

/// Geometry of one application of [`ChromeLikeFilter`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChromeLayout {
    /// Full-width band, including the part hidden under the adaptive inset.
    pub band: RectPx,
    pub font_size: u32,
}

/// Paints a full-width band across the top or bottom of the icon and
/// centers a label in it.
///
/// On legacy icons the band replaces the pixels beneath it, alpha included,
/// so transparent corners turn into solid ribbon. On adaptive icons it is
/// composited normally.
#[derive(Debug, Clone)]
pub struct ChromeLikeFilter {
    config: ChromeLikeConfig,
    typeface: Typeface,
}

impl ChromeLikeFilter {
    /// Creates the filter, loading its font.
    pub fn new(config: ChromeLikeConfig) -> Self {
        let typeface = config.font.resolve();
        Self { config, typeface }
    }

    pub fn config(&self) -> &ChromeLikeConfig {
        &self.config
    }

    fn gravity(&self) -> ChromeGravity {
        self.config.gravity.unwrap_or_default()
    }

    /// Computes the band and label size for a canvas of `size`.
    pub fn layout(&self, size: SizePx, adaptive: bool, measure: &impl TextMeasure) -> ChromeLayout {
        let viewport = Viewport::of(size, adaptive);
        let vertical_padding = ((size.height - viewport.height) as f32 / 2.0).round() as u32;

        let overlay_ratio = self.config.overlay_height.unwrap_or(DEFAULT_OVERLAY_RATIO);
        let overlay_height = (viewport.height as f32 * overlay_ratio).round() as u32;
        let band_height = overlay_height + vertical_padding;
        let band = match self.gravity() {
            ChromeGravity::Top => RectPx::new(0, 0, size.width, band_height),
            ChromeGravity::Bottom => RectPx::new(
                0,
                size.height as i32 - band_height as i32,
                size.width,
                band_height,
            ),
        };

        let extra_padding = if self.config.adaptive_padding.unwrap_or(true) && adaptive {
            viewport.height as f32 / 10.0
        } else {
            0.0
        };
        let fit_box = FitBox {
            max_width: (viewport.width as f32 - extra_padding).round() as u32,
            max_height: Some((band_height as f32 - extra_padding).round() as u32),
        };
        let font_size = resolve_font_size(
            measure,
            &self.config.label,
            self.config.text_size_ratio,
            viewport.height,
            viewport.height,
            fit_box,
        );

        ChromeLayout { band, font_size }
    }

    /// Fills the band only, without the label.
    pub fn fill_band(&self, canvas: &mut Canvas, layout: &ChromeLayout, adaptive: bool) {
        let mode = if adaptive { FillMode::Over } else { FillMode::Replace };
        let color = self.config.ribbon_color.unwrap_or(Color::DARK_GRAY);
        canvas.fill_rect(layout.band, color, mode, Transform::identity());
    }
}

impl FilterEffect for ChromeLikeFilter {
    fn apply(&self, canvas: &mut Canvas, adaptive: bool) {
        let layout = self.layout(canvas.size(), adaptive, &self.typeface);
        self.fill_band(canvas, &layout, adaptive);

        debug!(
            "chrome-like label `{}` at {}px in a {}px band",
            self.config.label, layout.font_size, layout.band.height
        );
        if layout.font_size == 0 {
            return;
        }

        let label = &self.config.label;
        let bounds = self.typeface.measure(label, layout.font_size as f32);
        let padding = self.config.label_padding.unwrap_or(0) as f32;
        let band = layout.band;
        let x = band.center_x() - bounds.center_x();
        // The label hugs the band edge facing the icon center.
        let y = match self.gravity() {
            ChromeGravity::Top => band.bottom() as f32 - padding - bounds.bottom(),
            ChromeGravity::Bottom => band.y as f32 + padding - bounds.y,
        };

        self.typeface.draw(
            canvas,
            label,
            layout.font_size,
            self.config.label_color.unwrap_or(Color::WHITE),
            (x, y),
            Transform::identity(),
            None,
        );
    }
}
