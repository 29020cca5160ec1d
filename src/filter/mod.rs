//! Icon filters.
//!
//! A filter mutates a [`Canvas`] in place. Three kinds exist and they are
//! modelled as a closed sum type, [`Filter`], so every place that
//! dispatches over filters is checked for exhaustiveness:
//!
//! - [`ChromeLikeFilter`]: a full-width band at the top or bottom with a label
//! - [`ColorRibbonFilter`]: a horizontal or diagonal corner ribbon with a label
//! - [`OverlayFilter`]: another image drawn centered on top of the icon
//!
//! Configs keep every optional setting as an `Option` and resolve defaults
//! only when the filter is applied.

pub mod chrome_like;
pub mod color_ribbon;
pub mod overlay;

pub use chrome_like::{ChromeGravity, ChromeLikeConfig, ChromeLikeFilter};
pub use color_ribbon::{ColorRibbonConfig, ColorRibbonFilter, DrawingOption, RibbonGravity, RibbonPreset};
pub use overlay::{OverlayConfig, OverlayFilter};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::canvas::Canvas;
use crate::error::Result;

/// Something that decorates a canvas.
pub trait FilterEffect {
    /// Draws this filter onto `canvas`. `adaptive` selects the inset
    /// viewport of adaptive icons.
    fn apply(&self, canvas: &mut Canvas, adaptive: bool);
}

/// The kind of a filter, as named in configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub enum FilterKind {
    ChromeLike,
    ColorRibbon,
    Overlay,
}

impl FilterKind {
    /// Lowercase type name used to derive generated resource names.
    pub fn type_name(self) -> &'static str {
        match self {
            FilterKind::ChromeLike => "chromelikefilter",
            FilterKind::ColorRibbon => "colorribbonfilter",
            FilterKind::Overlay => "overlayfilter",
        }
    }

    /// Builds a filter of this kind from a property bag.
    ///
    /// `default_label` is used by the labelled filters when the bag has no
    /// `label`/`name`; it is normally the build variant name.
    pub fn from_properties(self, properties: &Map<String, Value>, default_label: &str) -> Result<Filter> {
        Ok(match self {
            FilterKind::ChromeLike => ChromeLikeConfig::from_properties(properties, default_label)?.into(),
            FilterKind::ColorRibbon => ColorRibbonConfig::from_properties(properties, default_label)?.into(),
            FilterKind::Overlay => OverlayConfig::from_properties(properties)?.into(),
        })
    }
}

/// A configured filter, ready to be applied.
#[derive(Debug, Clone)]
pub enum Filter {
    ChromeLike(ChromeLikeFilter),
    ColorRibbon(ColorRibbonFilter),
    Overlay(OverlayFilter),
}

impl Filter {
    pub fn kind(&self) -> FilterKind {
        match self {
            Filter::ChromeLike(_) => FilterKind::ChromeLike,
            Filter::ColorRibbon(_) => FilterKind::ColorRibbon,
            Filter::Overlay(_) => FilterKind::Overlay,
        }
    }

    /// Stable identifier of the filter at `index` in a variant's list,
    /// e.g. `colorribbonfilter_0`.
    pub fn identifier(&self, index: usize) -> String {
        format!("{}_{index}", self.kind().type_name())
    }
}

impl FilterEffect for Filter {
    fn apply(&self, canvas: &mut Canvas, adaptive: bool) {
        match self {
            Filter::ChromeLike(filter) => filter.apply(canvas, adaptive),
            Filter::ColorRibbon(filter) => filter.apply(canvas, adaptive),
            Filter::Overlay(filter) => filter.apply(canvas, adaptive),
        }
    }
}

impl From<ChromeLikeConfig> for Filter {
    fn from(config: ChromeLikeConfig) -> Self {
        Filter::ChromeLike(ChromeLikeFilter::new(config))
    }
}

impl From<ColorRibbonConfig> for Filter {
    fn from(config: ColorRibbonConfig) -> Self {
        Filter::ColorRibbon(ColorRibbonFilter::new(config))
    }
}

impl From<OverlayConfig> for Filter {
    fn from(config: OverlayConfig) -> Self {
        Filter::Overlay(OverlayFilter::new(config))
    }
}
