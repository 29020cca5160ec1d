//! easylauncher: launcher icon decoration for build variants
//!
//! This crate draws ribbons, labels and overlay images over application
//! icons so debug and staging builds are easy to tell apart on a device.
//! Flat (legacy) icons are decorated in place; adaptive icons get one
//! transparent overlay per filter at every screen density plus a layer list
//! stacking them over the untouched original.
//!
//! # Example
//!
//! ```no_run
//! use easylauncher::{
//!     AdaptiveSize, ChromeLikeConfig, ColorRibbonConfig, IconGenerator, RibbonGravity,
//! };
//!
//! let generator = IconGenerator::new(vec![
//!     ColorRibbonConfig::new("beta")
//!         .with_gravity(RibbonGravity::TopRight)
//!         .into(),
//!     ChromeLikeConfig::new("beta").into(),
//! ])
//! .with_min_sdk_version(21);
//!
//! // Decorate a raster icon.
//! generator.transform_raster(
//!     "res/mipmap-xhdpi/ic_launcher.png".as_ref(),
//!     "build/res/mipmap-xhdpi/ic_launcher.png".as_ref(),
//!     false,
//! )?;
//!
//! // Layer an adaptive icon.
//! let output = generator.transform_adaptive(
//!     "res/mipmap/ic_launcher.xml".as_ref(),
//!     "build/res/mipmap/ic_launcher.xml".as_ref(),
//!     AdaptiveSize::new(108.0, 108.0),
//! )?;
//! assert_eq!(output.manifest.len(), 3);
//! # Ok::<(), easylauncher::Error>(())
//! ```
//!
//! # Property Bags
//!
//! Build scripts usually describe filters as loosely-typed maps. Those are
//! turned into typed configs once, failing on unknown values:
//!
//! ```
//! use easylauncher::FilterKind;
//! use serde_json::json;
//!
//! let props = json!({ "ribbonColor": "#99FF0000", "position": "TOPLEFT" });
//! let filter = FilterKind::ColorRibbon
//!     .from_properties(props.as_object().unwrap(), "debug")
//!     .unwrap();
//! assert_eq!(filter.identifier(0), "colorribbonfilter_0");
//!
//! let props = json!({ "gravity": "LEFT" });
//! assert!(FilterKind::ChromeLike.from_properties(props.as_object().unwrap(), "debug").is_err());
//! ```

mod canvas;
mod color;
pub mod density;
mod error;
pub mod filter;
mod generator;
mod icon;
mod manifest;
mod profile;
mod properties;
mod text;

pub use canvas::{Canvas, FillMode};
pub use color::Color;
pub use density::{Density, ANDROID_OREO, DENSITIES};
pub use error::{Error, Result};
pub use filter::{
    ChromeGravity, ChromeLikeConfig, ChromeLikeFilter, ColorRibbonConfig, ColorRibbonFilter,
    DrawingOption, Filter, FilterEffect, FilterKind, OverlayConfig, OverlayFilter, RibbonGravity,
    RibbonPreset,
};
pub use generator::{AdaptiveOutput, IconGenerator, IconJob, IconOutput};
pub use icon::{AdaptiveSize, Dimension, RectPx, SizePx, Viewport};
pub use manifest::LayerManifest;
pub use profile::{FilterProperties, GenerationProfile, IconEntry};
pub use text::{FitBox, FontSpec, TextBounds, TextMeasure, Typeface};
