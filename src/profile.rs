//! Serializable description of one variant's icon generation.
//!
//! A [`GenerationProfile`] is what a build script hands over: the variant
//! name, the platform baseline, an ordered list of filter property bags and
//! the icons to decorate. Resolving it validates every filter up front, so
//! configuration mistakes surface before anything is rendered.
//!
//! # Example
//!
//! ```
//! use easylauncher::GenerationProfile;
//!
//! let profile = GenerationProfile::from_json(r##"{
//!     "variant": "beta",
//!     "minSdkVersion": 21,
//!     "filters": [
//!         { "type": "colorRibbon", "ribbonColor": "#99FF7600", "position": "topRight" },
//!         { "type": "chromeLike", "gravity": "top" }
//!     ],
//!     "icons": [
//!         { "source": "res/mipmap/ic_launcher.xml", "output": "out/res/mipmap/ic_launcher.xml",
//!           "width": "108dp", "height": "108dp" },
//!         { "source": "res/mipmap-xhdpi/ic_launcher.png", "output": "out/res/mipmap-xhdpi/ic_launcher.png" }
//!     ]
//! }"##).unwrap();
//!
//! let (generator, jobs) = profile.resolve().unwrap();
//! assert_eq!(generator.filters().len(), 2);
//! assert_eq!(jobs.len(), 2);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::density::ANDROID_OREO;
use crate::error::{Error, Result};
use crate::filter::{Filter, FilterKind};
use crate::generator::{IconGenerator, IconJob};
use crate::icon::{AdaptiveSize, Dimension};

// ============================================================================
// Entries
// ============================================================================

/// One filter as configured: its kind plus a loosely-typed property bag.
///
/// ```json
/// { "type": "chromeLike", "label": "beta", "gravity": "TOP" }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct FilterProperties {
    #[serde(rename = "type")]
    pub kind: FilterKind,

    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl FilterProperties {
    pub fn new(kind: FilterKind) -> Self {
        Self {
            kind,
            properties: Map::new(),
        }
    }

    /// Adds one property.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Builds the filter, labelling it with `variant` unless a label is set.
    pub fn resolve(&self, variant: &str) -> Result<Filter> {
        self.kind.from_properties(&self.properties, variant)
    }
}

/// An icon to decorate.
///
/// Sources ending in `.xml` are adaptive icon descriptions and need a
/// declared `width` and `height`; anything else is decoded as a raster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct IconEntry {
    /// Name used in logs and errors. Defaults to the source file stem.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    pub source: PathBuf,

    pub output: PathBuf,

    /// For rasters only: draw within the adaptive viewport.
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub adaptive: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
}

impl IconEntry {
    pub fn new(source: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            name: None,
            source: source.into(),
            output: output.into(),
            adaptive: false,
            width: None,
            height: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_adaptive(mut self, adaptive: bool) -> Self {
        self.adaptive = adaptive;
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = Some(Dimension(width));
        self.height = Some(Dimension(height));
        self
    }

    fn is_description(&self) -> bool {
        self.source
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("xml"))
    }

    /// Turns this entry into a generator job.
    pub fn to_job(&self) -> Result<IconJob> {
        let name = self.name.clone().unwrap_or_else(|| {
            self.source
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_default()
        });

        if !self.is_description() {
            return Ok(IconJob::Raster {
                name,
                source: self.source.clone(),
                output: self.output.clone(),
                adaptive: self.adaptive,
            });
        }

        let width = self.width.ok_or(Error::MissingProperty("width"))?;
        let height = self.height.ok_or(Error::MissingProperty("height"))?;
        Ok(IconJob::Adaptive {
            name,
            source: self.source.clone(),
            output: self.output.clone(),
            size: AdaptiveSize { width, height },
        })
    }
}

// ============================================================================
// GenerationProfile
// ============================================================================

fn default_min_sdk_version() -> u32 {
    ANDROID_OREO
}

/// Everything needed to generate one variant's icons.
///
/// # JSON Format
///
/// ```json
/// {
///   "variant": "debug",
///   "minSdkVersion": 21,
///   "filters": [{ "type": "overlay", "file": "badge.png" }],
///   "icons": [{ "source": "ic.png", "output": "out/ic.png" }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct GenerationProfile {
    /// Build variant name; the default label of labelled filters.
    pub variant: String,

    #[serde(default = "default_min_sdk_version")]
    pub min_sdk_version: u32,

    #[serde(default)]
    pub filters: Vec<FilterProperties>,

    #[serde(default)]
    pub icons: Vec<IconEntry>,
}

impl GenerationProfile {
    /// Creates an empty profile for `variant`.
    pub fn new(variant: impl Into<String>) -> Self {
        Self {
            variant: variant.into(),
            min_sdk_version: ANDROID_OREO,
            filters: Vec::new(),
            icons: Vec::new(),
        }
    }

    pub fn with_min_sdk_version(mut self, version: u32) -> Self {
        self.min_sdk_version = version;
        self
    }

    pub fn with_filter(mut self, filter: FilterProperties) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn with_icon(mut self, icon: IconEntry) -> Self {
        self.icons.push(icon);
        self
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserializes a profile from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Reads a profile from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Builds every filter, in order, failing on the first invalid one.
    pub fn resolve_filters(&self) -> Result<Vec<Filter>> {
        self.filters
            .iter()
            .map(|filter| filter.resolve(&self.variant))
            .collect()
    }

    pub fn resolve_jobs(&self) -> Result<Vec<IconJob>> {
        self.icons.iter().map(IconEntry::to_job).collect()
    }

    /// A generator running this profile's filters.
    pub fn generator(&self) -> Result<IconGenerator> {
        Ok(IconGenerator::new(self.resolve_filters()?).with_min_sdk_version(self.min_sdk_version))
    }

    /// Validates the whole profile, returning the generator and its jobs.
    pub fn resolve(&self) -> Result<(IconGenerator, Vec<IconJob>)> {
        Ok((self.generator()?, self.resolve_jobs()?))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_serialization_roundtrip() {
        let profile = GenerationProfile::new("beta")
            .with_min_sdk_version(21)
            .with_filter(
                FilterProperties::new(FilterKind::ColorRibbon)
                    .with("ribbonColor", "#99FF0000")
                    .with("drawingOptions", vec!["ADD_EXTRA_PADDING"]),
            )
            .with_icon(IconEntry::new("res/mipmap/ic.xml", "out/mipmap/ic.xml").with_size(108.0, 108.0));

        let json = profile.to_json().unwrap();
        let restored = GenerationProfile::from_json(&json).unwrap();
        assert_eq!(restored, profile);
    }

    #[test]
    fn profile_json_format() {
        let profile = GenerationProfile::new("debug")
            .with_filter(FilterProperties::new(FilterKind::Overlay).with("file", "badge.png"));
        let json = profile.to_json_pretty().unwrap();

        assert!(json.contains("\"minSdkVersion\": 26"));
        assert!(json.contains("\"type\": \"overlay\""));
        assert!(json.contains("\"file\": \"badge.png\""));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let profile = GenerationProfile::from_json(r#"{ "variant": "debug" }"#).unwrap();
        assert_eq!(profile.min_sdk_version, ANDROID_OREO);
        assert!(profile.filters.is_empty());
        assert!(profile.icons.is_empty());
    }

    #[test]
    fn filters_resolve_in_order_with_variant_label() {
        let profile = GenerationProfile::from_json(
            r#"{
                "variant": "staging",
                "filters": [
                    { "type": "chromeLike" },
                    { "type": "colorRibbon", "label": "qa" },
                    { "type": "overlay", "file": "badge.png" }
                ]
            }"#,
        )
        .unwrap();

        let filters = profile.resolve_filters().unwrap();
        assert_eq!(
            filters.iter().map(Filter::kind).collect::<Vec<_>>(),
            [FilterKind::ChromeLike, FilterKind::ColorRibbon, FilterKind::Overlay]
        );
        match (&filters[0], &filters[1]) {
            (Filter::ChromeLike(chrome), Filter::ColorRibbon(ribbon)) => {
                assert_eq!(chrome.config().label, "staging");
                assert_eq!(ribbon.config().label, "qa");
            }
            other => panic!("unexpected filters {other:?}"),
        }
    }

    #[test]
    fn invalid_filter_fails_before_rendering() {
        let profile = GenerationProfile::new("debug").with_filter(
            FilterProperties::new(FilterKind::ChromeLike).with("gravity", "left"),
        );
        let err = profile.resolve().unwrap_err();
        assert_eq!(err.to_string(), "unknown gravity: left. Use one of [TOP, BOTTOM]");
    }

    #[test]
    fn unknown_filter_type_is_a_json_error() {
        let err = GenerationProfile::from_json(r#"{ "variant": "debug", "filters": [{ "type": "blur" }] }"#)
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[test]
    fn icons_become_jobs() {
        let profile = GenerationProfile::new("debug")
            .with_icon(IconEntry::new("res/mipmap-xhdpi/ic_launcher.png", "out/ic_launcher.png"))
            .with_icon(
                IconEntry::new("res/drawable/ic_launcher_foreground.png", "out/fg.png")
                    .with_name("foreground")
                    .with_adaptive(true),
            )
            .with_icon(IconEntry::new("res/mipmap/ic_launcher.XML", "out/ic_launcher.xml").with_size(108.0, 108.0));

        let jobs = profile.resolve_jobs().unwrap();
        assert_eq!(jobs[0].name(), "ic_launcher");
        assert!(matches!(jobs[0], IconJob::Raster { adaptive: false, .. }));
        assert_eq!(jobs[1].name(), "foreground");
        assert!(matches!(jobs[1], IconJob::Raster { adaptive: true, .. }));
        match &jobs[2] {
            IconJob::Adaptive { size, .. } => assert_eq!(*size, AdaptiveSize::new(108.0, 108.0)),
            other => panic!("unexpected job {other:?}"),
        }
    }

    #[test]
    fn descriptions_need_a_size() {
        let profile = GenerationProfile::from_json(
            r#"{ "variant": "debug", "icons": [{ "source": "ic.xml", "output": "out/ic.xml", "width": "108dp" }] }"#,
        )
        .unwrap();
        assert!(matches!(profile.resolve_jobs(), Err(Error::MissingProperty("height"))));
    }

    #[test]
    fn generator_carries_min_sdk_version() {
        let generator = GenerationProfile::new("debug")
            .with_min_sdk_version(23)
            .generator()
            .unwrap();
        assert_eq!(generator.min_sdk_version(), 23);
    }
}
