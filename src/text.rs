//! Label fonts, measurement and font-size fitting.
//!
//! Text is laid out and rasterized by `usvg`/`resvg`: a label becomes a tiny
//! SVG `<text>` document rendered against a font database. A [`Typeface`]
//! owns that database plus the concrete family name labels are drawn with.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{debug, warn};
use once_cell::sync::Lazy;
use resvg::tiny_skia::{Mask, Transform};
use resvg::usvg::{self, fontdb};
use serde::{Deserialize, Serialize};

use crate::canvas::Canvas;
use crate::color::Color;

/// Fonts installed on the host, loaded once per process.
static SYSTEM_FONTS: Lazy<Arc<fontdb::Database>> = Lazy::new(|| {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    debug!("loaded {} system font faces", db.len());
    Arc::new(db)
});

// ============================================================================
// FontSpec
// ============================================================================

/// Which font a label should be drawn with.
///
/// A font `file` wins over a `family` name, but only if the file exists when
/// the filter is built. Otherwise the family is looked up among the system
/// fonts, falling back to a default sans-serif face.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct FontSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub family: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

impl FontSpec {
    pub fn family(name: impl Into<String>) -> Self {
        Self {
            family: Some(name.into()),
            file: None,
        }
    }

    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self {
            family: None,
            file: Some(path.into()),
        }
    }

    /// Loads the font this spec points at.
    ///
    /// Never fails: an absent or unreadable font file falls back to the
    /// family lookup.
    pub fn resolve(&self) -> Typeface {
        if let Some(path) = self.file.as_deref().filter(|path| path.exists()) {
            match Typeface::from_file(path) {
                Some(typeface) => return typeface,
                None => warn!(
                    "font file {} could not be loaded, using family lookup",
                    path.display()
                ),
            }
        }
        Typeface::system(self.family.as_deref())
    }
}

// ============================================================================
// Measurement
// ============================================================================

/// Bounding box of a rendered string, relative to its baseline origin.
///
/// `y` is usually negative since glyphs extend above the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextBounds {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl TextBounds {
    pub fn center_x(&self) -> f32 {
        self.x + self.width / 2.0
    }

    pub fn center_y(&self) -> f32 {
        self.y + self.height / 2.0
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Anything able to report the bounds of a string at a pixel size.
pub trait TextMeasure {
    fn measure(&self, text: &str, size: f32) -> TextBounds;
}

/// The box a label must fit in when its size is chosen automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FitBox {
    pub max_width: u32,
    /// `None` constrains the width only.
    pub max_height: Option<u32>,
}

impl FitBox {
    pub fn accepts(&self, bounds: &TextBounds) -> bool {
        bounds.width < self.max_width as f32
            && self
                .max_height
                .is_none_or(|max_height| bounds.height < max_height as f32)
    }
}

/// Finds the largest size in `[0, ceiling]` satisfying `fits`.
///
/// `fits` must be monotonic (true up to some size, false above it). Returns 0
/// when nothing in range fits.
pub fn fit_font_size(ceiling: u32, fits: impl Fn(u32) -> bool) -> u32 {
    let (mut low, mut high) = (0u32, ceiling);
    while low < high {
        let mid = low + (high - low).div_ceil(2);
        if fits(mid) {
            low = mid;
        } else {
            high = mid - 1;
        }
    }
    low
}

/// Resolves the pixel size a label is drawn at.
///
/// With a `ratio` the size is `round(viewport_height * ratio)` and no fitting
/// happens. Without one, the largest size up to `ceiling` whose bounds fit in
/// `fit_box` is used.
pub fn resolve_font_size(
    measure: &impl TextMeasure,
    text: &str,
    ratio: Option<f32>,
    viewport_height: u32,
    ceiling: u32,
    fit_box: FitBox,
) -> u32 {
    if let Some(ratio) = ratio {
        return (viewport_height as f32 * ratio).round() as u32;
    }
    fit_font_size(ceiling, |size| {
        fit_box.accepts(&measure.measure(text, size as f32))
    })
}

// ============================================================================
// Typeface
// ============================================================================

/// A font database plus the family labels are drawn in.
#[derive(Clone)]
pub struct Typeface {
    db: Arc<fontdb::Database>,
    family: String,
}

impl std::fmt::Debug for Typeface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Typeface")
            .field("family", &self.family)
            .field("faces", &self.db.len())
            .finish()
    }
}

impl Typeface {
    /// Looks `family` up among the system fonts.
    pub fn system(family: Option<&str>) -> Self {
        let db = SYSTEM_FONTS.clone();
        let family = resolve_family(&db, family);
        Self { db, family }
    }

    /// Loads a single font file. Returns `None` if it holds no usable face.
    pub fn from_file(path: &Path) -> Option<Self> {
        let mut db = fontdb::Database::new();
        if let Err(err) = db.load_font_file(path) {
            warn!("cannot read font file {}: {err}", path.display());
            return None;
        }
        let family = db
            .faces()
            .find_map(|face| face.families.first().map(|(name, _)| name.clone()))?;
        Some(Self {
            db: Arc::new(db),
            family,
        })
    }

    /// The family name labels will be rendered with.
    pub fn family_name(&self) -> &str {
        &self.family
    }

    /// Whether any face is available to render glyphs with.
    pub fn has_faces(&self) -> bool {
        !self.db.is_empty()
    }

    /// Draws `text` with its baseline origin at `origin` inside the frame
    /// described by `frame`. When `clip` is given, the label only lands on
    /// pixels covered by the mask.
    #[allow(clippy::too_many_arguments)]
    pub fn draw(
        &self,
        canvas: &mut Canvas,
        text: &str,
        size: u32,
        color: Color,
        origin: (f32, f32),
        frame: Transform,
        clip: Option<&Mask>,
    ) {
        let Some(tree) = self.layout(text, size as f32, color) else {
            return;
        };
        let Ok(mut layer) = Canvas::new(canvas.width(), canvas.height()) else {
            return;
        };
        let transform = frame.pre_translate(origin.0, origin.1);
        resvg::render(&tree, transform, &mut layer.pixmap_mut().as_mut());
        canvas.draw_layer(&layer, clip);
    }

    fn layout(&self, text: &str, size: f32, color: Color) -> Option<usvg::Tree> {
        if text.is_empty() || size <= 0.0 {
            return None;
        }

        let svg = format!(
            r##"<svg xmlns="http://www.w3.org/2000/svg" width="1" height="1"><text x="0" y="0" xml:space="preserve" font-family="{family}" font-size="{size}" fill="#{r:02x}{g:02x}{b:02x}" fill-opacity="{opacity}">{text}</text></svg>"##,
            family = quick_xml::escape::escape(self.family.as_str()),
            text = quick_xml::escape::escape(text),
            r = color.r,
            g = color.g,
            b = color.b,
            opacity = color.a as f32 / 255.0,
        );

        let mut options = usvg::Options::default();
        options.fontdb = self.db.clone();
        options.font_family = self.family.clone();

        usvg::Tree::from_str(&svg, &options).ok()
    }
}

impl TextMeasure for Typeface {
    fn measure(&self, text: &str, size: f32) -> TextBounds {
        let Some(tree) = self.layout(text, size, Color::WHITE) else {
            return TextBounds::default();
        };
        let root = tree.root();
        if !root.has_children() {
            return TextBounds::default();
        }
        let bbox = root.abs_bounding_box();
        TextBounds {
            x: bbox.x(),
            y: bbox.y(),
            width: bbox.width(),
            height: bbox.height(),
        }
    }
}

fn resolve_family(db: &fontdb::Database, requested: Option<&str>) -> String {
    let has_family = |family: fontdb::Family<'_>| {
        let families = [family];
        db.query(&fontdb::Query {
            families: &families,
            ..fontdb::Query::default()
        })
        .is_some()
    };

    if let Some(name) = requested {
        if has_family(fontdb::Family::Name(name)) {
            return name.to_string();
        }
        warn!("font family `{name}` not found, using the default sans-serif face");
    }
    if has_family(fontdb::Family::SansSerif) {
        return db.family_name(&fontdb::Family::SansSerif).to_string();
    }
    if let Some(name) = FALLBACK_SANS_FAMILIES
        .into_iter()
        .find(|&name| has_family(fontdb::Family::Name(name)))
    {
        return name.to_string();
    }

    let regular = || db.faces().filter(|face| face.style == fontdb::Style::Normal);
    let first_family =
        |face: &fontdb::FaceInfo| face.families.first().map(|(name, _)| name.clone());
    regular()
        .filter_map(first_family)
        .find(|name| is_plain_sans(name))
        .or_else(|| regular().chain(db.faces()).find_map(first_family))
        .unwrap_or_else(|| requested.unwrap_or("sans-serif").to_string())
}

/// Sans-serif families tried when the generic family is not installed.
const FALLBACK_SANS_FAMILIES: [&str; 6] = [
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Helvetica",
    "Arial",
    "Segoe UI",
];

fn is_plain_sans(family: &str) -> bool {
    family.contains("Sans") && !family.contains("Mono")
}
