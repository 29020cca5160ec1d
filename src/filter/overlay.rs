//! Foreground image drawn centered over the icon.

use std::f32::consts::FRAC_1_SQRT_2;
use std::path::PathBuf;

use image::imageops::{self, FilterType};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::FilterEffect;
use crate::canvas::Canvas;
use crate::error::{Error, Result};
use crate::icon::{SizePx, Viewport};
use crate::properties::Properties;

// ============================================================================
// OverlayConfig
// ============================================================================

/// Configuration for [`OverlayFilter`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct OverlayConfig {
    /// Image drawn over the icon, any format the `image` crate decodes.
    pub file: PathBuf,

    /// Shrink the overlay into the adaptive mask circle. Defaults to `true`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adaptive_padding: Option<bool>,
}

impl OverlayConfig {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            adaptive_padding: None,
        }
    }

    pub fn with_adaptive_padding(mut self, enabled: bool) -> Self {
        self.adaptive_padding = Some(enabled);
        self
    }

    /// Parses a property bag with a required `file` and optional
    /// `adaptivePadding`.
    pub fn from_properties(properties: &Map<String, Value>) -> Result<Self> {
        let props = Properties::new(properties);
        Ok(Self {
            file: props.path("file").ok_or(Error::MissingProperty("file"))?,
            adaptive_padding: props.boolean("adaptivePadding"),
        })
    }
}

// ============================================================================
// OverlayFilter
// ============================================================================

/// Scales an image to the icon's viewport and draws it centered.
///
/// The image is decoded on every application; a file that cannot be read
/// leaves the canvas untouched.
#[derive(Debug, Clone)]
pub struct OverlayFilter {
    config: OverlayConfig,
}

impl OverlayFilter {
    pub fn new(config: OverlayConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Size the foreground is resampled to on a `canvas`-sized icon.
    ///
    /// The aspect ratio is kept and the result fits the viewport. Adaptive
    /// icons with padding enabled scale by a further `sqrt(0.5)` so a square
    /// overlay stays inside the circle inscribed in the viewport.
    pub fn scaled_size(&self, canvas: SizePx, foreground: SizePx, adaptive: bool) -> SizePx {
        let viewport = Viewport::of(canvas, adaptive);
        let (fg_width, fg_height) = (foreground.width as f32, foreground.height as f32);

        let mut scale = (viewport.width as f32 / fg_width).min(viewport.height as f32 / fg_height);
        if self.config.adaptive_padding.unwrap_or(true) && adaptive {
            scale *= FRAC_1_SQRT_2;
        }
        SizePx::new(
            (fg_width * scale).round() as u32,
            (fg_height * scale).round() as u32,
        )
    }
}

impl FilterEffect for OverlayFilter {
    fn apply(&self, canvas: &mut Canvas, adaptive: bool) {
        let foreground = match image::open(&self.config.file) {
            Ok(image) => image.into_rgba8(),
            Err(err) => {
                warn!(
                    "overlay {} skipped, cannot decode: {err}",
                    self.config.file.display()
                );
                return;
            }
        };
        if foreground.width() == 0 || foreground.height() == 0 {
            return;
        }

        let size = self.scaled_size(
            canvas.size(),
            SizePx::new(foreground.width(), foreground.height()),
            adaptive,
        );
        if size.width == 0 || size.height == 0 {
            return;
        }
        let scaled = imageops::resize(&foreground, size.width, size.height, FilterType::Lanczos3);

        let x = ((canvas.width() as f32 - size.width as f32) / 2.0).round() as i32;
        let y = ((canvas.height() as f32 - size.height as f32) / 2.0).round() as i32;
        debug!(
            "overlay {} drawn at {}x{} on a {}x{} canvas",
            self.config.file.display(),
            size.width,
            size.height,
            canvas.width(),
            canvas.height()
        );
        if let Err(err) = canvas.draw_image(&scaled, x, y) {
            warn!("overlay {} skipped: {err}", self.config.file.display());
        }
    }
}
