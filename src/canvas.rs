//! Mutable raster surface the filters draw on.
//!
//! [`Canvas`] wraps a premultiplied `tiny_skia` pixmap so ribbons can be
//! filled through arbitrary affine transforms and blend modes, while
//! decoding and encoding go through the `image` crate.

use std::fs;
use std::path::Path;

use image::{ImageFormat, Rgba, RgbaImage};
use resvg::tiny_skia::{
    BlendMode, ColorU8, Mask, MaskType, Paint, Pixmap, PixmapPaint, Rect, Transform,
};

use crate::color::Color;
use crate::error::{Error, Result};
use crate::icon::{RectPx, SizePx};

/// How a filled shape combines with the pixels already on the canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FillMode {
    /// Normal alpha compositing (source over destination).
    #[default]
    Over,
    /// The source replaces the destination, alpha included.
    Replace,
    /// The source is kept only where the destination already has coverage;
    /// transparent destination pixels stay transparent.
    InsideOpaque,
}

impl FillMode {
    fn blend_mode(self) -> BlendMode {
        match self {
            FillMode::Over => BlendMode::SourceOver,
            FillMode::Replace => BlendMode::Source,
            FillMode::InsideOpaque => BlendMode::SourceIn,
        }
    }
}

/// An owned RGBA raster.
#[derive(Debug, Clone, PartialEq)]
pub struct Canvas {
    pixmap: Pixmap,
}

impl Canvas {
    /// Allocates a fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(Error::EmptyCanvas { width, height })?;
        Ok(Self { pixmap })
    }

    /// Allocates a transparent canvas of the given size.
    pub fn with_size(size: SizePx) -> Result<Self> {
        Self::new(size.width, size.height)
    }

    /// Decodes an image file into a canvas.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let image = image::open(path.as_ref())?.to_rgba8();
        Self::from_rgba_image(&image)
    }

    /// Copies a straight-alpha image into a new canvas.
    pub fn from_rgba_image(image: &RgbaImage) -> Result<Self> {
        let mut canvas = Self::new(image.width(), image.height())?;
        for (dst, src) in canvas.pixmap.pixels_mut().iter_mut().zip(image.pixels()) {
            let [r, g, b, a] = src.0;
            *dst = ColorU8::from_rgba(r, g, b, a).premultiply();
        }
        Ok(canvas)
    }

    /// Converts the canvas back into a straight-alpha image.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width(), self.height());
        for (dst, src) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let color = src.demultiply();
            *dst = Rgba([color.red(), color.green(), color.blue(), color.alpha()]);
        }
        image
    }

    /// Encodes the canvas as PNG, creating parent directories as needed.
    pub fn save_png(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        self.to_rgba_image().save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn size(&self) -> SizePx {
        SizePx::new(self.width(), self.height())
    }

    /// Reads a single pixel as a straight-alpha color.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Color> {
        if x >= self.width() || y >= self.height() {
            return None;
        }
        let color = self.pixmap.pixel(x, y)?.demultiply();
        Some(Color::new(color.red(), color.green(), color.blue(), color.alpha()))
    }

    /// Fills `rect` (in the coordinate frame described by `transform`) with a
    /// solid color.
    pub fn fill_rect(&mut self, rect: RectPx, color: Color, mode: FillMode, transform: Transform) {
        let Some(rect) = Rect::from_xywh(
            rect.x as f32,
            rect.y as f32,
            rect.width as f32,
            rect.height as f32,
        ) else {
            return;
        };

        let mut paint = Paint::default();
        paint.set_color(color.into());
        paint.blend_mode = mode.blend_mode();
        paint.anti_alias = !transform.is_identity();
        self.pixmap.fill_rect(rect, &paint, transform, None);
    }

    /// Composites a straight-alpha image with its top-left corner at `(x, y)`.
    pub fn draw_image(&mut self, image: &RgbaImage, x: i32, y: i32) -> Result<()> {
        let layer = Canvas::from_rgba_image(image)?;
        self.pixmap.draw_pixmap(
            x,
            y,
            layer.pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            None,
        );
        Ok(())
    }

    /// Composites a same-sized layer over this canvas, optionally clipped by
    /// `mask`.
    pub fn draw_layer(&mut self, layer: &Canvas, mask: Option<&Mask>) {
        self.pixmap.draw_pixmap(
            0,
            0,
            layer.pixmap.as_ref(),
            &PixmapPaint::default(),
            Transform::identity(),
            mask,
        );
    }

    /// Coverage mask built from the current alpha channel.
    pub fn alpha_mask(&self) -> Mask {
        Mask::from_pixmap(self.pixmap.as_ref(), MaskType::Alpha)
    }

    pub(crate) fn pixmap_mut(&mut self) -> &mut Pixmap {
        &mut self.pixmap
    }
}
