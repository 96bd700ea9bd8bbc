//! Raster drawing surface.
//!
//! A [`Surface`] owns a tiny-skia pixmap plus a base transform from logical
//! layout pixels to device pixels. The compositor always draws in logical
//! coordinates; the screen surface uses the identity transform and export
//! surfaces use a centered, aspect-preserving scale.

use tiny_skia::{
    Color, FilterQuality, Paint, PathBuilder, Pattern, Pixmap, PixmapPaint, Rect as SkiaRect, SpreadMode,
    Stroke, StrokeDash, Transform,
};

use crate::errors::{PreviewError, PreviewResult};
use crate::geometry::{CanvasSize, Point, Rect};

use super::text;

/// Horizontal anchoring of a label relative to its position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
}

/// How to draw one label.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle {
    /// Logical pixels
    pub size: f32,
    pub color: Color,
    pub align: TextAlign,
    /// Degrees, clockwise; -90 reads bottom to top
    pub rotation: f32,
}

impl TextStyle {
    pub fn centered(size: f32, color: Color) -> Self {
        TextStyle {
            size,
            color,
            align: TextAlign::Center,
            rotation: 0.0,
        }
    }

    pub fn rotated(mut self, degrees: f32) -> Self {
        self.rotation = degrees;
        self
    }
}

/// Parse `#rrggbb` into an opaque color.
pub fn hex_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    let channel = |i: usize| {
        digits
            .get(i..i + 2)
            .and_then(|s| u8::from_str_radix(s, 16).ok())
            .unwrap_or(0)
    };
    Color::from_rgba8(channel(0), channel(2), channel(4), 255)
}

/// Drawing target with a logical coordinate system.
pub struct Surface {
    pixmap: Pixmap,
    base: Transform,
    pixel_ratio: f32,
    logical: CanvasSize,
}

impl Surface {
    /// Surface whose device pixels equal logical pixels.
    pub fn new(size: CanvasSize) -> PreviewResult<Self> {
        let pixmap = allocate(size)?;
        Ok(Surface {
            pixmap,
            base: Transform::identity(),
            pixel_ratio: 1.0,
            logical: size,
        })
    }

    /// Device surface of `device` size showing a `logical` layout scaled to
    /// fit and centered.
    pub fn scaled(device: CanvasSize, logical: CanvasSize) -> PreviewResult<Self> {
        let pixmap = allocate(device)?;
        let (scale, offset_x, offset_y) = logical.fit_within(device);
        let scale = scale as f32;
        Ok(Surface {
            pixmap,
            base: Transform::from_row(scale, 0.0, 0.0, scale, offset_x as f32, offset_y as f32),
            pixel_ratio: scale,
            logical,
        })
    }

    pub fn logical_size(&self) -> CanvasSize {
        self.logical
    }

    pub fn device_size(&self) -> CanvasSize {
        CanvasSize::new(self.pixmap.width(), self.pixmap.height())
    }

    /// Device pixels per logical pixel
    pub fn pixel_ratio(&self) -> f32 {
        self.pixel_ratio
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Fill the whole device surface, including any letterbox area.
    pub fn clear(&mut self, color: Color) {
        self.pixmap.fill(color);
    }

    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some(r) = to_skia(rect) else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = false;
        self.pixmap.fill_rect(r, &paint, self.base, None);
    }

    pub fn stroke_rect(&mut self, rect: Rect, color: Color, width: f32) {
        let Some(r) = to_skia(rect) else {
            return;
        };
        let path = PathBuilder::from_rect(r);
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        let stroke = Stroke {
            width,
            ..Stroke::default()
        };
        self.pixmap.stroke_path(&path, &paint, &stroke, self.base, None);
    }

    /// Straight line; `dash` is `[on, off]` in logical pixels.
    pub fn line(&mut self, from: Point, to: Point, color: Color, width: f32, dash: Option<[f32; 2]>) {
        let mut builder = PathBuilder::new();
        builder.move_to(from.x as f32, from.y as f32);
        builder.line_to(to.x as f32, to.y as f32);
        let Some(path) = builder.finish() else {
            return;
        };
        let mut paint = Paint::default();
        paint.set_color(color);
        paint.anti_alias = true;
        let mut stroke = Stroke {
            width,
            ..Stroke::default()
        };
        if let Some([on, off]) = dash {
            stroke.dash = StrokeDash::new(vec![on, off], 0.0);
        }
        self.pixmap.stroke_path(&path, &paint, &stroke, self.base, None);
    }

    /// Paint one image tile stretched to `tile`, visible only inside `clip`.
    pub fn draw_image_tile(&mut self, image: &Pixmap, tile: Rect, clip: Rect) {
        if tile.is_empty() || image.width() == 0 || image.height() == 0 {
            return;
        }
        let Some(visible) = tile.intersection(&clip) else {
            return;
        };
        let Some(visible) = to_skia(visible) else {
            return;
        };

        let scale_x = (tile.width / f64::from(image.width())) as f32;
        let scale_y = (tile.height / f64::from(image.height())) as f32;
        if !scale_x.is_finite() || !scale_y.is_finite() {
            return;
        }

        let mut paint = Paint::default();
        paint.shader = Pattern::new(
            image.as_ref(),
            SpreadMode::Pad,
            FilterQuality::Bilinear,
            1.0,
            Transform::from_row(scale_x, 0.0, 0.0, scale_y, tile.x as f32, tile.y as f32),
        );
        paint.anti_alias = false;
        self.pixmap.fill_rect(visible, &paint, self.base, None);
    }

    /// Draw a label whose baseline passes through `at`.
    pub fn draw_text(&mut self, label: &str, at: Point, style: TextStyle) {
        let device_size = style.size * self.pixel_ratio;
        let Some(raster) = text::rasterize(label, device_size, style.color) else {
            return;
        };
        let inv = 1.0 / self.pixel_ratio;
        let dx = match style.align {
            TextAlign::Left => 0.0,
            TextAlign::Center => -raster.width() / 2.0,
        };
        let transform = self
            .base
            .pre_translate(at.x as f32, at.y as f32)
            .pre_concat(Transform::from_rotate(style.rotation))
            .pre_scale(inv, inv)
            .pre_translate(dx, -raster.ascent);
        let paint = PixmapPaint {
            quality: FilterQuality::Bilinear,
            ..PixmapPaint::default()
        };
        self.pixmap
            .draw_pixmap(0, 0, raster.pixmap.as_ref(), &paint, transform, None);
    }

    /// Encode the device pixmap as PNG.
    pub fn encode_png(&self) -> PreviewResult<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| PreviewError::render_target("encode_png", e.to_string()))
    }
}

fn allocate(size: CanvasSize) -> PreviewResult<Pixmap> {
    Pixmap::new(size.width, size.height).ok_or_else(|| {
        PreviewError::render_target(
            "allocate_surface",
            format!("Cannot allocate a {}x{} surface", size.width, size.height),
        )
    })
}

fn to_skia(rect: Rect) -> Option<SkiaRect> {
    SkiaRect::from_xywh(rect.x as f32, rect.y as f32, rect.width as f32, rect.height as f32)
}
