//! Label text rasterization.
//!
//! Labels are rasterized with fontdue into a small premultiplied pixmap at
//! device resolution and composited by [`Surface`](super::surface::Surface).
//! The font comes from the fonts bundled with typst-assets so the raster
//! and the PDF share a typeface family without any system font lookup.

use fontdue::{Font, FontSettings};
use once_cell::sync::Lazy;
use tiny_skia::{Color, IntSize, Pixmap, PremultipliedColorU8};

static LABEL_FONT: Lazy<Option<Font>> = Lazy::new(load_label_font);

fn load_label_font() -> Option<Font> {
    for bytes in typst_assets::fonts() {
        match Font::from_bytes(bytes, FontSettings::default()) {
            Ok(font) if font.lookup_glyph_index('A') != 0 => return Some(font),
            Ok(_) => continue,
            Err(e) => tracing::debug!(error = e, "Skipping bundled font"),
        }
    }
    tracing::warn!("No bundled font could be parsed; labels will be skipped");
    None
}

/// A rasterized single-line label.
pub struct RasterLabel {
    pub pixmap: Pixmap,
    /// Baseline distance from the top of the pixmap, in device pixels
    pub ascent: f32,
}

impl RasterLabel {
    pub fn width(&self) -> f32 {
        self.pixmap.width() as f32
    }
}

/// Measure a label's advance width in pixels at `size_px`.
pub fn measure(text: &str, size_px: f32) -> f32 {
    match LABEL_FONT.as_ref() {
        Some(font) => text.chars().map(|c| font.metrics(c, size_px).advance_width).sum(),
        None => 0.0,
    }
}

/// Rasterize `text` at `size_px` device pixels. `None` when no font is
/// available or the text is empty.
pub fn rasterize(text: &str, size_px: f32, color: Color) -> Option<RasterLabel> {
    let font = LABEL_FONT.as_ref()?;
    if text.is_empty() || !(size_px > 0.0) {
        return None;
    }

    let (ascent, descent) = match font.horizontal_line_metrics(size_px) {
        Some(lm) => (lm.ascent, lm.descent),
        None => (size_px * 0.8, -size_px * 0.2),
    };
    let width = measure(text, size_px).ceil().max(1.0) as u32;
    let height = (ascent - descent).ceil().max(1.0) as u32;
    let size = IntSize::from_wh(width, height)?;
    let mut pixels = vec![PremultipliedColorU8::TRANSPARENT; (width * height) as usize];

    let mut pen_x = 0.0f32;
    for c in text.chars() {
        let (metrics, coverage) = font.rasterize(c, size_px);
        let left = (pen_x + metrics.xmin as f32).round() as i32;
        let top = (ascent - (metrics.height as f32 + metrics.ymin as f32)).round() as i32;
        for gy in 0..metrics.height {
            for gx in 0..metrics.width {
                let alpha = coverage[gy * metrics.width + gx];
                if alpha == 0 {
                    continue;
                }
                let x = left + gx as i32;
                let y = top + gy as i32;
                if x < 0 || y < 0 || x >= width as i32 || y >= height as i32 {
                    continue;
                }
                let idx = (y as u32 * width + x as u32) as usize;
                if let Some(px) = blend_coverage(pixels[idx], color, alpha) {
                    pixels[idx] = px;
                }
            }
        }
        pen_x += metrics.advance_width;
    }

    let data: Vec<u8> = pixels
        .iter()
        .flat_map(|p| [p.red(), p.green(), p.blue(), p.alpha()])
        .collect();
    let pixmap = Pixmap::from_vec(data, size)?;
    Some(RasterLabel { pixmap, ascent })
}

/// Glyph boxes may overlap; keep the stronger coverage.
fn blend_coverage(existing: PremultipliedColorU8, color: Color, coverage: u8) -> Option<PremultipliedColorU8> {
    let a = color.alpha() * f32::from(coverage) / 255.0;
    let alpha = (a * 255.0).round() as u8;
    if alpha <= existing.alpha() {
        return None;
    }
    PremultipliedColorU8::from_rgba(
        (color.red() * a * 255.0).round() as u8,
        (color.green() * a * 255.0).round() as u8,
        (color.blue() * a * 255.0).round() as u8,
        alpha,
    )
}
