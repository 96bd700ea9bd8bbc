//! # Pattern Images
//!
//! Decodes repeat images (JPEG or PNG) into premultiplied tiny-skia pixmaps
//! ready to be used as tile shaders. The host performs the I/O; this module
//! only sees bytes.

use std::fmt;
use std::sync::Arc;

use image::DynamicImage;
use tiny_skia::{IntSize, Pixmap};

use crate::errors::{PreviewError, PreviewResult};

/// A decoded repeat image, cheap to clone.
#[derive(Clone)]
pub struct PatternImage {
    source_ref: String,
    pixmap: Arc<Pixmap>,
}

impl fmt::Debug for PatternImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternImage")
            .field("source_ref", &self.source_ref)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

impl PatternImage {
    /// Decode encoded image bytes. `source_ref` names the image in errors.
    pub fn decode(source_ref: impl Into<String>, bytes: &[u8]) -> PreviewResult<Self> {
        let source_ref = source_ref.into();
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| PreviewError::asset_unavailable(&source_ref, e.to_string()))?;
        Self::from_dynamic(source_ref, &decoded)
    }

    pub fn from_dynamic(source_ref: impl Into<String>, image: &DynamicImage) -> PreviewResult<Self> {
        let source_ref = source_ref.into();
        let pixmap = dynamic_image_to_pixmap(image)
            .ok_or_else(|| PreviewError::asset_unavailable(&source_ref, "Image has no pixels"))?;
        tracing::debug!(
            source = %source_ref,
            width = pixmap.width(),
            height = pixmap.height(),
            "Pattern image decoded"
        );
        Ok(PatternImage {
            source_ref,
            pixmap: Arc::new(pixmap),
        })
    }

    /// Wrap an existing pixmap (tests and procedurally generated swatches).
    pub fn from_pixmap(source_ref: impl Into<String>, pixmap: Pixmap) -> Self {
        PatternImage {
            source_ref: source_ref.into(),
            pixmap: Arc::new(pixmap),
        }
    }

    pub fn source_ref(&self) -> &str {
        &self.source_ref
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// `(width, height)` in source pixels
    pub fn size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }

    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }
}

/// Convert to tiny-skia's premultiplied RGBA layout.
fn dynamic_image_to_pixmap(image: &DynamicImage) -> Option<Pixmap> {
    let rgba = image.to_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return None;
    }

    let mut data = Vec::with_capacity((width * height * 4) as usize);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        let alpha = f32::from(a) / 255.0;
        data.push((f32::from(r) * alpha).round() as u8);
        data.push((f32::from(g) * alpha).round() as u8);
        data.push((f32::from(b) * alpha).round() as u8);
        data.push(a);
    }

    let size = IntSize::from_wh(width, height)?;
    Pixmap::from_vec(data, size)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageFormat, Rgba, RgbaImage};
    use std::io::Cursor;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = RgbaImage::from_pixel(width, height, Rgba([200, 40, 40, 255]));
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgba8(img).write_to(&mut out, ImageFormat::Png).unwrap();
        out.into_inner()
    }

    #[test]
    fn test_decode_png() {
        let image = PatternImage::decode("swatch.png", &png_bytes(4, 8)).unwrap();
        assert_eq!(image.size(), (4, 8));
        let px = image.pixmap().pixel(0, 0).unwrap();
        assert_eq!((px.red(), px.green(), px.blue(), px.alpha()), (200, 40, 40, 255));
    }

    #[test]
    fn test_premultiplies_alpha() {
        let img = RgbaImage::from_pixel(1, 1, Rgba([200, 100, 0, 128]));
        let image = PatternImage::from_dynamic("half", &DynamicImage::ImageRgba8(img)).unwrap();
        let px = image.pixmap().pixel(0, 0).unwrap();
        assert_eq!(px.alpha(), 128);
        assert_eq!(px.red(), 100);
    }

    #[test]
    fn test_garbage_is_asset_unavailable() {
        let err = PatternImage::decode("broken.jpg", b"not an image").unwrap_err();
        assert_eq!(err.error_code(), "ASSET_UNAVAILABLE");
        assert!(err.is_recoverable());
    }
}
