//! # Rendering
//!
//! Raster output for a [`RenderSession`](crate::session::RenderSession):
//!
//! - [`surface`] - tiny-skia drawing target with a logical coordinate system
//! - [`text`] - label glyph rasterization
//! - [`compositor`] - the two preview sections
//! - [`export`] - high-resolution offscreen renders for print and viewing

pub mod compositor;
pub mod export;
pub mod surface;
pub mod text;

pub use compositor::{render_preview, RenderedFrame};
pub use export::{render_export, ExportImage, ExportTarget};
pub use surface::Surface;
