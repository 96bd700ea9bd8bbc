//! # High-Resolution Export
//!
//! Renders the screen layout into an independent offscreen surface scaled to
//! a print or view target. The live screen frame is never touched, so a
//! failed export leaves it intact.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::asset::PatternImage;
use crate::config::PreviewConfig;
use crate::errors::PreviewResult;
use crate::geometry::CanvasSize;
use crate::session::RenderSession;

use super::compositor::draw_preview;
use super::surface::Surface;

/// Which export raster to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportTarget {
    /// Drawing area of the print page at its dpi
    Print,
    /// Large on-screen viewing raster
    View,
}

impl ExportTarget {
    pub fn canvas_size(&self, config: &PreviewConfig) -> CanvasSize {
        match self {
            ExportTarget::Print => config.export.print.canvas_size(),
            ExportTarget::View => config.export.view,
        }
    }
}

/// An encoded export raster.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportImage {
    pub target: ExportTarget,
    pub size: CanvasSize,
    pub png: Vec<u8>,
}

impl ExportImage {
    /// `data:image/png;base64,...`
    pub fn data_url(&self) -> String {
        format!("data:image/png;base64,{}", STANDARD.encode(&self.png))
    }
}

/// Render `session` for `target`. The screen layout is scaled to fit the
/// target canvas and centered.
pub fn render_export(
    session: &RenderSession,
    image: Option<&PatternImage>,
    config: &PreviewConfig,
    target: ExportTarget,
) -> PreviewResult<ExportImage> {
    let size = target.canvas_size(config);
    let mut surface = Surface::scaled(size, config.screen)?;
    draw_preview(&mut surface, session, image, &config.layout)?;
    let png = surface.encode_png()?;
    tracing::info!(
        session = %session.id,
        ?target,
        width = size.width,
        height = size.height,
        bytes = png.len(),
        "Export rendered"
    );
    Ok(ExportImage { target, size, png })
}
