//! # Section Compositor
//!
//! Draws the two preview sections onto a [`Surface`]:
//!
//! 1. **Full coverage**: every panel column tiled, overage dimmed with 50%
//!    white, wall and panel outlines, dashed seams, and dimension leaders.
//! 2. **Wall only**: the wall rectangle tiled on the same grid with its
//!    outline and width/height leaders.
//!
//! Without an image both sections still draw outlines, overlay, and labels
//! over white.

use tiny_skia::{Color, Pixmap};

use crate::asset::PatternImage;
use crate::errors::PreviewResult;
use crate::frame::{compute_reference_frame, ReferenceFrame, Section};
use crate::geometry::{CanvasSize, LayoutMargins, Point, Rect};
use crate::pattern::SaleType;
use crate::session::RenderSession;
use crate::tiler::{tile_pattern, TileTarget};
use crate::units::{format_feet_inches, Inches};

use super::surface::{hex_color, Surface, TextStyle};

const WALL_OUTLINE: &str = "#2c3e50";
const PANEL_OUTLINE: &str = "#666666";
const SEAM: &str = "#999999";
const LABEL: &str = "#333333";
const SEAM_DASH: [f32; 2] = [6.0, 6.0];
const TICK: f64 = 5.0;

/// Result of a screen render.
pub struct RenderedFrame {
    pub frame: ReferenceFrame,
    pub pixmap: Pixmap,
    /// False when no pattern image was available
    pub pattern_drawn: bool,
}

impl RenderedFrame {
    pub fn encode_png(&self) -> PreviewResult<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| crate::errors::PreviewError::render_target("encode_png", e.to_string()))
    }
}

/// Dimension label texts for a session.
#[derive(Debug, Clone, PartialEq)]
pub struct SectionLabels {
    pub panel_width: String,
    pub total_width: String,
    pub panel_height: String,
    pub wall_width: String,
    pub wall_height: String,
}

impl SectionLabels {
    pub fn for_session(session: &RenderSession) -> Self {
        let req = &session.requirements;
        let is_yard = req.sale_type == SaleType::Yard;
        let panel_width = format_feet_inches(Inches(session.pattern.panel_width_in));
        let total_width = format_feet_inches(Inches(req.total_width_in));
        let panel_height = if is_yard {
            let extra = req.panel_length_extra_in.round() as u32;
            if extra > 0 {
                format!("Strip Height: {}'-{}\"", req.panel_length_ft, extra)
            } else {
                format!("Strip Height: {}'", req.panel_length_ft)
            }
        } else {
            format!("Panel Height: {}'", req.panel_length_ft)
        };
        SectionLabels {
            panel_width: format!("{}: {}", if is_yard { "Strip Width" } else { "Panel Width" }, panel_width),
            total_width: format!("{}: {}", if is_yard { "All Strips" } else { "All Panels" }, total_width),
            panel_height,
            wall_width: format!("Wall Width: {}", session.wall.width.dashed()),
            wall_height: format!("Wall Height: {}", session.wall.height.dashed()),
        }
    }
}

/// Overage regions of the panel block outside the wall. Left and right
/// strips span the full block height; top and bottom span the wall width.
pub fn overage_strips(block: Rect, wall: Rect) -> Vec<Rect> {
    let mut strips = Vec::with_capacity(4);
    if wall.x > block.x {
        strips.push(Rect::new(block.x, block.y, wall.x - block.x, block.height));
    }
    if wall.right() < block.right() {
        strips.push(Rect::new(wall.right(), block.y, block.right() - wall.right(), block.height));
    }
    if wall.y > block.y {
        strips.push(Rect::new(wall.x, block.y, wall.width, wall.y - block.y));
    }
    if wall.bottom() < block.bottom() {
        strips.push(Rect::new(wall.x, wall.bottom(), wall.width, block.bottom() - wall.bottom()));
    }
    strips
}

/// Clear to white and draw both sections. Returns the frame used.
pub fn draw_preview(
    surface: &mut Surface,
    session: &RenderSession,
    image: Option<&PatternImage>,
    layout: &LayoutMargins,
) -> PreviewResult<ReferenceFrame> {
    let frame = compute_reference_frame(
        &session.wall,
        &session.requirements,
        &session.pattern,
        surface.logical_size(),
        layout,
    )?;
    surface.clear(Color::WHITE);
    render_full_coverage(surface, &frame, session, image, layout);
    render_wall_only(surface, &frame, session, image, layout);
    Ok(frame)
}

/// Render the screen preview into a fresh surface of `canvas` size.
pub fn render_preview(
    session: &RenderSession,
    image: Option<&PatternImage>,
    canvas: CanvasSize,
    layout: &LayoutMargins,
) -> PreviewResult<RenderedFrame> {
    let mut surface = Surface::new(canvas)?;
    let frame = draw_preview(&mut surface, session, image, layout)?;
    tracing::info!(
        session = %session.id,
        width = canvas.width,
        height = canvas.height,
        pattern_drawn = image.is_some(),
        "Preview rendered"
    );
    Ok(RenderedFrame {
        frame,
        pixmap: surface.into_pixmap(),
        pattern_drawn: image.is_some(),
    })
}

/// Section 1: all panels, overage overlay, outlines, and leaders.
pub fn render_full_coverage(
    surface: &mut Surface,
    frame: &ReferenceFrame,
    session: &RenderSession,
    image: Option<&PatternImage>,
    layout: &LayoutMargins,
) {
    let block = frame.panel_block_rect();
    let wall = frame.wall_rect(Section::FullCoverage);
    let panel_w = frame.panel_width_px(&session.pattern);
    let panels = session.requirements.panels_needed as usize;

    for i in 0..panels {
        let column = Rect::new(block.x + i as f64 * panel_w, block.y, panel_w, block.height);
        tile_pattern(surface, column, frame, session, image, TileTarget::Panel(i));
    }

    let dim = Color::from_rgba8(255, 255, 255, 128);
    for strip in overage_strips(block, wall) {
        surface.fill_rect(strip, dim);
    }

    surface.stroke_rect(wall, hex_color(WALL_OUTLINE), 2.0);
    for i in 0..panels {
        let column = Rect::new(block.x + i as f64 * panel_w, block.y, panel_w, block.height);
        surface.stroke_rect(column, hex_color(PANEL_OUTLINE), 1.0);
    }
    for i in 1..panels {
        let x = block.x + i as f64 * panel_w;
        surface.line(
            Point::new(x, block.y),
            Point::new(x, block.bottom()),
            hex_color(SEAM),
            1.0,
            Some(SEAM_DASH),
        );
    }

    let labels = SectionLabels::for_session(session);
    let font = layout.label_font_px as f32;
    let style = TextStyle::centered(font, hex_color(LABEL));

    if panels > 0 {
        let y = block.y - 50.0;
        horizontal_leader(surface, block.x, block.x + panel_w, y);
        surface.draw_text(&labels.panel_width, Point::new(block.x + panel_w / 2.0, y - 8.0), style);
    }

    let y = block.y - 80.0;
    horizontal_leader(surface, block.x, block.right(), y);
    surface.draw_text(&labels.total_width, Point::new(block.x + block.width / 2.0, y - 8.0), style);

    let x = block.x - 30.0;
    vertical_leader(surface, x, block.y, block.bottom());
    surface.draw_text(
        &labels.panel_height,
        Point::new(x - 15.0, block.y + block.height / 2.0),
        style.rotated(-90.0),
    );

    if session.requirements.sale_type == SaleType::Panel {
        for i in 0..panels {
            if let Some(letter) = session.pattern.sequence_label(i) {
                let center = block.x + (i as f64 + 0.5) * panel_w;
                surface.draw_text(&letter.to_string(), Point::new(center, block.y - 25.0), style);
            }
        }
    }
}

/// Section 2: wall rectangle on the continuous grid with its leaders.
pub fn render_wall_only(
    surface: &mut Surface,
    frame: &ReferenceFrame,
    session: &RenderSession,
    image: Option<&PatternImage>,
    layout: &LayoutMargins,
) {
    let wall = frame.wall_rect(Section::WallOnly);
    tile_pattern(surface, wall, frame, session, image, TileTarget::WallOnly);
    surface.stroke_rect(wall, hex_color(WALL_OUTLINE), 2.0);

    let labels = SectionLabels::for_session(session);
    let style = TextStyle::centered(layout.label_font_px as f32, hex_color(LABEL));

    let y = wall.bottom() + 30.0;
    horizontal_leader(surface, wall.x, wall.right(), y);
    surface.draw_text(&labels.wall_width, Point::new(wall.x + wall.width / 2.0, y + 15.0), style);

    let x = wall.x - 30.0;
    vertical_leader(surface, x, wall.y, wall.bottom());
    surface.draw_text(
        &labels.wall_height,
        Point::new(x - 15.0, wall.y + wall.height / 2.0),
        style.rotated(-90.0),
    );
}

fn horizontal_leader(surface: &mut Surface, x0: f64, x1: f64, y: f64) {
    let color = hex_color(LABEL);
    surface.line(Point::new(x0, y), Point::new(x1, y), color, 1.0, None);
    surface.line(Point::new(x0, y - TICK), Point::new(x0, y + TICK), color, 1.0, None);
    surface.line(Point::new(x1, y - TICK), Point::new(x1, y + TICK), color, 1.0, None);
}

fn vertical_leader(surface: &mut Surface, x: f64, y0: f64, y1: f64) {
    let color = hex_color(LABEL);
    surface.line(Point::new(x, y0), Point::new(x, y1), color, 1.0, None);
    surface.line(Point::new(x - TICK, y0), Point::new(x + TICK, y0), color, 1.0, None);
    surface.line(Point::new(x - TICK, y1), Point::new(x + TICK, y1), color, 1.0, None);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PreviewConfig;
    use crate::pattern::{safe_default, PatternMatch, SaleTerms};
    use crate::session::RenderSession;
    use crate::wall::WallSpec;
    use tiny_skia::Pixmap;

    fn session(wall_w: f64, wall_h: f64) -> RenderSession {
        let config = PreviewConfig::default();
        let pattern = safe_default(&config.defaults);
        let wall = WallSpec::from_inches(wall_w, wall_h).unwrap();
        RenderSession::build(pattern, wall, &config).unwrap()
    }

    fn red_swatch() -> PatternImage {
        let mut pixmap = Pixmap::new(8, 8).unwrap();
        pixmap.fill(Color::from_rgba8(200, 0, 0, 255));
        PatternImage::from_pixmap("red", pixmap)
    }

    #[test]
    fn test_overage_strips() {
        let block = Rect::new(0.0, 0.0, 100.0, 100.0);
        let wall = Rect::new(10.0, 20.0, 80.0, 60.0);
        let strips = overage_strips(block, wall);
        assert_eq!(strips.len(), 4);
        assert_eq!(strips[0], Rect::new(0.0, 0.0, 10.0, 100.0));
        assert_eq!(strips[2], Rect::new(10.0, 0.0, 80.0, 20.0));

        // bottom-anchored wall: no bottom strip
        let anchored = Rect::new(10.0, 40.0, 80.0, 60.0);
        assert_eq!(overage_strips(block, anchored).len(), 3);
    }

    #[test]
    fn test_panel_labels() {
        let labels = SectionLabels::for_session(&session(114.0, 96.0));
        assert_eq!(labels.panel_width, "Panel Width: 4'-6\"");
        assert_eq!(labels.total_width, "All Panels: 13'-6\"");
        assert_eq!(labels.panel_height, "Panel Height: 9'");
        assert_eq!(labels.wall_width, "Wall Width: 9'-6\"");
        assert_eq!(labels.wall_height, "Wall Height: 8'");
    }

    #[test]
    fn test_strip_labels() {
        let config = PreviewConfig::default();
        let mut pattern = safe_default(&config.defaults);
        pattern.repeat_width_in = 27.0;
        pattern.repeat_height_in = Some(25.0);
        pattern.pattern_match = PatternMatch::Straight;
        pattern.sale = SaleTerms::Yard {
            roll_width_in: 54.0,
            min_yard_order: 3,
        };
        let wall = WallSpec::from_inches(100.0, 96.0).unwrap();
        let s = RenderSession::build(pattern, wall, &config).unwrap();
        let labels = SectionLabels::for_session(&s);
        assert_eq!(labels.panel_width, "Strip Width: 4'-6\"");
        assert_eq!(labels.total_width, "All Strips: 9'");
        assert_eq!(labels.panel_height, "Strip Height: 8'-4\"");
    }

    #[test]
    fn test_render_without_image_is_white_inside_wall() {
        let s = session(120.0, 96.0);
        let rendered = render_preview(&s, None, CanvasSize::default(), &LayoutMargins::default()).unwrap();
        assert!(!rendered.pattern_drawn);
        let wall = rendered.frame.wall_rect(Section::WallOnly);
        let cx = (wall.x + wall.width / 2.0) as u32;
        let cy = (wall.y + wall.height / 2.0) as u32;
        let px = rendered.pixmap.pixel(cx, cy).unwrap();
        assert_eq!((px.red(), px.green(), px.blue()), (255, 255, 255));
    }

    #[test]
    fn test_render_with_image_fills_wall_and_dims_overage() {
        let s = session(120.0, 96.0);
        let image = red_swatch();
        let rendered =
            render_preview(&s, Some(&image), CanvasSize::default(), &LayoutMargins::default()).unwrap();
        assert!(rendered.pattern_drawn);

        let wall = rendered.frame.wall_rect(Section::WallOnly);
        let px = rendered
            .pixmap
            .pixel((wall.x + wall.width / 2.0) as u32, (wall.y + wall.height / 2.0) as u32)
            .unwrap();
        assert!(px.red() > 190 && px.green() < 10);

        // left overage strip in Section 1 is dimmed toward white
        let block = rendered.frame.panel_block_rect();
        let wall1 = rendered.frame.wall_rect(Section::FullCoverage);
        let ox = ((block.x + wall1.x) / 2.0) as u32;
        let oy = (block.y + block.height / 2.0) as u32;
        let dimmed = rendered.pixmap.pixel(ox, oy).unwrap();
        assert!(dimmed.green() > 100 && dimmed.green() < 160);
    }
}
