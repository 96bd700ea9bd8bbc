//! # Reference Coordinate Frame
//!
//! One coordinate frame shared by both preview sections:
//!
//! - **Section 1** (full coverage) shows every panel with the wall inside it.
//! - **Section 2** (wall only) shows just the wall, stacked below.
//!
//! Both sections draw from the same pattern grid. The grid origin is the
//! bottom-left corner of the Section 1 panel block; Section 2 places its
//! grid so the wall sits at exactly the same offset from that origin. This
//! is what keeps the pattern phase at the wall's corners identical in both
//! sections, and in every export, since exports rebuild the frame from the
//! same inputs.
//!
//! ## Example
//!
//! ```rust
//! use wall_core::calculations::compute_requirements;
//! use wall_core::frame::{compute_reference_frame, Section};
//! use wall_core::geometry::{CanvasSize, LayoutMargins};
//! use wall_core::pattern::PatternCatalog;
//! use wall_core::units::Inches;
//! use wall_core::wall::WallSpec;
//!
//! let catalog = PatternCatalog::demo();
//! let pattern = catalog.get("demo-pattern").unwrap();
//! let wall = WallSpec::from_inches(120.0, 96.0).unwrap();
//! let req = compute_requirements(pattern, Inches(120.0), Inches(96.0)).unwrap();
//! let frame = compute_reference_frame(&wall, &req, pattern, CanvasSize::default(), &LayoutMargins::default()).unwrap();
//!
//! let (dx1, dy1) = frame.wall_offset_from_origin(Section::FullCoverage);
//! let (dx2, dy2) = frame.wall_offset_from_origin(Section::WallOnly);
//! assert!((dx1 - dx2).abs() < 1e-9 && (dy1 - dy2).abs() < 1e-9);
//! ```

use serde::{Deserialize, Serialize};

use crate::calculations::Requirements;
use crate::errors::{PreviewError, PreviewResult};
use crate::geometry::{CanvasSize, LayoutMargins, Point, Rect};
use crate::pattern::{PatternSpec, SaleType};
use crate::units::INCHES_PER_FOOT;
use crate::wall::WallSpec;

/// The two stacked preview sections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    FullCoverage,
    WallOnly,
}

/// Placement of one section.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectionFrame {
    /// Bottom-left of the pattern grid
    pub grid_origin: Point,
    /// Top-left of the panel block (grid origin minus the block height)
    pub pattern_start: Point,
    /// Top-left of the wall
    pub wall_start: Point,
}

/// Scaled sizes in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScaledDimensions {
    pub total_width: f64,
    pub total_height: f64,
    pub wall_width: f64,
    pub wall_height: f64,
    /// Height reserved for Section 1 in the layout
    pub section1_height: f64,
}

/// Coordinate frame for one draw call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReferenceFrame {
    /// Pixels per inch
    pub scale: f64,
    /// Wall bottom aligned with the panel bottom (wall taller than panels)
    pub bottom_anchored: bool,
    pub canvas: CanvasSize,
    pub section1: SectionFrame,
    pub section2: SectionFrame,
    pub dimensions: ScaledDimensions,
}

impl ReferenceFrame {
    pub fn section(&self, section: Section) -> &SectionFrame {
        match section {
            Section::FullCoverage => &self.section1,
            Section::WallOnly => &self.section2,
        }
    }

    pub fn wall_rect(&self, section: Section) -> Rect {
        Rect::from_origin(
            self.section(section).wall_start,
            self.dimensions.wall_width,
            self.dimensions.wall_height,
        )
    }

    /// Full panel block in Section 1.
    pub fn panel_block_rect(&self) -> Rect {
        Rect::from_origin(
            self.section1.pattern_start,
            self.dimensions.total_width,
            self.dimensions.total_height,
        )
    }

    /// Wall position relative to the grid origin: `(right of origin, above origin)`
    /// measured to the wall's bottom-left.
    pub fn wall_offset_from_origin(&self, section: Section) -> (f64, f64) {
        let s = self.section(section);
        (
            s.wall_start.x - s.grid_origin.x,
            s.grid_origin.y - (s.wall_start.y + self.dimensions.wall_height),
        )
    }

    /// Width of one panel in pixels.
    pub fn panel_width_px(&self, pattern: &PatternSpec) -> f64 {
        pattern.panel_width_in * self.scale
    }
}

/// True when the wall plus overage is taller than the chosen panels.
pub fn should_bottom_anchor(wall: &WallSpec, requirements: &Requirements, pattern: &PatternSpec) -> bool {
    requirements.sale_type == SaleType::Panel
        && wall.height_in() + pattern.min_overage_in
            > f64::from(requirements.panel_length_ft) * INCHES_PER_FOOT
}

/// Build the shared coordinate frame for a canvas.
///
/// The stacked content (Section 1, gap, Section 2) is scaled to fit the
/// area inside the margins and centered in it.
pub fn compute_reference_frame(
    wall: &WallSpec,
    requirements: &Requirements,
    pattern: &PatternSpec,
    canvas: CanvasSize,
    layout: &LayoutMargins,
) -> PreviewResult<ReferenceFrame> {
    let max_width = f64::from(canvas.width) - layout.left - layout.right;
    let max_height = f64::from(canvas.height) - layout.top - layout.bottom;
    let content_height_avail = max_height - layout.section_gap;
    if max_width <= 0.0 || content_height_avail <= 0.0 {
        return Err(PreviewError::render_target(
            "compute_reference_frame",
            format!(
                "Canvas {}x{} leaves no drawing area inside the margins",
                canvas.width, canvas.height
            ),
        ));
    }

    let wall_width = wall.width_in();
    let wall_height = wall.height_in();
    let bottom_anchored = should_bottom_anchor(wall, requirements, pattern);

    let mut section1_height_in = requirements.max_strip_length_in();
    if !bottom_anchored {
        section1_height_in = section1_height_in.max(wall_height + pattern.min_overage_in);
    }

    let content_width = requirements.total_width_in.max(wall_width);
    let scale = (max_width / content_width).min(content_height_avail / (section1_height_in + wall_height));

    let total_width = requirements.total_width_in * scale;
    let total_height = requirements.total_height_in * scale;
    let scaled_wall_width = wall_width * scale;
    let scaled_wall_height = wall_height * scale;
    let section1_height = section1_height_in * scale;

    let content_height = section1_height + scaled_wall_height + layout.section_gap;
    let section1_top = layout.top + (max_height - content_height) / 2.0;

    // Section 1: panel block centered horizontally
    let pattern_start = Point::new(layout.left + (max_width - total_width) / 2.0, section1_top);
    let wall_x = pattern_start.x + (total_width - scaled_wall_width) / 2.0;
    let wall_y = if bottom_anchored {
        pattern_start.y + total_height - scaled_wall_height
    } else {
        pattern_start.y + (section1_height - scaled_wall_height) / 2.0
    };
    let section1 = SectionFrame {
        grid_origin: Point::new(pattern_start.x, pattern_start.y + total_height),
        pattern_start,
        wall_start: Point::new(wall_x, wall_y),
    };

    // Section 2: wall alone, grid placed to keep the wall's offset from origin
    let wall2 = Point::new(
        layout.left + (max_width - scaled_wall_width) / 2.0,
        section1_top + section1_height + layout.section_gap,
    );
    let rel_x = section1.wall_start.x - section1.grid_origin.x;
    let rel_y = section1.grid_origin.y - (section1.wall_start.y + scaled_wall_height);
    let origin2 = Point::new(wall2.x - rel_x, wall2.y + scaled_wall_height + rel_y);
    let section2 = SectionFrame {
        grid_origin: origin2,
        pattern_start: Point::new(origin2.x, origin2.y - total_height),
        wall_start: wall2,
    };

    tracing::debug!(
        scale,
        bottom_anchored,
        canvas_w = canvas.width,
        canvas_h = canvas.height,
        "Reference frame computed"
    );

    Ok(ReferenceFrame {
        scale,
        bottom_anchored,
        canvas,
        section1,
        section2,
        dimensions: ScaledDimensions {
            total_width,
            total_height,
            wall_width: scaled_wall_width,
            wall_height: scaled_wall_height,
            section1_height,
        },
    })
}
