//! # Pattern Tiler
//!
//! Places repeat tiles on the universal pattern grid and paints the ones
//! that fall inside a target rectangle.
//!
//! ## Grid rules
//!
//! - Tile width is the panel width divided by repeats per panel, so tiles
//!   subdivide each panel exactly. Tile height follows the image aspect ratio.
//! - Horizontal repeat indices run across the full multi-panel width starting
//!   at the grid origin, whichever target is being drawn.
//! - Half-drop offsets (downward, half a tile):
//!
//! | Match                    | Tile `i` is dropped when            |
//! |--------------------------|-------------------------------------|
//! | straight                 | never                               |
//! | half-drop, multi-repeat  | its index within the panel is odd   |
//! | half-drop, single-repeat | its panel index is odd              |
//!
//! - Vertically repeating designs stack tiles upward from the grid origin;
//!   designs without a vertical repeat get one tile resting on the origin.
//!
//! [`plan_tiles`] is pure geometry; [`tile_pattern`] paints the plan.

use serde::{Deserialize, Serialize};

use crate::asset::PatternImage;
use crate::calculations::Requirements;
use crate::frame::{ReferenceFrame, Section};
use crate::geometry::Rect;
use crate::pattern::PatternSpec;
use crate::render::surface::Surface;
use crate::session::RenderSession;

/// What a tiling pass is drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileTarget {
    /// One panel column of the full-coverage section
    Panel(usize),
    /// The wall rectangle of the wall-only section
    WallOnly,
}

impl TileTarget {
    pub fn section(&self) -> Section {
        match self {
            TileTarget::Panel(_) => Section::FullCoverage,
            TileTarget::WallOnly => Section::WallOnly,
        }
    }
}

/// One tile to paint.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TilePlacement {
    /// Horizontal repeat index from the grid origin
    pub repeat_index: usize,
    /// Vertical copy index (0 rests on the origin)
    pub row: usize,
    pub rect: Rect,
    /// Half-drop offset applied to this column
    pub drop: f64,
}

/// Tiles for one target, already culled to the clip rectangle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilePlan {
    pub clip: Rect,
    pub tile_width: f64,
    pub tile_height: f64,
    pub tiles: Vec<TilePlacement>,
}

impl TilePlan {
    fn empty(clip: Rect) -> Self {
        TilePlan {
            clip,
            tile_width: 0.0,
            tile_height: 0.0,
            tiles: Vec::new(),
        }
    }
}

/// Tile size in pixels for an image of `image_size` source pixels.
pub fn tile_size(frame: &ReferenceFrame, pattern: &PatternSpec, repeats_per_panel: f64, image_size: (u32, u32)) -> (f64, f64) {
    let (img_w, img_h) = image_size;
    if img_w == 0 || img_h == 0 || !(repeats_per_panel > 0.0) {
        return (0.0, 0.0);
    }
    let width = frame.panel_width_px(pattern) / repeats_per_panel;
    let height = width * f64::from(img_h) / f64::from(img_w);
    (width, height)
}

/// Downward half-drop offset for horizontal repeat `repeat_index`.
pub fn half_drop_offset(requirements: &Requirements, repeat_index: usize, tile_height: f64) -> f64 {
    if !requirements.is_half_drop {
        return 0.0;
    }
    let rpp = requirements.repeats_per_panel;
    let dropped = if requirements.is_multi_repeat() {
        tile_index_within_panel(repeat_index, rpp) % 2 == 1
    } else {
        panel_index_of_repeat(repeat_index, rpp) % 2 == 1
    };
    if dropped {
        tile_height / 2.0
    } else {
        0.0
    }
}

/// Index of a repeat within its panel. Fractional repeat counts round the
/// position down.
pub fn tile_index_within_panel(repeat_index: usize, repeats_per_panel: f64) -> usize {
    (repeat_index as f64 % repeats_per_panel).floor() as usize
}

/// Panel containing the left edge of a repeat.
pub fn panel_index_of_repeat(repeat_index: usize, repeats_per_panel: f64) -> usize {
    (repeat_index as f64 / repeats_per_panel + 1e-9).floor() as usize
}

/// Compute every tile that intersects `area` for `target`.
pub fn plan_tiles(
    area: Rect,
    frame: &ReferenceFrame,
    pattern: &PatternSpec,
    requirements: &Requirements,
    image_size: (u32, u32),
    target: TileTarget,
) -> TilePlan {
    let (tile_w, tile_h) = tile_size(frame, pattern, requirements.repeats_per_panel, image_size);
    if tile_w <= 0.0 || tile_h <= 0.0 || area.is_empty() {
        return TilePlan::empty(area);
    }

    let origin = frame.section(target.section()).grid_origin;
    let total_pattern_width = f64::from(requirements.panels_needed) * frame.panel_width_px(pattern);
    let horizontal = (total_pattern_width / tile_w - 1e-9).ceil().max(0.0) as usize;

    let draw_height = match target {
        TileTarget::Panel(_) => frame.dimensions.total_height,
        TileTarget::WallOnly => area.height,
    };
    let rows = if pattern.has_vertical_repeat() {
        // Also reach the clip top when the origin sits below the area
        let by_height = (draw_height / tile_h).ceil() as usize + 3;
        let by_reach = ((origin.y - area.y) / tile_h).ceil().max(0.0) as usize + 2;
        by_height.max(by_reach)
    } else {
        1
    };

    let mut tiles = Vec::new();
    for i in 0..horizontal {
        let x = origin.x + i as f64 * tile_w;
        if x + tile_w <= area.x || x >= area.right() {
            continue;
        }
        let drop = half_drop_offset(requirements, i, tile_h);
        for row in 0..rows {
            let y = origin.y - (row as f64 + 1.0) * tile_h + drop;
            if y + tile_h <= area.y || y >= area.bottom() {
                continue;
            }
            tiles.push(TilePlacement {
                repeat_index: i,
                row,
                rect: Rect::new(x, y, tile_w, tile_h),
                drop,
            });
        }
    }

    TilePlan {
        clip: area,
        tile_width: tile_w,
        tile_height: tile_h,
        tiles,
    }
}

/// Paint the pattern into `area`. No-op without an image.
pub fn tile_pattern(
    surface: &mut Surface,
    area: Rect,
    frame: &ReferenceFrame,
    session: &RenderSession,
    image: Option<&PatternImage>,
    target: TileTarget,
) {
    let Some(image) = image else {
        return;
    };
    let plan = plan_tiles(
        area,
        frame,
        &session.pattern,
        &session.requirements,
        image.size(),
        target,
    );
    tracing::trace!(?target, tiles = plan.tiles.len(), "Tiling pattern");
    for tile in &plan.tiles {
        surface.draw_image_tile(image.pixmap(), tile.rect, plan.clip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::compute_requirements;
    use crate::config::CatalogDefaults;
    use crate::frame::compute_reference_frame;
    use crate::geometry::{CanvasSize, LayoutMargins};
    use crate::pattern::{safe_default, PatternMatch, SaleTerms};
    use crate::units::Inches;
    use crate::wall::WallSpec;

    fn setup(repeat_w: f64, pattern_match: PatternMatch, repeat_h: Option<f64>) -> (PatternSpec, Requirements, ReferenceFrame) {
        let mut pattern = safe_default(&CatalogDefaults::default());
        pattern.repeat_width_in = repeat_w;
        pattern.repeat_height_in = repeat_h;
        pattern.pattern_match = pattern_match;
        let wall = WallSpec::from_inches(150.0, 96.0).unwrap();
        let req = compute_requirements(&pattern, Inches(150.0), Inches(96.0)).unwrap();
        let frame =
            compute_reference_frame(&wall, &req, &pattern, CanvasSize::default(), &LayoutMargins::default()).unwrap();
        (pattern, req, frame)
    }

    #[test]
    fn test_straight_never_drops() {
        let (_, req, _) = setup(27.0, PatternMatch::Straight, Some(27.0));
        for i in 0..8 {
            assert_eq!(half_drop_offset(&req, i, 10.0), 0.0);
        }
    }

    #[test]
    fn test_multi_repeat_drops_odd_tiles_in_panel() {
        let (_, req, _) = setup(27.0, PatternMatch::HalfDrop, Some(27.0));
        assert_eq!(req.repeats_per_panel, 2.0);
        let drops: Vec<f64> = (0..6).map(|i| half_drop_offset(&req, i, 10.0)).collect();
        assert_eq!(drops, vec![0.0, 5.0, 0.0, 5.0, 0.0, 5.0]);
    }

    #[test]
    fn test_multi_repeat_odd_count_restarts_per_panel() {
        let (_, mut req, _) = setup(18.0, PatternMatch::HalfDrop, Some(18.0));
        req.repeats_per_panel = 3.0;
        // panel 0: tiles 0,1,2 ; panel 1: tiles 3,4,5
        let drops: Vec<f64> = (0..6).map(|i| half_drop_offset(&req, i, 10.0)).collect();
        assert_eq!(drops, vec![0.0, 5.0, 0.0, 0.0, 5.0, 0.0]);
    }

    #[test]
    fn test_single_repeat_drops_odd_panels() {
        let (_, req, _) = setup(54.0, PatternMatch::HalfDrop, Some(54.0));
        assert_eq!(req.repeats_per_panel, 1.0);
        let drops: Vec<f64> = (0..4).map(|i| half_drop_offset(&req, i, 8.0)).collect();
        assert_eq!(drops, vec![0.0, 4.0, 0.0, 4.0]);

        // two tiles per panel width but below the multi-repeat threshold
        let (_, mut req, _) = setup(36.0, PatternMatch::HalfDrop, Some(36.0));
        req.repeats_per_panel = 1.5;
        assert_eq!(half_drop_offset(&req, 1, 8.0), 0.0);
        assert_eq!(half_drop_offset(&req, 2, 8.0), 4.0);
    }

    #[test]
    fn test_tiles_cover_panel_column() {
        let (pattern, req, frame) = setup(54.0, PatternMatch::Straight, Some(54.0));
        let block = frame.panel_block_rect();
        let pw = frame.panel_width_px(&pattern);
        let column = Rect::new(block.x + pw, block.y, pw, block.height);
        let plan = plan_tiles(column, &frame, &pattern, &req, (100, 100), TileTarget::Panel(1));

        assert!(!plan.tiles.is_empty());
        assert!(plan.tiles.iter().all(|t| t.repeat_index == 1));
        let top = plan.tiles.iter().map(|t| t.rect.y).fold(f64::INFINITY, f64::min);
        let bottom = plan.tiles.iter().map(|t| t.rect.bottom()).fold(f64::NEG_INFINITY, f64::max);
        assert!(top <= column.y);
        assert!(bottom >= column.bottom() - 1e-9);
    }

    #[test]
    fn test_non_repeating_single_row() {
        let (pattern, req, frame) = setup(54.0, PatternMatch::Straight, None);
        let block = frame.panel_block_rect();
        let plan = plan_tiles(block, &frame, &pattern, &req, (100, 300), TileTarget::Panel(0));
        assert!(plan.tiles.iter().all(|t| t.row == 0));
        let first = plan.tiles[0];
        assert!((first.rect.bottom() - frame.section1.grid_origin.y).abs() < 1e-9);
    }

    #[test]
    fn test_no_image_size_is_empty() {
        let (pattern, req, frame) = setup(54.0, PatternMatch::Straight, Some(54.0));
        let plan = plan_tiles(frame.panel_block_rect(), &frame, &pattern, &req, (0, 0), TileTarget::WallOnly);
        assert!(plan.tiles.is_empty());
    }

    #[test]
    fn test_yard_pattern_tile_width() {
        let (mut pattern, _, _) = setup(27.0, PatternMatch::Straight, Some(27.0));
        pattern.sale = SaleTerms::Yard {
            roll_width_in: 54.0,
            min_yard_order: 3,
        };
        let wall = WallSpec::from_inches(100.0, 96.0).unwrap();
        let req = compute_requirements(&pattern, Inches(100.0), Inches(96.0)).unwrap();
        let frame =
            compute_reference_frame(&wall, &req, &pattern, CanvasSize::default(), &LayoutMargins::default()).unwrap();
        let (w, h) = tile_size(&frame, &pattern, req.repeats_per_panel, (200, 100));
        assert!((w - 27.0 * frame.scale).abs() < 1e-9);
        assert!((h - w / 2.0).abs() < 1e-9);
    }
}
