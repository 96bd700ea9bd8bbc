//! Property-based invariant tests for requirements, frames, and tiling.
//!
//! These tests verify invariants that must hold for any valid wall:
//!
//! 1. Panel goods with a covering length cover the wall plus overage.
//! 2. Panel count is `ceil((width + overage) / panel width)`.
//! 3. Walls taller than every length are bottom-anchored on the panel block.
//! 4. `compute_reference_frame` is deterministic.
//! 5. The wall sits at the same offset from the grid origin in both sections.
//! 6. The pattern phase at the wall's top-left corner matches across sections.
//! 7. Half-drop parity follows the repeat-per-panel rules.
//! 8. Single-repeat half-drop strips include the extra half repeat.
//! 9. End-to-end scenarios through the workflow.

use proptest::prelude::*;

use wall_core::calculations::yard::strip_length;
use wall_core::calculations::{compute_requirements, CoverageAdvisory};
use wall_core::config::{CatalogDefaults, PreviewConfig};
use wall_core::frame::{compute_reference_frame, Section};
use wall_core::geometry::{CanvasSize, LayoutMargins, Point, Rect};
use wall_core::pattern::{safe_default, PatternCatalog, PatternMatch, PatternSpec, SaleTerms};
use wall_core::session::PreviewWorkflow;
use wall_core::tiler::{half_drop_offset, plan_tiles, tile_index_within_panel, TilePlan, TileTarget};
use wall_core::units::Inches;
use wall_core::wall::WallSpec;

// ── Helpers ─────────────────────────────────────────────────────────────

fn panel_pattern(repeat_w: f64, repeat_h: Option<f64>, pattern_match: PatternMatch) -> PatternSpec {
    let mut p = safe_default(&CatalogDefaults::default());
    p.id = "prop".into();
    p.repeat_width_in = repeat_w;
    p.repeat_height_in = repeat_h;
    p.pattern_match = pattern_match;
    p
}

fn yard_pattern(repeat_w: f64, repeat_h: f64, pattern_match: PatternMatch) -> PatternSpec {
    let mut p = panel_pattern(repeat_w, Some(repeat_h), pattern_match);
    p.sale = SaleTerms::Yard {
        roll_width_in: 54.0,
        min_yard_order: 3,
    };
    p
}

fn match_strategy() -> impl Strategy<Value = PatternMatch> {
    prop_oneof![Just(PatternMatch::Straight), Just(PatternMatch::HalfDrop)]
}

fn repeat_width_strategy() -> impl Strategy<Value = f64> {
    prop::sample::select(vec![13.5, 18.0, 27.0, 36.0, 54.0])
}

fn pattern_strategy() -> impl Strategy<Value = PatternSpec> {
    (
        repeat_width_strategy(),
        prop::sample::select(vec![18.0, 25.0, 27.0, 36.0]),
        match_strategy(),
        any::<bool>(),
    )
        .prop_map(|(rw, rh, m, yard)| {
            if yard {
                yard_pattern(rw, rh, m)
            } else {
                panel_pattern(rw, Some(rh), m)
            }
        })
}

/// Offset of `corner` inside the tile that contains it.
fn phase_at(plan: &TilePlan, corner: Point) -> Option<(f64, f64)> {
    let probe = Point::new(corner.x + 0.25, corner.y + 0.25);
    plan.tiles
        .iter()
        .find(|t| t.rect.contains(probe))
        .map(|t| (corner.x - t.rect.x, corner.y - t.rect.y))
}

// ═════════════════════════════════════════════════════════════════════════
// 1-2. Panel coverage and count
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn panel_length_covers_wall(w in 24.0f64..400.0, h in 24.0f64..176.0, rw in repeat_width_strategy()) {
        let pattern = panel_pattern(rw, Some(rw), PatternMatch::Straight);
        let req = compute_requirements(&pattern, Inches(w), Inches(h)).unwrap();
        prop_assert!(!req.length_capped);
        prop_assert!(f64::from(req.panel_length_ft) * 12.0 >= h + pattern.min_overage_in);
        let expected = ((w + pattern.min_overage_in) / pattern.panel_width_in).ceil() as u32;
        prop_assert_eq!(req.panels_needed, expected);
        prop_assert!(req.total_width_in >= w + pattern.min_overage_in);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 3. Bottom anchoring
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn tall_walls_are_bottom_anchored(w in 24.0f64..300.0, h in 177.0f64..320.0) {
        let pattern = panel_pattern(54.0, Some(54.0), PatternMatch::Straight);
        let wall = WallSpec::from_inches(w, h).unwrap();
        let req = compute_requirements(&pattern, Inches(w), Inches(h)).unwrap();
        prop_assert_eq!(req.panel_length_ft, 15);
        prop_assert!(req.length_capped);

        let frame = compute_reference_frame(&wall, &req, &pattern, CanvasSize::default(), &LayoutMargins::default()).unwrap();
        prop_assert!(frame.bottom_anchored);
        let wall_bottom = frame.wall_rect(Section::FullCoverage).bottom();
        let block_bottom = frame.panel_block_rect().bottom();
        prop_assert!((wall_bottom - block_bottom).abs() < 1.0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 4-5. Determinism and wall offset
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn frame_is_deterministic_and_offset_consistent(
        pattern in pattern_strategy(),
        w in 24.0f64..400.0,
        h in 24.0f64..320.0,
        cw in 600u32..2400,
        ch in 600u32..2000,
    ) {
        let wall = WallSpec::from_inches(w, h).unwrap();
        let req = compute_requirements(&pattern, Inches(w), Inches(h)).unwrap();
        let canvas = CanvasSize::new(cw, ch);
        let layout = LayoutMargins::default();

        let a = compute_reference_frame(&wall, &req, &pattern, canvas, &layout).unwrap();
        let b = compute_reference_frame(&wall, &req, &pattern, canvas, &layout).unwrap();
        prop_assert_eq!(a, b);

        let (dx1, dy1) = a.wall_offset_from_origin(Section::FullCoverage);
        let (dx2, dy2) = a.wall_offset_from_origin(Section::WallOnly);
        prop_assert!((dx1 - dx2).abs() < 1e-6);
        prop_assert!((dy1 - dy2).abs() < 1e-6);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 6. Phase continuity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn phase_matches_at_wall_corner(
        pattern in pattern_strategy(),
        w in 24.0f64..300.0,
        h in 24.0f64..250.0,
        img_w in 50u32..400,
        img_h in 50u32..400,
    ) {
        let wall = WallSpec::from_inches(w, h).unwrap();
        let req = compute_requirements(&pattern, Inches(w), Inches(h)).unwrap();
        let frame = compute_reference_frame(&wall, &req, &pattern, CanvasSize::default(), &LayoutMargins::default()).unwrap();

        let wall1 = frame.wall_rect(Section::FullCoverage);
        let wall2 = frame.wall_rect(Section::WallOnly);
        let plan1 = plan_tiles(wall1, &frame, &pattern, &req, (img_w, img_h), TileTarget::Panel(0));
        let plan2 = plan_tiles(wall2, &frame, &pattern, &req, (img_w, img_h), TileTarget::WallOnly);

        let phase1 = phase_at(&plan1, wall1.origin());
        let phase2 = phase_at(&plan2, wall2.origin());
        prop_assert!(phase1.is_some(), "no tile at Section 1 wall corner");
        let (p1x, p1y) = phase1.unwrap();
        let (p2x, p2y) = phase2.unwrap();
        prop_assert!((p1x - p2x).abs() < 1e-6, "x phase {} vs {}", p1x, p2x);
        prop_assert!((p1y - p2y).abs() < 1e-6, "y phase {} vs {}", p1y, p2y);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 7. Half-drop parity
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn half_drop_parity(rw in repeat_width_strategy(), i in 0usize..40, tile_h in 1.0f64..500.0) {
        let pattern = panel_pattern(rw, Some(rw), PatternMatch::HalfDrop);
        let req = compute_requirements(&pattern, Inches(300.0), Inches(96.0)).unwrap();
        let rpp = req.repeats_per_panel;
        let drop = half_drop_offset(&req, i, tile_h);

        let dropped = if rpp >= 2.0 {
            tile_index_within_panel(i, rpp) % 2 == 1
        } else {
            ((i as f64 / rpp + 1e-9).floor() as usize) % 2 == 1
        };
        let expected = if dropped { tile_h / 2.0 } else { 0.0 };
        prop_assert_eq!(drop, expected);

        let straight = panel_pattern(rw, Some(rw), PatternMatch::Straight);
        let req = compute_requirements(&straight, Inches(300.0), Inches(96.0)).unwrap();
        prop_assert_eq!(half_drop_offset(&req, i, tile_h), 0.0);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 8. Single-repeat half-drop strip bound
// ═════════════════════════════════════════════════════════════════════════

proptest! {
    #[test]
    fn single_repeat_strip_includes_half_repeat(needed in 24.0f64..400.0, r in 6.0f64..72.0) {
        let length = strip_length(needed, r, true);
        prop_assert!(length >= needed + r / 2.0 - 1e-9);
        prop_assert!(length < needed + r / 2.0 + r + 1e-9);
        let repeats = length / r;
        prop_assert!((repeats - repeats.round()).abs() < 1e-9);

        let plain = strip_length(needed, r, false);
        prop_assert!(plain >= needed - 1e-9);
        prop_assert!(plain <= length);
    }
}

// ═════════════════════════════════════════════════════════════════════════
// 9. Scenarios
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn scenario_half_drop_yard_goods() {
    let pattern = yard_pattern(54.0, 36.0, PatternMatch::HalfDrop);
    let mut catalog = PatternCatalog::new();
    catalog.insert(pattern);
    let mut workflow = PreviewWorkflow::new(PreviewConfig::default(), catalog);

    let (session, _) = workflow
        .generate("prop", WallSpec::from_inches(108.0, 96.0).unwrap())
        .unwrap();
    assert_eq!(session.requirements.panels_needed, 3);
    assert_eq!(session.requirements.strip_lengths_in, vec![144.0; 3]);
    assert_eq!(session.requirements.total_yardage, Some(13));
    assert!(session.advisories.is_empty());
}

#[test]
fn scenario_tall_non_repeating_panels() {
    let pattern = panel_pattern(54.0, None, PatternMatch::Straight);
    let mut catalog = PatternCatalog::new();
    catalog.insert(pattern);
    let mut workflow = PreviewWorkflow::new(PreviewConfig::default(), catalog);

    let (session, _) = workflow
        .generate("prop", WallSpec::from_inches(150.0, 200.0).unwrap())
        .unwrap();
    assert_eq!(session.requirements.panels_needed, 3);
    assert_eq!(session.requirements.panel_length_ft, 15);
    assert!(workflow.last_frame().unwrap().frame.bottom_anchored);
    assert!(session
        .advisories
        .iter()
        .any(|a| matches!(a, CoverageAdvisory::NoVerticalRepeat { .. })));
    // 204 in is below the 27 ft print ceiling
    assert!(!session
        .advisories
        .iter()
        .any(|a| matches!(a, CoverageAdvisory::PrintLengthCeiling { .. })));
}

#[test]
fn scenario_wall_above_print_ceiling() {
    let mut pattern = panel_pattern(54.0, None, PatternMatch::Straight);
    pattern.sale = SaleTerms::Panel {
        available_lengths_ft: vec![9, 12, 15],
        panel_sequence: "ABC".into(),
    };
    let mut catalog = PatternCatalog::new();
    catalog.insert(pattern);
    let mut workflow = PreviewWorkflow::new(PreviewConfig::default(), catalog);

    let (session, _) = workflow
        .generate("prop", WallSpec::from_inches(100.0, 330.0).unwrap())
        .unwrap();
    assert_eq!(session.advisories.len(), 2);
}

#[test]
fn empty_wall_area_has_no_tiles() {
    let pattern = panel_pattern(27.0, Some(27.0), PatternMatch::Straight);
    let wall = WallSpec::from_inches(100.0, 96.0).unwrap();
    let req = compute_requirements(&pattern, Inches(100.0), Inches(96.0)).unwrap();
    let frame = compute_reference_frame(&wall, &req, &pattern, CanvasSize::default(), &LayoutMargins::default()).unwrap();
    let plan = plan_tiles(Rect::new(10.0, 10.0, 0.0, 0.0), &frame, &pattern, &req, (100, 100), TileTarget::WallOnly);
    assert!(plan.tiles.is_empty());
}
