//! # Yard Goods
//!
//! Continuous goods are cut into strips that are whole multiples of the
//! vertical repeat. Half-drop patterns with a single repeat per strip shift
//! every other strip by half a repeat, so each strip needs that extra half
//! repeat plus one spare yard on the order.
//!
//! ## Strip length
//!
//! | Match                     | Strip length                                  |
//! |---------------------------|-----------------------------------------------|
//! | straight                  | `ceil(H / r) × r`                             |
//! | half-drop, multi-repeat   | `ceil(H / r) × r`                             |
//! | half-drop, single-repeat  | `ceil((H + r/2) / r) × r`                     |
//!
//! where `H` is wall height plus overage and `r` the repeat height.

use crate::errors::{PreviewError, PreviewResult};
use crate::pattern::{PatternSpec, SaleType};
use crate::units::{Inches, INCHES_PER_FOOT, INCHES_PER_YARD};

use super::{is_multi_repeat, panels_across, Requirements};

/// Cut length of one strip.
pub fn strip_length(needed_height_in: f64, repeat_height_in: f64, half_drop_single: bool) -> f64 {
    let height = if half_drop_single {
        needed_height_in + repeat_height_in / 2.0
    } else {
        needed_height_in
    };
    (height / repeat_height_in).ceil() * repeat_height_in
}

/// Yards to order for a set of strips, never below the minimum order.
pub fn total_yardage(strip_lengths_in: &[f64], extra_yards: f64, min_yard_order: u32) -> u32 {
    let inches: f64 = strip_lengths_in.iter().sum();
    let yards = (inches / INCHES_PER_YARD + extra_yards).ceil() as u32;
    yards.max(min_yard_order)
}

/// Requirements for yard goods.
pub fn calculate(
    pattern: &PatternSpec,
    min_yard_order: u32,
    wall_width: Inches,
    wall_height: Inches,
) -> PreviewResult<Requirements> {
    let repeat_height = pattern.repeat_height_in.ok_or_else(|| {
        PreviewError::invalid_pattern(
            &pattern.id,
            "repeat_height_in",
            "none",
            "Yard goods are cut by repeat height and need one",
        )
    })?;

    let needed_height = wall_height.value() + pattern.min_overage_in;
    let strips_needed = panels_across(wall_width, pattern.min_overage_in, pattern.panel_width_in);
    let repeats_per_panel = pattern.repeats_per_panel();
    let half_drop_single = pattern.is_half_drop() && !is_multi_repeat(repeats_per_panel);

    let length = strip_length(needed_height, repeat_height, half_drop_single);
    let strip_lengths_in = vec![length; strips_needed as usize];
    let extra_yards = if half_drop_single { 1.0 } else { 0.0 };
    let yardage = total_yardage(&strip_lengths_in, extra_yards, min_yard_order);

    tracing::debug!(
        pattern = %pattern.id,
        strips = strips_needed,
        strip_in = length,
        repeats_per_panel,
        half_drop_single,
        yardage,
        "Yard requirements"
    );

    Ok(Requirements {
        sale_type: SaleType::Yard,
        panels_needed: strips_needed,
        panel_length_ft: (length / INCHES_PER_FOOT).floor() as u32,
        panel_length_extra_in: length % INCHES_PER_FOOT,
        total_width_in: f64::from(strips_needed) * pattern.panel_width_in,
        total_height_in: length,
        total_yardage: Some(yardage),
        strip_lengths_in,
        pattern_match: pattern.pattern_match,
        is_half_drop: pattern.is_half_drop(),
        repeats_per_panel,
        length_capped: false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::compute_requirements;
    use crate::config::CatalogDefaults;
    use crate::pattern::{safe_default, PatternMatch, SaleTerms};

    fn yard_pattern(repeat_w: f64, repeat_h: f64, pattern_match: PatternMatch) -> PatternSpec {
        let mut p = safe_default(&CatalogDefaults::default());
        p.id = "yard-test".into();
        p.repeat_width_in = repeat_w;
        p.repeat_height_in = Some(repeat_h);
        p.panel_width_in = 54.0;
        p.pattern_match = pattern_match;
        p.sale = SaleTerms::Yard {
            roll_width_in: 54.0,
            min_yard_order: 3,
        };
        p
    }

    #[test]
    fn test_half_drop_single_repeat_scenario() {
        let pattern = yard_pattern(54.0, 36.0, PatternMatch::HalfDrop);
        let req = compute_requirements(&pattern, Inches(108.0), Inches(96.0)).unwrap();

        assert_eq!(req.panels_needed, 3);
        assert_eq!(req.strip_lengths_in, vec![144.0; 3]);
        assert_eq!(req.total_height_in, 144.0);
        assert_eq!(req.panel_length_ft, 12);
        assert_eq!(req.panel_length_extra_in, 0.0);
        // 432 in = 12 yd, plus one spare yard
        assert_eq!(req.total_yardage, Some(13));
    }

    #[test]
    fn test_straight_match() {
        let pattern = yard_pattern(27.0, 25.0, PatternMatch::Straight);
        let req = compute_requirements(&pattern, Inches(100.0), Inches(96.0)).unwrap();
        // 100 in needed -> 4 repeats of 25
        assert_eq!(req.total_height_in, 100.0);
        assert_eq!(req.panel_length_ft, 8);
        assert_eq!(req.panel_length_extra_in, 4.0);
        // 2 strips x 100 in = 5.56 yd
        assert_eq!(req.total_yardage, Some(6));
    }

    #[test]
    fn test_half_drop_multi_repeat_no_extra() {
        let pattern = yard_pattern(27.0, 36.0, PatternMatch::HalfDrop);
        let req = compute_requirements(&pattern, Inches(50.0), Inches(96.0)).unwrap();
        assert_eq!(req.repeats_per_panel, 2.0);
        assert_eq!(req.total_height_in, 108.0);
        // 1 strip x 108 in = 3 yd, no spare
        assert_eq!(req.total_yardage, Some(3));
    }

    #[test]
    fn test_min_yard_order() {
        assert_eq!(total_yardage(&[36.0], 0.0, 3), 3);
        assert_eq!(total_yardage(&[144.0, 144.0], 0.0, 3), 8);
    }

    #[test]
    fn test_missing_repeat_height_rejected() {
        let mut pattern = yard_pattern(54.0, 36.0, PatternMatch::Straight);
        pattern.repeat_height_in = None;
        let err = compute_requirements(&pattern, Inches(100.0), Inches(96.0)).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PATTERN_DATA");
    }
}
