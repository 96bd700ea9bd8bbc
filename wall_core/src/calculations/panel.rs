//! # Panel Goods
//!
//! Pre-cut panels come in a short list of fixed lengths. The calculator picks
//! the shortest length that covers the wall plus overage; when none does, it
//! falls back to the longest and flags the result as capped. That fallback is
//! the only case where coverage can fall short of the wall.

use crate::errors::{PreviewError, PreviewResult};
use crate::pattern::{PatternSpec, SaleType};
use crate::units::{Inches, INCHES_PER_FOOT};

use super::{panels_across, Requirements};

/// Pick a panel length for a wall height (overage already added).
///
/// Returns `(length_ft, capped)`. `lengths` must be sorted ascending.
pub fn select_length(lengths: &[u32], needed_height_in: f64) -> Option<(u32, bool)> {
    let covering = lengths
        .iter()
        .copied()
        .find(|len| f64::from(*len) * INCHES_PER_FOOT >= needed_height_in);
    match covering {
        Some(len) => Some((len, false)),
        None => lengths.iter().copied().max().map(|len| (len, true)),
    }
}

/// Requirements for panel goods.
pub fn calculate(
    pattern: &PatternSpec,
    available_lengths_ft: &[u32],
    wall_width: Inches,
    wall_height: Inches,
) -> PreviewResult<Requirements> {
    let needed_height = wall_height.value() + pattern.min_overage_in;
    let panels_needed = panels_across(wall_width, pattern.min_overage_in, pattern.panel_width_in);

    let (panel_length_ft, length_capped) =
        select_length(available_lengths_ft, needed_height).ok_or_else(|| {
            PreviewError::invalid_pattern(
                &pattern.id,
                "available_lengths_ft",
                "[]",
                "Panel goods need at least one available length",
            )
        })?;

    if length_capped {
        tracing::warn!(
            pattern = %pattern.id,
            needed_in = needed_height,
            length_ft = panel_length_ft,
            "Wall is taller than every panel length; using the longest"
        );
    }

    Ok(Requirements {
        sale_type: SaleType::Panel,
        panels_needed,
        panel_length_ft,
        panel_length_extra_in: 0.0,
        total_width_in: f64::from(panels_needed) * pattern.panel_width_in,
        total_height_in: f64::from(panel_length_ft) * INCHES_PER_FOOT,
        total_yardage: None,
        strip_lengths_in: Vec::new(),
        pattern_match: pattern.pattern_match,
        is_half_drop: pattern.is_half_drop(),
        repeats_per_panel: pattern.repeats_per_panel(),
        length_capped,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calculations::compute_requirements;
    use crate::config::CatalogDefaults;
    use crate::pattern::safe_default;

    #[test]
    fn test_select_first_covering_length() {
        assert_eq!(select_length(&[9, 12, 15], 100.0), Some((9, false)));
        assert_eq!(select_length(&[9, 12, 15], 108.0), Some((9, false)));
        assert_eq!(select_length(&[9, 12, 15], 108.5), Some((12, false)));
    }

    #[test]
    fn test_select_falls_back_to_max() {
        assert_eq!(select_length(&[9, 12, 15], 204.0), Some((15, true)));
        assert_eq!(select_length(&[], 10.0), None);
    }

    #[test]
    fn test_tall_wall_scenario() {
        // 54" panels in 9/12/15 ft, wall 150 x 200 in
        let mut pattern = safe_default(&CatalogDefaults::default());
        pattern.repeat_height_in = None;
        let req = compute_requirements(&pattern, Inches(150.0), Inches(200.0)).unwrap();

        assert_eq!(req.panels_needed, 3);
        assert_eq!(req.panel_length_ft, 15);
        assert!(req.length_capped);
        assert_eq!(req.total_width_in, 162.0);
        assert_eq!(req.total_height_in, 180.0);
        assert_eq!(req.total_yardage, None);
    }

    #[test]
    fn test_standard_wall() {
        let pattern = safe_default(&CatalogDefaults::default());
        let req = compute_requirements(&pattern, Inches(120.0), Inches(104.0)).unwrap();
        // 104 + 4 = 108 fits exactly in 9 ft
        assert_eq!(req.panel_length_ft, 9);
        assert!(!req.length_capped);
        assert_eq!(req.panels_needed, 3);
        assert_eq!(req.repeats_per_panel, 0.5);
    }
}
