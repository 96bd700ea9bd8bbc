//! # Requirement Calculations
//!
//! Wall dimensions plus pattern metadata in, material requirements out.
//! Every calculation follows the same shape:
//!
//! - inputs are a validated [`PatternSpec`] and wall dimensions in inches
//! - `calculate(...) -> PreviewResult<Requirements>` is a pure function
//! - results are JSON-serializable
//!
//! ## Available Calculations
//!
//! - [`panel`] - pre-cut panels in fixed lengths
//! - [`yard`] - continuous goods cut to strip length
//! - [`order`] - order quantities including spare material
//! - [`coverage`] - advisories when the material cannot cover the wall
//!
//! ## Example
//!
//! ```rust
//! use wall_core::calculations::compute_requirements;
//! use wall_core::pattern::PatternCatalog;
//! use wall_core::units::Inches;
//!
//! let catalog = PatternCatalog::demo();
//! let pattern = catalog.get("demo-pattern").unwrap();
//! let req = compute_requirements(pattern, Inches(150.0), Inches(96.0)).unwrap();
//! assert_eq!(req.panels_needed, 3);
//! assert_eq!(req.panel_length_ft, 9);
//! ```

pub mod coverage;
pub mod order;
pub mod panel;
pub mod yard;

use serde::{Deserialize, Serialize};

use crate::errors::{PreviewError, PreviewResult};
use crate::pattern::{PatternMatch, PatternSpec, SaleTerms, SaleType};
use crate::units::Inches;

pub use coverage::{evaluate_coverage, CoverageAdvisory};
pub use order::OrderSummary;

/// Repeats per panel at or above which a half-drop pattern drops per tile
/// instead of per panel.
pub const MULTI_REPEAT_THRESHOLD: f64 = 2.0;

/// True when `repeats_per_panel` counts as multi-repeat.
pub fn is_multi_repeat(repeats_per_panel: f64) -> bool {
    repeats_per_panel >= MULTI_REPEAT_THRESHOLD
}

/// Material requirements for one wall.
///
/// ## JSON Example
///
/// ```json
/// {
///   "sale_type": "yard",
///   "panels_needed": 3,
///   "panel_length_ft": 12,
///   "panel_length_extra_in": 0.0,
///   "total_width_in": 162.0,
///   "total_height_in": 144.0,
///   "total_yardage": 13,
///   "strip_lengths_in": [144.0, 144.0, 144.0],
///   "pattern_match": "half-drop",
///   "is_half_drop": true,
///   "repeats_per_panel": 1.0,
///   "length_capped": false
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Requirements {
    pub sale_type: SaleType,

    /// Panels (or strips, for yard goods) across the wall
    pub panels_needed: u32,

    /// Chosen panel length; whole feet of the strip length for yard goods
    pub panel_length_ft: u32,

    /// Inches past `panel_length_ft` (yard goods only)
    pub panel_length_extra_in: f64,

    /// `panels_needed × panel_width`
    pub total_width_in: f64,

    /// Panel length for panel goods; longest strip for yard goods
    pub total_height_in: f64,

    /// Yard goods only
    pub total_yardage: Option<u32>,

    /// Per-strip cut lengths (yard goods only)
    pub strip_lengths_in: Vec<f64>,

    pub pattern_match: PatternMatch,
    pub is_half_drop: bool,
    pub repeats_per_panel: f64,

    /// The wall plus overage was taller than every available length, so
    /// the longest one was used
    pub length_capped: bool,
}

impl Requirements {
    pub fn is_multi_repeat(&self) -> bool {
        is_multi_repeat(self.repeats_per_panel)
    }

    /// Longest strip; equals `total_height_in` for every sale type.
    pub fn max_strip_length_in(&self) -> f64 {
        self.strip_lengths_in
            .iter()
            .copied()
            .fold(self.total_height_in, f64::max)
    }
}

/// Compute material requirements for a wall.
///
/// Validates the wall dimensions and the pattern metadata, then dispatches
/// on the sale unit.
pub fn compute_requirements(
    pattern: &PatternSpec,
    wall_width: Inches,
    wall_height: Inches,
) -> PreviewResult<Requirements> {
    check_wall("wall_width_in", wall_width)?;
    check_wall("wall_height_in", wall_height)?;
    pattern.validate()?;

    let requirements = match &pattern.sale {
        SaleTerms::Panel {
            available_lengths_ft, ..
        } => panel::calculate(pattern, available_lengths_ft, wall_width, wall_height),
        SaleTerms::Yard { min_yard_order, .. } => {
            yard::calculate(pattern, *min_yard_order, wall_width, wall_height)
        }
    }?;

    tracing::debug!(
        pattern = %pattern.id,
        panels = requirements.panels_needed,
        length_ft = requirements.panel_length_ft,
        height_in = requirements.total_height_in,
        "Requirements computed"
    );
    Ok(requirements)
}

fn check_wall(field: &str, value: Inches) -> PreviewResult<()> {
    if !(value.value() > 0.0) || !value.value().is_finite() {
        return Err(PreviewError::invalid_input(
            field,
            value.value().to_string(),
            "Wall dimensions must be positive",
        ));
    }
    Ok(())
}

/// Shared by both sale units: panels across the wall including overage.
pub(crate) fn panels_across(wall_width: Inches, min_overage_in: f64, panel_width_in: f64) -> u32 {
    ((wall_width.value() + min_overage_in) / panel_width_in).ceil() as u32
}
