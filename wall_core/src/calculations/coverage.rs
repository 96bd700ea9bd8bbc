//! # Coverage Advisories
//!
//! Non-fatal notices that the ordered material cannot cover the wall as
//! drawn. They are evaluated independently, so a wall can carry both.

use serde::{Deserialize, Serialize};

use crate::config::{AdvisoryMessages, PanelLimits};
use crate::pattern::{PatternSpec, SaleTerms};
use crate::units::INCHES_PER_FOOT;
use crate::wall::WallSpec;

use super::Requirements;

/// A user-visible coverage notice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum CoverageAdvisory {
    /// The design has no vertical repeat and the longest panel is shorter
    /// than the wall plus overage.
    NoVerticalRepeat {
        needed_height_in: f64,
        max_length_ft: u32,
        message: String,
    },
    /// The wall plus overage exceeds the longest panel that can be printed.
    PrintLengthCeiling {
        needed_height_in: f64,
        ceiling_ft: f64,
        message: String,
    },
}

impl CoverageAdvisory {
    pub fn message(&self) -> &str {
        match self {
            CoverageAdvisory::NoVerticalRepeat { message, .. } => message,
            CoverageAdvisory::PrintLengthCeiling { message, .. } => message,
        }
    }
}

/// Evaluate coverage advisories for panel goods. Yard goods are cut to
/// length and never fall short.
pub fn evaluate_coverage(
    pattern: &PatternSpec,
    wall: &WallSpec,
    requirements: &Requirements,
    limits: &PanelLimits,
    messages: &AdvisoryMessages,
) -> Vec<CoverageAdvisory> {
    let SaleTerms::Panel {
        available_lengths_ft, ..
    } = &pattern.sale
    else {
        return Vec::new();
    };

    let needed_height_in = wall.height_in() + pattern.min_overage_in;
    let mut advisories = Vec::new();

    if let Some(max_length_ft) = available_lengths_ft.iter().copied().max() {
        if !pattern.has_vertical_repeat()
            && requirements.panel_length_ft == max_length_ft
            && needed_height_in > f64::from(max_length_ft) * INCHES_PER_FOOT
        {
            advisories.push(CoverageAdvisory::NoVerticalRepeat {
                needed_height_in,
                max_length_ft,
                message: messages.no_vertical_repeat.clone(),
            });
        }
    }

    if needed_height_in > limits.max_panel_height_ft * INCHES_PER_FOOT {
        advisories.push(CoverageAdvisory::PrintLengthCeiling {
            needed_height_in,
            ceiling_ft: limits.max_panel_height_ft,
            message: messages.panel_limit.clone(),
        });
    }

    for advisory in &advisories {
        tracing::warn!(pattern = %pattern.id, ?advisory, "Coverage advisory");
    }
    advisories
}
