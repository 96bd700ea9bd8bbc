//! # Order Quantities
//!
//! Turns requirements into the quantities shown next to a preview: the
//! exact order and a recommended order with spare material for waste and
//! future repairs.

use serde::{Deserialize, Serialize};

use crate::pattern::SaleType;

use super::Requirements;

/// Order quantities for one preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sale_type", rename_all = "lowercase")]
pub enum OrderSummary {
    Panel {
        panels: u32,
        panel_length_ft: u32,
        /// Whole yards in one panel
        yards_per_panel: u32,
        total_yards: u32,
        /// Recommended panel count including spares
        panels_with_excess: u32,
        total_yards_with_excess: u32,
    },
    Yard {
        total_yards: u32,
        total_yards_with_excess: u32,
    },
}

impl OrderSummary {
    /// `excess_factor` is the spare-material multiplier (1.2 by default).
    pub fn from_requirements(requirements: &Requirements, excess_factor: f64) -> Self {
        match requirements.sale_type {
            SaleType::Panel => {
                let panels = requirements.panels_needed;
                let yards_per_panel = (f64::from(requirements.panel_length_ft) / 3.0).round() as u32;
                let panels_with_excess = (f64::from(panels) * excess_factor).ceil() as u32;
                OrderSummary::Panel {
                    panels,
                    panel_length_ft: requirements.panel_length_ft,
                    yards_per_panel,
                    total_yards: panels * yards_per_panel,
                    panels_with_excess,
                    total_yards_with_excess: panels_with_excess * yards_per_panel,
                }
            }
            SaleType::Yard => {
                let total_yards = requirements.total_yardage.unwrap_or(0);
                OrderSummary::Yard {
                    total_yards,
                    total_yards_with_excess: (f64::from(total_yards) * excess_factor).ceil() as u32,
                }
            }
        }
    }

    /// One-line quantity, e.g. `[x3] 15' Panels` or `Total yardage: 13 yds`.
    pub fn quantity_line(&self) -> String {
        match self {
            OrderSummary::Panel {
                panels,
                panel_length_ft,
                ..
            } => format!("[x{}] {}' Panels", panels, panel_length_ft),
            OrderSummary::Yard { total_yards, .. } => format!("Total yardage: {} yds", total_yards),
        }
    }

    /// Same as [`quantity_line`](Self::quantity_line) for the order with spares.
    pub fn excess_line(&self) -> String {
        match self {
            OrderSummary::Panel {
                panels_with_excess,
                panel_length_ft,
                ..
            } => format!("[x{}] {}' Panels", panels_with_excess, panel_length_ft),
            OrderSummary::Yard {
                total_yards_with_excess,
                ..
            } => format!("Total yardage: {} yds", total_yards_with_excess),
        }
    }

    /// Lines printed under an order heading on the preview document.
    pub fn document_lines(&self, with_excess: bool) -> Vec<String> {
        match self {
            OrderSummary::Panel {
                yards_per_panel,
                total_yards,
                total_yards_with_excess,
                ..
            } => {
                let (first, total) = if with_excess {
                    (self.excess_line(), total_yards_with_excess)
                } else {
                    (self.quantity_line(), total_yards)
                };
                vec![
                    first,
                    format!("Yardage per a panel: {} yds", yards_per_panel),
                    format!("Total yardage: {} yds", total),
                ]
            }
            OrderSummary::Yard { .. } if with_excess => vec![self.excess_line()],
            OrderSummary::Yard { .. } => vec![self.quantity_line()],
        }
    }
}
