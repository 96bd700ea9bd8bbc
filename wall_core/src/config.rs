//! # Preview Configuration
//!
//! Every tunable constant of the preview engine in one serde structure:
//! catalog defaults, the absolute panel-height ceiling, layout margins,
//! canvas sizes, export targets, the excess-order factor, and the advisory
//! texts shown next to a preview.
//!
//! Each section is `#[serde(default)]`, so a config file only needs the
//! values it overrides.
//!
//! ## Example
//!
//! ```rust
//! use wall_core::config::PreviewConfig;
//!
//! let config: PreviewConfig = serde_json::from_str(r#"{"limits": {"max_panel_height_ft": 20}}"#).unwrap();
//! assert_eq!(config.limits.max_panel_height_ft, 20.0);
//! assert_eq!(config.defaults.min_overage_in, 4.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::geometry::{CanvasSize, LayoutMargins};

/// Root configuration object.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewConfig {
    pub business: BusinessInfo,
    pub defaults: CatalogDefaults,
    pub limits: PanelLimits,
    pub layout: LayoutMargins,
    pub screen: CanvasSize,
    pub export: ExportTargets,
    pub order: OrderPolicy,
    pub messages: AdvisoryMessages,
}

/// Document header and contact footer. Empty contact fields are omitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessInfo {
    pub name: String,
    pub email: String,
    pub website: String,
    pub location: String,
}

impl Default for BusinessInfo {
    fn default() -> Self {
        BusinessInfo {
            name: "Wallcast Studio".to_string(),
            email: String::new(),
            website: String::new(),
            location: String::new(),
        }
    }
}

/// Fallback values applied to catalog rows with missing columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogDefaults {
    pub repeat_width_in: f64,
    pub panel_width_in: f64,
    pub available_lengths_ft: Vec<u32>,
    pub panel_sequence: String,
    pub min_overage_in: f64,
    pub roll_width_in: f64,
    pub min_yard_order: u32,
    /// Prefix for `{sku}.jpg` when a row has no repeat image URL
    pub image_base_url: String,
}

impl Default for CatalogDefaults {
    fn default() -> Self {
        CatalogDefaults {
            repeat_width_in: 108.0,
            panel_width_in: 54.0,
            available_lengths_ft: vec![9, 12, 15],
            panel_sequence: "AB".to_string(),
            min_overage_in: 4.0,
            roll_width_in: 54.0,
            min_yard_order: 3,
            image_base_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelLimits {
    /// Longest panel the print process can produce, in feet
    pub max_panel_height_ft: f64,
}

impl Default for PanelLimits {
    fn default() -> Self {
        PanelLimits {
            max_panel_height_ft: 27.0,
        }
    }
}

/// High-resolution raster targets.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportTargets {
    pub print: PrintPage,
    pub view: CanvasSize,
}

impl Default for ExportTargets {
    fn default() -> Self {
        ExportTargets {
            print: PrintPage::default(),
            view: CanvasSize::new(4800, 3600),
        }
    }
}

/// Landscape print page. The drawing area is the page minus the margins and
/// the text column on the right.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintPage {
    pub width_in: f64,
    pub height_in: f64,
    pub dpi: f64,
    pub margin_in: f64,
    pub text_column_in: f64,
}

impl PrintPage {
    /// Drawing area in inches `(width, height)`.
    pub fn drawing_area_in(&self) -> (f64, f64) {
        (
            self.width_in - 2.0 * self.margin_in - self.text_column_in,
            self.height_in - 2.0 * self.margin_in,
        )
    }

    /// Raster size of the drawing area at the configured resolution.
    pub fn canvas_size(&self) -> CanvasSize {
        let (w, h) = self.drawing_area_in();
        CanvasSize::new(
            (w * self.dpi).round().max(0.0) as u32,
            (h * self.dpi).round().max(0.0) as u32,
        )
    }
}

impl Default for PrintPage {
    fn default() -> Self {
        PrintPage {
            width_in: 24.0,
            height_in: 18.0,
            dpi: 300.0,
            margin_in: 0.25,
            text_column_in: 3.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrderPolicy {
    /// Multiplier for the recommended order including spare material
    pub excess_factor: f64,
}

impl Default for OrderPolicy {
    fn default() -> Self {
        OrderPolicy { excess_factor: 1.2 }
    }
}

/// User-visible texts for coverage advisories and the document footer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdvisoryMessages {
    pub no_vertical_repeat: String,
    pub panel_limit: String,
    pub disclaimer: String,
}

impl Default for AdvisoryMessages {
    fn default() -> Self {
        AdvisoryMessages {
            no_vertical_repeat: "This pattern does not repeat vertically and the wall is taller than the \
                longest available panel. Contact us to discuss options for covering the full height."
                .to_string(),
            panel_limit: "The wall is taller than the longest panel we can print. Additional seams or a \
                custom solution will be required."
                .to_string(),
            disclaimer: "Preview is for visualization only. Colors and scale may vary from the printed \
                product. Verify measurements before ordering."
                .to_string(),
        }
    }
}
