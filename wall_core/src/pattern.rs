//! # Pattern Catalog
//!
//! [`PatternSpec`] is the immutable description of a purchasable design:
//! repeat size, material width, match type, and how it is sold. Catalog rows
//! arrive as loosely typed [`PatternRecord`]s (one per product-sheet row) and
//! are normalized against [`CatalogDefaults`] into specs.
//!
//! ## Example
//!
//! ```rust
//! use wall_core::pattern::{PatternCatalog, PatternMatch};
//!
//! let catalog = PatternCatalog::demo();
//! let demo = catalog.get("demo-pattern").unwrap();
//! assert_eq!(demo.pattern_match, PatternMatch::Straight);
//! assert_eq!(demo.repeats_per_panel(), 0.5);
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::config::CatalogDefaults;
use crate::errors::{PreviewError, PreviewResult};

/// How adjacent strips line up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PatternMatch {
    #[default]
    Straight,
    #[serde(alias = "half_drop", alias = "halfdrop")]
    HalfDrop,
}

impl PatternMatch {
    /// Parse a catalog cell; anything unrecognized is a straight match.
    pub fn from_cell(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().replace(['_', ' '], "-").as_str() {
            "half-drop" | "halfdrop" => PatternMatch::HalfDrop,
            _ => PatternMatch::Straight,
        }
    }
}

impl fmt::Display for PatternMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternMatch::Straight => write!(f, "Straight"),
            PatternMatch::HalfDrop => write!(f, "Half Drop"),
        }
    }
}

/// Sale unit without the unit-specific data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaleType {
    Panel,
    Yard,
}

/// How a pattern is sold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "sale_type", rename_all = "lowercase")]
pub enum SaleTerms {
    /// Pre-cut panels in fixed lengths
    Panel {
        /// Sorted ascending
        available_lengths_ft: Vec<u32>,
        /// Labels cycled across panels, e.g. "AB"
        panel_sequence: String,
    },
    /// Continuous goods cut to length from a roll
    Yard { roll_width_in: f64, min_yard_order: u32 },
}

/// Immutable description of a purchasable design.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatternSpec {
    pub id: String,
    pub name: String,
    pub sku: String,
    pub repeat_width_in: f64,
    /// `None` when the design does not repeat vertically
    pub repeat_height_in: Option<f64>,
    /// Material width
    pub panel_width_in: f64,
    pub pattern_match: PatternMatch,
    pub sale: SaleTerms,
    pub min_overage_in: f64,
    pub image_url: String,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tearsheet_url: String,
    #[serde(default)]
    pub product_page_url: String,
    #[serde(default)]
    pub view_360_url: String,
}

impl PatternSpec {
    pub fn sale_type(&self) -> SaleType {
        match self.sale {
            SaleTerms::Panel { .. } => SaleType::Panel,
            SaleTerms::Yard { .. } => SaleType::Yard,
        }
    }

    pub fn has_vertical_repeat(&self) -> bool {
        self.repeat_height_in.is_some()
    }

    pub fn is_half_drop(&self) -> bool {
        self.pattern_match == PatternMatch::HalfDrop
    }

    /// Horizontal repeats across one panel (may be fractional)
    pub fn repeats_per_panel(&self) -> f64 {
        self.panel_width_in / self.repeat_width_in
    }

    /// Panel label sequence; empty for yard goods.
    pub fn panel_sequence(&self) -> &str {
        match &self.sale {
            SaleTerms::Panel { panel_sequence, .. } => panel_sequence,
            SaleTerms::Yard { .. } => "",
        }
    }

    /// Sequence label for the panel at `index`, cycling through the
    /// sequence. `None` for yard goods or sequences of one label or fewer.
    pub fn sequence_label(&self, index: usize) -> Option<char> {
        let labels: Vec<char> = self.panel_sequence().chars().collect();
        if labels.len() <= 1 {
            return None;
        }
        Some(labels[index % labels.len()])
    }

    /// Check the metadata can produce sensible geometry.
    pub fn validate(&self) -> PreviewResult<()> {
        if !(self.repeat_width_in > 0.0) {
            return Err(PreviewError::invalid_pattern(
                &self.id,
                "repeat_width_in",
                self.repeat_width_in.to_string(),
                "Repeat width must be positive",
            ));
        }
        if !(self.panel_width_in > 0.0) {
            return Err(PreviewError::invalid_pattern(
                &self.id,
                "panel_width_in",
                self.panel_width_in.to_string(),
                "Panel width must be positive",
            ));
        }
        if let Some(h) = self.repeat_height_in {
            if !(h > 0.0) {
                return Err(PreviewError::invalid_pattern(
                    &self.id,
                    "repeat_height_in",
                    h.to_string(),
                    "Repeat height must be positive",
                ));
            }
        }
        match &self.sale {
            SaleTerms::Panel {
                available_lengths_ft, ..
            } => {
                if available_lengths_ft.is_empty() {
                    return Err(PreviewError::invalid_pattern(
                        &self.id,
                        "available_lengths_ft",
                        "[]",
                        "Panel goods need at least one available length",
                    ));
                }
            }
            SaleTerms::Yard { .. } => {
                if self.repeat_height_in.is_none() {
                    return Err(PreviewError::invalid_pattern(
                        &self.id,
                        "repeat_height_in",
                        "none",
                        "Yard goods are cut by repeat height and need one",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Pattern substituted when catalog data cannot produce a preview.
pub fn safe_default(defaults: &CatalogDefaults) -> PatternSpec {
    PatternSpec {
        id: "demo-pattern".to_string(),
        name: "Demo Pattern".to_string(),
        sku: "DEMO-001".to_string(),
        repeat_width_in: defaults.repeat_width_in,
        repeat_height_in: Some(144.0),
        panel_width_in: defaults.panel_width_in,
        pattern_match: PatternMatch::Straight,
        sale: SaleTerms::Panel {
            available_lengths_ft: defaults.available_lengths_ft.clone(),
            panel_sequence: defaults.panel_sequence.clone(),
        },
        min_overage_in: defaults.min_overage_in,
        image_url: String::new(),
        thumbnail_url: String::new(),
        description: String::new(),
        tearsheet_url: String::new(),
        product_page_url: String::new(),
        view_360_url: String::new(),
    }
}

/// Catalog id derived from a SKU: lowercase, non-alphanumerics become `-`.
pub fn pattern_id_from_sku(sku: &str) -> String {
    sku.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c.to_ascii_lowercase() } else { '-' })
        .collect()
}

// ============================================================================
// Catalog rows
// ============================================================================

/// A product-sheet cell, which may hold a number or free text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Number(f64),
    Text(String),
}

impl CellValue {
    fn as_text(&self) -> String {
        match self {
            CellValue::Number(n) if n.fract() == 0.0 => format!("{}", *n as i64),
            CellValue::Number(n) => n.to_string(),
            CellValue::Text(s) => s.trim().to_string(),
        }
    }

    fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Number(n) => Some(*n),
            CellValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// One product-sheet row, columns named as in the sheet.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternRecord {
    pub pattern_name: Option<String>,
    pub sku: Option<CellValue>,
    pub repeat_width_inches: Option<CellValue>,
    pub repeat_height_inches: Option<CellValue>,
    pub material_width_inches: Option<CellValue>,
    pub available_lengths_feet: Option<CellValue>,
    pub panel_sequence: Option<String>,
    pub sale_type: Option<String>,
    pub min_yard_order: Option<CellValue>,
    pub pattern_match: Option<String>,
    pub repeat_url: Option<String>,
    pub description: Option<String>,
    pub product_tearsheet_url: Option<String>,
    pub product_page_url: Option<String>,
    #[serde(rename = "360_view_url")]
    pub view_360_url: Option<String>,
}

fn positive_or(cell: &Option<CellValue>, fallback: f64) -> f64 {
    cell.as_ref()
        .and_then(CellValue::as_number)
        .filter(|v| *v > 0.0)
        .unwrap_or(fallback)
}

fn text_or_empty(cell: &Option<String>) -> String {
    cell.as_deref().map(str::trim).unwrap_or_default().to_string()
}

impl PatternRecord {
    /// Normalize into a spec. Rows without a name or SKU are skipped.
    pub fn to_spec(&self, defaults: &CatalogDefaults) -> Option<PatternSpec> {
        let name = self.pattern_name.as_deref().map(str::trim).filter(|n| !n.is_empty())?;
        let sku = self.sku.as_ref().map(CellValue::as_text).filter(|s| !s.is_empty())?;

        let repeat_height_in = match &self.repeat_height_inches {
            Some(CellValue::Text(t)) if t.trim().eq_ignore_ascii_case("none") => None,
            other => Some(positive_or(other, 144.0)),
        };

        let is_yard = self
            .sale_type
            .as_deref()
            .map(|s| s.trim().eq_ignore_ascii_case("yard"))
            .unwrap_or(false);

        let sale = if is_yard {
            SaleTerms::Yard {
                roll_width_in: defaults.roll_width_in,
                min_yard_order: self
                    .min_yard_order
                    .as_ref()
                    .and_then(CellValue::as_number)
                    .filter(|v| *v > 0.0)
                    .map(|v| v as u32)
                    .unwrap_or(defaults.min_yard_order),
            }
        } else {
            let mut lengths = match &self.available_lengths_feet {
                Some(cell) => parse_lengths(&cell.as_text()),
                None => defaults.available_lengths_ft.clone(),
            };
            if lengths.is_empty() {
                lengths = defaults.available_lengths_ft.clone();
            }
            lengths.sort_unstable();
            lengths.dedup();
            let sequence = text_or_empty(&self.panel_sequence);
            SaleTerms::Panel {
                available_lengths_ft: lengths,
                panel_sequence: if sequence.is_empty() {
                    defaults.panel_sequence.clone()
                } else {
                    sequence
                },
            }
        };

        let image_url = match self.repeat_url.as_deref().map(str::trim) {
            Some(url) if !url.is_empty() => url.to_string(),
            _ => format!("{}{}.jpg", defaults.image_base_url, sku),
        };

        Some(PatternSpec {
            id: pattern_id_from_sku(&sku),
            name: name.to_string(),
            repeat_width_in: positive_or(&self.repeat_width_inches, defaults.repeat_width_in),
            repeat_height_in,
            panel_width_in: positive_or(&self.material_width_inches, defaults.panel_width_in),
            pattern_match: self
                .pattern_match
                .as_deref()
                .map(PatternMatch::from_cell)
                .unwrap_or_default(),
            sale,
            min_overage_in: defaults.min_overage_in,
            thumbnail_url: image_url.clone(),
            image_url,
            description: text_or_empty(&self.description),
            tearsheet_url: text_or_empty(&self.product_tearsheet_url),
            product_page_url: text_or_empty(&self.product_page_url),
            view_360_url: text_or_empty(&self.view_360_url),
            sku,
        })
    }
}

/// Parse "9, 12, 15" into feet, dropping anything that is not a number.
fn parse_lengths(text: &str) -> Vec<u32> {
    text.split(',')
        .filter_map(|part| part.trim().parse::<f64>().ok())
        .filter(|v| *v > 0.0)
        .map(|v| v as u32)
        .collect()
}

// ============================================================================
// Catalog
// ============================================================================

/// Patterns keyed by id.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PatternCatalog {
    patterns: BTreeMap<String, PatternSpec>,
}

impl PatternCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from sheet rows. Rows that normalize to nothing are skipped.
    pub fn from_records(records: &[PatternRecord], defaults: &CatalogDefaults) -> Self {
        let mut catalog = PatternCatalog::new();
        for (row, record) in records.iter().enumerate() {
            match record.to_spec(defaults) {
                Some(spec) => catalog.insert(spec),
                None => tracing::warn!(row = row + 1, "Skipping catalog row without name or SKU"),
            }
        }
        tracing::info!(count = catalog.len(), "Pattern catalog loaded");
        catalog
    }

    /// Single-entry catalog used when no catalog file is available.
    pub fn demo() -> Self {
        let mut catalog = PatternCatalog::new();
        catalog.insert(safe_default(&CatalogDefaults::default()));
        catalog
    }

    pub fn insert(&mut self, spec: PatternSpec) {
        self.patterns.insert(spec.id.clone(), spec);
    }

    pub fn get(&self, id: &str) -> PreviewResult<&PatternSpec> {
        self.patterns.get(id).ok_or_else(|| PreviewError::pattern_not_found(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PatternSpec> {
        self.patterns.values()
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(json: &str) -> PatternRecord {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_id_from_sku() {
        assert_eq!(pattern_id_from_sku("AB-12 Blue"), "ab-12-blue");
    }

    #[test]
    fn test_record_to_panel_spec() {
        let record = row(
            r#"{"pattern_name": "Fern", "sku": "FERN-01", "repeat_width_inches": 54,
                "repeat_height_inches": "none", "material_width_inches": 54,
                "available_lengths_feet": "15, 9, 12", "pattern_match": "half-drop"}"#,
        );
        let spec = record.to_spec(&CatalogDefaults::default()).unwrap();
        assert_eq!(spec.id, "fern-01");
        assert_eq!(spec.repeat_height_in, None);
        assert_eq!(spec.pattern_match, PatternMatch::HalfDrop);
        assert_eq!(
            spec.sale,
            SaleTerms::Panel {
                available_lengths_ft: vec![9, 12, 15],
                panel_sequence: "AB".to_string()
            }
        );
        assert_eq!(spec.image_url, "FERN-01.jpg");
    }

    #[test]
    fn test_record_to_yard_spec() {
        let record = row(
            r#"{"pattern_name": "Lattice", "sku": 4410, "repeat_width_inches": 27,
                "repeat_height_inches": 36, "sale_type": "yard", "repeat_url": " https://x/l.jpg "}"#,
        );
        let spec = record.to_spec(&CatalogDefaults::default()).unwrap();
        assert_eq!(spec.sku, "4410");
        assert_eq!(spec.sale_type(), SaleType::Yard);
        assert_eq!(
            spec.sale,
            SaleTerms::Yard {
                roll_width_in: 54.0,
                min_yard_order: 3
            }
        );
        assert_eq!(spec.repeat_height_in, Some(36.0));
        assert_eq!(spec.image_url, "https://x/l.jpg");
        assert_eq!(spec.panel_sequence(), "");
    }

    #[test]
    fn test_record_missing_required_is_skipped() {
        let record = row(r#"{"sku": "X"}"#);
        assert!(record.to_spec(&CatalogDefaults::default()).is_none());
        let catalog = PatternCatalog::from_records(&[record], &CatalogDefaults::default());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_validate_rejects_empty_lengths() {
        let mut spec = safe_default(&CatalogDefaults::default());
        spec.sale = SaleTerms::Panel {
            available_lengths_ft: vec![],
            panel_sequence: "AB".into(),
        };
        let err = spec.validate().unwrap_err();
        assert_eq!(err.error_code(), "INVALID_PATTERN_DATA");
    }

    #[test]
    fn test_validate_rejects_zero_widths() {
        let mut spec = safe_default(&CatalogDefaults::default());
        spec.panel_width_in = 0.0;
        assert!(spec.validate().is_err());

        let mut spec = safe_default(&CatalogDefaults::default());
        spec.repeat_height_in = Some(-1.0);
        assert!(spec.validate().is_err());
    }

    #[test]
    fn test_sequence_labels_cycle() {
        let spec = safe_default(&CatalogDefaults::default());
        assert_eq!(spec.sequence_label(0), Some('A'));
        assert_eq!(spec.sequence_label(3), Some('B'));

        let mut single = spec.clone();
        single.sale = SaleTerms::Panel {
            available_lengths_ft: vec![9],
            panel_sequence: "A".into(),
        };
        assert_eq!(single.sequence_label(0), None);
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = PatternCatalog::demo();
        assert!(catalog.get("demo-pattern").is_ok());
        assert!(matches!(
            catalog.get("nope"),
            Err(PreviewError::PatternNotFound { .. })
        ));
    }
}
