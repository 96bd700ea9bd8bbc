//! # Unit Types
//!
//! Length helpers for wallpaper estimates. Wallcast works in inches
//! internally; panel lengths are sold in whole feet and continuous goods in
//! whole yards, so the conversion constants live here along with the
//! feet-and-inches display formats used on drawings.
//!
//! ## Example
//!
//! ```rust
//! use wall_core::units::{format_feet_inches, FeetInches, Inches};
//!
//! let wall = FeetInches::new(12, 6.0);
//! assert_eq!(wall.total_inches(), Inches(150.0));
//! assert_eq!(wall.to_string(), "12'6\"");
//! assert_eq!(format_feet_inches(Inches(54.0)), "4'-6\"");
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// Inches per foot
pub const INCHES_PER_FOOT: f64 = 12.0;

/// Inches per yard
pub const INCHES_PER_YARD: f64 = 36.0;

/// Length in inches
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Inches(pub f64);

impl Inches {
    /// Get the raw f64 value
    pub fn value(self) -> f64 {
        self.0
    }
}

// ============================================================================
// Feet + Inches pairs
// ============================================================================

/// A measurement entered as whole feet plus inches.
///
/// This is how walls are measured and entered; the calculator only ever sees
/// [`FeetInches::total_inches`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FeetInches {
    pub feet: u32,
    pub inches: f64,
}

impl FeetInches {
    pub fn new(feet: u32, inches: f64) -> Self {
        FeetInches { feet, inches }
    }

    /// Total length in inches
    pub fn total_inches(&self) -> Inches {
        Inches(f64::from(self.feet) * INCHES_PER_FOOT + self.inches)
    }

    /// True when both parts are zero (nothing entered)
    pub fn is_zero(&self) -> bool {
        self.feet == 0 && self.inches == 0.0
    }

    /// Drawing label format: `9'-6"`, or `9'` when there are no inches.
    pub fn dashed(&self) -> String {
        if self.inches > 0.0 {
            format!("{}'-{}\"", self.feet, trim_number(self.inches))
        } else {
            format!("{}'", self.feet)
        }
    }
}

impl fmt::Display for FeetInches {
    /// Title format: `9'6"`, or `9'` when there are no inches.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.inches > 0.0 {
            write!(f, "{}'{}\"", self.feet, trim_number(self.inches))
        } else {
            write!(f, "{}'", self.feet)
        }
    }
}

/// Format a length in inches as a dimension label (`4'-6"` or `4'`).
///
/// Inches are rounded to the nearest whole inch; a rounded value of 12 rolls
/// into the next foot.
pub fn format_feet_inches(length: Inches) -> String {
    let total = length.0.max(0.0);
    let mut feet = (total / INCHES_PER_FOOT).floor() as u32;
    let mut inches = (total % INCHES_PER_FOOT).round() as u32;
    if inches >= 12 {
        feet += 1;
        inches -= 12;
    }
    if inches > 0 {
        format!("{}'-{}\"", feet, inches)
    } else {
        format!("{}'", feet)
    }
}

/// Print an f64 without a trailing `.0` for whole values.
fn trim_number(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}
