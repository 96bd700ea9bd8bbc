//! # Wall Dimensions
//!
//! A wall is entered as feet + inches pairs and normalized to total inches.
//! The original pairs are kept for titles and labels.
//!
//! ## Example
//!
//! ```rust
//! use wall_core::units::FeetInches;
//! use wall_core::wall::WallSpec;
//!
//! let wall = WallSpec::new(FeetInches::new(9, 0.0), FeetInches::new(8, 0.0)).unwrap();
//! assert_eq!(wall.width_in(), 108.0);
//! assert_eq!(wall.height_in(), 96.0);
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{PreviewError, PreviewResult};
use crate::units::{FeetInches, INCHES_PER_FOOT};

/// Wall to be covered. Both dimensions are positive.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WallSpec {
    pub width: FeetInches,
    pub height: FeetInches,
}

impl WallSpec {
    pub fn new(width: FeetInches, height: FeetInches) -> PreviewResult<Self> {
        check_dimension("wall_width", width)?;
        check_dimension("wall_height", height)?;
        Ok(WallSpec { width, height })
    }

    /// Build from total inches, splitting into whole feet + remainder.
    pub fn from_inches(width_in: f64, height_in: f64) -> PreviewResult<Self> {
        WallSpec::new(split_inches(width_in), split_inches(height_in))
    }

    pub fn width_in(&self) -> f64 {
        self.width.total_inches().value()
    }

    pub fn height_in(&self) -> f64 {
        self.height.total_inches().value()
    }
}

fn split_inches(total: f64) -> FeetInches {
    if !(total > 0.0) {
        return FeetInches::new(0, total.min(0.0));
    }
    let feet = (total / INCHES_PER_FOOT).floor();
    FeetInches::new(feet as u32, total - feet * INCHES_PER_FOOT)
}

fn check_dimension(field: &str, value: FeetInches) -> PreviewResult<()> {
    if !value.inches.is_finite() || value.inches < 0.0 {
        return Err(PreviewError::invalid_input(
            field,
            value.inches.to_string(),
            "Inches must be a non-negative number",
        ));
    }
    if !(value.total_inches().value() > 0.0) {
        return Err(PreviewError::invalid_input(
            field,
            value.to_string(),
            "Wall dimensions must be greater than zero",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_zero_wall() {
        let err = WallSpec::new(FeetInches::new(0, 0.0), FeetInches::new(8, 0.0)).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_INPUT");
    }

    #[test]
    fn test_rejects_negative_inches() {
        assert!(WallSpec::new(FeetInches::new(8, -2.0), FeetInches::new(8, 0.0)).is_err());
    }

    #[test]
    fn test_from_inches_splits() {
        let wall = WallSpec::from_inches(150.0, 200.0).unwrap();
        assert_eq!(wall.width, FeetInches::new(12, 6.0));
        assert_eq!(wall.height, FeetInches::new(16, 8.0));
        assert_eq!(wall.height_in(), 200.0);
    }
}
