//! Pixel-space geometry shared by the resolver, tiler, and compositor.
//!
//! All coordinates are `f64` logical pixels with the origin at the top-left
//! of the canvas and `y` growing downward, the same convention as a 2D
//! canvas. Conversion to device pixels happens only at the raster surface.

use serde::{Deserialize, Serialize};

/// Size of a drawing surface in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanvasSize {
    pub width: u32,
    pub height: u32,
}

impl CanvasSize {
    pub const fn new(width: u32, height: u32) -> Self {
        CanvasSize { width, height }
    }

    /// Uniform scale and centering offset that fit `self` inside `target`
    /// while preserving aspect ratio.
    ///
    /// Returns `(scale, offset_x, offset_y)`.
    pub fn fit_within(&self, target: CanvasSize) -> (f64, f64, f64) {
        let scale_x = f64::from(target.width) / f64::from(self.width);
        let scale_y = f64::from(target.height) / f64::from(self.height);
        let scale = scale_x.min(scale_y);
        let offset_x = (f64::from(target.width) - f64::from(self.width) * scale) / 2.0;
        let offset_y = (f64::from(target.height) - f64::from(self.height) * scale) / 2.0;
        (scale, offset_x, offset_y)
    }
}

impl Default for CanvasSize {
    fn default() -> Self {
        CanvasSize::new(1200, 1000)
    }
}

/// Fixed layout constants for the two stacked preview sections.
///
/// Margins leave room for the dimension leaders drawn outside the pattern
/// block; the gap separates Section 1 from Section 2.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutMargins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
    pub section_gap: f64,
    /// Label font size in logical pixels
    pub label_font_px: f64,
}

impl Default for LayoutMargins {
    fn default() -> Self {
        LayoutMargins {
            left: 120.0,
            right: 120.0,
            top: 140.0,
            bottom: 120.0,
            section_gap: 60.0,
            label_font_px: 14.0,
        }
    }
}

/// A point in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }
}

/// Axis-aligned rectangle in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect { x, y, width, height }
    }

    pub fn from_origin(origin: Point, width: f64, height: f64) -> Self {
        Rect::new(origin.x, origin.y, width, height)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Half-open containment: left/top edges inside, right/bottom outside.
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x < self.right() && p.y >= self.y && p.y < self.bottom()
    }

    /// Overlapping region, or `None` when the rectangles do not overlap.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let x0 = self.x.max(other.x);
        let y0 = self.y.max(other.y);
        let x1 = self.right().min(other.right());
        let y1 = self.bottom().min(other.bottom());
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    }
}
