//! # wall_core - Wallpaper Preview Engine
//!
//! `wall_core` computes how much wallpaper a wall needs and draws a two-section
//! preview of it: every panel with the overage dimmed, then the wall alone, both
//! on one continuous pattern grid. All inputs and outputs are JSON-serializable.
//!
//! ## Design Philosophy
//!
//! - **Pure geometry**: requirements, frames, and tile plans are plain functions
//! - **Immutable sessions**: every draw reads one `Arc<RenderSession>`
//! - **Explicit canvases**: screen and export renders differ only in canvas size
//! - **Rich Errors**: structured error types, not just strings
//!
//! ## Quick Start
//!
//! ```rust
//! use wall_core::config::PreviewConfig;
//! use wall_core::pattern::PatternCatalog;
//! use wall_core::session::PreviewWorkflow;
//! use wall_core::wall::WallSpec;
//!
//! let mut workflow = PreviewWorkflow::new(PreviewConfig::default(), PatternCatalog::demo());
//! let wall = WallSpec::from_inches(150.0, 200.0).unwrap();
//! let (session, _ticket) = workflow.generate("demo-pattern", wall).unwrap();
//!
//! assert_eq!(session.requirements.panels_needed, 3);
//! assert_eq!(session.order.quantity_line(), "[x3] 15' Panels");
//! ```
//!
//! ## Modules
//!
//! - [`calculations`] - Panel and yard requirements, advisories, order quantities
//! - [`frame`] - Shared reference frame for both preview sections
//! - [`tiler`] - Pattern grid placement and half-drop offsets
//! - [`render`] - Surfaces, compositor, and high-resolution exports
//! - [`session`] - Render sessions and the preview lifecycle
//! - [`pdf`] - Print document assembly
//! - [`pattern`] - Pattern specs and catalog loading
//! - [`units`] - Type-safe unit wrappers
//! - [`errors`] - Structured error types
//! - [`file_io`] - Atomic writes, catalog and config loading

pub mod asset;
pub mod calculations;
pub mod config;
pub mod errors;
pub mod file_io;
pub mod frame;
pub mod geometry;
pub mod pattern;
pub mod pdf;
pub mod render;
pub mod session;
pub mod tiler;
pub mod units;
pub mod wall;

// Re-export commonly used types at crate root for convenience
pub use asset::PatternImage;
pub use calculations::{compute_requirements, CoverageAdvisory, OrderSummary, Requirements};
pub use config::PreviewConfig;
pub use errors::{PreviewError, PreviewResult};
pub use frame::{compute_reference_frame, ReferenceFrame};
pub use geometry::CanvasSize;
pub use pattern::{PatternCatalog, PatternSpec};
pub use render::{ExportImage, ExportTarget, RenderedFrame};
pub use session::{ImageLoadOutcome, ImageTicket, PreviewState, PreviewWorkflow, RenderSession};
pub use wall::WallSpec;
