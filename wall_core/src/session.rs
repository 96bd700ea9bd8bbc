//! # Preview Sessions
//!
//! A [`RenderSession`] is the immutable result of one generate request:
//! pattern, wall, requirements, advisories, order quantities, and display
//! strings. Every draw call reads from a session shared as
//! `Arc<RenderSession>`; nothing mutates it after construction.
//!
//! [`PreviewWorkflow`] drives the lifecycle around it:
//!
//! ```text
//! Idle -> Computing -> Rendered -> (Resetting -> Idle)
//! ```
//!
//! Each `generate` tears down the previous session and image binding, bumps
//! a monotonic token, and hands the host an [`ImageTicket`]. The host loads
//! the pattern image and reports back through
//! [`PreviewWorkflow::complete_image_load`]; completions carrying an old
//! token are ignored.
//!
//! ## Example
//!
//! ```rust
//! use wall_core::config::PreviewConfig;
//! use wall_core::pattern::PatternCatalog;
//! use wall_core::session::{PreviewState, PreviewWorkflow};
//! use wall_core::wall::WallSpec;
//!
//! let mut workflow = PreviewWorkflow::new(PreviewConfig::default(), PatternCatalog::demo());
//! let wall = WallSpec::from_inches(120.0, 96.0).unwrap();
//! let (session, _ticket) = workflow.generate("demo-pattern", wall).unwrap();
//!
//! assert_eq!(workflow.state(), PreviewState::Rendered);
//! assert_eq!(session.requirements.panels_needed, 3);
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::asset::PatternImage;
use crate::calculations::{compute_requirements, evaluate_coverage, CoverageAdvisory, OrderSummary, Requirements};
use crate::config::PreviewConfig;
use crate::errors::{PreviewError, PreviewResult};
use crate::pattern::{safe_default, PatternCatalog, PatternSpec};
use crate::render::compositor::{render_preview, RenderedFrame};
use crate::render::export::{render_export, ExportImage, ExportTarget};
use crate::units::Inches;
use crate::wall::WallSpec;

/// Human-readable strings shown next to a preview.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayStrings {
    /// e.g. `9'6"`
    pub width: String,
    pub height: String,
    /// e.g. `Trellis: 9'6"w x 8'h Wall`
    pub title: String,
}

impl DisplayStrings {
    pub fn new(pattern: &PatternSpec, wall: &WallSpec) -> Self {
        let width = wall.width.to_string();
        let height = wall.height.to_string();
        let title = format!("{}: {}w x {}h Wall", pattern.name, width, height);
        DisplayStrings { width, height, title }
    }
}

/// Everything needed to draw one preview. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderSession {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    /// Five-digit number printed on documents
    pub preview_number: String,
    pub pattern: PatternSpec,
    pub wall: WallSpec,
    pub requirements: Requirements,
    pub display: DisplayStrings,
    pub advisories: Vec<CoverageAdvisory>,
    pub order: OrderSummary,
    /// The requested pattern was unusable and the safe default was drawn
    pub substituted: bool,
}

impl RenderSession {
    /// Compute requirements, advisories, and order quantities.
    pub fn build(pattern: PatternSpec, wall: WallSpec, config: &PreviewConfig) -> PreviewResult<Self> {
        let requirements = compute_requirements(&pattern, Inches(wall.width_in()), Inches(wall.height_in()))?;
        let advisories = evaluate_coverage(&pattern, &wall, &requirements, &config.limits, &config.messages);
        let order = OrderSummary::from_requirements(&requirements, config.order.excess_factor);
        let display = DisplayStrings::new(&pattern, &wall);
        let created_at = Utc::now();

        Ok(RenderSession {
            id: Uuid::new_v4(),
            created_at,
            preview_number: fallback_preview_number(created_at),
            pattern,
            wall,
            requirements,
            display,
            advisories,
            order,
            substituted: false,
        })
    }

    /// Replace the generated preview number with one assigned by the host.
    pub fn with_preview_number(mut self, number: impl Into<String>) -> Self {
        self.preview_number = number.into();
        self
    }

    /// Creation date (UTC) as printed on documents, e.g. `3/7/2026`.
    pub fn date_label(&self) -> String {
        self.created_at.format("%-m/%-d/%Y").to_string()
    }
}

/// Last five digits of the creation time in milliseconds.
pub fn fallback_preview_number(at: DateTime<Utc>) -> String {
    format!("{:05}", at.timestamp_millis().rem_euclid(100_000))
}

/// Workflow lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreviewState {
    Idle,
    Computing,
    Rendered,
    Resetting,
}

/// Handed to the host when an image load should start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageTicket {
    pub token: u64,
    /// Pattern image URL or path; empty when the pattern has none
    pub source_ref: String,
}

/// Result of reporting an image load.
#[derive(Debug, Clone, PartialEq)]
pub enum ImageLoadOutcome {
    /// Image bound and the preview redrawn with it
    Applied,
    /// Load failed; the preview keeps outlines over white
    Unavailable(PreviewError),
    /// Ticket belongs to an earlier generate; ignored
    Stale,
}

/// Pattern image state for the current session.
#[derive(Debug, Clone)]
pub enum ImageBinding {
    None,
    Pending(ImageTicket),
    Loaded(PatternImage),
    Failed(PreviewError),
}

impl ImageBinding {
    pub fn image(&self) -> Option<&PatternImage> {
        match self {
            ImageBinding::Loaded(image) => Some(image),
            _ => None,
        }
    }
}

/// Drives generate, image binding, rendering, export, and reset.
pub struct PreviewWorkflow {
    config: PreviewConfig,
    catalog: PatternCatalog,
    state: PreviewState,
    token: u64,
    session: Option<Arc<RenderSession>>,
    image: ImageBinding,
    last_frame: Option<RenderedFrame>,
}

impl PreviewWorkflow {
    pub fn new(config: PreviewConfig, catalog: PatternCatalog) -> Self {
        PreviewWorkflow {
            config,
            catalog,
            state: PreviewState::Idle,
            token: 0,
            session: None,
            image: ImageBinding::None,
            last_frame: None,
        }
    }

    pub fn config(&self) -> &PreviewConfig {
        &self.config
    }

    pub fn catalog(&self) -> &PatternCatalog {
        &self.catalog
    }

    pub fn state(&self) -> PreviewState {
        self.state
    }

    pub fn session(&self) -> Option<&Arc<RenderSession>> {
        self.session.as_ref()
    }

    pub fn image_binding(&self) -> &ImageBinding {
        &self.image
    }

    /// Last successfully rendered screen frame.
    pub fn last_frame(&self) -> Option<&RenderedFrame> {
        self.last_frame.as_ref()
    }

    /// Start a preview with a generated preview number.
    pub fn generate(&mut self, pattern_id: &str, wall: WallSpec) -> PreviewResult<(Arc<RenderSession>, ImageTicket)> {
        self.generate_numbered(pattern_id, wall, None)
    }

    /// Start a preview. Tears down the previous session, computes a new
    /// one, and renders it without an image. Pattern data that cannot
    /// produce geometry is replaced by the safe default pattern.
    pub fn generate_numbered(
        &mut self,
        pattern_id: &str,
        wall: WallSpec,
        preview_number: Option<String>,
    ) -> PreviewResult<(Arc<RenderSession>, ImageTicket)> {
        self.state = PreviewState::Computing;
        self.session = None;
        self.image = ImageBinding::None;
        self.last_frame = None;
        self.token += 1;
        tracing::info!(pattern = pattern_id, token = self.token, "Generating preview");

        let session = match self.build_session(pattern_id, wall) {
            Ok(session) => session,
            Err(e) => {
                self.state = PreviewState::Idle;
                return Err(e);
            }
        };
        let session = match preview_number {
            Some(number) => session.with_preview_number(number),
            None => session,
        };
        let session = Arc::new(session);

        let ticket = ImageTicket {
            token: self.token,
            source_ref: session.pattern.image_url.clone(),
        };
        self.session = Some(Arc::clone(&session));
        self.image = ImageBinding::Pending(ticket.clone());

        if let Err(e) = self.render_screen() {
            self.session = None;
            self.image = ImageBinding::None;
            self.last_frame = None;
            self.state = PreviewState::Idle;
            return Err(e);
        }
        Ok((session, ticket))
    }

    /// Compute a session without rendering or touching workflow state.
    pub fn estimate(&self, pattern_id: &str, wall: WallSpec) -> PreviewResult<RenderSession> {
        self.build_session(pattern_id, wall)
    }

    fn build_session(&self, pattern_id: &str, wall: WallSpec) -> PreviewResult<RenderSession> {
        let pattern = self.catalog.get(pattern_id)?.clone();
        match RenderSession::build(pattern, wall, &self.config) {
            Err(PreviewError::InvalidPatternData {
                pattern_id,
                field,
                reason,
                ..
            }) => {
                tracing::warn!(
                    pattern = %pattern_id,
                    field = %field,
                    reason = %reason,
                    "Pattern data unusable, substituting safe default"
                );
                let mut session = RenderSession::build(safe_default(&self.config.defaults), wall, &self.config)?;
                session.substituted = true;
                Ok(session)
            }
            other => other,
        }
    }

    /// Report the result of an image load started by `ticket`.
    pub fn complete_image_load(
        &mut self,
        ticket: &ImageTicket,
        result: PreviewResult<PatternImage>,
    ) -> PreviewResult<ImageLoadOutcome> {
        if ticket.token != self.token || self.session.is_none() {
            tracing::warn!(
                ticket = ticket.token,
                current = self.token,
                source = %ticket.source_ref,
                "Ignoring stale image load"
            );
            return Ok(ImageLoadOutcome::Stale);
        }

        match result {
            Ok(image) => {
                tracing::info!(source = %image.source_ref(), "Pattern image bound");
                self.image = ImageBinding::Loaded(image);
                self.render_screen()?;
                Ok(ImageLoadOutcome::Applied)
            }
            Err(e) => {
                tracing::warn!(source = %ticket.source_ref, error = %e, "Pattern image unavailable");
                self.image = ImageBinding::Failed(e.clone());
                Ok(ImageLoadOutcome::Unavailable(e))
            }
        }
    }

    /// Redraw the screen frame from the current session. On failure the
    /// previous frame is kept.
    pub fn render_screen(&mut self) -> PreviewResult<&RenderedFrame> {
        let session = self.require_session("render_screen")?;
        let rendered = render_preview(&session, self.image.image(), self.config.screen, &self.config.layout)?;
        self.state = PreviewState::Rendered;
        Ok(&*self.last_frame.insert(rendered))
    }

    /// Render a high-resolution export into its own surface.
    pub fn export(&self, target: ExportTarget) -> PreviewResult<ExportImage> {
        let session = self.require_session("export")?;
        render_export(&session, self.image.image(), &self.config, target)
    }

    /// Print raster wrapped in the preview document.
    pub fn export_pdf(&self) -> PreviewResult<Vec<u8>> {
        let session = self.require_session("export_pdf")?;
        crate::pdf::render_preview_pdf(&session, self.image.image(), &self.config)
    }

    /// Drop the session and return to idle.
    pub fn reset(&mut self) {
        self.state = PreviewState::Resetting;
        self.session = None;
        self.image = ImageBinding::None;
        self.last_frame = None;
        self.token += 1;
        self.state = PreviewState::Idle;
        tracing::info!(token = self.token, "Preview reset");
    }

    fn require_session(&self, operation: &str) -> PreviewResult<Arc<RenderSession>> {
        self.session
            .clone()
            .ok_or_else(|| PreviewError::render_target(operation, "No preview has been generated"))
    }
}
