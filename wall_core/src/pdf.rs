//! # PDF Generation Module
//!
//! Wraps the print raster of a preview in a one-page document using Typst.
//!
//! ## Architecture
//!
//! - The Typst template is embedded as a string constant
//! - Data is injected via placeholder replacement before compilation
//! - The print raster is served to Typst as the virtual file `/preview.png`
//! - Output is raw PDF bytes (`Vec<u8>`)
//!
//! ## Example
//!
//! ```rust,no_run
//! use wall_core::config::PreviewConfig;
//! use wall_core::pattern::PatternCatalog;
//! use wall_core::pdf::{render_preview_pdf, suggested_filename};
//! use wall_core::session::RenderSession;
//! use wall_core::wall::WallSpec;
//!
//! let config = PreviewConfig::default();
//! let pattern = PatternCatalog::demo().get("demo-pattern").unwrap().clone();
//! let wall = WallSpec::from_inches(120.0, 96.0).unwrap();
//! let session = RenderSession::build(pattern, wall, &config).unwrap();
//!
//! let pdf_bytes = render_preview_pdf(&session, None, &config).unwrap();
//! std::fs::write(suggested_filename(&session), pdf_bytes).unwrap();
//! ```

use std::path::Path;

use chrono::Utc;
use typst::diag::{FileError, FileResult};
use typst::foundations::{Bytes, Datetime};
use typst::syntax::{FileId, Source};
use typst::text::{Font, FontBook};
use typst::utils::LazyHash;
use typst::{Library, LibraryExt, World};
use typst_pdf::PdfOptions;

use crate::asset::PatternImage;
use crate::config::{BusinessInfo, PreviewConfig};
use crate::errors::{PreviewError, PreviewResult};
use crate::render::export::{render_export, ExportTarget};
use crate::session::RenderSession;
use crate::units::{format_feet_inches, Inches};

const PREVIEW_IMAGE_PATH: &str = "preview.png";

// ============================================================================
// Typst World Implementation
// ============================================================================

/// A minimal Typst world whose only file is the preview raster.
struct PdfWorld {
    main: Source,
    book: LazyHash<FontBook>,
    fonts: Vec<Font>,
    library: LazyHash<Library>,
    preview_png: Bytes,
}

impl PdfWorld {
    fn new(source: String, preview_png: Vec<u8>) -> Self {
        let fonts = Self::load_fonts();
        let book = FontBook::from_fonts(&fonts);

        PdfWorld {
            main: Source::detached(source),
            book: LazyHash::new(book),
            fonts,
            library: LazyHash::new(Library::default()),
            preview_png: Bytes::new(preview_png),
        }
    }

    fn load_fonts() -> Vec<Font> {
        typst_assets::fonts()
            .flat_map(|font_bytes| Font::iter(Bytes::new(font_bytes.to_vec())))
            .collect()
    }
}

impl World for PdfWorld {
    fn library(&self) -> &LazyHash<Library> {
        &self.library
    }

    fn book(&self) -> &LazyHash<FontBook> {
        &self.book
    }

    fn main(&self) -> FileId {
        self.main.id()
    }

    fn source(&self, id: FileId) -> FileResult<Source> {
        if id == self.main.id() {
            Ok(self.main.clone())
        } else {
            Err(FileError::NotFound(id.vpath().as_rootless_path().into()))
        }
    }

    fn file(&self, id: FileId) -> FileResult<Bytes> {
        let path = id.vpath().as_rootless_path();
        if path == Path::new(PREVIEW_IMAGE_PATH) {
            Ok(self.preview_png.clone())
        } else {
            Err(FileError::NotFound(path.into()))
        }
    }

    fn font(&self, index: usize) -> Option<Font> {
        self.fonts.get(index).cloned()
    }

    fn today(&self, _offset: Option<i64>) -> Option<Datetime> {
        let now = Utc::now();
        Datetime::from_ymd(
            now.format("%Y").to_string().parse().ok()?,
            now.format("%m").to_string().parse().ok()?,
            now.format("%d").to_string().parse().ok()?,
        )
    }
}

// ============================================================================
// PDF Template
// ============================================================================

/// Landscape print page: raster on the left, text column on the right.
const PREVIEW_TEMPLATE: &str = r##"
#set page(
  width: {{PAGE_W}}in,
  height: {{PAGE_H}}in,
  margin: {{MARGIN}}in,
)

#set text(size: 16pt)

#grid(
  columns: (1fr, {{TEXT_COL}}in),
  gutter: 0pt,
  align(center + horizon)[
    #image("/preview.png", width: 100%)
  ],
  block(inset: (left: 18pt, top: 12pt))[
    #text(size: 28pt, weight: "bold")[{{BUSINESS}}]
    #v(18pt)
    #text(size: 20pt, weight: "bold")[{{PATTERN_NAME}}]
    #linebreak()
    {{SKU}}
    #v(12pt)
    Wall Dimensions: {{WALL_W}}w × {{WALL_H}}h
    #linebreak()
    {{REPEAT_LINE}}
    #linebreak()
    Match: {{MATCH}}
    #v(12pt)
    Preview Number: {{PREVIEW_NUMBER}}
    #linebreak()
    Date: {{DATE}}
    #v(18pt)
    *Order quantity as shown:*
    #linebreak()
    {{ORDER_LINES}}
    #v(12pt)
    *Order quantity with {{EXCESS_PERCENT}}% overage added:*
    #linebreak()
    {{EXCESS_LINES}}
    {{ADVISORIES}}
    #v(24pt)
    #text(size: 11pt, fill: gray)[{{DISCLAIMER}}]
    {{CONTACT}}
  ],
)
"##;

// ============================================================================
// Rendering
// ============================================================================

/// Render the print-layout PDF for a session.
pub fn render_preview_pdf(
    session: &RenderSession,
    image: Option<&PatternImage>,
    config: &PreviewConfig,
) -> PreviewResult<Vec<u8>> {
    let raster = render_export(session, image, config, ExportTarget::Print)?;
    let source = build_source(session, config);

    let world = PdfWorld::new(source, raster.png);
    let warned = typst::compile(&world);

    let document = warned.output.map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        PreviewError::Internal {
            message: format!("Typst compilation failed: {}", error_msgs.join("; ")),
        }
    })?;

    let pdf_bytes = typst_pdf::pdf(&document, &PdfOptions::default()).map_err(|errors| {
        let error_msgs: Vec<String> = errors.iter().map(|e| e.message.to_string()).collect();
        PreviewError::render_target("render_pdf", error_msgs.join("; "))
    })?;

    tracing::info!(
        session = %session.id,
        preview_number = %session.preview_number,
        bytes = pdf_bytes.len(),
        "Preview PDF rendered"
    );
    Ok(pdf_bytes)
}

/// `Wallpaper-Preview-{sku}-{preview number}.pdf`
pub fn suggested_filename(session: &RenderSession) -> String {
    let sku: String = session
        .pattern
        .sku
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
        .collect();
    format!("Wallpaper-Preview-{}-{}.pdf", sku, session.preview_number)
}

fn build_source(session: &RenderSession, config: &PreviewConfig) -> String {
    let page = &config.export.print;
    let pattern = &session.pattern;

    let repeat_line = match pattern.repeat_height_in {
        Some(h) => format!(
            "Repeat: {}w × {}h",
            format_feet_inches(Inches(pattern.repeat_width_in)),
            format_feet_inches(Inches(h))
        ),
        None => format!("Repeat: {}w", format_feet_inches(Inches(pattern.repeat_width_in))),
    };
    let advisories: String = session
        .advisories
        .iter()
        .map(|a| format!("#v(12pt)\n    #text(fill: rgb(\"#b03a2e\"))[{}]\n", escape_typst(a.message())))
        .collect();
    let excess_percent = ((config.order.excess_factor - 1.0) * 100.0).round();

    PREVIEW_TEMPLATE
        .replace("{{PAGE_W}}", &page.width_in.to_string())
        .replace("{{PAGE_H}}", &page.height_in.to_string())
        .replace("{{MARGIN}}", &page.margin_in.to_string())
        .replace("{{TEXT_COL}}", &page.text_column_in.to_string())
        .replace("{{BUSINESS}}", &escape_typst(&config.business.name))
        .replace("{{PATTERN_NAME}}", &escape_typst(&pattern.name))
        .replace("{{SKU}}", &escape_typst(&pattern.sku))
        .replace("{{WALL_W}}", &escape_typst(&session.wall.width.dashed()))
        .replace("{{WALL_H}}", &escape_typst(&session.wall.height.dashed()))
        .replace("{{REPEAT_LINE}}", &escape_typst(&repeat_line))
        .replace("{{MATCH}}", &escape_typst(&pattern.pattern_match.to_string()))
        .replace("{{PREVIEW_NUMBER}}", &escape_typst(&session.preview_number))
        .replace("{{DATE}}", &session.date_label())
        .replace("{{ORDER_LINES}}", &markup_lines(&session.order.document_lines(false)))
        .replace("{{EXCESS_PERCENT}}", &format!("{:.0}", excess_percent))
        .replace("{{EXCESS_LINES}}", &markup_lines(&session.order.document_lines(true)))
        .replace("{{ADVISORIES}}", &advisories)
        .replace("{{DISCLAIMER}}", &escape_typst(&config.messages.disclaimer))
        .replace("{{CONTACT}}", &contact_block(&config.business))
}

/// `email • website` then location; nothing when every field is empty.
fn contact_block(business: &BusinessInfo) -> String {
    let first: Vec<&str> = [business.email.as_str(), business.website.as_str()]
        .into_iter()
        .filter(|s| !s.trim().is_empty())
        .collect();
    let mut lines = Vec::new();
    if !first.is_empty() {
        lines.push(first.join(" • "));
    }
    if !business.location.trim().is_empty() {
        lines.push(business.location.clone());
    }
    if lines.is_empty() {
        return String::new();
    }
    format!("#v(12pt)\n    #text(size: 12pt)[{}]", markup_lines(&lines))
}

fn markup_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|l| escape_typst(l))
        .collect::<Vec<_>>()
        .join(" #linebreak()\n    ")
}

/// Escape special Typst markup characters.
fn escape_typst(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '*' => "\\*".to_string(),
            '_' => "\\_".to_string(),
            '#' => "\\#".to_string(),
            '$' => "\\$".to_string(),
            '@' => "\\@".to_string(),
            '<' => "\\<".to_string(),
            '>' => "\\>".to_string(),
            '[' => "\\[".to_string(),
            ']' => "\\]".to_string(),
            '\\' => "\\\\".to_string(),
            '`' => "\\`".to_string(),
            _ => c.to_string(),
        })
        .collect()
}
