//! # Wallcast CLI Application
//!
//! Command-line front end for the preview engine: list catalog patterns,
//! estimate material for a wall, and write screen previews, high-resolution
//! exports, or the print PDF.
//!
//! Logging goes to stderr through `tracing-subscriber`; set `RUST_LOG` to
//! change verbosity.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use wall_core::errors::{PreviewError, PreviewResult};
use wall_core::file_io::{load_catalog, load_config, read_bytes, write_atomic};
use wall_core::pattern::PatternCatalog;
use wall_core::pdf::suggested_filename;
use wall_core::render::ExportTarget;
use wall_core::session::{ImageLoadOutcome, ImageTicket, PreviewWorkflow, RenderSession};
use wall_core::units::FeetInches;
use wall_core::{PatternImage, WallSpec};

#[derive(Parser, Debug)]
#[command(name = "wallcast", version, about = "Wallpaper previews and material estimates")]
struct Cli {
    /// Catalog JSON file (array of product-sheet rows); demo catalog if omitted
    #[arg(long, global = true)]
    catalog: Option<PathBuf>,

    /// Configuration JSON file
    #[arg(long, global = true, default_value = "wallcast.json")]
    config: PathBuf,

    /// Print machine-readable JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List catalog patterns
    Patterns,
    /// Compute requirements and order quantities for a wall
    Estimate(WallArgs),
    /// Render the screen preview to a PNG file
    Preview {
        #[command(flatten)]
        wall: WallArgs,
        #[command(flatten)]
        image: ImageArgs,
        #[arg(long, short, default_value = "preview.png")]
        out: PathBuf,
    },
    /// Render a high-resolution PNG or the print PDF
    Export {
        #[command(flatten)]
        wall: WallArgs,
        #[command(flatten)]
        image: ImageArgs,
        #[arg(long, value_enum, default_value_t = ExportKind::Pdf)]
        target: ExportKind,
        /// Output path; the suggested filename is used for PDFs if omitted
        #[arg(long, short)]
        out: Option<PathBuf>,
        /// Preview number assigned by an order system
        #[arg(long)]
        number: Option<String>,
    },
}

#[derive(Args, Debug)]
struct WallArgs {
    /// Pattern id from the catalog
    #[arg(long, short)]
    pattern: String,
    #[arg(long)]
    width_ft: u32,
    #[arg(long, default_value_t = 0.0)]
    width_in: f64,
    #[arg(long)]
    height_ft: u32,
    #[arg(long, default_value_t = 0.0)]
    height_in: f64,
}

impl WallArgs {
    fn wall(&self) -> PreviewResult<WallSpec> {
        WallSpec::new(
            FeetInches::new(self.width_ft, self.width_in),
            FeetInches::new(self.height_ft, self.height_in),
        )
    }
}

#[derive(Args, Debug)]
struct ImageArgs {
    /// Pattern image file; defaults to the pattern's image URL when it is a local path
    #[arg(long)]
    image: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum ExportKind {
    Print,
    View,
    Pdf,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("wall_core=info,wall_cli=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            if cli.json {
                if let Ok(json) = serde_json::to_string_pretty(&e) {
                    eprintln!("{}", json);
                }
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> PreviewResult<()> {
    let config = load_config(&cli.config)?;
    let catalog = match &cli.catalog {
        Some(path) => load_catalog(path, &config.defaults)?,
        None => PatternCatalog::demo(),
    };

    match &cli.command {
        Command::Patterns => list_patterns(&catalog, cli.json),
        Command::Estimate(wall) => {
            let workflow = PreviewWorkflow::new(config, catalog);
            let session = workflow.estimate(&wall.pattern, wall.wall()?)?;
            print_estimate(&session, cli.json)
        }
        Command::Preview { wall, image, out } => {
            let mut workflow = PreviewWorkflow::new(config, catalog);
            let (session, ticket) = workflow.generate(&wall.pattern, wall.wall()?)?;
            bind_image(&mut workflow, &ticket, image)?;
            let frame = workflow
                .last_frame()
                .ok_or_else(|| PreviewError::render_target("preview", "No frame was rendered"))?;
            write_atomic(out, &frame.encode_png()?)?;
            println!("Preview for {} written to {}", session.display.title, out.display());
            Ok(())
        }
        Command::Export {
            wall,
            image,
            target,
            out,
            number,
        } => {
            let mut workflow = PreviewWorkflow::new(config, catalog);
            let (session, ticket) = workflow.generate_numbered(&wall.pattern, wall.wall()?, number.clone())?;
            bind_image(&mut workflow, &ticket, image)?;
            let (bytes, path) = match target {
                ExportKind::Pdf => (
                    workflow.export_pdf()?,
                    out.clone().unwrap_or_else(|| PathBuf::from(suggested_filename(&session))),
                ),
                ExportKind::Print | ExportKind::View => {
                    let target = if *target == ExportKind::Print {
                        ExportTarget::Print
                    } else {
                        ExportTarget::View
                    };
                    let export = workflow.export(target)?;
                    let default_name = format!("preview-{}-{:?}.png", session.preview_number, target).to_lowercase();
                    (export.png, out.clone().unwrap_or_else(|| PathBuf::from(default_name)))
                }
            };
            write_atomic(&path, &bytes)?;
            println!("Export written to {} ({} bytes)", path.display(), bytes.len());
            Ok(())
        }
    }
}

fn bind_image(workflow: &mut PreviewWorkflow, ticket: &ImageTicket, image: &ImageArgs) -> PreviewResult<()> {
    let path = match &image.image {
        Some(path) => path.clone(),
        None => PathBuf::from(&ticket.source_ref),
    };
    let result = if path.as_os_str().is_empty() || !Path::new(&path).exists() {
        Err(PreviewError::asset_unavailable(
            ticket.source_ref.clone(),
            "No local image file; drawing outlines only",
        ))
    } else {
        read_bytes(&path).and_then(|bytes| PatternImage::decode(path.display().to_string(), &bytes))
    };
    if let ImageLoadOutcome::Unavailable(e) = workflow.complete_image_load(ticket, result)? {
        eprintln!("Warning: {}", e);
    }
    Ok(())
}

fn list_patterns(catalog: &PatternCatalog, json: bool) -> PreviewResult<()> {
    if json {
        let patterns: Vec<_> = catalog.iter().collect();
        println!("{}", serde_json::to_string_pretty(&patterns)?);
        return Ok(());
    }
    println!("{:<24} {:<14} {:<6} {:<10} {}", "ID", "SKU", "SALE", "MATCH", "NAME");
    for p in catalog.iter() {
        println!(
            "{:<24} {:<14} {:<6} {:<10} {}",
            p.id,
            p.sku,
            format!("{:?}", p.sale_type()).to_lowercase(),
            p.pattern_match.to_string(),
            p.name
        );
    }
    Ok(())
}

fn print_estimate(session: &RenderSession, json: bool) -> PreviewResult<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(session)?);
        return Ok(());
    }
    let req = &session.requirements;
    println!("═══════════════════════════════════════");
    println!("  {}", session.display.title);
    println!("═══════════════════════════════════════");
    if session.substituted {
        println!("  (pattern data unusable, showing {})", session.pattern.name);
    }
    println!();
    println!("Requirements:");
    println!("  Panels across:  {}", req.panels_needed);
    println!("  Length:         {}' + {:.0}\"", req.panel_length_ft, req.panel_length_extra_in);
    println!("  Coverage:       {:.1}\" x {:.1}\"", req.total_width_in, req.total_height_in);
    println!("  Repeats/panel:  {:.2}", req.repeats_per_panel);
    println!();
    println!("Order quantity as shown:");
    for line in session.order.document_lines(false) {
        println!("  {}", line);
    }
    println!("Order quantity with overage added:");
    for line in session.order.document_lines(true) {
        println!("  {}", line);
    }
    if !session.advisories.is_empty() {
        println!();
        println!("Advisories:");
        for advisory in &session.advisories {
            println!("  [!] {}", advisory.message());
        }
    }
    println!();
    println!("Preview number: {}", session.preview_number);
    Ok(())
}
