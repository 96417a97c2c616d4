//! Scrollwork Simulator
//!
//! Mounts the landing page in a headless document, scrolls it to the bottom
//! and back, and prints what the animation engine did.
//!
//! Usage:
//!   scrollwork-sim                          # Default 1280x800 pass
//!   scrollwork-sim --config site.toml       # Load settings from TOML
//!   scrollwork-sim --viewport 1920x1080     # Override the viewport
//!   scrollwork-sim --json                   # Print the report as JSON
//!   scrollwork-sim --print-config           # Dump the effective config

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use scrollwork_core::Viewport;
use scrollwork_site::{NullEmbedLoader, SimReport, Simulation, SiteConfig};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "scrollwork-sim")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Headless scroll simulation of the Scrollwork landing page", long_about = None)]
struct Cli {
    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Viewport as WIDTHxHEIGHT
    #[arg(long)]
    viewport: Option<Viewport>,

    /// Pixels per scroll step
    #[arg(long)]
    step: Option<f32>,

    /// Pretend a 3D renderer is installed (it always fails to load)
    #[arg(long)]
    with_renderer: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SiteConfig::load(path)
            .with_context(|| format!("Failed to load {}", path.display()))?,
        None => SiteConfig::default(),
    };
    if let Some(viewport) = cli.viewport {
        config.viewport = viewport;
    }
    if let Some(step) = cli.step {
        config.simulation.scroll_step = step;
    }
    config.validate().context("Invalid settings")?;

    // RUST_LOG wins, then --verbose, then the config file
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new(config.log_filter.as_deref().unwrap_or("info"))
        }
    });
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    if cli.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    let simulation = Simulation::new(config)?;
    let mut renderer = NullEmbedLoader;
    let report = if cli.with_renderer {
        simulation.run(Some(&mut renderer))?
    } else {
        simulation.run(None)?
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report);
    }
    Ok(())
}

fn print_summary(report: &SimReport) {
    println!("Scrollwork simulation");
    println!("  viewport         {}x{}", report.viewport.width, report.viewport.height);
    println!("  page height      {:.0}px (max scroll {:.0}px)", report.page_height, report.max_scroll);
    println!("  bindings         {} across {} sections", report.bindings, report.owners);
    println!("  reveals played   {}", report.reveals_played);
    println!("  pin width        {:.0}px", report.pin_width);
    println!("  pinned frames    {} of {}", report.pinned_frames, report.frames);
    println!("  strip travel     {:.0}px (final {:.1}px)", report.max_strip_travel, report.final_strip_translation);
    println!("  property writes  {}", report.property_writes);
    println!("  3D embed         {}", report.embed);
    println!("  released         {}", report.released);
}
