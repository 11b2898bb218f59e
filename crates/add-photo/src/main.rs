//! add-photo-to-pdf - insert an image into a PDF
//!
//! Usage:
//!   add-photo-to-pdf form.pdf photo.jpg out.pdf
//!   add-photo-to-pdf in.pdf photo.jpg out.pdf --position center
//!   add-photo-to-pdf in.pdf photo.jpg out.pdf --x 100 --y 200
//!   add-photo-to-pdf in.pdf sig.png out.pdf --width 180 --height 60 --fit-mode fit

use add_photo::config::{default_config_path, load_config, Config};
use add_photo::{insert_photo, PhotoJob};
use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use photo_core::{Anchor, FitMode, Opacity, PositionDirective, Rotation, SizeDirective};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

#[derive(Parser, Debug)]
#[command(name = "add-photo-to-pdf")]
#[command(version, about = "Insert an image into a PDF file at a specific position")]
#[command(after_help = "Coordinates are in points (1/72 inch) from the bottom-left corner.\n\
Without --width/--height/--scale the image is sized as a 35mm x 45mm ID photo (99 x 127 points).")]
struct Cli {
    /// Input PDF file
    pdf: PathBuf,

    /// Image file to insert (JPG, PNG, ...)
    image: PathBuf,

    /// Output PDF file
    output: PathBuf,

    /// Page number to insert the image on (0-indexed)
    #[arg(short, long, default_value = "0")]
    page: usize,

    /// Named position: top-left, top-right, bottom-left, bottom-right, center
    #[arg(long)]
    position: Option<Anchor>,

    /// X coordinate of the image's lower-left corner (requires --y)
    #[arg(long, requires = "y", allow_negative_numbers = true)]
    x: Option<f64>,

    /// Y coordinate of the image's lower-left corner (requires --x)
    #[arg(long, requires = "x", allow_negative_numbers = true)]
    y: Option<f64>,

    /// Image width in points
    #[arg(long)]
    width: Option<f64>,

    /// Image height in points
    #[arg(long)]
    height: Option<f64>,

    /// Scale factor relative to the image's pixel size (e.g. 0.5)
    #[arg(long, conflicts_with_all = ["width", "height"])]
    scale: Option<f64>,

    /// Margin from the page edges for named positions
    #[arg(long)]
    margin: Option<f64>,

    /// How to resize when both --width and --height are given: fit, fill, stretch
    #[arg(long)]
    fit_mode: Option<FitMode>,

    /// Do not keep the aspect ratio (deprecated: use --fit-mode stretch)
    #[arg(long)]
    no_aspect: bool,

    /// Image opacity (0.0-1.0)
    #[arg(long)]
    opacity: Option<f64>,

    /// Rotation in degrees: 0, 90, 180, 270
    #[arg(long, value_parser = ["0", "90", "180", "270"])]
    rotation: Option<String>,

    /// Config file (default: platform config dir, add-photo/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// A config named with `--config` must load. The default location is
/// optional and falls back to built-in settings with a warning.
fn load_settings(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        if !path.is_file() {
            anyhow::bail!("Config file not found: {}", path.display());
        }
        return load_config(path).with_context(|| format!("Invalid config {}", path.display()));
    }

    let Ok(path) = default_config_path() else {
        return Ok(Config::default());
    };
    match load_config(&path) {
        Ok(config) => Ok(config),
        Err(e) => {
            tracing::warn!("Ignoring config {}: {e:#}", path.display());
            Ok(Config::default())
        }
    }
}

/// Merge flags over config values into a job.
fn build_job(cli: Cli, config: &Config) -> Result<PhotoJob> {
    let mut fit_mode = cli.fit_mode.unwrap_or_else(|| config.fit_mode());
    if cli.no_aspect && fit_mode == FitMode::Fit {
        fit_mode = FitMode::Stretch;
    }

    let position = match (cli.x, cli.y) {
        (Some(x), Some(y)) => PositionDirective::Explicit { x, y },
        _ => PositionDirective::Named {
            anchor: cli.position.unwrap_or_else(|| config.position()),
            margin: cli.margin.unwrap_or_else(|| config.margin()),
        },
    };

    let opacity = Opacity::new(cli.opacity.unwrap_or_else(|| config.opacity()))
        .context("Opacity must be between 0.0 and 1.0")?;

    let degrees = match cli.rotation.as_deref() {
        Some(value) => value
            .parse::<i64>()
            .with_context(|| format!("invalid rotation '{value}'"))?,
        None => config.rotation(),
    };
    let rotation = Rotation::try_from(degrees)?;

    Ok(PhotoJob {
        page_index: cli.page,
        size: SizeDirective::from_options(cli.width, cli.height, cli.scale),
        fit_mode,
        position,
        rotation,
        opacity,
        ..PhotoJob::new(cli.pdf, cli.image, cli.output)
    })
}

fn run(cli: Cli) -> Result<()> {
    let config = load_settings(cli.config.as_deref())?;
    let job = build_job(cli, &config)?;
    tracing::debug!("Job: {job:?}");

    let outcome = insert_photo(&job).context("Error inserting image")?;

    println!(
        "{} Image inserted into {}",
        "Success!".green().bold(),
        job.output.display()
    );
    println!(
        "  Position: ({:.2}, {:.2})",
        outcome.placement.origin.x, outcome.placement.origin.y
    );
    println!(
        "  Size: {:.2} x {:.2} points",
        outcome.placement.size.width(),
        outcome.placement.size.height()
    );
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {e:#}", "Error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
