//! Taylor diagram renderer.
//!
//! Reads a YAML or JSON plot description and writes the diagram as SVG
//! or PNG, chosen by the output file's extension.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use taylor_render::PlotFile;

#[derive(Parser, Debug)]
#[command(name = "taylor-render")]
#[command(about = "Render a Taylor diagram from a plot description")]
struct Args {
    /// Plot description (.yaml, .yml or .json)
    plot_file: PathBuf,

    /// Output file; .png is rasterized, anything else is written as SVG
    #[arg(short, long, default_value = "taylor.png")]
    output: PathBuf,

    /// Figure width in inches
    #[arg(long)]
    width: Option<f64>,

    /// Figure height in inches
    #[arg(long)]
    height: Option<f64>,

    /// Output resolution
    #[arg(long)]
    dpi: Option<f64>,

    /// Log level
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr);
    if args.json {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    info!(plot_file = ?args.plot_file, "Loading plot description");
    let mut plot = PlotFile::load(&args.plot_file)?;

    if let Some(width) = args.width {
        plot.figure.width = width;
    }
    if let Some(height) = args.height {
        plot.figure.height = height;
    }
    if let Some(dpi) = args.dpi {
        plot.figure.dpi = dpi;
    }

    let surface = plot
        .render()
        .with_context(|| format!("Failed to draw {:?}", args.plot_file))?;
    surface
        .save(&args.output)
        .with_context(|| format!("Failed to write {:?}", args.output))?;

    info!(output = ?args.output, "Diagram written");
    Ok(())
}
