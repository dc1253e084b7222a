//! mdw CLI - Markdown to Word document converter.
//!
//! Reads a markdown file, renders it into the document model, and writes an
//! OOXML `.docx` package. Configuration comes from an `mdw.toml` discovered
//! next to the input (or given via `--config`).

mod error;
mod output;

use std::path::{Path, PathBuf};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use mdw_config::Config;
use mdw_docx::{DocxOptions, DocxSink};
use mdw_renderer::{RenderOptions, Renderer};

use error::CliError;
use output::Output;

/// mdw - Markdown to Word document converter.
#[derive(Parser)]
#[command(name = "mdw", version, about)]
struct Cli {
    /// Input markdown file.
    input: PathBuf,

    /// Output path. Defaults to the input path with a `.docx` extension.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Explicit config file. Without it, `mdw.toml` is discovered from the
    /// input file's directory upward.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run(&cli) {
        Ok(destination) => output.success(&format!("Wrote {}", destination.display())),
        Err(err) => {
            output.error(&format!("Error: {err}"));
            std::process::exit(1);
        }
    }
}

fn run(cli: &Cli) -> Result<PathBuf, CliError> {
    let config = load_config(cli)?;
    let markdown = std::fs::read_to_string(&cli.input)?;

    let blocks = mdw_parser::parse(&markdown);
    info!(blocks = blocks.len(), "parsed input");

    let renderer = Renderer::new(RenderOptions {
        monospace_font: config.document.monospace_font,
        named_heading_styles: config.render.named_heading_styles,
        numbered_ordered_lists: config.render.numbered_ordered_lists,
    });

    let destination = cli
        .output
        .clone()
        .unwrap_or_else(|| cli.input.with_extension("docx"));
    let mut sink = DocxSink::new(
        &destination,
        DocxOptions {
            font: config.document.font,
        },
    );
    renderer.render_into(&blocks, &mut sink)?;
    info!(destination = %destination.display(), "conversion complete");
    Ok(destination)
}

fn load_config(cli: &Cli) -> Result<Config, CliError> {
    if let Some(path) = &cli.config {
        return Ok(Config::load(path)?);
    }
    let start = cli.input.parent().unwrap_or_else(|| Path::new("."));
    Ok(Config::discover(start)?.unwrap_or_default())
}
